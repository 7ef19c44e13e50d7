//! Pluggable module resolution: how a locator becomes registered classes.

use crate::registry::Registry;

use libloading::Library;
use parking_lot::Mutex;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Exported entry point a dynamic module may provide. Invoked once, right
/// after the library is loaded, with no lock held; it may call back into the
/// registry freely.
pub const MODULE_INIT_SYMBOL: &[u8] = b"crucible_module_init";

type InitFn = unsafe extern "C" fn();

/// Error raised when a module locator resolves but the load itself fails.
#[derive(Debug, thiserror::Error)]
pub enum ModuleLoadError {
  /// The dynamic library could not be opened.
  #[error("failed to load module `{locator}`")]
  Open {
    locator: String,
    #[source]
    source: libloading::Error,
  },
  /// A custom loader could not supply the module.
  #[error("module `{locator}` is unavailable: {reason}")]
  Unavailable { locator: String, reason: String },
}

/// Strategy invoked on a class-table miss for names carrying a module
/// locator.
///
/// An implementation makes the classes behind `locator` registered, either
/// in `registry` or in the global one for modules that self-register, and
/// the caller retries the lookup once afterwards. Substituting an
/// implementation swaps the discovery mechanism (dynamic libraries, static
/// linking, a test stub) without touching the class table or singleton cache
/// logic.
///
/// `load` is called with no registry lock held, so implementations may
/// re-enter the registry, including from module initialization code.
pub trait ModuleLoader: Send + Sync {
  fn load(&self, locator: &str, registry: &Registry) -> Result<(), ModuleLoadError>;
}

/// Default loader: opens the locator as a dynamic library and keeps it
/// resident for the life of the process. Unloading is left entirely to
/// process teardown.
///
/// A bare locator is mapped to the platform library file name (`codecs` to
/// `libcodecs.so` / `codecs.dll` / `libcodecs.dylib`); a locator with an
/// extension or a path component is used verbatim. Class registration is
/// expected to happen as a side effect of the module's initializers or of
/// its [`MODULE_INIT_SYMBOL`] entry point.
///
/// A load failure is a broken deployment: it trips a `debug_assert!` in
/// debug builds and degrades to an error (and thus an empty resolution) in
/// release builds.
#[derive(Default)]
pub struct DylibLoader {
  resident: Mutex<HashMap<String, Library>>,
}

impl DylibLoader {
  pub fn new() -> Self {
    Self::default()
  }

  fn library_path(locator: &str) -> PathBuf {
    let path = Path::new(locator);
    if path.extension().is_some() || path.components().count() > 1 {
      path.to_path_buf()
    } else {
      PathBuf::from(libloading::library_filename(locator))
    }
  }

  /// Resident check, open, and bookkeeping around one load attempt.
  ///
  /// The resident lock is never held while `open` runs: opening a library
  /// can be arbitrarily slow and runs the module's initializers, which may
  /// re-enter this loader on the same thread for another module. The cost
  /// is that two racing loads of one locator may both open it; that is
  /// benign, the loser's handle is dropped while the stored one keeps the
  /// module mapped, and the caller's retry lookup decides whether the load
  /// helped.
  fn load_inner(
    &self,
    locator: &str,
    open: impl FnOnce() -> Result<Library, ModuleLoadError>,
  ) -> Result<(), ModuleLoadError> {
    {
      let resident = self.resident.lock();
      if resident.contains_key(locator) {
        return Ok(());
      }
    }

    let lib = open()?;

    // Copy the entry point out as a plain fn pointer; the library stays
    // resident, so the pointer remains valid past this borrow.
    let init = unsafe { lib.get::<InitFn>(MODULE_INIT_SYMBOL) }
      .ok()
      .map(|symbol| *symbol);

    let first = {
      let mut resident = self.resident.lock();
      match resident.entry(locator.to_owned()) {
        Entry::Occupied(_) => false,
        Entry::Vacant(slot) => {
          slot.insert(lib);
          true
        }
      }
    };

    // Only the load that won the bookkeeping race runs the entry point,
    // with no lock held.
    if first {
      if let Some(init) = init {
        // Safety: the symbol matches the documented zero-argument entry
        // point convention and its library is kept resident above.
        unsafe { init() };
      }
    }
    Ok(())
  }
}

impl ModuleLoader for DylibLoader {
  fn load(&self, locator: &str, _registry: &Registry) -> Result<(), ModuleLoadError> {
    self.load_inner(locator, || {
      let path = Self::library_path(locator);
      // Safety: loading a library runs its initializers; that is the whole
      // point of the fallback, and the library stays resident afterwards.
      match unsafe { Library::new(&path) } {
        Ok(lib) => {
          log::debug!("loaded module `{locator}` from {}", path.display());
          Ok(lib)
        }
        Err(source) => {
          debug_assert!(
            false,
            "required module failed to load: `{locator}`: {source}"
          );
          Err(ModuleLoadError::Open {
            locator: locator.to_owned(),
            source,
          })
        }
      }
    })
  }
}
