//! The `Registry`: class table, singleton cache, and resolution pipeline.

use crate::core::{ClassInfo, EvictFn, ObjCore};
use crate::handle::{Constructed, NativeHandle, Obj};
use crate::loader::{DylibLoader, ModuleLoader};

use dashmap::DashMap;

use std::any::Any;
use std::sync::{Arc, Weak};

/// Separator splitting a module locator off the front of a class name.
///
/// For `"codecs@Json"` the locator is `codecs` and the full string, separator
/// included, remains the lookup key; the loaded module must register under
/// that exact name.
pub const MODULE_SEPARATOR: &str = "@";

type ClassTable = DashMap<String, Arc<ClassInfo>>;
type SingletonCache = DashMap<String, Weak<ObjCore>>;

/// A thread-safe object factory keyed by class name.
///
/// Three pieces composed into one object: the class table (name to
/// construct/destroy pair), the singleton cache (name to the currently-live
/// shared instance), and the resolution pipeline that falls back to loading
/// an external module on a lookup miss. No lock is ever held while user
/// callbacks run (construct, destroy, module load, module init), so those
/// callbacks may freely re-enter the registry.
///
/// Most code uses the process-wide instance via [`global()`](crate::global);
/// standalone registries are useful for tests and for scoped plugin sets.
pub struct Registry {
  classes: Arc<ClassTable>,
  singletons: Arc<SingletonCache>,
  loader: Box<dyn ModuleLoader>,
}

impl Default for Registry {
  fn default() -> Self {
    Self::with_loader(DylibLoader::new())
  }
}

impl Registry {
  /// Creates a registry backed by the default dynamic-library loader.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a registry with a custom module resolution strategy.
  pub fn with_loader(loader: impl ModuleLoader + 'static) -> Self {
    Self {
      classes: Arc::new(ClassTable::new()),
      singletons: Arc::new(SingletonCache::new()),
      loader: Box::new(loader),
    }
  }

  /// Registers a class under `name`.
  ///
  /// `construct` builds one instance and returns its native handle paired
  /// with the interface view; `destroy` receives that same native handle
  /// when the instance's last external owner releases it. If `name` is
  /// already registered the previous entry is overwritten; the last writer
  /// wins and no duplicate error is raised.
  ///
  /// The returned token unregisters the class when dropped. Removal is keyed
  /// by the name captured here, not by revalidating the entry: if another
  /// registration overwrote `name` in the meantime, dropping this token
  /// removes the newer entry. Instances already created keep their own
  /// reference to the construct/destroy pair and tear down correctly
  /// regardless.
  pub fn register_class<C, D>(
    &self,
    name: impl Into<String>,
    construct: C,
    destroy: D,
  ) -> RegistrationToken
  where
    C: Fn() -> Constructed + Send + Sync + 'static,
    D: Fn(NativeHandle) + Send + Sync + 'static,
  {
    let name = name.into();
    debug_assert!(!name.is_empty(), "class name must be non-empty");
    let info = Arc::new(ClassInfo::new(Box::new(construct), Box::new(destroy)));
    self.classes.insert(name.clone(), info);
    log::trace!("registered class `{name}`");
    RegistrationToken {
      classes: Arc::downgrade(&self.classes),
      name,
    }
  }

  /// `true` if `name` currently has a class table entry. Does not consult
  /// the module loader.
  pub fn is_registered(&self, name: &str) -> bool {
    self.classes.contains_key(name)
  }

  /// Creates a fresh instance of the class registered under `name`, viewed
  /// as `I`.
  ///
  /// Returns `None` when the name cannot be resolved, or when the view
  /// registered for the class is not an `Arc<I>`. Emptiness is the sole
  /// failure signal; this never panics.
  pub fn create_instance<I>(&self, name: &str) -> Option<Obj<I>>
  where
    I: ?Sized + Any + Send + Sync,
  {
    let info = self.resolve(name)?;
    self.materialize(info, None)
  }

  /// Returns the shared instance of the class registered under `name`,
  /// constructing one if no live instance exists.
  ///
  /// While at least one handle from a previous call is alive, further calls
  /// return the same instance. Once the last handle is released the instance
  /// is destroyed and its cache entry erased by its own teardown, so the
  /// next call constructs a fresh one; a dead instance is never revived.
  ///
  /// Two threads racing on the *first* request for `name` may both
  /// construct: construction is deliberately not serialized, only the cache
  /// reads and writes are. The handle stored last becomes the discoverable
  /// singleton while both instances remain valid and independently owned.
  /// "Singleton" here means at most one instance discoverable through the
  /// cache, not at most one ever constructed.
  pub fn create_singleton<I>(&self, name: &str) -> Option<Obj<I>>
  where
    I: ?Sized + Any + Send + Sync,
  {
    if let Some(core) = self.singletons.get(name).and_then(|e| e.value().upgrade()) {
      return Obj::from_core(core);
    }

    let info = self.resolve(name)?;
    let evict: EvictFn = {
      let cache = Arc::downgrade(&self.singletons);
      let key = name.to_owned();
      Box::new(move || {
        if let Some(cache) = cache.upgrade() {
          cache.remove(&key);
        }
      })
    };
    let obj = self.materialize::<I>(info, Some(evict))?;
    self
      .singletons
      .insert(name.to_owned(), Arc::downgrade(obj.core()));
    Some(obj)
  }

  /// Constructs an instance from resolved class info and wraps it in a
  /// handle.
  fn materialize<I>(&self, info: Arc<ClassInfo>, evict: Option<EvictFn>) -> Option<Obj<I>>
  where
    I: ?Sized + Any + Send + Sync,
  {
    let built = info.construct();
    // Even when the view cast below fails, dropping the core still routes
    // the constructed object through its destroy function; nothing leaks.
    let core = Arc::new(ObjCore::new(info, built, evict));
    Obj::from_core(core)
  }

  /// Resolution pipeline: exact lookup, then the module-load fallback with a
  /// single retry.
  fn resolve(&self, name: &str) -> Option<Arc<ClassInfo>> {
    if let Some(entry) = self.classes.get(name) {
      return Some(Arc::clone(entry.value()));
    }

    // The class may live in a module that is not loaded yet: everything
    // before the first separator locates the module, while the full name
    // stays the lookup key. The loader runs with no lock held.
    let (locator, _) = name.split_once(MODULE_SEPARATOR)?;
    match self.loader.load(locator, self) {
      Ok(()) => {
        let info = self.classes.get(name).map(|entry| Arc::clone(entry.value()));
        if info.is_none() {
          log::warn!("module `{locator}` loaded but did not register `{name}`");
        }
        info
      }
      Err(err) => {
        log::warn!("resolving `{name}`: {err}");
        None
      }
    }
  }
}

/// Proof of a registration; dropping it unregisters the class.
///
/// Removal is keyed by the name captured at registration time (see
/// [`Registry::register_class`]). Commonly held for the life of the
/// providing module and dropped at its teardown.
#[must_use = "dropping the token immediately unregisters the class"]
pub struct RegistrationToken {
  classes: Weak<ClassTable>,
  name: String,
}

impl RegistrationToken {
  /// The class name this token unregisters.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Keeps the registration for the remaining life of the process.
  pub fn leak(self) {
    std::mem::forget(self);
  }
}

impl Drop for RegistrationToken {
  fn drop(&mut self) {
    if let Some(classes) = self.classes.upgrade() {
      classes.remove(&self.name);
      log::trace!("unregistered class `{}`", self.name);
    }
  }
}
