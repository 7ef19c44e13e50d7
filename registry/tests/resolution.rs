//! The module-load fallback: locator parsing, retry, and loader failures.

use crucible_registry::{Constructed, ModuleLoadError, ModuleLoader, Registry};

use std::sync::{Arc, Mutex};

// --- Helpers ---

fn register_value(registry: &Registry, name: impl Into<String>, value: u32) {
  registry
    .register_class(
      name,
      move || {
        let obj = Arc::new(value);
        Constructed::new(obj.clone(), obj)
      },
      |native| drop(native),
    )
    .leak();
}

// --- Loader Stubs ---

/// Records every locator it is asked for and registers the classes a real
/// module would have registered as a load side effect.
struct StubModules {
  calls: Arc<Mutex<Vec<String>>>,
  classes: Vec<String>,
}

impl ModuleLoader for StubModules {
  fn load(&self, locator: &str, registry: &Registry) -> Result<(), ModuleLoadError> {
    self.calls.lock().unwrap().push(locator.to_owned());
    let prefix = format!("{locator}@");
    for name in &self.classes {
      if name.starts_with(&prefix) {
        register_value(registry, name.clone(), 7);
      }
    }
    Ok(())
  }
}

struct FailingLoader;

impl ModuleLoader for FailingLoader {
  fn load(&self, locator: &str, _registry: &Registry) -> Result<(), ModuleLoadError> {
    Err(ModuleLoadError::Unavailable {
      locator: locator.to_owned(),
      reason: "no such module".to_string(),
    })
  }
}

// --- Resolution Tests ---

#[test]
fn test_miss_without_locator_never_consults_the_loader() {
  // Arrange
  let calls = Arc::new(Mutex::new(Vec::new()));
  let registry = Registry::with_loader(StubModules {
    calls: Arc::clone(&calls),
    classes: vec![],
  });

  // Act
  let missing = registry.create_instance::<u32>("Widget");

  // Assert: no separator, no load attempt.
  assert!(missing.is_none());
  assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_locator_load_registers_and_the_retry_succeeds() {
  // Arrange
  let calls = Arc::new(Mutex::new(Vec::new()));
  let registry = Registry::with_loader(StubModules {
    calls: Arc::clone(&calls),
    classes: vec!["widgets@Counter".to_string()],
  });
  assert!(!registry.is_registered("widgets@Counter"));

  // Act
  let counter = registry.create_instance::<u32>("widgets@Counter").unwrap();

  // Assert: the loader saw the locator, the full name became the key.
  assert_eq!(*counter, 7);
  assert_eq!(*calls.lock().unwrap(), vec!["widgets".to_string()]);
  assert!(registry.is_registered("widgets@Counter"));
}

#[test]
fn test_locator_splits_on_the_first_separator() {
  // Arrange
  let calls = Arc::new(Mutex::new(Vec::new()));
  let registry = Registry::with_loader(StubModules {
    calls: Arc::clone(&calls),
    classes: vec!["widgets@nested@Name".to_string()],
  });

  // Act
  let obj = registry.create_instance::<u32>("widgets@nested@Name");

  // Assert
  assert!(obj.is_some());
  assert_eq!(*calls.lock().unwrap(), vec!["widgets".to_string()]);
}

#[test]
fn test_load_without_registration_is_still_a_miss() {
  // Arrange
  let calls = Arc::new(Mutex::new(Vec::new()));
  let registry = Registry::with_loader(StubModules {
    calls: Arc::clone(&calls),
    classes: vec![],
  });

  // Act
  let ghost = registry.create_instance::<u32>("ghost@Thing");

  // Assert: the load "succeeded" but supplied nothing.
  assert!(ghost.is_none());
  assert_eq!(*calls.lock().unwrap(), vec!["ghost".to_string()]);
}

#[test]
fn test_failed_load_is_empty_not_a_panic() {
  let registry = Registry::with_loader(FailingLoader);
  assert!(registry.create_instance::<u32>("missing.mod@IFoo").is_none());
  assert!(registry.create_singleton::<u32>("missing.mod@IFoo").is_none());
}

#[test]
fn test_loader_may_reenter_the_registry() {
  // A module's initialization code may itself register helper classes and
  // resolve them while the load is in flight; nothing may deadlock.
  struct ReentrantLoader;

  impl ModuleLoader for ReentrantLoader {
    fn load(&self, locator: &str, registry: &Registry) -> Result<(), ModuleLoadError> {
      register_value(registry, "helper", 7);
      let helper = registry
        .create_instance::<u32>("helper")
        .expect("reentrant create_instance");
      assert_eq!(*helper, 7);

      register_value(registry, format!("{locator}@Main"), 11);
      Ok(())
    }
  }

  let registry = Registry::with_loader(ReentrantLoader);
  let main = registry.create_instance::<u32>("mods@Main").unwrap();
  assert_eq!(*main, 11);
}

#[test]
fn test_loader_is_retried_on_every_miss() {
  // The core does not cache load failures; each unresolved request asks the
  // loader again (the default dylib loader keeps its own resident set).
  let calls = Arc::new(Mutex::new(Vec::new()));
  let registry = Registry::with_loader(StubModules {
    calls: Arc::clone(&calls),
    classes: vec![],
  });

  assert!(registry.create_instance::<u32>("ghost@Thing").is_none());
  assert!(registry.create_instance::<u32>("ghost@Thing").is_none());
  assert_eq!(calls.lock().unwrap().len(), 2);
}
