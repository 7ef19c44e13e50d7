//! The process-wide registry instance.

use crate::registry::Registry;

use once_cell::sync::Lazy;

// The one and only process-wide registry. Created on first access in a
// thread-safe manner, never torn down before process exit.
static GLOBAL_REGISTRY: Lazy<Registry> = Lazy::new(Registry::default);

/// Provides a reference to the process-wide registry.
///
/// Lazily constructed on first access; the same instance is returned for the
/// rest of the process. Provider modules register into it at startup (or
/// when dynamically loaded) and client code resolves out of it from
/// anywhere.
///
/// # Examples
///
/// ```
/// use crucible_registry::global;
///
/// assert!(!global().is_registered("no.such.class"));
/// ```
pub fn global() -> &'static Registry {
  &GLOBAL_REGISTRY
}
