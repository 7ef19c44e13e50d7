//! # Crucible Registry
//!
//! A thread-safe, dynamically-extensible object factory and class registry.
//!
//! Code requests an instance of a named capability (usually a trait) and
//! the registry decides which registered concrete type satisfies it. The
//! provider can sit in the same binary or in a dynamic library that is
//! lazily loaded the first time one of its class names is resolved.
//!
//! ## Core concepts
//!
//! - **Registry**: the class table plus the singleton cache. Classes are
//!   registered under string names at any point in the process lifetime.
//! - **Global registry**: a process-wide instance, accessible via
//!   [`global()`], lazily created on first use.
//! - **Instancing policies**: [`create_instance`](Registry::create_instance)
//!   builds a fresh object per call; [`create_singleton`](Registry::create_singleton)
//!   shares one live instance per name, reference-counted by usage and
//!   destroyed when the last handle goes away.
//! - **Module locators**: a name like `"codecs@Json"` tells the registry to
//!   load the `codecs` module on a lookup miss and retry; the module
//!   registers the class under the full name.
//!
//! Resolution failure is always an empty result, never a panic.
//!
//! ## Quick start
//!
//! ```
//! use crucible_registry::{create_singleton, global, register_object, Obj};
//!
//! // Define a capability and a concrete implementation.
//! trait Greeter: Send + Sync {
//!   fn greet(&self) -> String;
//! }
//!
//! #[derive(Default)]
//! struct EnglishGreeter;
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     "Hello, World!".to_string()
//!   }
//! }
//!
//! // Provider side: register under a name, keep the registration alive.
//! register_object!(global(), "greeter.en", trait Greeter, EnglishGreeter).leak();
//!
//! // Client side: ask for the shared instance by name.
//! let greeter = create_singleton!(trait Greeter, "greeter.en").unwrap();
//! assert_eq!(greeter.greet(), "Hello, World!");
//!
//! // Further requests share the same instance while a handle is alive.
//! let again = create_singleton!(trait Greeter, "greeter.en").unwrap();
//! assert!(Obj::ptr_eq(&greeter, &again));
//! ```

mod core;
mod global;
mod handle;
mod loader;
mod macros;
mod registry;

pub use global::global;
pub use handle::{Constructed, NativeHandle, Obj};
pub use loader::{DylibLoader, ModuleLoadError, ModuleLoader, MODULE_INIT_SYMBOL};
pub use registry::{RegistrationToken, Registry, MODULE_SEPARATOR};
