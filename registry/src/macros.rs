//! Registration and resolution macros layered over the registry operations.

/// Registers a concrete type under a class name, optionally viewed through a
/// trait interface.
///
/// Expands to a [`register_class`](crate::Registry::register_class) call
/// whose construct function allocates the concrete type (via
/// `Default::default()` unless a factory is given) and whose destroy
/// function drops the native handle. Evaluates to the registration token.
///
/// # Examples
///
/// ```
/// use crucible_registry::{register_object, Registry};
///
/// trait Greeter: Send + Sync {
///   fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct EnglishGreeter;
///
/// impl Greeter for EnglishGreeter {
///   fn greet(&self) -> String {
///     "Hello!".to_string()
///   }
/// }
///
/// let registry = Registry::new();
/// let _token = register_object!(registry, "greeter.english", trait Greeter, EnglishGreeter);
///
/// let greeter = registry
///   .create_instance::<dyn Greeter>("greeter.english")
///   .unwrap();
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! register_object {
  // Trait view, Default-constructed concrete type.
  ($registry:expr, $name:expr, trait $iface:ident, $concrete:ty) => {
    $crate::register_object!(
      $registry,
      $name,
      trait $iface,
      $concrete,
      <$concrete as ::std::default::Default>::default
    )
  };

  // Trait view, explicit factory.
  ($registry:expr, $name:expr, trait $iface:ident, $concrete:ty, $factory:expr) => {
    $registry.register_class(
      $name,
      move || {
        let obj: ::std::sync::Arc<$concrete> = ::std::sync::Arc::new(($factory)());
        let view: ::std::sync::Arc<dyn $iface> = obj.clone();
        $crate::Constructed::new(obj, view)
      },
      |native| drop(native),
    )
  };

  // Concrete view, Default-constructed.
  ($registry:expr, $name:expr, $concrete:ty) => {
    $crate::register_object!(
      $registry,
      $name,
      $concrete,
      <$concrete as ::std::default::Default>::default
    )
  };

  // Concrete view, explicit factory.
  ($registry:expr, $name:expr, $concrete:ty, $factory:expr) => {
    $registry.register_class(
      $name,
      move || {
        let obj: ::std::sync::Arc<$concrete> = ::std::sync::Arc::new(($factory)());
        $crate::Constructed::new(obj.clone(), obj)
      },
      |native| drop(native),
    )
  };
}

/// Creates a fresh instance from the global registry.
///
/// Two forms, mirroring
/// [`create_instance`](crate::Registry::create_instance):
/// `create_instance!(Type, "name")` and
/// `create_instance!(trait Trait, "name")`. Both yield `Option<Obj<..>>`;
/// `None` means the name could not be resolved.
///
/// # Examples
///
/// ```
/// use crucible_registry::{create_instance, global, register_object};
///
/// #[derive(Default)]
/// struct Cursor {
///   row: u32,
/// }
///
/// register_object!(global(), "ui.cursor", Cursor).leak();
///
/// let cursor = create_instance!(Cursor, "ui.cursor").unwrap();
/// assert_eq!(cursor.row, 0);
/// assert!(create_instance!(Cursor, "ui.missing").is_none());
/// ```
#[macro_export]
macro_rules! create_instance {
  (trait $iface:ident, $name:expr) => {
    $crate::global().create_instance::<dyn $iface>($name)
  };
  ($type:ty, $name:expr) => {
    $crate::global().create_instance::<$type>($name)
  };
}

/// Returns the shared instance from the global registry, constructing it on
/// first use. Forms as in [`create_instance!`].
///
/// # Examples
///
/// ```
/// use crucible_registry::{create_singleton, global, register_object, Obj};
///
/// #[derive(Default)]
/// struct Clock;
///
/// register_object!(global(), "time.clock", Clock).leak();
///
/// let a = create_singleton!(Clock, "time.clock").unwrap();
/// let b = create_singleton!(Clock, "time.clock").unwrap();
/// assert!(Obj::ptr_eq(&a, &b));
/// ```
#[macro_export]
macro_rules! create_singleton {
  (trait $iface:ident, $name:expr) => {
    $crate::global().create_singleton::<dyn $iface>($name)
  };
  ($type:ty, $name:expr) => {
    $crate::global().create_singleton::<$type>($name)
  };
}
