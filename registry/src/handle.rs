//! Public handle types: what constructors produce and what callers hold.

use crate::core::ObjCore;

use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// The untyped owning handle a construct function produces.
///
/// Teardown always operates on this handle, never on the typed view, so
/// release stays correct regardless of how the view's address relates to the
/// underlying allocation.
pub type NativeHandle = Arc<dyn Any + Send + Sync>;

/// The result of one construct call: the owning untyped handle plus a typed
/// view over the same object.
pub struct Constructed {
  pub(crate) native: NativeHandle,
  pub(crate) view: Box<dyn Any + Send + Sync>,
}

impl Constructed {
  /// Pairs the owning handle with its interface view.
  ///
  /// `view` is usually a clone of `native` coerced to the interface type:
  ///
  /// ```
  /// use crucible_registry::Constructed;
  /// use std::sync::Arc;
  ///
  /// trait Codec: Send + Sync {}
  /// struct Json;
  /// impl Codec for Json {}
  ///
  /// let obj = Arc::new(Json);
  /// let view: Arc<dyn Codec> = obj.clone();
  /// let built = Constructed::new(obj, view);
  /// # let _ = built;
  /// ```
  pub fn new<C, I>(native: Arc<C>, view: Arc<I>) -> Self
  where
    C: Any + Send + Sync,
    I: ?Sized + Any + Send + Sync,
  {
    Self {
      native,
      view: Box::new(view),
    }
  }
}

/// Shared ownership handle to a registry-created instance, viewed through the
/// interface `I`.
///
/// Clones share the same underlying instance. When the last clone is
/// released the instance tears down: its singleton cache entry (if it has
/// one) is erased and the registered destroy function receives the native
/// handle. This holds even if the class was unregistered in the meantime,
/// because the handle keeps its own reference to the construct/destroy pair.
pub struct Obj<I: ?Sized> {
  view: Arc<I>,
  core: Arc<ObjCore>,
}

impl<I: ?Sized> Obj<I> {
  pub(crate) fn from_core(core: Arc<ObjCore>) -> Option<Self>
  where
    I: Any + Send + Sync,
  {
    let view = core.view::<I>()?;
    Some(Self { view, core })
  }

  pub(crate) fn core(&self) -> &Arc<ObjCore> {
    &self.core
  }

  /// `true` if both handles refer to the same underlying instance.
  pub fn ptr_eq(a: &Self, b: &Self) -> bool {
    Arc::ptr_eq(&a.core, &b.core)
  }
}

impl<I: ?Sized> Clone for Obj<I> {
  fn clone(&self) -> Self {
    Self {
      view: self.view.clone(),
      core: self.core.clone(),
    }
  }
}

impl<I: ?Sized> Deref for Obj<I> {
  type Target = I;

  fn deref(&self) -> &I {
    &self.view
  }
}

impl<I: ?Sized + fmt::Debug> fmt::Debug for Obj<I> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(&**self, f)
  }
}
