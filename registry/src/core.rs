//! Core, non-public data structures for the registry.

use crate::handle::{Constructed, NativeHandle};

use std::any::Any;
use std::sync::Arc;

pub(crate) type ConstructFn = Box<dyn Fn() -> Constructed + Send + Sync>;
pub(crate) type DestroyFn = Box<dyn Fn(NativeHandle) + Send + Sync>;
pub(crate) type EvictFn = Box<dyn FnOnce() + Send + Sync>;

/// Immutable construct/destroy pair for one registered class name.
///
/// Shared via `Arc` between the class table entry and every in-flight
/// instance, so unregistering a class never invalidates the destroy path of
/// instances already created from it.
pub(crate) struct ClassInfo {
  construct: ConstructFn,
  destroy: DestroyFn,
}

impl ClassInfo {
  pub(crate) fn new(construct: ConstructFn, destroy: DestroyFn) -> Self {
    Self { construct, destroy }
  }

  pub(crate) fn construct(&self) -> Constructed {
    (self.construct)()
  }

  pub(crate) fn destroy(&self, native: NativeHandle) {
    (self.destroy)(native)
  }
}

/// Shared guts of a live instance: the type-erased interface view, the
/// untyped native handle, and the teardown protocol.
///
/// Dropped when the last [`Obj`](crate::Obj) over it goes away. Teardown
/// order: erase the singleton cache entry (if any), release the view, then
/// hand the native handle to the stored destroy function. Destroy receives
/// the exact handle that construct produced.
pub(crate) struct ObjCore {
  view: Option<Box<dyn Any + Send + Sync>>,
  native: Option<NativeHandle>,
  info: Arc<ClassInfo>,
  evict: Option<EvictFn>,
}

impl ObjCore {
  pub(crate) fn new(info: Arc<ClassInfo>, built: Constructed, evict: Option<EvictFn>) -> Self {
    Self {
      view: Some(built.view),
      native: Some(built.native),
      info,
      evict,
    }
  }

  /// Clones the typed view out of the erased one. `None` when the caller
  /// asked for a different interface than the one registered for this class.
  pub(crate) fn view<I>(&self) -> Option<Arc<I>>
  where
    I: ?Sized + Any + Send + Sync,
  {
    self.view.as_ref()?.downcast_ref::<Arc<I>>().cloned()
  }
}

impl Drop for ObjCore {
  fn drop(&mut self) {
    if let Some(evict) = self.evict.take() {
      evict();
    }
    // The view must go before destroy so the native handle is the last
    // owner when the destroy function consumes it.
    self.view = None;
    if let Some(native) = self.native.take() {
      self.info.destroy(native);
    }
  }
}
