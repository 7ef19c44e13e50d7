use crucible_registry::{create_instance, global, register_object};

use std::sync::atomic::{AtomicUsize, Ordering};

// A global, thread-safe counter to hand out unique IDs.
static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

// Each resolved instance gets its own ID.
struct RequestContext {
  id: usize,
}

impl RequestContext {
  fn new() -> Self {
    println!("Constructing a fresh RequestContext...");
    Self {
      id: NEXT_ID.fetch_add(1, Ordering::SeqCst),
    }
  }
}

fn main() {
  // Register once; keep the registration for the life of the process.
  register_object!(global(), "http.request_context", RequestContext, RequestContext::new).leak();

  // Every request constructs a new instance.
  let first = create_instance!(RequestContext, "http.request_context").unwrap();
  let second = create_instance!(RequestContext, "http.request_context").unwrap();

  println!("first: {}, second: {}", first.id, second.id);
  assert_ne!(first.id, second.id);
  println!("Transient instances are distinct, as expected.");
}
