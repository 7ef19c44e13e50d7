use crucible_registry::{create_singleton, global, register_object, Obj};

use std::sync::atomic::{AtomicUsize, Ordering};

static GENERATION: AtomicUsize = AtomicUsize::new(0);

struct ConnectionPool {
  generation: usize,
}

impl ConnectionPool {
  fn new() -> Self {
    println!("Building connection pool...");
    Self {
      generation: GENERATION.fetch_add(1, Ordering::SeqCst),
    }
  }
}

fn main() {
  register_object!(global(), "db.pool", ConnectionPool, ConnectionPool::new).leak();

  // --- Shared while held ---
  let a = create_singleton!(ConnectionPool, "db.pool").unwrap();
  let b = create_singleton!(ConnectionPool, "db.pool").unwrap();
  assert!(Obj::ptr_eq(&a, &b), "both handles share one pool");
  println!("Shared pool generation: {}", a.generation);

  // --- Destroyed on last release, rebuilt on demand ---
  drop(a);
  drop(b);

  let c = create_singleton!(ConnectionPool, "db.pool").unwrap();
  println!("Rebuilt pool generation: {}", c.generation);
  assert_eq!(c.generation, 1, "a dead singleton is never revived");
}
