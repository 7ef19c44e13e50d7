use crucible_registry::{create_instance, global, register_object};

// The capability callers program against.
trait Greeter: Send + Sync {
  fn greet(&self) -> String;
}

#[derive(Default)]
struct EnglishGreeter;

impl Greeter for EnglishGreeter {
  fn greet(&self) -> String {
    "Hello!".to_string()
  }
}

#[derive(Default)]
struct GermanGreeter;

impl Greeter for GermanGreeter {
  fn greet(&self) -> String {
    "Hallo!".to_string()
  }
}

fn main() {
  // Two implementations of the same interface, told apart by class name.
  register_object!(global(), "greeter.en", trait Greeter, EnglishGreeter).leak();
  register_object!(global(), "greeter.de", trait Greeter, GermanGreeter).leak();

  for name in ["greeter.en", "greeter.de"] {
    let greeter = create_instance!(trait Greeter, name).unwrap();
    println!("{name}: {}", greeter.greet());
  }
}
