use crucible_registry::{create_instance, global};

struct TelemetrySink;

fn main() {
  // Nothing ever registered this name; emptiness is the failure signal and
  // the only one. Resolution never panics.
  match create_instance!(TelemetrySink, "telemetry.sink") {
    Some(_) => unreachable!("nothing registered this name"),
    None => println!("Correctly received `None` for the missing class."),
  }

  assert!(!global().is_registered("telemetry.sink"));
}
