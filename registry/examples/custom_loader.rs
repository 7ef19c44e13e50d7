//! Substitutes the module discovery strategy: instead of dynamic libraries,
//! "modules" here are statically linked registration functions.

use crucible_registry::{Constructed, ModuleLoadError, ModuleLoader, Obj, Registry};

use std::sync::Arc;

trait Codec: Send + Sync {
  fn name(&self) -> &'static str;
}

struct Json;

impl Codec for Json {
  fn name(&self) -> &'static str {
    "json"
  }
}

struct StaticModules;

impl ModuleLoader for StaticModules {
  fn load(&self, locator: &str, registry: &Registry) -> Result<(), ModuleLoadError> {
    match locator {
      "codecs" => {
        println!("Linking in the `codecs` module...");
        registry
          .register_class(
            "codecs@Json",
            || {
              let obj = Arc::new(Json);
              let view: Arc<dyn Codec> = obj.clone();
              Constructed::new(obj, view)
            },
            |native| drop(native),
          )
          .leak();
        Ok(())
      }
      other => Err(ModuleLoadError::Unavailable {
        locator: other.to_owned(),
        reason: "not linked into this binary".to_string(),
      }),
    }
  }
}

fn main() {
  let registry = Registry::with_loader(StaticModules);

  // Nothing is registered up front; the locator prefix pulls the module in
  // on the first miss, and the retry finds the class under the full name.
  let codec: Obj<dyn Codec> = registry.create_instance("codecs@Json").unwrap();
  println!("Resolved codec: {}", codec.name());

  // Unknown locators degrade to an empty result.
  assert!(registry.create_instance::<dyn Codec>("archives@Zip").is_none());
  println!("`archives@Zip` stayed unresolved, as expected.");
}
