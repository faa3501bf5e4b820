use fibre_di::{implements, ComponentType, Constructor, Container, Injectable, RegistrationConfig, TypeCatalog};
use std::sync::Arc;

trait Greeter: Send + Sync {
  fn greet(&self, name: &str) -> String;
}

struct EnglishGreeter;
impl Greeter for EnglishGreeter {
  fn greet(&self, name: &str) -> String {
    format!("Hello, {}!", name)
  }
}
impl Injectable for EnglishGreeter {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public().build(|_| Ok(EnglishGreeter))]
  }
}

struct FrenchGreeter;
impl Greeter for FrenchGreeter {
  fn greet(&self, name: &str) -> String {
    format!("Bonjour, {} !", name)
  }
}
impl Injectable for FrenchGreeter {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public().build(|_| Ok(FrenchGreeter))]
  }
}

implements!(EnglishGreeter => dyn Greeter);
implements!(FrenchGreeter => dyn Greeter);

const CONFIG: &str = r#"
container:
  resolution_timeout: 2s
registrations:
  - as: greeter
    type: english_greeter
  - as: greeter
    type: french_greeter
    name: fr
"#;

fn main() {
  // --- Catalog ---
  // Configuration refers to types by name, so they are published first.
  let catalog = TypeCatalog::new();
  catalog
    .add_interface_as::<dyn Greeter>("greeter")
    .add_component_as(
      "english_greeter",
      ComponentType::builder::<EnglishGreeter>().implements::<dyn Greeter>().build(),
    )
    .add_component_as(
      "french_greeter",
      ComponentType::builder::<FrenchGreeter>().implements::<dyn Greeter>().build(),
    );

  // --- Loading ---
  let config = RegistrationConfig::from_yaml_str(CONFIG).expect("invalid configuration");
  let container = Container::builder()
    .catalog(Arc::new(catalog))
    .settings(&config.container)
    .build()
    .unwrap();
  let count = container.register_from_config(&config).unwrap();
  println!("Loaded {} registrations:\n{}", count, container);

  // --- Resolution ---
  let default = container.resolve::<dyn Greeter>(None).unwrap();
  let french = container.resolve::<dyn Greeter>(Some("fr")).unwrap();
  println!("{}", default.greet("Ada"));
  println!("{}", french.greet("Ada"));
  assert_eq!(french.greet("Ada"), "Bonjour, Ada !");
}
