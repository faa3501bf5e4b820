use fibre_di::{implements, Constructor, Container, Injectable};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

impl Injectable for ConsoleLogger {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public().build(|_| Ok(ConsoleLogger))]
  }
}

implements!(ConsoleLogger => dyn Logger);

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

// The service lists its dependencies; it never creates its own logger.
impl Injectable for ReportService {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public()
      .param::<dyn Logger>("logger")
      .build(|args| Ok(ReportService { logger: args.next()? }))]
  }
}

fn main() {
  // --- Registration ---
  let container = Container::new();
  container
    .register_type_as::<ConsoleLogger, dyn Logger>(None)
    .expect("logger registration failed");

  // --- Resolution and Usage ---
  // ReportService is not registered. It is built from its constructor and the
  // logger is injected from the registration above.
  println!("Resolving the high-level service...");
  let report_service = container
    .resolve_component::<ReportService>(None)
    .expect("report service could not be resolved");

  println!("Using the service...");
  report_service.generate_report();

  let logger = container.resolve::<dyn Logger>(None).unwrap();
  assert!(Arc::ptr_eq(&report_service.logger, &logger));
  println!("\nThe service received the container's shared logger.");
}
