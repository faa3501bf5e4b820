use fibre_di::{implements, Constructor, Container, Disposable, Injectable};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static NEXT_CONNECTION: AtomicUsize = AtomicUsize::new(1);

trait Connection: Send + Sync {
  fn id(&self) -> usize;
}

struct DbConnection {
  id: usize,
}

impl Connection for DbConnection {
  fn id(&self) -> usize {
    self.id
  }
}

impl Disposable for DbConnection {
  fn dispose(&self) {
    println!("Closing connection #{}", self.id);
  }
}

impl Injectable for DbConnection {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public().build(|_| {
      Ok(DbConnection {
        id: NEXT_CONNECTION.fetch_add(1, Ordering::SeqCst),
      })
    })]
  }

  fn as_disposable(&self) -> Option<&dyn Disposable> {
    Some(self)
  }
}

implements!(DbConnection => dyn Connection);

// A function that runs inside a request scope.
// By accepting a `&Container`, it can be tested with a controlled environment.
fn handle_request(app: &Container) -> usize {
  let request = app.child().expect("application container is disposed");
  request
    .register_type_as::<DbConnection, dyn Connection>(Some("request"))
    .unwrap();

  let connection = request.resolve::<dyn Connection>(Some("request")).unwrap();
  let id = connection.id();
  // Objects built by the request scope are disposed with it.
  request.dispose();
  id
}

fn main() {
  // --- Application Scope ---
  let app = Container::new();
  app
    .register_type_as::<DbConnection, dyn Connection>(None)
    .unwrap();
  let shared = app.resolve::<dyn Connection>(None).unwrap();
  println!("Application connection: #{}", shared.id());

  // --- Request Scopes ---
  let first = handle_request(&app);
  let second = handle_request(&app);
  println!("Request connections: #{} and #{}", first, second);
  assert_ne!(first, second);
  assert_ne!(first, shared.id());

  // Children see the parent's registrations and share its objects.
  let child = app.child().unwrap();
  let from_child = child.resolve::<dyn Connection>(None).unwrap();
  assert!(Arc::ptr_eq(&shared, &from_child));

  // --- Shutdown ---
  app.dispose();
  assert!(app.resolve::<dyn Connection>(None).is_err());
}
