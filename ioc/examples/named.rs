use fibre_di::{implements, Constructor, Container, Injectable};
use std::collections::HashMap;
use std::sync::Arc;

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}
impl Injectable for EmailSender {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public().build(|_| Ok(EmailSender))]
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}
impl Injectable for SmsSender {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public().build(|_| Ok(SmsSender))]
  }
}

implements!(EmailSender => dyn MessageSender);
implements!(SmsSender => dyn MessageSender);

// Receives every named sender.
struct Broadcaster {
  senders: HashMap<String, Arc<dyn MessageSender>>,
}

impl Injectable for Broadcaster {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public()
      .named_group::<dyn MessageSender>("senders")
      .build(|args| {
        Ok(Broadcaster {
          senders: args.next_group()?,
        })
      })]
  }
}

fn main() {
  // --- Registration ---
  // Register both implementations with unique names.
  let container = Container::new();
  container
    .register_type_as::<EmailSender, dyn MessageSender>(Some("email"))
    .unwrap();
  container
    .register_type_as::<SmsSender, dyn MessageSender>(Some("sms"))
    .unwrap();

  // --- Resolution ---
  // Names select the implementation. They ignore case.
  let email_notifier = container.resolve::<dyn MessageSender>(Some("email")).unwrap();
  let sms_notifier = container.resolve::<dyn MessageSender>(Some("SMS")).unwrap();

  let result1 = email_notifier.send("test@example.com", "Hello from Fibre!");
  let result2 = sms_notifier.send("+123456789", "Hello from Fibre!");

  println!("{}", result1);
  println!("{}", result2);

  assert!(result1.contains("email"));
  assert!(result2.contains("SMS"));

  // --- Every Named Registration ---
  let broadcaster = container.resolve_component::<Broadcaster>(None).unwrap();
  let mut names: Vec<&String> = broadcaster.senders.keys().collect();
  names.sort();
  println!("Broadcasting through: {:?}", names);
  assert_eq!(broadcaster.senders.len(), 2);
}
