//! Notifications about objects built by a container.

use crate::instance::Instance;
use crate::types::TypeInfo;
use parking_lot::RwLock;
use std::sync::Arc;

/// Raised once for every object a container constructs from a type
/// registration or implicitly. Pool hits, instance registrations and factory
/// results do not raise it.
#[derive(Debug, Clone)]
pub struct ObjectCreated {
  type_info: TypeInfo,
  name: Option<String>,
  instance: Instance,
}

impl ObjectCreated {
  pub(crate) fn new(type_info: TypeInfo, name: Option<&str>, instance: Instance) -> Self {
    Self {
      type_info,
      name: name.map(str::to_owned),
      instance,
    }
  }

  /// The implementation type that was constructed.
  pub fn type_info(&self) -> &TypeInfo {
    &self.type_info
  }

  /// The name of the registration being resolved.
  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn instance(&self) -> &Instance {
    &self.instance
  }
}

pub(crate) type Listener = Arc<dyn Fn(&ObjectCreated) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Listeners {
  listeners: RwLock<Vec<Listener>>,
}

impl Listeners {
  pub(crate) fn add(&self, listener: Listener) {
    self.listeners.write().push(listener);
  }

  pub(crate) fn clear(&self) {
    self.listeners.write().clear();
  }

  pub(crate) fn notify(&self, event: &ObjectCreated) {
    // Listeners may resolve from the container, so call them outside the lock.
    let listeners: Vec<Listener> = self.listeners.read().clone();
    for listener in listeners {
      listener(event);
    }
  }
}
