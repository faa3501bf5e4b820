//! Type-erased object handles and the upcasting glue between
//! implementations and the interfaces they are registered as.

use crate::error::{ContainerError, Result};
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A resource that must be released when its owning container is disposed.
pub trait Disposable: Send + Sync {
  fn dispose(&self);
}

/// Converts a shared implementation into a shared interface object.
///
/// Every type implements `Implements<Self>`. Trait objects are added with the
/// [`implements!`](crate::implements) macro or by hand:
///
/// ```
/// use fibre_di::Implements;
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {}
/// struct SystemClock;
/// impl Clock for SystemClock {}
///
/// impl Implements<dyn Clock> for SystemClock {
///   fn upcast(self: Arc<Self>) -> Arc<dyn Clock> {
///     self
///   }
/// }
/// ```
pub trait Implements<I: ?Sized>: Send + Sync + 'static {
  fn upcast(self: Arc<Self>) -> Arc<I>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
  fn upcast(self: Arc<Self>) -> Arc<T> {
    self
  }
}

/// A cheaply clonable, type-erased handle to a resolved object.
///
/// Internally an `Arc<T>` for the type `T` the object was produced as; `T` may
/// be a trait object. [`downcast`](Instance::downcast) recovers it.
#[derive(Clone)]
pub struct Instance {
  value: Arc<dyn Any + Send + Sync>,
  type_name: &'static str,
  address: usize,
}

impl Instance {
  pub fn new<T: ?Sized + Any + Send + Sync>(value: Arc<T>) -> Self {
    let address = Arc::as_ptr(&value) as *const () as usize;
    Self {
      value: Arc::new(value),
      type_name: type_name::<T>(),
      address,
    }
  }

  pub fn downcast<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.value.downcast_ref::<Arc<T>>().cloned()
  }

  pub fn is<T: ?Sized + Any + Send + Sync>(&self) -> bool {
    self.value.is::<Arc<T>>()
  }

  /// The type this handle was produced as.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// Whether both handles point at the same object, even when viewed
  /// through different interfaces.
  pub fn same_object(&self, other: &Instance) -> bool {
    self.address == other.address
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Instance({} @ {:#x})", self.type_name, self.address)
  }
}

pub(crate) fn downcast_instance<T: ?Sized + Any + Send + Sync>(instance: &Instance) -> Result<Arc<T>> {
  instance
    .downcast::<T>()
    .ok_or_else(|| ContainerError::TypeMismatch {
      expected: type_name::<T>().to_owned(),
      actual: instance.type_name().to_owned(),
    })
}

/// Re-views an instance produced as one type as another.
pub(crate) type Caster = fn(&Instance) -> Option<Instance>;

pub(crate) fn same_instance(instance: &Instance) -> Option<Instance> {
  Some(instance.clone())
}

pub(crate) fn upcast_instance<T, I>(instance: &Instance) -> Option<Instance>
where
  T: Implements<I>,
  I: ?Sized + Any + Send + Sync,
{
  instance
    .downcast::<T>()
    .map(|object| Instance::new::<I>(<T as Implements<I>>::upcast(object)))
}

/// Releases a pooled object when the container is disposed.
pub(crate) type Disposer = Box<dyn FnOnce() + Send + Sync>;
