//! Public macros for declaring registrations.

/// Implements [`Implements`](crate::Implements) for each listed interface so
/// the type can be registered as, and resolved through, those interfaces.
///
/// # Examples
///
/// ```
/// use fibre_di::{implements, Constructor, Container, Injectable};
///
/// trait Greeter: Send + Sync {
///   fn greet(&self) -> String;
/// }
/// trait Named: Send + Sync {
///   fn name(&self) -> &str;
/// }
///
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter {
///   fn greet(&self) -> String {
///     "Hello!".to_string()
///   }
/// }
/// impl Named for EnglishGreeter {
///   fn name(&self) -> &str {
///     "english"
///   }
/// }
/// impl Injectable for EnglishGreeter {
///   fn constructors() -> Vec<Constructor<Self>> {
///     vec![Constructor::public().build(|_| Ok(EnglishGreeter))]
///   }
/// }
///
/// implements!(EnglishGreeter => dyn Greeter, dyn Named);
///
/// let container = Container::new();
/// container.register_type_as::<EnglishGreeter, dyn Greeter>(None).unwrap();
/// assert_eq!(container.resolve::<dyn Greeter>(None).unwrap().greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! implements {
  ($ty:ty => $($iface:ty),+ $(,)?) => {
    $(
      impl $crate::Implements<$iface> for $ty {
        fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$iface> {
          self
        }
      }
    )+
  };
}
