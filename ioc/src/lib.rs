//! # Fibre DI
//!
//! An embeddable, thread-safe object-resolution container for Rust.
//!
//! Given interface-to-implementation registrations, a [`Container`] builds
//! object graphs on demand: it resolves constructor dependencies
//! transitively, caches objects per container, detects circular
//! dependencies and supports parent/child scopes.
//!
//! ## Core Concepts
//!
//! - **Container**: holds registrations and the pool of objects it built.
//!   Children created with [`Container::child`] fall back to their parent.
//! - **Injectable**: a type the container can construct. It lists its
//!   constructors and their parameters as data.
//! - **Implements**: the upcast from an implementation to an interface trait
//!   object, usually declared with [`implements!`].
//! - **Strategy**: [`Strategy::PerContext`] (default) builds one object per
//!   container, [`Strategy::PerDependency`] builds one per resolution.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_di::{implements, Constructor, Container, Injectable};
//! use std::sync::Arc;
//!
//! trait MessageSource: Send + Sync {
//!   fn message(&self) -> String;
//! }
//!
//! struct FixedMessage;
//! impl MessageSource for FixedMessage {
//!   fn message(&self) -> String {
//!     "Hello, World!".to_string()
//!   }
//! }
//! impl Injectable for FixedMessage {
//!   fn constructors() -> Vec<Constructor<Self>> {
//!     vec![Constructor::public().build(|_| Ok(FixedMessage))]
//!   }
//! }
//! implements!(FixedMessage => dyn MessageSource);
//!
//! struct Greeter {
//!   source: Arc<dyn MessageSource>,
//! }
//! impl Injectable for Greeter {
//!   fn constructors() -> Vec<Constructor<Self>> {
//!     vec![Constructor::public()
//!       .param::<dyn MessageSource>("source")
//!       .build(|args| Ok(Greeter { source: args.next()? }))]
//!   }
//! }
//!
//! let container = Container::new();
//! container.register_type_as::<FixedMessage, dyn MessageSource>(None).unwrap();
//!
//! // `Greeter` is not registered; it is built from its own constructor.
//! let greeter = container.resolve_component::<Greeter>(None).unwrap();
//! assert_eq!(greeter.source.message(), "Hello, World!");
//!
//! // Per-context objects are built once per container.
//! let again = container.resolve_component::<Greeter>(None).unwrap();
//! assert!(Arc::ptr_eq(&greeter, &again));
//! ```

mod catalog;
mod component;
#[cfg(feature = "config")]
mod config;
mod container;
mod error;
mod events;
mod generic;
mod guard;
mod instance;
mod key;
mod macros;
mod options;
mod path;
mod pool;
mod registration;
mod types;

pub use catalog::TypeCatalog;
pub use component::{
  Arguments, ComponentBuilder, ComponentType, Constructor, ConstructorBuilder, Injectable, Parameter, Visibility,
  REGISTERED_NAME_PARAMETER,
};
#[cfg(feature = "config")]
pub use config::{ContainerSettings, RegistrationConfig, RegistrationEntry};
pub use container::{Container, ResolveAll};
pub use error::{ContainerError, PathSnapshot, Result};
pub use events::ObjectCreated;
pub use generic::{GenericDefinition, GenericDefinitionBuilder};
pub use instance::{Disposable, Implements, Instance};
pub use key::{Name, RegistrationKey};
pub use options::{ContainerBuilder, ContainerOptions, DEFAULT_RESOLUTION_TIMEOUT};
pub use path::ResolutionList;
pub use registration::{Factory, Strategy, StrategyHandle};
pub use types::{GenericForm, TypeIdentity, TypeInfo};
