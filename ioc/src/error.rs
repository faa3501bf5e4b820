use std::fmt;

use thiserror::Error;

/// A snapshot of the resolution path at the moment an error was raised.
///
/// Type names are listed in call order, outermost first. When rendered with
/// `Display` an empty snapshot produces nothing, a non-empty one produces a
/// ` (resolution path: A->B->C)` suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSnapshot(Vec<String>);

impl PathSnapshot {
  pub(crate) fn new(types: Vec<String>) -> Self {
    Self(types)
  }

  pub fn types(&self) -> &[String] {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Display for PathSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0.is_empty() {
      return Ok(());
    }
    write!(f, " (resolution path: {})", self.0.join("->"))
  }
}

/// The error type for every fallible container operation.
#[derive(Debug, Error)]
pub enum ContainerError {
  #[error("Object container disposed")]
  Disposed,

  #[error("Base container is no longer available")]
  ParentReleased,

  #[error("Interface cannot be resolved: {key}{path}")]
  Unresolvable { key: String, path: PathSnapshot },

  #[error("Primitive types or structs cannot be resolved: {type_name}{path}")]
  PrimitiveType { type_name: String, path: PathSnapshot },

  #[error("Circular dependency found! {type_name}{path}")]
  CircularDependency { type_name: String, path: PathSnapshot },

  #[error("Multiple public constructors with same maximum parameter count are not supported! {type_name}{path}")]
  AmbiguousConstructor { type_name: String, path: PathSnapshot },

  #[error("Type does not declare any constructor: {type_name}")]
  NoConstructor { type_name: String },

  #[error("Concurrent object resolution timeout (potential circular dependency): {key}{path}")]
  ConcurrentResolutionTimeout { key: String, path: PathSnapshot },

  #[error("An object has been resolved for this interface already: {key}")]
  AlreadyResolved { key: String },

  #[error("Invalid type mapping: {implementation} cannot be used as {interface}")]
  InvalidMapping {
    implementation: String,
    interface: String,
  },

  #[error("Generic definition '{definition}' has no closed form for {requested}")]
  UnclosableGeneric { definition: String, requested: String },

  #[error("Resolved object of type {actual} cannot be used as {expected}")]
  TypeMismatch { expected: String, actual: String },

  #[error("Constructor argument #{position} is not available as {expected}")]
  ArgumentMismatch { position: usize, expected: String },

  #[error("Registered name '{name}' cannot be converted to {key_type}")]
  InvalidNamedKey { name: String, key_type: String },

  #[error("Object construction failed: {0}")]
  Construction(String),

  #[error("Unknown type in container configuration: {0}")]
  UnknownType(String),

  #[error("Invalid container configuration: {0}")]
  Config(String),
}

impl ContainerError {
  /// Wraps a failure reported by user construction code.
  pub fn construction(reason: impl fmt::Display) -> Self {
    ContainerError::Construction(reason.to_string())
  }

  /// The resolution path captured with the error, if the error carries one.
  pub fn resolution_path(&self) -> Option<&PathSnapshot> {
    match self {
      ContainerError::Unresolvable { path, .. }
      | ContainerError::PrimitiveType { path, .. }
      | ContainerError::CircularDependency { path, .. }
      | ContainerError::AmbiguousConstructor { path, .. }
      | ContainerError::ConcurrentResolutionTimeout { path, .. } => Some(path),
      _ => None,
    }
  }

  pub fn is_circular_dependency(&self) -> bool {
    matches!(self, ContainerError::CircularDependency { .. })
  }
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = ContainerError> = std::result::Result<T, E>;
