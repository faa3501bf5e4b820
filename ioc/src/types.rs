//! Runtime type descriptors used as registration and pool keys.

use once_cell::sync::Lazy;
use std::any::{type_name, Any, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// Types that are never constructed by the container.
static PRIMITIVES: Lazy<HashSet<TypeId>> = Lazy::new(|| {
  [
    TypeId::of::<()>(),
    TypeId::of::<bool>(),
    TypeId::of::<char>(),
    TypeId::of::<i8>(),
    TypeId::of::<i16>(),
    TypeId::of::<i32>(),
    TypeId::of::<i64>(),
    TypeId::of::<i128>(),
    TypeId::of::<isize>(),
    TypeId::of::<u8>(),
    TypeId::of::<u16>(),
    TypeId::of::<u32>(),
    TypeId::of::<u64>(),
    TypeId::of::<u128>(),
    TypeId::of::<usize>(),
    TypeId::of::<f32>(),
    TypeId::of::<f64>(),
    TypeId::of::<str>(),
    TypeId::of::<&'static str>(),
    TypeId::of::<String>(),
  ]
  .into_iter()
  .collect()
});

/// What a `TypeInfo` stands for: a concrete type, or an open generic
/// definition known only by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeIdentity {
  Concrete(TypeId),
  Definition(&'static str),
}

/// Declares that a type is one closed form of a generic definition.
///
/// ```
/// use fibre_di::{GenericForm, TypeInfo};
///
/// trait Repository<T>: Send + Sync {}
///
/// impl<T: 'static> GenericForm for dyn Repository<T> {
///   const DEFINITION: &'static str = "Repository";
///   fn arguments() -> Vec<TypeInfo> {
///     vec![TypeInfo::of::<T>()]
///   }
/// }
/// ```
pub trait GenericForm {
  const DEFINITION: &'static str;

  fn arguments() -> Vec<TypeInfo>;
}

#[derive(Debug)]
struct GenericInfo {
  definition: &'static str,
  arguments: Vec<TypeInfo>,
}

/// A runtime descriptor of a type.
///
/// Equality and hashing only look at the identity. Generic information is
/// extra knowledge attached to closed forms so they can be matched against
/// their open definition with [`TypeInfo::matches`].
#[derive(Clone)]
pub struct TypeInfo {
  identity: TypeIdentity,
  name: &'static str,
  generic: Option<Arc<GenericInfo>>,
}

impl TypeInfo {
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      identity: TypeIdentity::Concrete(TypeId::of::<T>()),
      name: type_name::<T>(),
      generic: None,
    }
  }

  /// Describes a closed generic form, keeping its definition and arguments.
  pub fn generic<T: ?Sized + Any + GenericForm>() -> Self {
    Self {
      identity: TypeIdentity::Concrete(TypeId::of::<T>()),
      name: type_name::<T>(),
      generic: Some(Arc::new(GenericInfo {
        definition: T::DEFINITION,
        arguments: T::arguments(),
      })),
    }
  }

  /// Describes an open generic definition.
  pub fn definition(name: &'static str) -> Self {
    Self {
      identity: TypeIdentity::Definition(name),
      name,
      generic: None,
    }
  }

  pub fn identity(&self) -> TypeIdentity {
    self.identity
  }

  pub fn type_id(&self) -> Option<TypeId> {
    match self.identity {
      TypeIdentity::Concrete(id) => Some(id),
      TypeIdentity::Definition(_) => None,
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn is_generic_definition(&self) -> bool {
    matches!(self.identity, TypeIdentity::Definition(_))
  }

  /// The generic definition this type is, or is a closed form of.
  pub fn generic_definition(&self) -> Option<&'static str> {
    match self.identity {
      TypeIdentity::Definition(name) => Some(name),
      TypeIdentity::Concrete(_) => self.generic.as_ref().map(|g| g.definition),
    }
  }

  pub fn generic_arguments(&self) -> &[TypeInfo] {
    self
      .generic
      .as_ref()
      .map(|g| g.arguments.as_slice())
      .unwrap_or(&[])
  }

  pub fn has_generic_info(&self) -> bool {
    self.generic.is_some()
  }

  /// Primitives and strings are rejected by the resolver.
  pub fn is_primitive(&self) -> bool {
    match self.identity {
      TypeIdentity::Concrete(id) => PRIMITIVES.contains(&id),
      TypeIdentity::Definition(_) => false,
    }
  }

  /// Same type, or one of them is the generic definition of the other.
  pub fn matches(&self, other: &TypeInfo) -> bool {
    if self.identity == other.identity {
      return true;
    }
    match (self.identity, other.identity) {
      (TypeIdentity::Definition(def), TypeIdentity::Concrete(_)) => {
        other.generic_definition() == Some(def)
      }
      (TypeIdentity::Concrete(_), TypeIdentity::Definition(def)) => {
        self.generic_definition() == Some(def)
      }
      _ => false,
    }
  }

  /// Whether both are closed forms with pairwise identical arguments.
  pub(crate) fn same_arguments(&self, other: &TypeInfo) -> bool {
    let (ours, theirs) = (self.generic_arguments(), other.generic_arguments());
    ours.len() == theirs.len() && ours.iter().zip(theirs).all(|(a, b)| a == b)
  }
}

impl PartialEq for TypeInfo {
  fn eq(&self, other: &Self) -> bool {
    self.identity == other.identity
  }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.identity.hash(state);
  }
}

impl fmt::Display for TypeInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.identity {
      TypeIdentity::Definition(name) => write!(f, "{}<>", name),
      TypeIdentity::Concrete(_) => f.write_str(self.name),
    }
  }
}

impl fmt::Debug for TypeInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.generic {
      Some(generic) => write!(
        f,
        "TypeInfo({}, Definition({}), Arguments({:?}))",
        self.name, generic.definition, generic.arguments
      ),
      None => write!(f, "TypeInfo({})", self),
    }
  }
}
