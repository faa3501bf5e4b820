//! Open generic implementations.
//!
//! Generic code cannot be instantiated at runtime, so an open implementation
//! is the finite set of closed forms compiled into the host. Resolving a
//! closed interface form picks the implementation form with the same generic
//! arguments.

use crate::component::{ComponentType, Injectable};
use crate::error::{ContainerError, Result};
use crate::instance::Implements;
use crate::types::{GenericForm, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

struct DefinitionInner {
  name: &'static str,
  forms: Vec<ComponentType>,
}

/// An open generic implementation and its known closed forms.
///
/// ```
/// use fibre_di::{Constructor, GenericDefinition, GenericForm, Injectable, TypeInfo};
/// use std::marker::PhantomData;
///
/// trait Repository<T>: Send + Sync {}
/// impl<T: 'static> GenericForm for dyn Repository<T> {
///   const DEFINITION: &'static str = "Repository";
///   fn arguments() -> Vec<TypeInfo> {
///     vec![TypeInfo::of::<T>()]
///   }
/// }
///
/// struct MemoryRepository<T>(PhantomData<fn() -> T>);
/// impl<T: 'static> Repository<T> for MemoryRepository<T> {}
/// impl<T: 'static> GenericForm for MemoryRepository<T> {
///   const DEFINITION: &'static str = "MemoryRepository";
///   fn arguments() -> Vec<TypeInfo> {
///     vec![TypeInfo::of::<T>()]
///   }
/// }
/// impl<T: 'static> Injectable for MemoryRepository<T> {
///   fn constructors() -> Vec<Constructor<Self>> {
///     vec![Constructor::public().build(|_| Ok(MemoryRepository(PhantomData)))]
///   }
/// }
/// impl<T: 'static> fibre_di::Implements<dyn Repository<T>> for MemoryRepository<T> {
///   fn upcast(self: std::sync::Arc<Self>) -> std::sync::Arc<dyn Repository<T>> {
///     self
///   }
/// }
///
/// struct User;
/// let definition = GenericDefinition::builder("MemoryRepository")
///   .close::<MemoryRepository<User>, dyn Repository<User>>()
///   .build()
///   .unwrap();
/// assert_eq!(definition.forms().len(), 1);
/// ```
#[derive(Clone)]
pub struct GenericDefinition {
  inner: Arc<DefinitionInner>,
}

impl GenericDefinition {
  pub fn builder(name: &'static str) -> GenericDefinitionBuilder {
    GenericDefinitionBuilder {
      name,
      forms: Vec::new(),
    }
  }

  pub fn name(&self) -> &'static str {
    self.inner.name
  }

  pub fn type_info(&self) -> TypeInfo {
    TypeInfo::definition(self.inner.name)
  }

  pub fn forms(&self) -> &[ComponentType] {
    &self.inner.forms
  }

  /// Whether every closed form can be viewed as a closed form of
  /// `interface_definition`.
  pub fn implements(&self, interface_definition: &str) -> bool {
    self.inner.forms.iter().all(|form| {
      form.type_info().generic_definition() == Some(interface_definition)
        || form.implements_definition(interface_definition)
    })
  }

  /// The closed form whose generic arguments equal those of `requested`.
  pub(crate) fn close(&self, requested: &TypeInfo) -> Result<&ComponentType> {
    self
      .inner
      .forms
      .iter()
      .find(|form| form.type_info().same_arguments(requested))
      .ok_or_else(|| ContainerError::UnclosableGeneric {
        definition: self.inner.name.to_owned(),
        requested: requested.name().to_owned(),
      })
  }

  /// Generic descriptors of every form and of the interfaces they declare.
  pub(crate) fn descriptors(&self) -> impl Iterator<Item = &TypeInfo> {
    self.inner.forms.iter().flat_map(|form| form.generic_descriptors())
  }

  /// Interface definitions declared by the closed forms.
  pub(crate) fn interface_definitions(&self) -> impl Iterator<Item = &'static str> + '_ {
    self
      .inner
      .forms
      .iter()
      .flat_map(|form| form.interfaces().filter_map(TypeInfo::generic_definition))
  }
}

impl fmt::Debug for GenericDefinition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GenericDefinition")
      .field("name", &self.inner.name)
      .field("forms", &self.inner.forms.iter().map(ComponentType::name).collect::<Vec<_>>())
      .finish()
  }
}

pub struct GenericDefinitionBuilder {
  name: &'static str,
  forms: Vec<ComponentType>,
}

impl GenericDefinitionBuilder {
  /// Adds a closed form. Its type must have been built with
  /// [`ComponentBuilder::generic`](crate::ComponentBuilder::generic).
  pub fn form(mut self, form: ComponentType) -> Self {
    self.forms.push(form);
    self
  }

  /// Adds the closed form `T` declared as the closed interface form `I`.
  pub fn close<T, I>(self) -> Self
  where
    T: Injectable + GenericForm + Implements<I>,
    I: ?Sized + Any + Send + Sync + GenericForm,
  {
    let form = ComponentType::builder::<T>().generic().implements_generic::<I>().build();
    self.form(form)
  }

  pub fn build(self) -> Result<GenericDefinition> {
    if let Some(stray) = self
      .forms
      .iter()
      .find(|form| form.type_info().generic_definition() != Some(self.name))
    {
      return Err(ContainerError::InvalidMapping {
        implementation: stray.name().to_owned(),
        interface: TypeInfo::definition(self.name).to_string(),
      });
    }
    Ok(GenericDefinition {
      inner: Arc::new(DefinitionInner {
        name: self.name,
        forms: self.forms,
      }),
    })
  }
}
