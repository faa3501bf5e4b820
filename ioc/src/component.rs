//! Constructor metadata for types the container can build.
//!
//! There is no runtime reflection, so a constructible type describes itself by
//! implementing [`Injectable`]: a list of constructors, each with a visibility,
//! its parameter descriptors and a function that builds the value from the
//! resolved arguments.

use crate::container::Container;
use crate::error::{ContainerError, Result};
use crate::instance::{
  downcast_instance, same_instance, upcast_instance, Caster, Disposable, Disposer, Implements, Instance,
};
use crate::path::ResolutionList;
use crate::types::{GenericForm, TypeInfo};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Name of the `String` constructor parameter that receives the registered
/// name of the object being built instead of being resolved.
pub const REGISTERED_NAME_PARAMETER: &str = "registered_name";

/// A type the container can construct.
///
/// ```
/// use fibre_di::{Constructor, Injectable};
///
/// struct Clock;
///
/// impl Injectable for Clock {
///   fn constructors() -> Vec<Constructor<Self>> {
///     vec![Constructor::public().build(|_| Ok(Clock))]
///   }
/// }
/// ```
pub trait Injectable: Send + Sync + Sized + 'static {
  fn constructors() -> Vec<Constructor<Self>>;

  /// Exposes the object's cleanup hook. Objects returning `Some` are disposed
  /// together with the container that constructed them.
  fn as_disposable(&self) -> Option<&dyn Disposable> {
    None
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
  Public,
  NonPublic,
}

pub(crate) type GroupResolver = fn(&Container, &ResolutionList) -> Result<Instance>;

#[derive(Clone, Copy)]
pub(crate) enum ParameterKind {
  /// Resolved through registrations only.
  Dependency,
  /// Resolved through registrations, or built from its own constructors.
  Component(fn() -> ComponentType),
  /// Every named registration of the element type, keyed by name.
  NamedGroup(GroupResolver),
}

/// Describes one constructor or factory parameter.
#[derive(Clone)]
pub struct Parameter {
  name: &'static str,
  type_info: TypeInfo,
  kind: ParameterKind,
}

impl Parameter {
  pub fn of<T: ?Sized + Any + Send + Sync>(name: &'static str) -> Self {
    Self {
      name,
      type_info: TypeInfo::of::<T>(),
      kind: ParameterKind::Dependency,
    }
  }

  /// A dependency that may also be built without being registered.
  pub fn component<T: Injectable>(name: &'static str) -> Self {
    Self {
      name,
      type_info: TypeInfo::of::<T>(),
      kind: ParameterKind::Component(ComponentType::of::<T>),
    }
  }

  /// The `String` parameter that receives the registered name.
  pub fn registered_name() -> Self {
    Self::of::<String>(REGISTERED_NAME_PARAMETER)
  }

  /// A `HashMap<String, Arc<T>>` of every named registration of `T`.
  pub fn named_group<T: ?Sized + Any + Send + Sync>(name: &'static str) -> Self {
    Self {
      name,
      type_info: TypeInfo::of::<HashMap<String, Arc<T>>>(),
      kind: ParameterKind::NamedGroup(group_instance::<T>),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn type_info(&self) -> &TypeInfo {
    &self.type_info
  }

  pub fn is_registered_name(&self) -> bool {
    self.name == REGISTERED_NAME_PARAMETER && self.type_info == TypeInfo::of::<String>()
  }

  pub(crate) fn kind(&self) -> ParameterKind {
    self.kind
  }
}

impl fmt::Debug for Parameter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.name, self.type_info)
  }
}

fn group_instance<T: ?Sized + Any + Send + Sync>(container: &Container, path: &ResolutionList) -> Result<Instance> {
  let group = container.named_group::<T>(path)?;
  Ok(Instance::new(Arc::new(group)))
}

pub(crate) enum Argument {
  Value(Instance),
  Name(Option<String>),
}

/// Resolved arguments, consumed in declaration order.
pub struct Arguments {
  values: std::vec::IntoIter<Argument>,
  position: usize,
}

impl Arguments {
  pub(crate) fn new(values: Vec<Argument>) -> Self {
    Self {
      values: values.into_iter(),
      position: 0,
    }
  }

  pub fn remaining(&self) -> usize {
    self.values.len()
  }

  /// Takes the next resolved dependency.
  pub fn next<T: ?Sized + Any + Send + Sync>(&mut self) -> Result<Arc<T>> {
    let position = self.advance();
    match self.values.next() {
      Some(Argument::Value(instance)) => downcast_instance::<T>(&instance).map_err(|_| mismatch::<T>(position)),
      _ => Err(mismatch::<T>(position)),
    }
  }

  /// Takes the registered name of the object under construction.
  pub fn next_name(&mut self) -> Result<Option<String>> {
    let position = self.advance();
    match self.values.next() {
      Some(Argument::Name(name)) => Ok(name),
      _ => Err(mismatch::<String>(position)),
    }
  }

  /// Takes a named group declared with [`Parameter::named_group`].
  pub fn next_group<T: ?Sized + Any + Send + Sync>(&mut self) -> Result<HashMap<String, Arc<T>>> {
    let position = self.position;
    self
      .next::<HashMap<String, Arc<T>>>()
      .map(|group| (*group).clone())
      .map_err(|_| mismatch::<HashMap<String, Arc<T>>>(position))
  }

  fn advance(&mut self) -> usize {
    let position = self.position;
    self.position += 1;
    position
  }
}

fn mismatch<T: ?Sized>(position: usize) -> ContainerError {
  ContainerError::ArgumentMismatch {
    position,
    expected: type_name::<T>().to_owned(),
  }
}

type Invoke<T> = Arc<dyn Fn(&mut Arguments) -> Result<T> + Send + Sync>;

/// One way of building a `T`.
pub struct Constructor<T> {
  visibility: Visibility,
  parameters: Vec<Parameter>,
  invoke: Invoke<T>,
}

impl Constructor<()> {
  pub fn public() -> ConstructorBuilder {
    ConstructorBuilder::new(Visibility::Public)
  }

  pub fn non_public() -> ConstructorBuilder {
    ConstructorBuilder::new(Visibility::NonPublic)
  }
}

impl<T> Constructor<T> {
  pub fn visibility(&self) -> Visibility {
    self.visibility
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }
}

/// Collects constructor parameters in order.
pub struct ConstructorBuilder {
  visibility: Visibility,
  parameters: Vec<Parameter>,
}

impl ConstructorBuilder {
  fn new(visibility: Visibility) -> Self {
    Self {
      visibility,
      parameters: Vec::new(),
    }
  }

  pub fn param<D: ?Sized + Any + Send + Sync>(mut self, name: &'static str) -> Self {
    self.parameters.push(Parameter::of::<D>(name));
    self
  }

  pub fn component<D: Injectable>(mut self, name: &'static str) -> Self {
    self.parameters.push(Parameter::component::<D>(name));
    self
  }

  pub fn registered_name(mut self) -> Self {
    self.parameters.push(Parameter::registered_name());
    self
  }

  pub fn named_group<D: ?Sized + Any + Send + Sync>(mut self, name: &'static str) -> Self {
    self.parameters.push(Parameter::named_group::<D>(name));
    self
  }

  pub fn parameter(mut self, parameter: Parameter) -> Self {
    self.parameters.push(parameter);
    self
  }

  pub fn build<T, F>(self, invoke: F) -> Constructor<T>
  where
    F: Fn(&mut Arguments) -> Result<T> + Send + Sync + 'static,
  {
    Constructor {
      visibility: self.visibility,
      parameters: self.parameters,
      invoke: Arc::new(invoke),
    }
  }
}

#[derive(Clone)]
pub(crate) struct ErasedConstructor {
  visibility: Visibility,
  parameters: Vec<Parameter>,
  invoke: Arc<dyn Fn(&mut Arguments) -> Result<Instance> + Send + Sync>,
}

impl ErasedConstructor {
  fn from_typed<T: Injectable>(constructor: Constructor<T>) -> Self {
    let typed = constructor.invoke;
    Self {
      visibility: constructor.visibility,
      parameters: constructor.parameters,
      invoke: Arc::new(move |args: &mut Arguments| typed(args).map(|value| Instance::new(Arc::new(value)))),
    }
  }

  pub(crate) fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub(crate) fn invoke(&self, args: &mut Arguments) -> Result<Instance> {
    (self.invoke)(args)
  }
}

#[derive(Clone)]
struct Cast {
  interface: TypeInfo,
  caster: Caster,
}

struct ComponentInner {
  type_info: TypeInfo,
  constructors: Vec<ErasedConstructor>,
  casts: Vec<Cast>,
  disposer: fn(&Instance) -> Option<Disposer>,
}

/// A constructible implementation type with the interfaces it can be viewed
/// as.
#[derive(Clone)]
pub struct ComponentType {
  inner: Arc<ComponentInner>,
}

impl ComponentType {
  pub fn of<T: Injectable>() -> Self {
    Self::builder::<T>().build()
  }

  pub fn builder<T: Injectable>() -> ComponentBuilder<T> {
    ComponentBuilder {
      type_info: TypeInfo::of::<T>(),
      casts: Vec::new(),
      _marker: PhantomData,
    }
  }

  pub fn type_info(&self) -> &TypeInfo {
    &self.inner.type_info
  }

  pub fn name(&self) -> &'static str {
    self.inner.type_info.name()
  }

  /// The interface types this component declared, excluding itself.
  pub fn interfaces(&self) -> impl Iterator<Item = &TypeInfo> {
    self.inner.casts.iter().map(|cast| &cast.interface)
  }

  /// Whether an instance of this component can be used as `interface`.
  pub fn implements(&self, interface: &TypeInfo) -> bool {
    self.caster_for(interface).is_some()
  }

  pub(crate) fn caster_for(&self, interface: &TypeInfo) -> Option<Caster> {
    if *interface == self.inner.type_info {
      return Some(same_instance);
    }
    self
      .inner
      .casts
      .iter()
      .find(|cast| cast.interface == *interface)
      .map(|cast| cast.caster)
  }

  /// Whether some declared interface is a closed form of `definition`.
  pub(crate) fn implements_definition(&self, definition: &str) -> bool {
    self
      .inner
      .casts
      .iter()
      .any(|cast| cast.interface.generic_definition() == Some(definition))
  }

  pub(crate) fn generic_descriptors(&self) -> impl Iterator<Item = &TypeInfo> {
    std::iter::once(&self.inner.type_info)
      .chain(self.interfaces())
      .filter(|t| t.has_generic_info())
  }

  /// Picks the constructor with the most parameters, preferring public ones.
  pub(crate) fn select_constructor(&self, path: &ResolutionList) -> Result<&ErasedConstructor> {
    let constructors = &self.inner.constructors;
    if constructors.is_empty() {
      return Err(ContainerError::NoConstructor {
        type_name: self.name().to_owned(),
      });
    }
    let has_public = constructors.iter().any(|c| c.visibility == Visibility::Public);
    let wanted = if has_public { Visibility::Public } else { Visibility::NonPublic };

    let mut candidates = constructors.iter().filter(|c| c.visibility == wanted);
    let mut best = candidates.next();
    let mut tied = false;
    for candidate in candidates {
      let current = best.map_or(0, |b| b.parameters.len());
      if candidate.parameters.len() > current {
        best = Some(candidate);
        tied = false;
      } else if candidate.parameters.len() == current {
        tied = true;
      }
    }

    match best {
      Some(_) if tied => Err(ContainerError::AmbiguousConstructor {
        type_name: self.name().to_owned(),
        path: path.snapshot(),
      }),
      Some(constructor) => Ok(constructor),
      None => Err(ContainerError::NoConstructor {
        type_name: self.name().to_owned(),
      }),
    }
  }

  /// The cleanup hook for an instance built by this component, if it has one.
  pub(crate) fn disposer_for(&self, instance: &Instance) -> Option<Disposer> {
    (self.inner.disposer)(instance)
  }
}

impl fmt::Debug for ComponentType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ComponentType")
      .field("type", &self.inner.type_info)
      .field("interfaces", &self.interfaces().collect::<Vec<_>>())
      .field("constructors", &self.inner.constructors.len())
      .finish()
  }
}

impl PartialEq for ComponentType {
  fn eq(&self, other: &Self) -> bool {
    self.inner.type_info == other.inner.type_info
  }
}

/// Declares the interfaces a component can be registered as.
///
/// ```
/// use fibre_di::{implements, ComponentType, Constructor, Injectable, TypeInfo};
///
/// trait Clock: Send + Sync {}
/// struct SystemClock;
/// impl Clock for SystemClock {}
/// implements!(SystemClock => dyn Clock);
///
/// impl Injectable for SystemClock {
///   fn constructors() -> Vec<Constructor<Self>> {
///     vec![Constructor::public().build(|_| Ok(SystemClock))]
///   }
/// }
///
/// let component = ComponentType::builder::<SystemClock>().implements::<dyn Clock>().build();
/// assert!(component.implements(&TypeInfo::of::<dyn Clock>()));
/// ```
pub struct ComponentBuilder<T: Injectable> {
  type_info: TypeInfo,
  casts: Vec<Cast>,
  _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> ComponentBuilder<T> {
  pub fn implements<I>(mut self) -> Self
  where
    I: ?Sized + Any + Send + Sync,
    T: Implements<I>,
  {
    self.casts.push(Cast {
      interface: TypeInfo::of::<I>(),
      caster: upcast_instance::<T, I>,
    });
    self
  }

  /// Like [`implements`](Self::implements) for a closed generic interface.
  pub fn implements_generic<I>(mut self) -> Self
  where
    I: ?Sized + Any + Send + Sync + GenericForm,
    T: Implements<I>,
  {
    self.casts.push(Cast {
      interface: TypeInfo::generic::<I>(),
      caster: upcast_instance::<T, I>,
    });
    self
  }

  /// Marks the component itself as a closed generic form.
  pub fn generic(mut self) -> Self
  where
    T: GenericForm,
  {
    self.type_info = TypeInfo::generic::<T>();
    self
  }

  pub fn build(self) -> ComponentType {
    ComponentType {
      inner: Arc::new(ComponentInner {
        type_info: self.type_info,
        constructors: T::constructors().into_iter().map(ErasedConstructor::from_typed).collect(),
        casts: self.casts,
        disposer: component_disposer::<T>,
      }),
    }
  }
}

fn component_disposer<T: Injectable>(instance: &Instance) -> Option<Disposer> {
  let object = instance.downcast::<T>()?;
  object.as_disposable()?;
  Some(Box::new(move || {
    if let Some(disposable) = object.as_disposable() {
      disposable.dispose();
    }
  }))
}
