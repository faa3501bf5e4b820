//! Registration entries and resolution strategies.

use crate::component::{Arguments, ComponentType, Parameter};
use crate::container::{Container, ContainerInner};
use crate::error::{ContainerError, Result};
use crate::generic::GenericDefinition;
use crate::guard::ConstructionGuard;
use crate::instance::Instance;
use crate::key::RegistrationKey;
use crate::types::TypeInfo;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};

/// How often a type or factory registration constructs its object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
  /// One object per container, cached in its pool.
  #[default]
  PerContext,
  /// A new object for every resolution.
  PerDependency,
}

#[derive(Debug, Default)]
pub(crate) struct StrategyCell(AtomicU8);

impl StrategyCell {
  pub(crate) fn get(&self) -> Strategy {
    match self.0.load(Ordering::Acquire) {
      1 => Strategy::PerDependency,
      _ => Strategy::PerContext,
    }
  }

  fn set(&self, strategy: Strategy) {
    let raw = match strategy {
      Strategy::PerContext => 0,
      Strategy::PerDependency => 1,
    };
    self.0.store(raw, Ordering::Release);
  }
}

/// Adjusts the strategy of a type or factory registration until its key is
/// first resolved.
#[derive(Clone)]
pub struct StrategyHandle {
  key: RegistrationKey,
  strategy: Arc<StrategyCell>,
  container: Weak<ContainerInner>,
}

impl StrategyHandle {
  pub(crate) fn new(key: RegistrationKey, strategy: Arc<StrategyCell>, container: Weak<ContainerInner>) -> Self {
    Self {
      key,
      strategy,
      container,
    }
  }

  pub fn instance_per_dependency(self) -> Result<Self> {
    self.apply(Strategy::PerDependency)
  }

  pub fn instance_per_context(self) -> Result<Self> {
    self.apply(Strategy::PerContext)
  }

  pub fn strategy(&self) -> Strategy {
    self.strategy.get()
  }

  pub fn key(&self) -> &RegistrationKey {
    &self.key
  }

  fn apply(self, strategy: Strategy) -> Result<Self> {
    let container = self.container.upgrade().ok_or(ContainerError::Disposed)?;
    container.assert_not_disposed()?;
    container.assert_not_resolved(&self.key)?;
    self.strategy.set(strategy);
    Ok(self)
  }
}

impl fmt::Debug for StrategyHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StrategyHandle")
      .field("key", &self.key)
      .field("strategy", &self.strategy.get())
      .finish()
  }
}

type FactoryFn<I> = Arc<dyn Fn(&Container, &mut Arguments) -> Result<Arc<I>> + Send + Sync>;

/// A function producing the object for a registration.
///
/// ```
/// use fibre_di::{Container, Factory};
/// use std::sync::Arc;
///
/// struct Settings(u16);
///
/// let container = Container::new();
/// container
///   .register_factory_as(Factory::new(|| Arc::new(Settings(8080))), None)
///   .unwrap();
/// assert_eq!(container.resolve::<Settings>(None).unwrap().0, 8080);
/// ```
pub struct Factory<I: ?Sized> {
  parameters: Vec<Parameter>,
  invoke: FactoryFn<I>,
}

impl<I: ?Sized + Any + Send + Sync> Factory<I> {
  /// A factory without arguments.
  pub fn new<F>(factory: F) -> Self
  where
    F: Fn() -> Arc<I> + Send + Sync + 'static,
  {
    Self {
      parameters: Vec::new(),
      invoke: Arc::new(move |_: &Container, _: &mut Arguments| -> Result<Arc<I>> { Ok(factory()) }),
    }
  }

  /// A factory receiving the container that owns the registration.
  pub fn with_container<F>(factory: F) -> Self
  where
    F: Fn(&Container) -> Result<Arc<I>> + Send + Sync + 'static,
  {
    Self {
      parameters: Vec::new(),
      invoke: Arc::new(move |container: &Container, _: &mut Arguments| factory(container)),
    }
  }

  /// A factory whose arguments are resolved like constructor parameters.
  pub fn with_dependencies<F>(parameters: Vec<Parameter>, factory: F) -> Self
  where
    F: Fn(&mut Arguments) -> Result<Arc<I>> + Send + Sync + 'static,
  {
    Self {
      parameters,
      invoke: Arc::new(move |_: &Container, args: &mut Arguments| factory(args)),
    }
  }

  pub(crate) fn erase(self) -> ErasedFactory {
    let typed = self.invoke;
    ErasedFactory {
      interface: TypeInfo::of::<I>(),
      parameters: self.parameters,
      invoke: Arc::new(move |container: &Container, args: &mut Arguments| {
        typed(container, args).map(Instance::new::<I>)
      }),
    }
  }
}

impl<I: ?Sized> fmt::Debug for Factory<I> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Factory")
      .field("parameters", &self.parameters)
      .finish_non_exhaustive()
  }
}

pub(crate) struct ErasedFactory {
  interface: TypeInfo,
  parameters: Vec<Parameter>,
  invoke: Arc<dyn Fn(&Container, &mut Arguments) -> Result<Instance> + Send + Sync>,
}

impl ErasedFactory {
  pub(crate) fn interface(&self) -> &TypeInfo {
    &self.interface
  }

  pub(crate) fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub(crate) fn invoke(&self, container: &Container, args: &mut Arguments) -> Result<Instance> {
    (self.invoke)(container, args)
  }
}

pub(crate) enum Implementation {
  Component(ComponentType),
  Generic(GenericDefinition),
}

impl Implementation {
  pub(crate) fn name(&self) -> &str {
    match self {
      Implementation::Component(component) => component.name(),
      Implementation::Generic(definition) => definition.name(),
    }
  }
}

pub(crate) enum Registration {
  Type {
    implementation: Implementation,
    strategy: Arc<StrategyCell>,
    guard: Arc<ConstructionGuard>,
  },
  Instance {
    instance: Instance,
  },
  Factory {
    factory: ErasedFactory,
    strategy: Arc<StrategyCell>,
    guard: Arc<ConstructionGuard>,
    id: u64,
  },
  /// The container's registration of itself.
  Container,
}

impl Registration {
  pub(crate) fn of_type(implementation: Implementation) -> Self {
    Registration::Type {
      implementation,
      strategy: Arc::default(),
      guard: Arc::new(ConstructionGuard::new()),
    }
  }

  pub(crate) fn of_factory(factory: ErasedFactory, id: u64) -> Self {
    Registration::Factory {
      factory,
      strategy: Arc::default(),
      guard: Arc::new(ConstructionGuard::new()),
      id,
    }
  }

  pub(crate) fn strategy_cell(&self) -> Option<&Arc<StrategyCell>> {
    match self {
      Registration::Type { strategy, .. } | Registration::Factory { strategy, .. } => Some(strategy),
      Registration::Instance { .. } | Registration::Container => None,
    }
  }
}

impl fmt::Display for Registration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Registration::Type { implementation, .. } => write!(f, "Type: {}", implementation.name()),
      Registration::Instance { instance } => write!(f, "Instance: {}", instance.type_name()),
      Registration::Factory { factory, .. } => write!(f, "Factory: {}", factory.interface()),
      Registration::Container => f.write_str("<self>"),
    }
  }
}
