//! The `Container`: registration table, object pool and resolution engine.

use crate::component::{Argument, Arguments, ComponentType, Injectable, Parameter, ParameterKind};
use crate::error::{ContainerError, Result};
use crate::events::{Listeners, ObjectCreated};
use crate::generic::GenericDefinition;
use crate::guard::ConstructionGuard;
use crate::instance::{downcast_instance, Disposable, Implements, Instance};
use crate::key::{PoolKey, PoolTarget, RegistrationKey};
use crate::options::{ContainerBuilder, ContainerOptions};
use crate::path::{InProgressGuard, ResolutionList};
use crate::pool::{ObjectPool, Pooled};
use crate::registration::{Factory, Implementation, Registration, Strategy, StrategyHandle};
use crate::types::TypeInfo;

use dashmap::{DashMap, DashSet};
use std::any::{type_name, Any};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

static NEXT_CONTAINER_ID: AtomicUsize = AtomicUsize::new(1);
static NEXT_FACTORY_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) struct ContainerInner {
  id: usize,
  options: ContainerOptions,
  parent: Option<Weak<ContainerInner>>,
  registrations: DashMap<RegistrationKey, Arc<Registration>>,
  /// Fallbacks for unregistered concrete types. Not registrations: they are
  /// invisible to lookups, listings and `resolve_all`.
  implicit: DashMap<RegistrationKey, Arc<Registration>>,
  pool: ObjectPool,
  resolved: DashSet<RegistrationKey>,
  listeners: Listeners,
  disposed: AtomicBool,
}

impl ContainerInner {
  pub(crate) fn assert_not_disposed(&self) -> Result<()> {
    if self.disposed.load(Ordering::Acquire) {
      return Err(ContainerError::Disposed);
    }
    Ok(())
  }

  /// An open definition key also counts as resolved once any of its closed
  /// forms has been.
  pub(crate) fn assert_not_resolved(&self, key: &RegistrationKey) -> Result<()> {
    let resolved = self.resolved.contains(key)
      || (key.type_info().is_generic_definition() && self.resolved.iter().any(|entry| key.matches(entry.key())));
    if resolved {
      return Err(ContainerError::AlreadyResolved { key: key.to_string() });
    }
    Ok(())
  }

  fn shutdown(&self) {
    if self.disposed.swap(true, Ordering::AcqRel) {
      debug!(container = self.id, "container already disposed");
      return;
    }
    let disposers = self.pool.clear();
    let disposed = disposers.len();
    for dispose in disposers {
      dispose();
    }
    self.registrations.clear();
    self.implicit.clear();
    self.resolved.clear();
    self.listeners.clear();
    debug!(container = self.id, disposed, "container disposed");
  }
}

impl Drop for ContainerInner {
  fn drop(&mut self) {
    if !self.disposed.load(Ordering::Acquire) {
      self.shutdown();
    }
  }
}

/// An object-resolution container.
///
/// Handles are cheap to clone and share one registration table and object
/// pool. The container is disposed when [`dispose`](Container::dispose) is
/// called or the last handle is dropped.
#[derive(Clone)]
pub struct Container {
  inner: Arc<ContainerInner>,
}

impl Default for Container {
  fn default() -> Self {
    Self::new()
  }
}

impl Container {
  /// Creates a new, empty root `Container` with default options.
  pub fn new() -> Self {
    Self::with_options(ContainerOptions::default(), None)
  }

  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::new()
  }

  pub(crate) fn with_options(options: ContainerOptions, parent: Option<&Container>) -> Self {
    let inner = Arc::new(ContainerInner {
      id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
      options,
      parent: parent.map(|p| Arc::downgrade(&p.inner)),
      registrations: DashMap::new(),
      implicit: DashMap::new(),
      pool: ObjectPool::default(),
      resolved: DashSet::new(),
      listeners: Listeners::default(),
      disposed: AtomicBool::new(false),
    });
    inner.registrations.insert(
      RegistrationKey::new(TypeInfo::of::<Container>(), None),
      Arc::new(Registration::Container),
    );
    trace!(container = inner.id, parent = ?parent.map(Container::id), "container created");
    Self { inner }
  }

  /// Creates a child scope that falls back to this container.
  pub fn child(&self) -> Result<Container> {
    ContainerBuilder::new().parent(self).build()
  }

  pub fn id(&self) -> usize {
    self.inner.id
  }

  /// The parent scope, if it is still alive.
  pub fn parent(&self) -> Option<Container> {
    let inner = self.inner.parent.as_ref()?.upgrade()?;
    Some(Container { inner })
  }

  pub fn options(&self) -> &ContainerOptions {
    &self.inner.options
  }

  pub fn is_disposed(&self) -> bool {
    self.inner.disposed.load(Ordering::Acquire)
  }

  pub(crate) fn assert_not_disposed(&self) -> Result<()> {
    self.inner.assert_not_disposed()
  }

  // --- REGISTRATION ---

  /// Registers `T` as the implementation of `I`, built from its constructors.
  pub fn register_type_as<T, I>(&self, name: Option<&str>) -> Result<StrategyHandle>
  where
    T: Injectable + Implements<I>,
    I: ?Sized + Any + Send + Sync,
  {
    let component = ComponentType::builder::<T>().implements::<I>().build();
    self.register_component_as(&component, &TypeInfo::of::<I>(), name)
  }

  /// Registers a component under a runtime interface type. Fails with
  /// `InvalidMapping` when the component does not declare the interface.
  pub fn register_component_as(
    &self,
    component: &ComponentType,
    interface: &TypeInfo,
    name: Option<&str>,
  ) -> Result<StrategyHandle> {
    if !component.implements(interface) {
      return Err(ContainerError::InvalidMapping {
        implementation: component.name().to_owned(),
        interface: interface.to_string(),
      });
    }
    let key = RegistrationKey::new(interface.clone(), name);
    let registration = Registration::of_type(Implementation::Component(component.clone()));
    self.register_with_strategy(key, registration)
  }

  /// Registers an open generic implementation for every closed form of the
  /// interface definition.
  pub fn register_generic_as(
    &self,
    definition: &GenericDefinition,
    interface_definition: &'static str,
    name: Option<&str>,
  ) -> Result<StrategyHandle> {
    if !definition.implements(interface_definition) {
      return Err(ContainerError::InvalidMapping {
        implementation: definition.type_info().to_string(),
        interface: TypeInfo::definition(interface_definition).to_string(),
      });
    }
    for descriptor in definition.descriptors() {
      self.inner.options.catalog.publish(descriptor);
    }
    let key = RegistrationKey::new(TypeInfo::definition(interface_definition), name);
    let registration = Registration::of_type(Implementation::Generic(definition.clone()));
    self.register_with_strategy(key, registration)
  }

  /// Registers a shared object. The container never disposes it.
  pub fn register_instance_as<I>(&self, instance: Arc<I>, name: Option<&str>) -> Result<()>
  where
    I: ?Sized + Any + Send + Sync,
  {
    let key = RegistrationKey::new(TypeInfo::of::<I>(), name);
    let instance = Instance::new(instance);
    self.register(key.clone(), Registration::Instance {
      instance: instance.clone(),
    })?;
    // A trait object has no implementation type for a type registration to
    // share the pool entry with.
    if is_sized::<I>() {
      let pool_key = PoolKey::new(PoolTarget::Type(TypeInfo::of::<I>().identity()), key.name_key());
      self.inner.pool.replace(pool_key, Pooled::NonDisposable(instance));
    }
    Ok(())
  }

  /// Registers a shared disposable object as `I`. With `dispose` set the
  /// container takes ownership and disposes it together with its pool.
  pub fn register_owned_instance_as<T, I>(&self, instance: Arc<T>, name: Option<&str>, dispose: bool) -> Result<()>
  where
    T: Disposable + Implements<I>,
    I: ?Sized + Any + Send + Sync,
  {
    let key = RegistrationKey::new(TypeInfo::of::<I>(), name);
    let interface = Instance::new::<I>(<T as Implements<I>>::upcast(Arc::clone(&instance)));
    self.register(key.clone(), Registration::Instance { instance: interface })?;

    let concrete = Instance::new(Arc::clone(&instance));
    let pooled = if dispose {
      Pooled::owned(concrete, Some(Box::new(move || instance.dispose())))
    } else {
      Pooled::NonDisposable(concrete)
    };
    let pool_key = PoolKey::new(PoolTarget::Type(TypeInfo::of::<T>().identity()), key.name_key());
    self.inner.pool.replace(pool_key, pooled);
    Ok(())
  }

  /// Registers a factory for `I`. Factory results are pooled per the
  /// strategy but never disposed by the container.
  pub fn register_factory_as<I>(&self, factory: Factory<I>, name: Option<&str>) -> Result<StrategyHandle>
  where
    I: ?Sized + Any + Send + Sync,
  {
    let key = RegistrationKey::new(TypeInfo::of::<I>(), name);
    let id = NEXT_FACTORY_ID.fetch_add(1, Ordering::Relaxed);
    self.register_with_strategy(key, Registration::of_factory(factory.erase(), id))
  }

  fn register_with_strategy(&self, key: RegistrationKey, registration: Registration) -> Result<StrategyHandle> {
    let strategy = registration
      .strategy_cell()
      .cloned()
      .unwrap_or_default();
    self.register(key.clone(), registration)?;
    Ok(StrategyHandle::new(key, strategy, Arc::downgrade(&self.inner)))
  }

  fn register(&self, key: RegistrationKey, registration: Registration) -> Result<()> {
    self.inner.assert_not_disposed()?;
    self.inner.assert_not_resolved(&key)?;
    debug!(container = self.inner.id, key = %key, registration = %registration, "registered");
    self.inner.registrations.insert(key, Arc::new(registration));
    Ok(())
  }

  /// Subscribes to objects constructed by this container.
  pub fn on_object_created<F>(&self, listener: F)
  where
    F: Fn(&ObjectCreated) + Send + Sync + 'static,
  {
    self.inner.listeners.add(Arc::new(listener));
  }

  // --- RESOLUTION ---

  /// Resolves `T`, optionally by registered name.
  pub fn resolve<T: ?Sized + Any + Send + Sync>(&self, name: Option<&str>) -> Result<Arc<T>> {
    let key = self.key_for(TypeInfo::of::<T>(), name);
    let instance = self.resolve_key(&key, None, &ResolutionList::new())?;
    downcast_instance::<T>(&instance)
  }

  /// Resolves `T`, building it from its own constructors when nothing is
  /// registered for it.
  pub fn resolve_component<T: Injectable>(&self, name: Option<&str>) -> Result<Arc<T>> {
    let type_info = TypeInfo::of::<T>();
    let component = self
      .inner
      .options
      .catalog
      .component_or_insert(&type_info, ComponentType::of::<T>);
    let key = self.key_for(type_info, name);
    let instance = self.resolve_key(&key, Some(&component), &ResolutionList::new())?;
    downcast_instance::<T>(&instance)
  }

  /// Resolves a runtime type descriptor to a type-erased instance.
  pub fn resolve_type(&self, type_info: &TypeInfo, name: Option<&str>) -> Result<Instance> {
    let key = self.key_for(type_info.clone(), name);
    self.resolve_key(&key, None, &ResolutionList::new())
  }

  /// Lazily resolves every registration of `T`, named or not, in this
  /// container and its ancestors.
  pub fn resolve_all<T: ?Sized + Any + Send + Sync>(&self) -> Result<ResolveAll<T>> {
    let keys = self.registration_keys(&TypeInfo::of::<T>(), false)?;
    Ok(ResolveAll {
      container: self.clone(),
      keys: keys.into_iter(),
      _marker: PhantomData,
    })
  }

  /// Every named registration of `T`, keyed by name.
  pub fn resolve_named<T: ?Sized + Any + Send + Sync>(&self) -> Result<HashMap<String, Arc<T>>> {
    self.named_group::<T>(&ResolutionList::new())
  }

  /// Like [`resolve_named`](Self::resolve_named) with names parsed into `K`.
  pub fn resolve_named_as<K, T>(&self) -> Result<HashMap<K, Arc<T>>>
  where
    K: FromStr + Eq + Hash,
    T: ?Sized + Any + Send + Sync,
  {
    self
      .resolve_named::<T>()?
      .into_iter()
      .map(|(name, value)| match name.parse::<K>() {
        Ok(key) => Ok((key, value)),
        Err(_) => Err(ContainerError::InvalidNamedKey {
          name,
          key_type: type_name::<K>().to_owned(),
        }),
      })
      .collect()
  }

  pub(crate) fn named_group<T: ?Sized + Any + Send + Sync>(
    &self,
    path: &ResolutionList,
  ) -> Result<HashMap<String, Arc<T>>> {
    let mut group = HashMap::new();
    for key in self.registration_keys(&TypeInfo::of::<T>(), true)? {
      let instance = self.resolve_key(&key, None, path)?;
      if let Some(name) = key.name() {
        group.insert(name.to_owned(), downcast_instance::<T>(&instance)?);
      }
    }
    Ok(group)
  }

  /// Whether a registration for `T` exists here or in an ancestor.
  pub fn is_registered<T: ?Sized + Any>(&self, name: Option<&str>) -> bool {
    let key = self.key_for(TypeInfo::of::<T>(), name);
    matches!(self.find_registration(&key), Ok(Some(_)))
  }

  /// Disposes every object this container constructed or owns, then drops
  /// all registrations. Later calls fail with `Disposed`. Idempotent.
  ///
  /// Dropping the last handle disposes too, but a pooled object that took the
  /// container as a constructor parameter holds a handle of its own. Such a
  /// container stays alive until `dispose` is called, which releases the
  /// pooled objects and with them the handles they hold.
  pub fn dispose(&self) {
    self.inner.shutdown();
  }

  // --- ENGINE ---

  fn key_for(&self, type_info: TypeInfo, name: Option<&str>) -> RegistrationKey {
    RegistrationKey::new(self.inner.options.catalog.describe(type_info), name)
  }

  fn resolve_key(
    &self,
    key: &RegistrationKey,
    fallback: Option<&ComponentType>,
    path: &ResolutionList,
  ) -> Result<Instance> {
    self.inner.assert_not_disposed()?;

    let type_info = key.type_info();
    if type_info.is_primitive() {
      return Err(ContainerError::PrimitiveType {
        type_name: type_info.name().to_owned(),
        path: path.snapshot(),
      });
    }

    let instance = match self.find_registration(key)? {
      Some((owner, registered, registration)) => {
        // An open request is served as the registered closed type.
        let target = if type_info.is_generic_definition() {
          registered.type_info().clone()
        } else {
          type_info.clone()
        };
        owner.resolve_registration(&registration, &target, key, path)?
      }
      None => {
        let registration = self.implicit_registration(key, fallback, path)?;
        self.resolve_registration(&registration, type_info, key, path)?
      }
    };

    self.inner.resolved.insert(key.clone());
    Ok(instance)
  }

  /// The requested type as its own implementation, kept apart from the
  /// registration table so the lookup leaves no registration behind.
  fn implicit_registration(
    &self,
    key: &RegistrationKey,
    fallback: Option<&ComponentType>,
    path: &ResolutionList,
  ) -> Result<Arc<Registration>> {
    let catalog = &self.inner.options.catalog;
    let component = fallback
      .cloned()
      .or_else(|| key.type_info().type_id().and_then(|id| catalog.component_for(id)))
      .ok_or_else(|| ContainerError::Unresolvable {
        key: key.to_string(),
        path: path.snapshot(),
      })?;

    trace!(container = self.inner.id, key = %key, "implicit fallback");
    let registration = self
      .inner
      .implicit
      .entry(key.clone())
      .or_insert_with(|| Arc::new(Registration::of_type(Implementation::Component(component))))
      .value()
      .clone();
    Ok(registration)
  }

  /// Finds the container owning the registration for `key`, with the key it
  /// is registered under.
  fn find_registration(
    &self,
    key: &RegistrationKey,
  ) -> Result<Option<(Container, RegistrationKey, Arc<Registration>)>> {
    if let Some((registered, registration)) = self.local_registration(key) {
      return Ok(Some((self.clone(), registered, registration)));
    }
    match self.parent_checked()? {
      Some(parent) => parent.find_registration(key),
      None => Ok(None),
    }
  }

  /// Exact key first, then the open definition of a closed request. An open
  /// request matches any closed registration of that definition.
  fn local_registration(&self, key: &RegistrationKey) -> Option<(RegistrationKey, Arc<Registration>)> {
    let registrations = &self.inner.registrations;
    if let Some(entry) = registrations.get(key) {
      return Some((key.clone(), entry.value().clone()));
    }
    if let Some(definition_key) = key.definition_key() {
      if let Some(entry) = registrations.get(&definition_key) {
        return Some((definition_key, entry.value().clone()));
      }
    }
    if key.type_info().is_generic_definition() {
      return registrations
        .iter()
        .find(|entry| entry.key().matches(key))
        .map(|entry| (entry.key().clone(), entry.value().clone()));
    }
    None
  }

  fn parent_checked(&self) -> Result<Option<Container>> {
    let Some(parent) = &self.inner.parent else {
      return Ok(None);
    };
    let inner = parent.upgrade().ok_or(ContainerError::ParentReleased)?;
    inner.assert_not_disposed()?;
    Ok(Some(Container { inner }))
  }

  fn resolve_registration(
    &self,
    registration: &Registration,
    target: &TypeInfo,
    key: &RegistrationKey,
    path: &ResolutionList,
  ) -> Result<Instance> {
    match registration {
      Registration::Instance { instance } => Ok(instance.clone()),
      Registration::Container => Ok(Instance::new(Arc::new(self.clone()))),
      Registration::Type {
        implementation,
        strategy,
        guard,
      } => {
        let component = match implementation {
          Implementation::Component(component) => component,
          Implementation::Generic(definition) => definition.close(target)?,
        };
        let pool_key = PoolKey::new(PoolTarget::Type(component.type_info().identity()), key.name_key());
        let instance = self.with_strategy(strategy.get(), guard, pool_key, key, path, || {
          self.construct_component(component, key, path)
        })?;
        cast(component, instance, target)
      }
      Registration::Factory {
        factory,
        strategy,
        guard,
        id,
      } => {
        let pool_key = PoolKey::new(PoolTarget::Factory(*id), key.name_key());
        self.with_strategy(strategy.get(), guard, pool_key, key, path, || {
          if path.contains(key) {
            return Err(ContainerError::CircularDependency {
              type_name: factory.interface().name().to_owned(),
              path: path.snapshot_with(factory.interface()),
            });
          }
          let _in_progress = InProgressGuard::enter(self.inner.id, key, factory.interface())?;
          let child_path = path.push(key.clone(), factory.interface().clone());
          let mut args = self.resolve_arguments(factory.parameters(), key, &child_path)?;
          trace!(container = self.inner.id, key = %key, "invoking factory");
          factory.invoke(self, &mut args).map(Pooled::NonDisposable)
        })
      }
    }
  }

  /// Applies the strategy: fresh object per call, or one pooled object per
  /// container built at most once under the registration's guard.
  fn with_strategy<F>(
    &self,
    strategy: Strategy,
    guard: &ConstructionGuard,
    pool_key: PoolKey,
    key: &RegistrationKey,
    path: &ResolutionList,
    construct: F,
  ) -> Result<Instance>
  where
    F: FnOnce() -> Result<Pooled>,
  {
    if strategy == Strategy::PerDependency {
      return construct().map(|pooled| pooled.instance().clone());
    }

    if let Some(instance) = self.pooled(&pool_key) {
      trace!(container = self.inner.id, key = %key, "pool hit");
      return Ok(instance);
    }

    if !self.inner.options.concurrency_guard {
      let pooled = construct()?;
      return Ok(self.inner.pool.insert(pool_key, pooled));
    }

    let timeout = self.inner.options.resolution_timeout;
    let Some(_lock) = guard.enter(timeout) else {
      debug!(container = self.inner.id, key = %key, ?timeout, "concurrent resolution timed out");
      return Err(ContainerError::ConcurrentResolutionTimeout {
        key: key.to_string(),
        path: path.snapshot(),
      });
    };

    // Another thread may have finished while we waited.
    if let Some(instance) = self.inner.pool.get(&pool_key) {
      return Ok(instance);
    }
    let pooled = construct()?;
    Ok(self.inner.pool.insert(pool_key, pooled))
  }

  /// Own pool first, then the ancestors' pools. Never writes upwards. A
  /// released ancestor is a miss.
  fn pooled(&self, pool_key: &PoolKey) -> Option<Instance> {
    if let Some(instance) = self.inner.pool.get(pool_key) {
      return Some(instance);
    }
    let inner = self.inner.parent.as_ref().and_then(Weak::upgrade)?;
    Container { inner }.pooled(pool_key)
  }

  fn construct_component(
    &self,
    component: &ComponentType,
    key: &RegistrationKey,
    path: &ResolutionList,
  ) -> Result<Pooled> {
    let constructor = component.select_constructor(path)?;
    if path.contains(key) {
      return Err(ContainerError::CircularDependency {
        type_name: component.name().to_owned(),
        path: path.snapshot_with(component.type_info()),
      });
    }

    let instance = {
      let _in_progress = InProgressGuard::enter(self.inner.id, key, component.type_info())?;
      let child_path = path.push(key.clone(), component.type_info().clone());
      trace!(container = self.inner.id, key = %key, implementation = %component.type_info(), depth = path.len(), "constructing");
      let mut args = self.resolve_arguments(constructor.parameters(), key, &child_path)?;
      constructor.invoke(&mut args)?
    };

    self.inner.listeners.notify(&ObjectCreated::new(
      component.type_info().clone(),
      key.name(),
      instance.clone(),
    ));
    let disposer = component.disposer_for(&instance);
    Ok(Pooled::owned(instance, disposer))
  }

  fn resolve_arguments(
    &self,
    parameters: &[Parameter],
    key: &RegistrationKey,
    path: &ResolutionList,
  ) -> Result<Arguments> {
    let mut values = Vec::with_capacity(parameters.len());
    for parameter in parameters {
      if parameter.is_registered_name() {
        values.push(Argument::Name(key.name().map(str::to_owned)));
        continue;
      }
      let value = match parameter.kind() {
        ParameterKind::NamedGroup(resolve_group) => resolve_group(self, path)?,
        ParameterKind::Component(build) => {
          let component = self
            .inner
            .options
            .catalog
            .component_or_insert(parameter.type_info(), build);
          let dependency = self.key_for(parameter.type_info().clone(), None);
          self.resolve_key(&dependency, Some(&component), path)?
        }
        ParameterKind::Dependency => {
          let dependency = self.key_for(parameter.type_info().clone(), None);
          self.resolve_key(&dependency, None, path)?
        }
      };
      values.push(Argument::Value(value));
    }
    Ok(Arguments::new(values))
  }

  /// Registration keys of exactly `type_info` along the hierarchy; nearer
  /// scopes shadow farther ones. Unnamed first, then by name.
  fn registration_keys(&self, type_info: &TypeInfo, named_only: bool) -> Result<Vec<RegistrationKey>> {
    self.inner.assert_not_disposed()?;
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    let mut scope = Some(self.clone());
    while let Some(container) = scope {
      for entry in container.inner.registrations.iter() {
        let key = entry.key();
        if key.type_info() == type_info && (!named_only || key.name().is_some()) && seen.insert(key.clone()) {
          keys.push(key.clone());
        }
      }
      scope = container.parent_checked()?;
    }
    keys.sort_by(|a, b| a.name().cmp(&b.name()));
    Ok(keys)
  }
}

/// Thin pointers mean a sized type.
fn is_sized<T: ?Sized>() -> bool {
  std::mem::size_of::<*const T>() == std::mem::size_of::<*const ()>()
}

fn cast(component: &ComponentType, instance: Instance, target: &TypeInfo) -> Result<Instance> {
  if target.is_generic_definition() {
    return Ok(instance);
  }
  component
    .caster_for(target)
    .and_then(|caster| caster(&instance))
    .ok_or_else(|| ContainerError::TypeMismatch {
      expected: target.name().to_owned(),
      actual: instance.type_name().to_owned(),
    })
}

impl fmt::Display for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut lines: Vec<String> = self
      .inner
      .registrations
      .iter()
      .map(|entry| format!("{} -> {}", entry.key(), entry.value()))
      .collect();
    lines.sort();
    f.write_str(&lines.join("\n"))
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("id", &self.inner.id)
      .field("registrations", &self.inner.registrations.len())
      .field("pooled", &self.inner.pool.len())
      .field("disposed", &self.is_disposed())
      .finish_non_exhaustive()
  }
}

/// Lazy sequence of every registration of `T`, returned by
/// [`Container::resolve_all`]. Each item resolves when it is reached.
pub struct ResolveAll<T: ?Sized> {
  container: Container,
  keys: std::vec::IntoIter<RegistrationKey>,
  _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized + Any + Send + Sync> Iterator for ResolveAll<T> {
  type Item = Result<Arc<T>>;

  fn next(&mut self) -> Option<Self::Item> {
    let key = self.keys.next()?;
    Some(
      self
        .container
        .resolve_key(&key, None, &ResolutionList::new())
        .and_then(|instance| downcast_instance::<T>(&instance)),
    )
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.keys.size_hint()
  }
}

impl<T: ?Sized + Any + Send + Sync> ExactSizeIterator for ResolveAll<T> {}

impl<T: ?Sized> fmt::Debug for ResolveAll<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ResolveAll")
      .field("remaining", &self.keys.len())
      .finish()
  }
}
