//! Name-based type lookup and generic descriptors.

use crate::component::{ComponentType, Injectable};
use crate::generic::GenericDefinition;
use crate::types::TypeInfo;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::fmt;

/// Types the container knows by name, shared between a container and its
/// children.
///
/// Serves three purposes: name lookup for configuration-driven registration,
/// implicit construction of unregistered components, and attaching generic
/// descriptors to closed generic types requested by `TypeId` alone.
#[derive(Default)]
pub struct TypeCatalog {
  components: DashMap<String, ComponentType>,
  components_by_id: DashMap<TypeId, ComponentType>,
  interfaces: DashMap<String, TypeInfo>,
  generics: DashMap<String, GenericDefinition>,
  descriptors: DashMap<TypeId, TypeInfo>,
}

impl TypeCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a component under its full type name.
  pub fn add_component(&self, component: ComponentType) -> &Self {
    self.add_component_as(component.name(), component)
  }

  /// Adds a component under an alias, and under its type for implicit
  /// construction.
  pub fn add_component_as(&self, alias: &str, component: ComponentType) -> &Self {
    for descriptor in component.generic_descriptors() {
      self.publish(descriptor);
    }
    if let Some(type_id) = component.type_info().type_id() {
      self.components_by_id.insert(type_id, component.clone());
    }
    self.components.insert(alias.to_owned(), component);
    self
  }

  pub fn add_interface<I: ?Sized + Any>(&self) -> &Self {
    self.add_interface_as::<I>(std::any::type_name::<I>())
  }

  pub fn add_interface_as<I: ?Sized + Any>(&self, alias: &str) -> &Self {
    self.interfaces.insert(alias.to_owned(), TypeInfo::of::<I>());
    self
  }

  /// Adds an open generic implementation under its definition name.
  pub fn add_generic(&self, definition: GenericDefinition) -> &Self {
    for descriptor in definition.descriptors() {
      self.publish(descriptor);
    }
    self.generics.insert(definition.name().to_owned(), definition);
    self
  }

  /// Remembers the generic shape of a closed generic type.
  pub fn publish(&self, type_info: &TypeInfo) {
    if let (true, Some(type_id)) = (type_info.has_generic_info(), type_info.type_id()) {
      self.descriptors.insert(type_id, type_info.clone());
    }
  }

  /// `type_info` enriched with its generic descriptor, when one is known.
  pub fn describe(&self, type_info: TypeInfo) -> TypeInfo {
    if type_info.has_generic_info() {
      return type_info;
    }
    type_info
      .type_id()
      .and_then(|id| self.descriptors.get(&id).map(|entry| entry.value().clone()))
      .unwrap_or(type_info)
  }

  pub fn find_component(&self, name: &str) -> Option<ComponentType> {
    self.components.get(name).map(|entry| entry.value().clone())
  }

  /// Interfaces first, then component types, which can be their own
  /// interface.
  pub fn find_interface(&self, name: &str) -> Option<TypeInfo> {
    self
      .interfaces
      .get(name)
      .map(|entry| entry.value().clone())
      .or_else(|| self.find_component(name).map(|c| c.type_info().clone()))
  }

  pub fn find_generic(&self, name: &str) -> Option<GenericDefinition> {
    self.generics.get(name).map(|entry| entry.value().clone())
  }

  /// An interface definition declared by some known generic implementation.
  pub fn find_interface_definition(&self, name: &str) -> Option<&'static str> {
    self.generics.iter().find_map(|entry| {
      let definition = entry.value();
      if definition.name() == name {
        return Some(definition.name());
      }
      definition.interface_definitions().find(|d| *d == name)
    })
  }

  pub(crate) fn component_for(&self, type_id: TypeId) -> Option<ComponentType> {
    self.components_by_id.get(&type_id).map(|entry| entry.value().clone())
  }

  /// The known component for `type_info`, or a fresh one from `build`.
  pub(crate) fn component_or_insert(&self, type_info: &TypeInfo, build: fn() -> ComponentType) -> ComponentType {
    match type_info.type_id() {
      Some(type_id) => self.components_by_id.entry(type_id).or_insert_with(build).value().clone(),
      None => build(),
    }
  }

  /// Makes `T` constructible without registration, under its own type only.
  pub fn add<T: Injectable>(&self) -> &Self {
    self.add_component(ComponentType::of::<T>())
  }
}

impl fmt::Debug for TypeCatalog {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeCatalog")
      .field("components", &self.components.len())
      .field("interfaces", &self.interfaces.len())
      .field("generics", &self.generics.len())
      .finish_non_exhaustive()
  }
}
