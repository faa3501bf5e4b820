mod common;

use common::*;
use fibre_di::{Container, ContainerError};
use std::sync::Arc;
use std::time::Duration;

// --- Lookup ---

#[test]
fn test_child_falls_back_to_parent_registrations() {
  // Arrange
  let parent = Container::new();
  parent
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();
  let child = parent.child().unwrap();

  // Act
  let from_child = child.resolve::<dyn Interface1>(None).unwrap();
  let from_parent = parent.resolve::<dyn Interface1>(None).unwrap();

  // Assert
  // The parent owns the registration, so it owns the object.
  assert!(same(&from_child, &from_parent));
}

#[test]
fn test_child_registration_shadows_the_parent() {
  // Arrange
  let parent = Container::new();
  parent
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();
  let child = parent.child().unwrap();
  child
    .register_type_as::<SimpleClassWithDefaultCtor, dyn Interface1>(None)
    .unwrap();

  // Act
  let from_child = child.resolve::<dyn Interface1>(None).unwrap();
  let from_parent = parent.resolve::<dyn Interface1>(None).unwrap();

  // Assert
  assert_eq!(from_child.describe(), "default");
  assert_eq!(from_parent.describe(), "very simple");
}

#[test]
fn test_parent_never_sees_child_registrations() {
  let parent = Container::new();
  let child = parent.child().unwrap();
  child
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();

  assert!(child.is_registered::<dyn Interface1>(None));
  assert!(!parent.is_registered::<dyn Interface1>(None));
  assert!(matches!(
    parent.resolve::<dyn Interface1>(None),
    Err(ContainerError::Unresolvable { .. })
  ));
}

#[test]
fn test_child_dependencies_come_from_the_child_scope() {
  // Arrange
  let parent = Container::new();
  parent
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();
  let child = parent.child().unwrap();
  child
    .register_type_as::<ClassWithSimpleDependency, dyn Interface2>(None)
    .unwrap();

  // Act
  let service = child.resolve::<dyn Interface2>(None).unwrap();

  // Assert
  let shared = parent.resolve::<dyn Interface1>(None).unwrap();
  assert!(same(&service.dependency(), &shared));
}

#[test]
fn test_implicit_objects_are_built_per_scope() {
  let parent = Container::new();
  let child = parent.child().unwrap();

  let in_child = child
    .resolve_component::<SimpleClassWithDefaultCtor>(None)
    .unwrap();
  let in_parent = parent
    .resolve_component::<SimpleClassWithDefaultCtor>(None)
    .unwrap();

  assert!(!Arc::ptr_eq(&in_child, &in_parent));
}

#[test]
fn test_container_resolves_to_the_requesting_scope() {
  let parent = Container::new();
  let child = parent.child().unwrap();

  let resolved = child.resolve::<Container>(None).unwrap();

  assert_eq!(resolved.id(), child.id());
  assert_eq!(child.parent().map(|p| p.id()), Some(parent.id()));
}

#[test]
fn test_resolve_all_spans_the_hierarchy() {
  // Arrange
  let parent = Container::new();
  parent
    .register_type_as::<VerySimpleClass, dyn Interface1>(Some("a"))
    .unwrap();
  parent
    .register_type_as::<VerySimpleClass, dyn Interface1>(Some("b"))
    .unwrap();
  let child = parent.child().unwrap();
  child
    .register_type_as::<SimpleClassWithDefaultCtor, dyn Interface1>(Some("b"))
    .unwrap();

  // Act
  let all: Vec<&'static str> = child
    .resolve_all::<dyn Interface1>()
    .unwrap()
    .map(|item| item.unwrap().describe())
    .collect();

  // Assert
  // "b" from the child hides the parent's "b".
  assert_eq!(all, vec!["very simple", "default"]);
}

// --- Lifetime ---

#[test]
fn test_disposing_the_child_leaves_the_parent_intact() {
  // Arrange
  let parent = Container::new();
  parent
    .register_type_as::<DisposableClass1, dyn Interface1>(Some("parent"))
    .unwrap();
  let child = parent.child().unwrap();
  child
    .register_type_as::<DisposableClass1, dyn Interface1>(Some("child"))
    .unwrap();
  child.resolve::<dyn Interface1>(Some("parent")).unwrap();
  child.resolve::<dyn Interface1>(Some("child")).unwrap();
  let parent_owned = parent.resolve_component::<DisposableClass1>(None).unwrap();

  // Act
  child.dispose();

  // Assert
  assert!(child.is_disposed());
  assert!(!parent.is_disposed());
  assert!(!parent_owned.is_disposed());
  assert!(parent.resolve::<dyn Interface1>(Some("parent")).is_ok());
}

#[test]
fn test_child_of_a_disposed_parent_cannot_be_created() {
  let parent = Container::new();
  parent.dispose();

  assert!(matches!(parent.child(), Err(ContainerError::Disposed)));
}

#[test]
fn test_child_reports_a_disposed_parent() {
  // Arrange
  let parent = Container::new();
  parent
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();
  let child = parent.child().unwrap();

  // Act
  parent.dispose();

  // Assert
  assert!(matches!(
    child.resolve::<dyn Interface1>(None),
    Err(ContainerError::Disposed)
  ));
}

#[test]
fn test_child_reports_a_released_parent() {
  // Arrange
  let parent = Container::new();
  parent
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();
  let child = parent.child().unwrap();
  child
    .register_type_as::<SimpleClassWithDefaultCtor, dyn Interface1>(Some("local"))
    .unwrap();

  // Act
  drop(parent);

  // Assert
  assert!(child.parent().is_none());
  assert!(matches!(
    child.resolve::<dyn Interface1>(None),
    Err(ContainerError::ParentReleased)
  ));
  // Local registrations keep working.
  assert!(child.resolve::<dyn Interface1>(Some("local")).is_ok());
}

#[test]
fn test_child_pools_its_own_objects_after_the_parent_is_released() {
  // Arrange
  let parent = Container::new();
  let child = parent.child().unwrap();
  child
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();

  // Act
  drop(parent);
  let first = child.resolve::<dyn Interface1>(None).unwrap();
  let second = child.resolve::<dyn Interface1>(None).unwrap();

  // Assert
  assert_eq!(first.describe(), "very simple");
  assert!(same(&first, &second));
}

// --- Options ---

#[test]
fn test_child_inherits_parent_options() {
  let parent = Container::builder()
    .resolution_timeout(Duration::from_millis(250))
    .concurrency_guard(false)
    .build()
    .unwrap();

  let child = parent.child().unwrap();

  assert_eq!(child.options().resolution_timeout(), Duration::from_millis(250));
  assert!(!child.options().concurrency_guard());
  assert!(Arc::ptr_eq(child.options().catalog(), parent.options().catalog()));
}

#[test]
fn test_child_may_override_parent_options() {
  let parent = Container::builder()
    .resolution_timeout(Duration::from_millis(250))
    .build()
    .unwrap();

  let child = Container::builder()
    .parent(&parent)
    .resolution_timeout(Duration::from_secs(5))
    .build()
    .unwrap();

  assert_eq!(child.options().resolution_timeout(), Duration::from_secs(5));
  assert!(child.options().concurrency_guard());
  assert_eq!(child.parent().map(|p| p.id()), Some(parent.id()));
}
