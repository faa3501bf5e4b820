mod common;

use common::*;
use fibre_di::{ComponentType, Container, ContainerError, Strategy, TypeInfo};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Registration & Resolution ---

#[test]
fn test_resolves_registered_implementation() {
  // Arrange
  let container = Container::new();
  container
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();

  // Act
  let r1 = container.resolve::<dyn Interface1>(None).unwrap();
  let r2 = container.resolve::<dyn Interface1>(None).unwrap();

  // Assert
  assert_eq!(r1.describe(), "very simple");
  assert!(same(&r1, &r2));
}

#[test]
fn test_per_dependency_builds_a_new_object_each_time() {
  // Arrange
  let container = Container::new();
  let handle = container
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap()
    .instance_per_dependency()
    .unwrap();
  assert_eq!(handle.strategy(), Strategy::PerDependency);

  // Act
  let r1 = container.resolve::<dyn Interface1>(None).unwrap();
  let r2 = container.resolve::<dyn Interface1>(None).unwrap();

  // Assert
  assert!(!same(&r1, &r2));
}

#[test]
fn test_resolves_constructor_dependencies() {
  // Arrange
  let container = Container::new();
  container
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();
  container
    .register_type_as::<ClassWithSimpleDependency, dyn Interface2>(None)
    .unwrap();

  // Act
  let service = container.resolve::<dyn Interface2>(None).unwrap();
  let dependency = container.resolve::<dyn Interface1>(None).unwrap();

  // Assert
  assert!(same(&service.dependency(), &dependency));
}

#[test]
fn test_registering_again_before_resolution_replaces() {
  // Arrange
  let container = Container::new();
  container
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();
  container
    .register_type_as::<SimpleClassWithDefaultCtor, dyn Interface1>(None)
    .unwrap();

  // Act
  let resolved = container.resolve::<dyn Interface1>(None).unwrap();

  // Assert
  assert_eq!(resolved.describe(), "default");
}

#[test]
fn test_registering_after_resolution_fails_and_keeps_the_original() {
  // Arrange
  let container = Container::new();
  container
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();
  let first = container.resolve::<dyn Interface1>(None).unwrap();

  // Act
  let result = container.register_type_as::<SimpleClassWithDefaultCtor, dyn Interface1>(None);

  // Assert
  assert!(matches!(result, Err(ContainerError::AlreadyResolved { .. })));
  let second = container.resolve::<dyn Interface1>(None).unwrap();
  assert!(same(&first, &second));
  assert_eq!(second.describe(), "very simple");
}

#[test]
fn test_changing_strategy_after_resolution_fails() {
  // Arrange
  let container = Container::new();
  let handle = container
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();
  container.resolve::<dyn Interface1>(None).unwrap();

  // Act
  let result = handle.instance_per_dependency();

  // Assert
  assert!(matches!(result, Err(ContainerError::AlreadyResolved { .. })));
}

#[test]
fn test_instance_registration_returns_the_same_object() {
  // Arrange
  let container = Container::new();
  let instance: Arc<dyn Interface1> = Arc::new(VerySimpleClass);
  container
    .register_instance_as::<dyn Interface1>(Arc::clone(&instance), None)
    .unwrap();

  // Act
  let resolved = container.resolve::<dyn Interface1>(None).unwrap();

  // Assert
  assert!(same(&instance, &resolved));
}

#[test]
fn test_concrete_instance_is_shared_with_type_registrations() {
  // Arrange
  let container = Container::new();
  let instance = Arc::new(VerySimpleClass);
  container
    .register_instance_as::<VerySimpleClass>(Arc::clone(&instance), None)
    .unwrap();
  container
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();

  // Act
  let resolved = container.resolve::<dyn Interface1>(None).unwrap();

  // Assert
  assert_eq!(Arc::as_ptr(&resolved) as *const (), Arc::as_ptr(&instance) as *const ());
}

#[test]
fn test_interface_instances_are_not_pooled() {
  let container = Container::new();
  container
    .register_instance_as::<dyn Interface1>(Arc::new(VerySimpleClass), None)
    .unwrap();

  let debug = format!("{:?}", container);

  assert!(debug.contains("pooled: 0"));
  assert!(container.resolve::<dyn Interface1>(None).is_ok());
}

#[test]
fn test_is_registered() {
  let container = Container::new();
  container
    .register_type_as::<VerySimpleClass, dyn Interface1>(Some("simple"))
    .unwrap();

  assert!(container.is_registered::<dyn Interface1>(Some("simple")));
  assert!(container.is_registered::<dyn Interface1>(Some("SIMPLE")));
  assert!(!container.is_registered::<dyn Interface1>(None));
  assert!(!container.is_registered::<dyn Interface2>(None));
  assert!(container.is_registered::<Container>(None));
}

// --- Implicit Registration ---

#[test]
fn test_resolves_unregistered_concrete_type() {
  // Arrange
  let container = Container::new();

  // Act
  let resolved = container
    .resolve_component::<SimpleClassWithDefaultCtor>(None)
    .unwrap();
  let again = container
    .resolve_component::<SimpleClassWithDefaultCtor>(None)
    .unwrap();

  // Assert
  assert_eq!(resolved.status, "default");
  assert!(Arc::ptr_eq(&resolved, &again));
}

#[test]
fn test_resolves_unregistered_concrete_dependencies_recursively() {
  // Arrange
  let container = Container::new();

  // Act
  let resolved = container
    .resolve_component::<ClassWithConcreteDependency>(None)
    .unwrap();

  // Assert
  let inner = container
    .resolve::<SimpleClassWithDefaultCtor>(None)
    .unwrap();
  assert!(Arc::ptr_eq(&resolved.inner, &inner));
}

#[test]
fn test_implicit_resolution_leaves_no_registration() {
  // Arrange
  let container = Container::new();

  // Act
  container.resolve_component::<VerySimpleClass>(None).unwrap();

  // Assert
  assert!(!container.is_registered::<VerySimpleClass>(None));
  assert_eq!(container.resolve_all::<VerySimpleClass>().unwrap().len(), 0);
  assert!(!container.to_string().contains("VerySimpleClass"));
}

#[test]
fn test_failed_implicit_resolution_leaves_no_registration() {
  // Arrange
  let container = Container::new();

  // Act
  let result = container.resolve_component::<CircularFirst>(None);

  // Assert
  assert!(matches!(result, Err(ContainerError::CircularDependency { .. })));
  assert!(!container.is_registered::<CircularFirst>(None));
  assert!(!container.is_registered::<CircularSecond>(None));
  assert_eq!(container.resolve_all::<CircularFirst>().unwrap().len(), 0);
  assert_eq!(container.to_string().lines().count(), 1);
}

#[test]
fn test_explicit_registration_is_allowed_after_failed_implicit_resolution() {
  let container = Container::new();
  container.resolve_component::<CircularFirst>(None).err().unwrap();

  let result = container.register_type_as::<CircularFirst, CircularFirst>(None);

  assert!(result.is_ok());
  assert!(container.is_registered::<CircularFirst>(None));
}

#[test]
fn test_catalog_components_resolve_without_registration() {
  // Arrange
  let container = Container::new();
  container.options().catalog().add::<VerySimpleClass>();

  // Act
  let resolved = container.resolve::<VerySimpleClass>(None);

  // Assert
  assert!(resolved.is_ok());
}

#[test]
fn test_unregistered_interface_cannot_be_resolved() {
  // Arrange
  let container = Container::new();

  // Act
  let err = container.resolve::<dyn Interface1>(None).err().unwrap();

  // Assert
  assert!(matches!(err, ContainerError::Unresolvable { .. }));
  assert!(err.to_string().starts_with("Interface cannot be resolved"));
}

#[test]
fn test_unresolvable_dependency_reports_the_path() {
  // Arrange
  let container = Container::new();

  // Act
  let err = container
    .resolve_component::<ClassWithUnregisteredDependency>(None)
    .err()
    .unwrap();

  // Assert
  assert!(matches!(err, ContainerError::Unresolvable { .. }));
  let path = err.resolution_path().unwrap();
  assert_eq!(
    path.types(),
    &[std::any::type_name::<ClassWithUnregisteredDependency>().to_string()]
  );
  assert!(err.to_string().contains("(resolution path: "));
}

#[test]
fn test_primitive_types_cannot_be_resolved() {
  let container = Container::new();

  let err = container.resolve::<i32>(None).err().unwrap();
  assert!(matches!(err, ContainerError::PrimitiveType { .. }));
  assert!(err
    .to_string()
    .starts_with("Primitive types or structs cannot be resolved"));

  assert!(matches!(
    container.resolve::<String>(None),
    Err(ContainerError::PrimitiveType { .. })
  ));
  assert!(matches!(
    container.resolve::<bool>(None),
    Err(ContainerError::PrimitiveType { .. })
  ));
}

// --- Constructor Selection ---

#[test]
fn test_constructor_with_most_parameters_is_used() {
  // Arrange
  let container = Container::new();
  container
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();

  // Act
  let resolved = container
    .resolve_component::<ClassWithTwoConstructors>(None)
    .unwrap();

  // Assert
  assert_eq!(resolved.used, "dependency");
}

#[test]
fn test_ambiguous_constructors_are_rejected() {
  let container = Container::new();

  let err = container
    .resolve_component::<ClassWithAmbiguousConstructors>(None)
    .err()
    .unwrap();

  assert!(matches!(err, ContainerError::AmbiguousConstructor { .. }));
  assert!(err
    .to_string()
    .starts_with("Multiple public constructors with same maximum parameter count are not supported!"));
}

// --- Runtime Mapping ---

#[test]
fn test_component_registration_checks_the_mapping() {
  // Arrange
  let container = Container::new();
  let component = ComponentType::of::<VerySimpleClass>();

  // Act
  let result = container.register_component_as(&component, &TypeInfo::of::<dyn Interface1>(), None);

  // Assert
  assert!(matches!(result, Err(ContainerError::InvalidMapping { .. })));

  let component = ComponentType::builder::<VerySimpleClass>()
    .implements::<dyn Interface1>()
    .build();
  container
    .register_component_as(&component, &TypeInfo::of::<dyn Interface1>(), None)
    .unwrap();
  assert!(container.resolve::<dyn Interface1>(None).is_ok());
}

#[test]
fn test_resolve_type_returns_an_erased_instance() {
  let container = Container::new();
  container
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();

  let instance = container
    .resolve_type(&TypeInfo::of::<dyn Interface1>(), None)
    .unwrap();

  assert!(instance.is::<dyn Interface1>());
  assert_eq!(instance.downcast::<dyn Interface1>().unwrap().describe(), "very simple");
}

// --- Self Registration ---

#[test]
fn test_container_resolves_itself() {
  let container = Container::new();

  let resolved = container.resolve::<Container>(None).unwrap();

  assert_eq!(resolved.id(), container.id());
}

// --- Object Created Event ---

#[test]
fn test_object_created_fires_once_per_construction() {
  // Arrange
  let container = Container::new();
  let created = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&created);
  container.on_object_created(move |event| {
    assert_eq!(event.type_info(), &TypeInfo::of::<VerySimpleClass>());
    counter.fetch_add(1, Ordering::SeqCst);
  });
  container
    .register_type_as::<VerySimpleClass, dyn Interface1>(None)
    .unwrap();

  // Act
  container.resolve::<dyn Interface1>(None).unwrap();
  container.resolve::<dyn Interface1>(None).unwrap();

  // Assert
  assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_object_created_is_not_raised_for_instances() {
  let container = Container::new();
  let created = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&created);
  container.on_object_created(move |_| {
    counter.fetch_add(1, Ordering::SeqCst);
  });
  container
    .register_instance_as::<dyn Interface1>(Arc::new(VerySimpleClass), None)
    .unwrap();

  container.resolve::<dyn Interface1>(None).unwrap();

  assert_eq!(created.load(Ordering::SeqCst), 0);
}

// --- Diagnostics ---

#[test]
fn test_display_lists_registrations() {
  let container = Container::new();
  container
    .register_type_as::<VerySimpleClass, dyn Interface1>(Some("simple"))
    .unwrap();
  container
    .register_instance_as::<dyn Interface2>(
      Arc::new(ClassWithSimpleDependency {
        dependency: Arc::new(VerySimpleClass),
      }),
      None,
    )
    .unwrap();

  let listing = container.to_string();

  assert!(listing.contains("-> <self>"));
  assert!(listing.contains(&format!(
    "('simple') -> Type: {}",
    std::any::type_name::<VerySimpleClass>()
  )));
  assert!(listing.contains("-> Instance: dyn "));
  assert_eq!(listing.lines().count(), 3);
}
