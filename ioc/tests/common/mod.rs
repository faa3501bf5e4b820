#![allow(dead_code)]

use fibre_di::{implements, Constructor, Disposable, Injectable};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

// --- Interfaces ---

pub trait Interface1: Send + Sync {
  fn describe(&self) -> &'static str;
}

pub trait Interface2: Send + Sync {
  fn dependency(&self) -> Arc<dyn Interface1>;
}

pub trait Interface3: Send + Sync {}

// --- Simple Classes ---

pub struct VerySimpleClass;

impl Interface1 for VerySimpleClass {
  fn describe(&self) -> &'static str {
    "very simple"
  }
}

impl Injectable for VerySimpleClass {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public().build(|_| Ok(VerySimpleClass))]
  }
}

implements!(VerySimpleClass => dyn Interface1);

pub struct SimpleClassWithDefaultCtor {
  pub status: &'static str,
}

impl Interface1 for SimpleClassWithDefaultCtor {
  fn describe(&self) -> &'static str {
    self.status
  }
}

impl Injectable for SimpleClassWithDefaultCtor {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public().build(|_| Ok(SimpleClassWithDefaultCtor { status: "default" }))]
  }
}

implements!(SimpleClassWithDefaultCtor => dyn Interface1);

pub struct ClassWithSimpleDependency {
  pub dependency: Arc<dyn Interface1>,
}

impl Interface2 for ClassWithSimpleDependency {
  fn dependency(&self) -> Arc<dyn Interface1> {
    Arc::clone(&self.dependency)
  }
}

impl Injectable for ClassWithSimpleDependency {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public()
      .param::<dyn Interface1>("dependency")
      .build(|args| {
        Ok(ClassWithSimpleDependency {
          dependency: args.next()?,
        })
      })]
  }
}

implements!(ClassWithSimpleDependency => dyn Interface2);

/// Needs an interface that is never registered.
pub struct ClassWithUnregisteredDependency {
  pub dependency: Arc<dyn Interface3>,
}

impl Injectable for ClassWithUnregisteredDependency {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public()
      .param::<dyn Interface3>("dependency")
      .build(|args| {
        Ok(ClassWithUnregisteredDependency {
          dependency: args.next()?,
        })
      })]
  }
}

/// Depends on a concrete class that is never registered.
pub struct ClassWithConcreteDependency {
  pub inner: Arc<SimpleClassWithDefaultCtor>,
}

impl Injectable for ClassWithConcreteDependency {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public()
      .component::<SimpleClassWithDefaultCtor>("inner")
      .build(|args| Ok(ClassWithConcreteDependency { inner: args.next()? }))]
  }
}

// --- Constructor Selection ---

pub struct ClassWithTwoConstructors {
  pub used: &'static str,
}

impl Injectable for ClassWithTwoConstructors {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![
      Constructor::public().build(|_| Ok(ClassWithTwoConstructors { used: "default" })),
      Constructor::public()
        .param::<dyn Interface1>("dependency")
        .build(|args| {
          args.next::<dyn Interface1>()?;
          Ok(ClassWithTwoConstructors { used: "dependency" })
        }),
    ]
  }
}

pub struct ClassWithAmbiguousConstructors;

impl Injectable for ClassWithAmbiguousConstructors {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![
      Constructor::public()
        .param::<dyn Interface1>("first")
        .build(|_| Ok(ClassWithAmbiguousConstructors)),
      Constructor::public()
        .param::<dyn Interface2>("second")
        .build(|_| Ok(ClassWithAmbiguousConstructors)),
    ]
  }
}

pub struct ClassWithRegisteredName {
  pub name: Option<String>,
}

impl Interface1 for ClassWithRegisteredName {
  fn describe(&self) -> &'static str {
    "named"
  }
}

impl Injectable for ClassWithRegisteredName {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public()
      .registered_name()
      .build(|args| Ok(ClassWithRegisteredName { name: args.next_name()? }))]
  }
}

implements!(ClassWithRegisteredName => dyn Interface1);

// --- Diamond ---

pub struct DiamondBottom;

impl Injectable for DiamondBottom {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public().build(|_| Ok(DiamondBottom))]
  }
}

pub struct DiamondLeft {
  pub bottom: Arc<DiamondBottom>,
}

impl Injectable for DiamondLeft {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public()
      .component::<DiamondBottom>("bottom")
      .build(|args| Ok(DiamondLeft { bottom: args.next()? }))]
  }
}

pub struct DiamondRight {
  pub bottom: Arc<DiamondBottom>,
}

impl Injectable for DiamondRight {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public()
      .component::<DiamondBottom>("bottom")
      .build(|args| Ok(DiamondRight { bottom: args.next()? }))]
  }
}

pub struct DiamondTop {
  pub left: Arc<DiamondLeft>,
  pub right: Arc<DiamondRight>,
}

impl Injectable for DiamondTop {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public()
      .component::<DiamondLeft>("left")
      .component::<DiamondRight>("right")
      .build(|args| {
        Ok(DiamondTop {
          left: args.next()?,
          right: args.next()?,
        })
      })]
  }
}

// --- Circular ---

pub struct CircularFirst;

impl Injectable for CircularFirst {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public()
      .component::<CircularSecond>("second")
      .build(|args| {
        args.next::<CircularSecond>()?;
        Ok(CircularFirst)
      })]
  }
}

pub struct CircularSecond;

impl Injectable for CircularSecond {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public()
      .component::<CircularFirst>("first")
      .build(|args| {
        args.next::<CircularFirst>()?;
        Ok(CircularSecond)
      })]
  }
}

pub struct SelfDependent;

impl Injectable for SelfDependent {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public()
      .component::<SelfDependent>("me")
      .build(|_| Ok(SelfDependent))]
  }
}

// --- Disposable ---

#[derive(Default)]
pub struct DisposableClass1 {
  disposed: AtomicBool,
  dispose_calls: AtomicUsize,
}

impl DisposableClass1 {
  pub fn is_disposed(&self) -> bool {
    self.disposed.load(Ordering::SeqCst)
  }

  pub fn dispose_calls(&self) -> usize {
    self.dispose_calls.load(Ordering::SeqCst)
  }
}

impl Disposable for DisposableClass1 {
  fn dispose(&self) {
    self.disposed.store(true, Ordering::SeqCst);
    self.dispose_calls.fetch_add(1, Ordering::SeqCst);
  }
}

impl Interface1 for DisposableClass1 {
  fn describe(&self) -> &'static str {
    "disposable"
  }
}

impl Injectable for DisposableClass1 {
  fn constructors() -> Vec<Constructor<Self>> {
    vec![Constructor::public().build(|_| Ok(DisposableClass1::default()))]
  }

  fn as_disposable(&self) -> Option<&dyn Disposable> {
    Some(self)
  }
}

implements!(DisposableClass1 => dyn Interface1);

// --- Helpers ---

/// Identity check that also works for trait objects.
pub fn same<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
  Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
