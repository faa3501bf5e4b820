//! Resolution paths and circular dependency detection.

use crate::error::{ContainerError, PathSnapshot, Result};
use crate::key::RegistrationKey;
use crate::types::TypeInfo;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

struct Node {
  key: RegistrationKey,
  type_info: TypeInfo,
  next: Option<Arc<Node>>,
}

/// The chain of in-progress constructions within one top-level resolve call.
///
/// Immutable: [`push`](ResolutionList::push) returns a new list sharing the
/// tail, so a list can be handed down the call tree without locking.
#[derive(Clone, Default)]
pub struct ResolutionList {
  head: Option<Arc<Node>>,
}

impl ResolutionList {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&self, key: RegistrationKey, type_info: TypeInfo) -> Self {
    Self {
      head: Some(Arc::new(Node {
        key,
        type_info,
        next: self.head.clone(),
      })),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.head.is_none()
  }

  pub fn len(&self) -> usize {
    self.iter_from_top().count()
  }

  /// Scans from the most recent entry.
  pub fn contains(&self, key: &RegistrationKey) -> bool {
    self.iter_from_top().any(|node| &node.key == key)
  }

  /// The constructed types in call order, outermost first.
  pub fn types(&self) -> Vec<TypeInfo> {
    let mut types: Vec<TypeInfo> = self.iter_from_top().map(|n| n.type_info.clone()).collect();
    types.reverse();
    types
  }

  pub(crate) fn snapshot(&self) -> PathSnapshot {
    PathSnapshot::new(self.types().iter().map(|t| t.name().to_owned()).collect())
  }

  /// The path in call order with `last` appended, for cycle reports.
  pub(crate) fn snapshot_with(&self, last: &TypeInfo) -> PathSnapshot {
    let mut types: Vec<String> = self.types().iter().map(|t| t.name().to_owned()).collect();
    types.push(last.name().to_owned());
    PathSnapshot::new(types)
  }

  fn iter_from_top(&self) -> impl Iterator<Item = &Node> {
    std::iter::successors(self.head.as_deref(), |node| node.next.as_deref())
  }
}

impl fmt::Debug for ResolutionList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list()
      .entries(self.iter_from_top().map(|n| &n.key).collect::<Vec<_>>().iter().rev())
      .finish()
  }
}

thread_local! {
  // Keys whose construction is running on this thread, tagged with the
  // owning container. Catches cycles the path cannot see, such as a factory
  // that calls back into the container.
  static IN_PROGRESS: RefCell<Vec<(usize, RegistrationKey, TypeInfo)>> = const { RefCell::new(Vec::new()) };
}

/// RAII marker for a construction in progress on the current thread.
///
/// Entering a key that is already in progress for the same container fails
/// with a circular dependency error. Dropping the guard removes the entry.
pub(crate) struct InProgressGuard {
  container: usize,
  key: RegistrationKey,
}

impl InProgressGuard {
  pub(crate) fn enter(container: usize, key: &RegistrationKey, type_info: &TypeInfo) -> Result<Self> {
    IN_PROGRESS.with(|stack| {
      let mut stack = stack.borrow_mut();
      if stack.iter().any(|(c, k, _)| *c == container && k == key) {
        let mut types: Vec<String> = stack
          .iter()
          .filter(|(c, _, _)| *c == container)
          .map(|(_, _, t)| t.name().to_owned())
          .collect();
        types.push(type_info.name().to_owned());
        return Err(ContainerError::CircularDependency {
          type_name: type_info.name().to_owned(),
          path: PathSnapshot::new(types),
        });
      }
      stack.push((container, key.clone(), type_info.clone()));
      Ok(())
    })?;
    Ok(Self {
      container,
      key: key.clone(),
    })
  }
}

impl Drop for InProgressGuard {
  fn drop(&mut self) {
    IN_PROGRESS.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(pos) = stack
        .iter()
        .rposition(|(c, k, _)| *c == self.container && *k == self.key)
      {
        stack.remove(pos);
      }
    });
  }
}
