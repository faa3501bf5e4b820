//! Per-registration construction lock.

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::time::Duration;

/// Serializes construction of one pooled entry across threads.
///
/// Re-entrant: a thread that already holds the guard can enter again, so
/// same-thread recursion reaches cycle detection instead of timing out.
#[derive(Default)]
pub(crate) struct ConstructionGuard {
  lock: ReentrantMutex<()>,
}

impl ConstructionGuard {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Waits up to `timeout` for the guard. `None` means the wait timed out.
  pub(crate) fn enter(&self, timeout: Duration) -> Option<ReentrantMutexGuard<'_, ()>> {
    self.lock.try_lock_for(timeout)
  }
}

impl std::fmt::Debug for ConstructionGuard {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ConstructionGuard")
      .field("locked", &self.lock.is_locked())
      .finish()
  }
}
