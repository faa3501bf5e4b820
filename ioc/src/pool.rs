//! Per-container cache of constructed objects.

use crate::instance::{Disposer, Instance};
use crate::key::PoolKey;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub(crate) enum Pooled {
  /// Built or adopted by the container; disposed with it.
  Owned {
    instance: Instance,
    disposer: Option<Disposer>,
  },
  /// Stored for lookup only; disposal skips it.
  NonDisposable(Instance),
}

impl Pooled {
  pub(crate) fn owned(instance: Instance, disposer: Option<Disposer>) -> Self {
    Pooled::Owned { instance, disposer }
  }

  pub(crate) fn instance(&self) -> &Instance {
    match self {
      Pooled::Owned { instance, .. } | Pooled::NonDisposable(instance) => instance,
    }
  }

  fn into_disposer(self) -> Option<Disposer> {
    match self {
      Pooled::Owned { disposer, .. } => disposer,
      Pooled::NonDisposable(_) => None,
    }
  }
}

struct Slot {
  order: u64,
  pooled: Pooled,
}

#[derive(Default)]
pub(crate) struct ObjectPool {
  entries: DashMap<PoolKey, Slot>,
  next_order: AtomicU64,
}

impl ObjectPool {
  pub(crate) fn get(&self, key: &PoolKey) -> Option<Instance> {
    self.entries.get(key).map(|entry| entry.pooled.instance().clone())
  }

  fn slot(&self, pooled: Pooled) -> Slot {
    Slot {
      order: self.next_order.fetch_add(1, Ordering::Relaxed),
      pooled,
    }
  }

  /// Stores `pooled` unless the key is taken. Returns the stored instance,
  /// which is the earlier one when the key was taken. A rejected entry is
  /// dropped without running its disposer.
  pub(crate) fn insert(&self, key: PoolKey, pooled: Pooled) -> Instance {
    match self.entries.entry(key) {
      Entry::Occupied(existing) => existing.get().pooled.instance().clone(),
      Entry::Vacant(vacant) => vacant.insert(self.slot(pooled)).pooled.instance().clone(),
    }
  }

  /// Stores `pooled` unconditionally. A displaced entry is dropped without
  /// being disposed.
  pub(crate) fn replace(&self, key: PoolKey, pooled: Pooled) {
    self.entries.insert(key, self.slot(pooled));
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }

  /// Empties the pool, returning the disposers of owned entries, newest
  /// first. Dependencies are stored before their dependents, so dependents
  /// are disposed first.
  pub(crate) fn clear(&self) -> Vec<Disposer> {
    let keys: Vec<PoolKey> = self.entries.iter().map(|entry| entry.key().clone()).collect();
    let mut slots: Vec<Slot> = keys
      .into_iter()
      .filter_map(|key| self.entries.remove(&key))
      .map(|(_, slot)| slot)
      .collect();
    slots.sort_by(|a, b| b.order.cmp(&a.order));
    slots
      .into_iter()
      .filter_map(|slot| slot.pooled.into_disposer())
      .collect()
  }
}
