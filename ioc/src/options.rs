//! Container options and the builder used to create containers.

use crate::catalog::TypeCatalog;
use crate::container::Container;
use crate::error::Result;

use core::fmt;
use std::sync::Arc;
use std::time::Duration;

/// How long a resolution waits for another thread constructing the same
/// pooled object.
pub const DEFAULT_RESOLUTION_TIMEOUT: Duration = Duration::from_secs(1);

/// Per-container settings. Children inherit their parent's options.
#[derive(Clone)]
pub struct ContainerOptions {
  pub(crate) resolution_timeout: Duration,
  pub(crate) concurrency_guard: bool,
  pub(crate) catalog: Arc<TypeCatalog>,
}

impl Default for ContainerOptions {
  fn default() -> Self {
    Self {
      resolution_timeout: DEFAULT_RESOLUTION_TIMEOUT,
      concurrency_guard: true,
      catalog: Arc::new(TypeCatalog::new()),
    }
  }
}

impl ContainerOptions {
  pub fn resolution_timeout(&self) -> Duration {
    self.resolution_timeout
  }

  /// Whether construction of pooled objects is serialized across threads.
  pub fn concurrency_guard(&self) -> bool {
    self.concurrency_guard
  }

  pub fn catalog(&self) -> &Arc<TypeCatalog> {
    &self.catalog
  }
}

impl fmt::Debug for ContainerOptions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ContainerOptions")
      .field("resolution_timeout", &self.resolution_timeout)
      .field("concurrency_guard", &self.concurrency_guard)
      .finish_non_exhaustive()
  }
}

/// A builder for creating `Container` instances.
#[derive(Default)]
pub struct ContainerBuilder {
  resolution_timeout: Option<Duration>,
  concurrency_guard: Option<bool>,
  catalog: Option<Arc<TypeCatalog>>,
  parent: Option<Container>,
}

impl fmt::Debug for ContainerBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ContainerBuilder")
      .field("resolution_timeout", &self.resolution_timeout)
      .field("concurrency_guard", &self.concurrency_guard)
      .field("has_catalog", &self.catalog.is_some())
      .field("has_parent", &self.parent.is_some())
      .finish_non_exhaustive()
  }
}

impl ContainerBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets how long a resolution waits on another thread building the same
  /// pooled object before failing.
  ///
  /// Defaults to `1 second`.
  pub fn resolution_timeout(mut self, timeout: Duration) -> Self {
    self.resolution_timeout = Some(timeout);
    self
  }

  /// Turns the cross-thread construction guard on or off. Without it
  /// concurrent first resolutions may construct twice; the first object
  /// stored in the pool wins.
  pub fn concurrency_guard(mut self, enabled: bool) -> Self {
    self.concurrency_guard = Some(enabled);
    self
  }

  pub fn catalog(mut self, catalog: Arc<TypeCatalog>) -> Self {
    self.catalog = Some(catalog);
    self
  }

  /// Makes the new container a child scope of `parent`. The child only holds
  /// a weak link to it.
  pub fn parent(mut self, parent: &Container) -> Self {
    self.parent = Some(parent.clone());
    self
  }

  /// Overrides every setting with `options`.
  pub fn options(mut self, options: ContainerOptions) -> Self {
    self.resolution_timeout = Some(options.resolution_timeout);
    self.concurrency_guard = Some(options.concurrency_guard);
    self.catalog = Some(options.catalog);
    self
  }

  /// Applies the settings section of a registration file.
  #[cfg(feature = "config")]
  pub fn settings(mut self, settings: &crate::config::ContainerSettings) -> Self {
    if let Some(timeout) = settings.resolution_timeout {
      self.resolution_timeout = Some(timeout);
    }
    if let Some(enabled) = settings.concurrency_guard {
      self.concurrency_guard = Some(enabled);
    }
    self
  }

  /// Creates the container. Fails if the parent has been disposed.
  pub fn build(self) -> Result<Container> {
    let base = match &self.parent {
      Some(parent) => {
        parent.assert_not_disposed()?;
        parent.options().clone()
      }
      None => ContainerOptions::default(),
    };

    let options = ContainerOptions {
      resolution_timeout: self.resolution_timeout.unwrap_or(base.resolution_timeout),
      concurrency_guard: self.concurrency_guard.unwrap_or(base.concurrency_guard),
      catalog: self.catalog.unwrap_or(base.catalog),
    };
    Ok(Container::with_options(options, self.parent.as_ref()))
  }
}
