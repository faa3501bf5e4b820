//! Registrations loaded from YAML or JSON.
//!
//! ```yaml
//! container:
//!   resolution_timeout: 2s
//!   concurrency_guard: true
//! registrations:
//!   - as: greeter
//!     type: english_greeter
//!   - as: greeter
//!     type: french_greeter
//!     name: fr
//! ```
//!
//! Type names are looked up in the container's [`TypeCatalog`](crate::TypeCatalog).

use crate::container::Container;
use crate::error::{ContainerError, Result};

use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// The `container` section: overrides for the container options.
#[derive(Debug, Deserialize, PartialEq, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ContainerSettings {
  #[serde(default, deserialize_with = "deserialize_duration")]
  pub resolution_timeout: Option<Duration>,
  #[serde(default)]
  pub concurrency_guard: Option<bool>,
}

/// One `(interface, implementation, name)` registration.
#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct RegistrationEntry {
  #[serde(rename = "as")]
  pub interface: String,
  #[serde(rename = "type")]
  pub implementation: String,
  #[serde(default)]
  pub name: Option<String>,
}

impl RegistrationEntry {
  /// The registered name; empty means unnamed.
  pub fn registered_name(&self) -> Option<&str> {
    self.name.as_deref().filter(|name| !name.is_empty())
  }
}

#[derive(Debug, Deserialize, PartialEq, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct RegistrationConfig {
  #[serde(default)]
  pub container: ContainerSettings,
  #[serde(default)]
  pub registrations: Vec<RegistrationEntry>,
}

impl RegistrationConfig {
  pub fn from_yaml_str(source: &str) -> Result<Self> {
    serde_yaml::from_str(source).map_err(|e| ContainerError::Config(e.to_string()))
  }

  pub fn from_json_str(source: &str) -> Result<Self> {
    serde_json::from_str(source).map_err(|e| ContainerError::Config(e.to_string()))
  }

  /// Reads a `.yaml`, `.yml` or `.json` file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
      .map_err(|e| ContainerError::Config(format!("Failed to read {:?}: {}", path, e)))?;
    match path.extension().and_then(|ext| ext.to_str()) {
      Some("yaml") | Some("yml") => Self::from_yaml_str(&source),
      Some("json") => Self::from_json_str(&source),
      _ => Err(ContainerError::Config(format!(
        "Unsupported configuration file extension: {:?}",
        path
      ))),
    }
  }
}

fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: Option<String> = Option::deserialize(deserializer)?;
  raw
    .map(|value| humantime::parse_duration(&value).map_err(serde::de::Error::custom))
    .transpose()
}

impl Container {
  /// Registers every entry of `config` by name. Stops at the first entry
  /// whose types are unknown or do not fit together. Returns the number of
  /// registrations added.
  pub fn register_from_config(&self, config: &RegistrationConfig) -> Result<usize> {
    let catalog = self.options().catalog();
    for entry in &config.registrations {
      let name = entry.registered_name();
      if let Some(component) = catalog.find_component(&entry.implementation) {
        let interface = catalog
          .find_interface(&entry.interface)
          .ok_or_else(|| ContainerError::UnknownType(entry.interface.clone()))?;
        self.register_component_as(&component, &interface, name)?;
      } else if let Some(definition) = catalog.find_generic(&entry.implementation) {
        let interface = catalog
          .find_interface_definition(&entry.interface)
          .ok_or_else(|| ContainerError::UnknownType(entry.interface.clone()))?;
        self.register_generic_as(&definition, interface, name)?;
      } else {
        return Err(ContainerError::UnknownType(entry.implementation.clone()));
      }
    }
    debug!(
      container = self.id(),
      count = config.registrations.len(),
      "registrations loaded from configuration"
    );
    Ok(config.registrations.len())
  }
}
