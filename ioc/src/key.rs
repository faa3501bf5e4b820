//! Registration and pool keys.

use crate::types::{TypeIdentity, TypeInfo};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A registration name. Compares and hashes case-insensitively.
#[derive(Clone)]
pub struct Name(Arc<str>);

impl Name {
  pub fn new(name: &str) -> Self {
    Self(Arc::from(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  fn folded(&self) -> impl Iterator<Item = char> + '_ {
    self.0.chars().flat_map(char::to_lowercase)
  }
}

impl PartialEq for Name {
  fn eq(&self, other: &Self) -> bool {
    self.folded().eq(other.folded())
  }
}

impl Eq for Name {}

impl Hash for Name {
  fn hash<H: Hasher>(&self, state: &mut H) {
    for c in self.folded() {
      c.hash(state);
    }
    state.write_u8(0xff);
  }
}

impl fmt::Debug for Name {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Name({})", self.0)
  }
}

/// Identifies a registration: the requested type plus an optional name.
///
/// `Eq`/`Hash` are strict on the type identity so the key is lawful inside a
/// hash map. The looser generic-definition rule lives in [`matches`].
///
/// [`matches`]: RegistrationKey::matches
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RegistrationKey {
  type_info: TypeInfo,
  name: Option<Name>,
}

impl RegistrationKey {
  pub fn new(type_info: TypeInfo, name: Option<&str>) -> Self {
    Self {
      type_info,
      name: name.map(Name::new),
    }
  }

  pub fn type_info(&self) -> &TypeInfo {
    &self.type_info
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_ref().map(Name::as_str)
  }

  pub(crate) fn name_key(&self) -> Option<&Name> {
    self.name.as_ref()
  }

  /// Same name (ignoring case), and the same type or one being the generic
  /// definition of the other.
  pub fn matches(&self, other: &RegistrationKey) -> bool {
    self.name == other.name && self.type_info.matches(&other.type_info)
  }

  /// The key of the open definition for a closed generic form.
  pub(crate) fn definition_key(&self) -> Option<RegistrationKey> {
    if self.type_info.is_generic_definition() {
      return None;
    }
    let definition = self.type_info.generic_definition()?;
    Some(RegistrationKey {
      type_info: TypeInfo::definition(definition),
      name: self.name.clone(),
    })
  }
}

impl fmt::Display for RegistrationKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "{}('{}')", self.type_info, name.as_str()),
      None => write!(f, "{}", self.type_info),
    }
  }
}

impl fmt::Debug for RegistrationKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key({})", self)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PoolTarget {
  Type(TypeIdentity),
  Factory(u64),
}

/// Indexes constructed objects: what produced them plus the registered name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PoolKey {
  target: PoolTarget,
  name: Option<Name>,
}

impl PoolKey {
  pub(crate) fn new(target: PoolTarget, name: Option<&Name>) -> Self {
    Self {
      target,
      name: name.cloned(),
    }
  }
}
