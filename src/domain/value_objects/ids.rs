//! # Identifiers
//!
//! [`EntityId`] names the financial or legal actor being scored. It is also the
//! node key of the transaction graph. [`EventId`] identifies audit events.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Identifier of a domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a random event id.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier of a scored entity.
///
/// # Invariants
///
/// - Never empty
///
/// # Examples
///
/// ```
/// use sentinel_risk::domain::value_objects::ids::EntityId;
///
/// let id = EntityId::new("ENT-001").unwrap();
/// assert_eq!(id.as_str(), "ENT-001");
/// assert!(EntityId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Creates a new entity id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyEntityId` if the trimmed value is empty.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::EmptyEntityId);
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EntityId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn rejects_blank() {
        assert_eq!(EntityId::new("   "), Err(DomainError::EmptyEntityId));
    }

    #[test]
    fn borrows_as_str_for_map_lookup() {
        let mut map = HashMap::new();
        map.insert(EntityId::new("A").unwrap(), 1);
        assert_eq!(map.get("A"), Some(&1));
    }

    #[test]
    fn event_ids_are_unique() {
        assert_ne!(EventId::new_v4(), EventId::new_v4());
    }

    #[test]
    fn serializes_transparently() {
        let id = EntityId::new("ENT-9").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ENT-9\"");
        let back: EntityId = serde_json::from_str("\"ENT-9\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deserialize_rejects_blank() {
        let err = serde_json::from_str::<EntityId>("\"  \"").unwrap_err();
        assert!(err.to_string().contains("entity"));
    }
}
