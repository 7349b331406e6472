//! # Domain Event Trait
//!
//! Events are audit records of engine state changes an operator must be able
//! to see after the fact: the fusion model being retired, or a transaction
//! dataset replacing the previous one.

use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{EntityId, EventId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine that emitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Fusion engine.
    Fusion,
    /// Systemic engine.
    Systemic,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fusion => write!(f, "FUSION"),
            Self::Systemic => write!(f, "SYSTEMIC"),
        }
    }
}

/// An engine state change.
pub trait DomainEvent: Send + Sync + fmt::Debug {
    /// Returns the event id.
    fn event_id(&self) -> EventId;

    /// Returns the entity being scored when the event happened, if any.
    fn entity_id(&self) -> Option<&EntityId>;

    /// Returns when the event happened.
    fn timestamp(&self) -> Timestamp;

    /// Returns the emitting engine.
    fn event_type(&self) -> EventType;

    /// Returns the event name used in logs.
    fn event_name(&self) -> &'static str;
}

/// Id, subject and time shared by every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Event id.
    pub event_id: EventId,
    /// Entity being scored, if any.
    pub entity_id: Option<EntityId>,
    /// Creation time.
    pub timestamp: Timestamp,
}

impl EventMetadata {
    /// Stamps a fresh id and the current time.
    #[must_use]
    pub fn new(entity_id: Option<EntityId>) -> Self {
        Self {
            event_id: EventId::new_v4(),
            entity_id,
            timestamp: Timestamp::now(),
        }
    }
}
