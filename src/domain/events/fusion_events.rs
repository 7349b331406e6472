//! # Fusion Events
//!
//! Events emitted by the fusion engine.
//!
//! # Event Flow
//!
//! ```text
//! (model available) -> ModelDegraded -> (static weights for the rest of the process)
//! ```

use crate::domain::events::domain_event::{DomainEvent, EventMetadata, EventType};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{EntityId, EventId};
use serde::{Deserialize, Serialize};

/// Event emitted once when the learned fusion model is retired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDegraded {
    /// Event metadata. The entity is the one whose fusion triggered the failure.
    pub metadata: EventMetadata,
    /// Name of the classifier that failed.
    pub classifier: String,
    /// Failure description.
    pub reason: String,
}

impl ModelDegraded {
    /// Creates a new ModelDegraded event.
    #[must_use]
    pub fn new(
        entity_id: EntityId,
        classifier: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            metadata: EventMetadata::new(Some(entity_id)),
            classifier: classifier.into(),
            reason: reason.into(),
        }
    }
}

impl DomainEvent for ModelDegraded {
    fn event_id(&self) -> EventId {
        self.metadata.event_id
    }

    fn entity_id(&self) -> Option<&EntityId> {
        self.metadata.entity_id.as_ref()
    }

    fn timestamp(&self) -> Timestamp {
        self.metadata.timestamp
    }

    fn event_type(&self) -> EventType {
        EventType::Fusion
    }

    fn event_name(&self) -> &'static str {
        "ModelDegraded"
    }
}
