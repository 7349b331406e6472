//! # Systemic Events
//!
//! Events emitted by the systemic risk engine.

use crate::domain::events::domain_event::{DomainEvent, EventMetadata, EventType};
use crate::domain::services::centrality::BetweennessMode;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{EntityId, EventId};
use serde::{Deserialize, Serialize};

/// Event emitted when a transaction dataset has been ingested and its
/// metrics are ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetIngested {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Distinct entities in the graph.
    pub nodes: usize,
    /// Distinct directed edges after merging parallel transactions.
    pub edges: usize,
    /// Records that became (part of) an edge.
    pub accepted: usize,
    /// Records dropped for a missing endpoint or unusable amount.
    pub skipped: usize,
    /// How betweenness was computed.
    pub betweenness_mode: BetweennessMode,
}

impl DatasetIngested {
    /// Creates a new DatasetIngested event.
    #[must_use]
    pub fn new(
        nodes: usize,
        edges: usize,
        accepted: usize,
        skipped: usize,
        betweenness_mode: BetweennessMode,
    ) -> Self {
        Self {
            metadata: EventMetadata::new(None),
            nodes,
            edges,
            accepted,
            skipped,
            betweenness_mode,
        }
    }
}

impl DomainEvent for DatasetIngested {
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
        EventType::Systemic
    }

    fn event_name(&self) -> &'static str {
        "DatasetIngested"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_ingested_event() {
        let event = DatasetIngested::new(4, 3, 5, 1, BetweennessMode::Exact);
        assert_eq!(event.event_name(), "DatasetIngested");
        assert_eq!(event.event_type(), EventType::Systemic);
        assert!(event.entity_id().is_none());
        assert_eq!(event.skipped, 1);
    }
}
