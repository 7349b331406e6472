//! # Domain Events
//!
//! Audit records of engine state changes.
//!
//! - [`ModelDegraded`]: the fusion classifier failed and was retired
//! - [`DatasetIngested`]: a transaction dataset was loaded and scored

pub mod domain_event;
pub mod fusion_events;
pub mod systemic_events;

pub use domain_event::{DomainEvent, EventMetadata, EventType};
pub use fusion_events::ModelDegraded;
pub use systemic_events::DatasetIngested;
