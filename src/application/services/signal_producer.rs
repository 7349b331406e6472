//! # Risk Signal Producer
//!
//! Shared capability of every per-domain risk engine.
//!
//! Credit, systemic and sentiment engines (and precomputed signal files) all
//! answer the same question: "what is this domain's opinion of entity X?".
//! The batch analyzer holds them as `Arc<dyn RiskSignalProducer>` and never
//! needs to know which domain it is talking to.

use crate::application::error::ApplicationResult;
use crate::domain::entities::RiskSignal;
use crate::domain::value_objects::{EntityId, RiskType};
use std::fmt;

/// Produces one [`RiskSignal`] per entity for a single risk domain.
pub trait RiskSignalProducer: Send + Sync + fmt::Debug {
    /// Returns the domain this producer speaks for.
    fn risk_type(&self) -> RiskType;

    /// Produces the signal for `entity_id`.
    ///
    /// # Errors
    ///
    /// Returns an `ApplicationError` when the producer cannot form an opinion.
    /// `MissingData` errors are recoverable: the entity is simply scored
    /// without this domain.
    fn analyze(&self, entity_id: &EntityId) -> ApplicationResult<RiskSignal>;

    /// Returns the name of this producer for logs.
    fn name(&self) -> &'static str;
}
