//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity and Time
//!
//! - [`EntityId`]: non-empty entity identifier, also the graph node key
//! - [`EventId`]: audit event identifier
//! - [`Timestamp`]: UTC instant
//!
//! ## Domain Enums
//!
//! - [`RiskType`]: closed set of risk domains
//! - [`RiskLevel`]: ordered categorical level
//! - [`FusionMethod`]: strategy that produced a composite score
//!
//! ## Configuration Values
//!
//! - [`RiskThresholds`]: level boundaries
//! - [`FusionWeights`]: static fusion weights
//! - [`score`]: rounding and clipping on the 0-100 scale
//!
//! ## Lifecycles
//!
//! - [`ModelState`]: learned fusion model availability
//! - [`IngestionState`]: systemic engine readiness

pub mod enums;
pub mod fusion_weights;
pub mod ids;
pub mod model_state;
pub mod score;
pub mod thresholds;
pub mod timestamp;

pub use enums::{FusionMethod, RiskLevel, RiskType};
pub use fusion_weights::FusionWeights;
pub use ids::{EntityId, EventId};
pub use model_state::{IngestionState, ModelState};
pub use thresholds::RiskThresholds;
pub use timestamp::Timestamp;
