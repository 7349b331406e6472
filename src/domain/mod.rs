//! # Domain Layer
//!
//! Risk vocabulary and the pure algorithms that operate on it.
//!
//! - [`value_objects`]: identifiers, enums, thresholds, weights, model state
//! - [`entities`]: risk signals, aggregated profiles, transaction records
//! - [`services`]: level classification, transaction graph, centrality, contagion
//! - [`events`]: auditable state changes
//! - [`errors`]: invariant violations

pub mod entities;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;
