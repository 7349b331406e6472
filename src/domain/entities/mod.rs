//! # Domain Entities
//!
//! Data contracts shared by every producer and the fusion engine.
//!
//! - [`RiskSignal`]: one domain's opinion on one entity
//! - [`AggregatedRiskProfile`]: fused view across domains
//! - [`TransactionRecord`]: raw input to the transaction graph
//! - [`NewsIndex`]: headlines per entity for the sentiment producer

pub mod news;
pub mod risk_profile;
pub mod risk_signal;
pub mod transaction;

pub use news::{NewsHeadline, NewsIndex};
pub use risk_profile::{AggregatedRiskProfile, ExcludedSignal};
pub use risk_signal::{RiskSignal, SignalMetadata};
pub use transaction::TransactionRecord;
