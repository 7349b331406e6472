//! # Aggregated Risk Profile
//!
//! The fused view of one entity across every risk domain.
//!
//! A profile is built once by the fusion engine and never mutated. Callers
//! serialize it to JSON for storage or reporting.

use crate::domain::entities::risk_signal::RiskSignal;
use crate::domain::value_objects::{EntityId, FusionMethod, RiskLevel, RiskType, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A signal left out of fusion because it named another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedSignal {
    /// Entity the signal claimed to describe.
    pub entity_id: EntityId,
    /// Domain of the excluded signal.
    pub risk_type: RiskType,
}

/// Composite risk assessment for one entity.
///
/// # Invariants
///
/// - `composite_risk_score` ∈ [0, 100], rounded to 2 decimals
/// - `risk_level` is the threshold classification of `composite_risk_score`
/// - every contributing signal names `entity_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRiskProfile {
    entity_id: EntityId,
    composite_risk_score: f64,
    risk_level: RiskLevel,
    fusion_method: FusionMethod,
    contributing_signals: Vec<RiskSignal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    excluded_signals: Vec<ExcludedSignal>,
    timestamp: Timestamp,
}

impl AggregatedRiskProfile {
    /// Assembles a profile. The score is expected to be rounded already.
    #[must_use]
    pub fn new(
        entity_id: EntityId,
        composite_risk_score: f64,
        risk_level: RiskLevel,
        fusion_method: FusionMethod,
        contributing_signals: Vec<RiskSignal>,
        excluded_signals: Vec<ExcludedSignal>,
    ) -> Self {
        Self {
            entity_id,
            composite_risk_score,
            risk_level,
            fusion_method,
            contributing_signals,
            excluded_signals,
            timestamp: Timestamp::now(),
        }
    }

    /// Returns the entity id.
    #[inline]
    #[must_use]
    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Returns the composite score.
    #[inline]
    #[must_use]
    pub fn composite_risk_score(&self) -> f64 {
        self.composite_risk_score
    }

    /// Returns the risk level.
    #[inline]
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Returns the strategy that produced the score.
    #[inline]
    #[must_use]
    pub fn fusion_method(&self) -> FusionMethod {
        self.fusion_method
    }

    /// Returns the fused signals in analysis order.
    #[inline]
    #[must_use]
    pub fn contributing_signals(&self) -> &[RiskSignal] {
        &self.contributing_signals
    }

    /// Returns signals dropped for naming another entity.
    #[inline]
    #[must_use]
    pub fn excluded_signals(&self) -> &[ExcludedSignal] {
        &self.excluded_signals
    }

    /// Returns the contributing signal of a given domain, if any.
    #[must_use]
    pub fn signal(&self, risk_type: RiskType) -> Option<&RiskSignal> {
        self.contributing_signals
            .iter()
            .rev()
            .find(|s| s.risk_type() == risk_type)
    }

    /// Returns the creation time.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Serializes to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; not expected for well-formed profiles.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl fmt::Display for AggregatedRiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AggregatedRiskProfile({} score={:.2} level={} via {} signals={})",
            self.entity_id,
            self.composite_risk_score,
            self.risk_level,
            self.fusion_method,
            self.contributing_signals.len()
        )
    }
}
