//! # Risk Signal
//!
//! One risk domain's standardized opinion on one entity.
//!
//! Every producer (credit, systemic, sentiment) emits a [`RiskSignal`]; the
//! fusion engine only ever reads `normalized_score` when comparing domains.
//!
//! # Examples
//!
//! ```
//! use sentinel_risk::domain::entities::risk_signal::RiskSignal;
//! use sentinel_risk::domain::value_objects::{EntityId, RiskType};
//!
//! let signal = RiskSignal::new(EntityId::new("ENT-1").unwrap(), RiskType::Credit, 0.42, 42.0, 0.95)
//!     .unwrap()
//!     .with_metadata("raw_pd_probability", 0.42);
//!
//! assert_eq!(signal.normalized_score(), 42.0);
//! assert!(signal.metadata().contains_key("raw_pd_probability"));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::score::{SCORE_MAX, SCORE_MIN};
use crate::domain::value_objects::{EntityId, RiskType, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Free-form explainability data attached by a producer.
///
/// Opaque to the fusion engine.
pub type SignalMetadata = BTreeMap<String, Value>;

/// Standardized risk assessment from a single domain.
///
/// # Invariants
///
/// - `normalized_score` ∈ [0, 100]
/// - `confidence` ∈ [0, 1]
/// - `raw_score` is finite
///
/// Deserialization goes through [`RiskSignal::at`], so parsed signals hold
/// the same invariants as constructed ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RiskSignalRepr")]
pub struct RiskSignal {
    /// Entity this signal describes.
    entity_id: EntityId,
    /// Domain of the signal.
    risk_type: RiskType,
    /// Domain-native score (e.g. a probability).
    raw_score: f64,
    /// Canonical 0-100 score.
    normalized_score: f64,
    /// Producer-reported reliability, 0-1.
    confidence: f64,
    /// Producer-specific explainability data.
    #[serde(default)]
    metadata: SignalMetadata,
    /// Creation time.
    timestamp: Timestamp,
}

/// Unchecked wire shape of [`RiskSignal`].
#[derive(Deserialize)]
struct RiskSignalRepr {
    entity_id: EntityId,
    risk_type: RiskType,
    raw_score: f64,
    normalized_score: f64,
    confidence: f64,
    #[serde(default)]
    metadata: SignalMetadata,
    timestamp: Timestamp,
}

impl TryFrom<RiskSignalRepr> for RiskSignal {
    type Error = DomainError;

    fn try_from(repr: RiskSignalRepr) -> Result<Self, Self::Error> {
        Ok(Self::at(
            repr.entity_id,
            repr.risk_type,
            repr.raw_score,
            repr.normalized_score,
            repr.confidence,
            repr.timestamp,
        )?
        .with_metadata_map(repr.metadata))
    }
}

impl RiskSignal {
    /// Creates a signal stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ScoreOutOfRange` or `DomainError::NonFinite` if
    /// any score violates its invariant.
    pub fn new(
        entity_id: EntityId,
        risk_type: RiskType,
        raw_score: f64,
        normalized_score: f64,
        confidence: f64,
    ) -> DomainResult<Self> {
        Self::at(
            entity_id,
            risk_type,
            raw_score,
            normalized_score,
            confidence,
            Timestamp::now(),
        )
    }

    /// Creates a signal with an explicit timestamp (for reconstruction).
    ///
    /// # Errors
    ///
    /// Same as [`RiskSignal::new`].
    pub fn at(
        entity_id: EntityId,
        risk_type: RiskType,
        raw_score: f64,
        normalized_score: f64,
        confidence: f64,
        timestamp: Timestamp,
    ) -> DomainResult<Self> {
        if !raw_score.is_finite() {
            return Err(DomainError::NonFinite { field: "raw_score" });
        }
        DomainError::check_range("normalized_score", normalized_score, SCORE_MIN, SCORE_MAX)?;
        DomainError::check_range("confidence", confidence, 0.0, 1.0)?;

        Ok(Self {
            entity_id,
            risk_type,
            raw_score,
            normalized_score,
            confidence,
            metadata: SignalMetadata::new(),
            timestamp,
        })
    }

    /// Adds one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Replaces the metadata map.
    #[must_use]
    pub fn with_metadata_map(mut self, metadata: SignalMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the entity id.
    #[inline]
    #[must_use]
    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Returns the risk domain.
    #[inline]
    #[must_use]
    pub fn risk_type(&self) -> RiskType {
        self.risk_type
    }

    /// Returns the domain-native score.
    #[inline]
    #[must_use]
    pub fn raw_score(&self) -> f64 {
        self.raw_score
    }

    /// Returns the canonical 0-100 score.
    #[inline]
    #[must_use]
    pub fn normalized_score(&self) -> f64 {
        self.normalized_score
    }

    /// Returns the producer confidence.
    #[inline]
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Returns the metadata map.
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &SignalMetadata {
        &self.metadata
    }

    /// Returns the creation time.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl fmt::Display for RiskSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RiskSignal({} {} score={:.2} confidence={:.2})",
            self.entity_id, self.risk_type, self.normalized_score, self.confidence
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity() -> EntityId {
        EntityId::new("ENT-001").unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn accepts_bounds() {
            assert!(RiskSignal::new(entity(), RiskType::Credit, 0.0, 0.0, 0.0).is_ok());
            assert!(RiskSignal::new(entity(), RiskType::Credit, 1.0, 100.0, 1.0).is_ok());
        }

        #[test]
        fn rejects_score_above_100() {
            let err = RiskSignal::new(entity(), RiskType::Credit, 1.0, 100.01, 0.5).unwrap_err();
            assert!(matches!(
                err,
                DomainError::ScoreOutOfRange {
                    field: "normalized_score",
                    ..
                }
            ));
        }

        #[test]
        fn rejects_confidence_above_one() {
            assert!(RiskSignal::new(entity(), RiskType::Sentiment, 0.1, 10.0, 1.2).is_err());
        }

        #[test]
        fn rejects_nan_raw_score() {
            let err = RiskSignal::new(entity(), RiskType::Systemic, f64::NAN, 10.0, 0.5).unwrap_err();
            assert_eq!(err, DomainError::NonFinite { field: "raw_score" });
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn json_roundtrip_preserves_all_fields() {
            let ts = Timestamp::from_millis(1_704_067_200_123).unwrap();
            let signal = RiskSignal::at(entity(), RiskType::Systemic, 37.123456, 37.123456, 0.85, ts)
                .unwrap()
                .with_metadata("network_nodes", 12)
                .with_metadata("centrality_metrics", json!({"pagerank": 0.0125}));

            let json = serde_json::to_string(&signal).unwrap();
            let back: RiskSignal = serde_json::from_str(&json).unwrap();

            assert_eq!(back, signal);
            assert_eq!(back.risk_type(), RiskType::Systemic);
            assert_eq!(back.normalized_score().to_bits(), 37.123456_f64.to_bits());
            assert_eq!(back.metadata()["network_nodes"], json!(12));
        }

        #[test]
        fn wire_field_names() {
            let signal = RiskSignal::new(entity(), RiskType::Credit, 0.8, 80.0, 0.95).unwrap();
            let value = serde_json::to_value(&signal).unwrap();
            assert_eq!(value["entity_id"], json!("ENT-001"));
            assert_eq!(value["risk_type"], json!("credit"));
            assert_eq!(value["normalized_score"], json!(80.0));
        }

        #[test]
        fn metadata_defaults_to_empty() {
            let json = r#"{"entity_id":"E","risk_type":"sentiment","raw_score":0.1,
                "normalized_score":10.0,"confidence":0.9,"timestamp":"2024-01-01T00:00:00Z"}"#;
            let signal: RiskSignal = serde_json::from_str(json).unwrap();
            assert!(signal.metadata().is_empty());
            assert_eq!(signal.normalized_score(), 10.0);
        }

        fn parse(entity_id: &str, normalized: f64, confidence: f64) -> serde_json::Result<RiskSignal> {
            serde_json::from_value(json!({
                "entity_id": entity_id,
                "risk_type": "credit",
                "raw_score": 1.0,
                "normalized_score": normalized,
                "confidence": confidence,
                "timestamp": "2024-01-01T00:00:00Z",
            }))
        }

        #[test]
        fn parse_rejects_score_above_100() {
            let err = parse("E", 180.0, 0.9).unwrap_err();
            assert!(err.to_string().contains("normalized_score"));
        }

        #[test]
        fn parse_rejects_confidence_above_one() {
            let err = parse("E", 50.0, 7.0).unwrap_err();
            assert!(err.to_string().contains("confidence"));
        }

        #[test]
        fn parse_rejects_blank_entity() {
            assert!(parse("", 50.0, 0.9).is_err());
        }
    }

    #[test]
    fn display() {
        let signal = RiskSignal::new(entity(), RiskType::Credit, 0.8, 80.0, 0.95).unwrap();
        assert_eq!(
            signal.to_string(),
            "RiskSignal(ENT-001 credit score=80.00 confidence=0.95)"
        );
    }
}
