//! # Precomputed Signals
//!
//! Signals produced elsewhere (another run, another system) fed back into
//! fusion as if a live producer had emitted them.
//!
//! A signal file is a JSON array of rows:
//!
//! ```json
//! [
//!   {"entity_id": "ENT-1", "risk_type": "credit", "normalized_score": 62.5, "confidence": 0.95},
//!   {"entity_id": "ENT-1", "risk_type": "sentiment", "raw_score": 0.3, "normalized_score": 50.0,
//!    "confidence": 0.9, "metadata": {"headline_count": 4}}
//! ]
//! ```
//!
//! `raw_score` defaults to `normalized_score` and `timestamp` to load time.

use crate::application::error::{ApplicationError, ApplicationResult, InfrastructureError};
use crate::application::services::signal_producer::RiskSignalProducer;
use crate::domain::entities::{RiskSignal, SignalMetadata};
use crate::domain::value_objects::{EntityId, RiskType, Timestamp};
use crate::infrastructure::persistence::json_file::read_rows;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct SignalRow {
    entity_id: String,
    risk_type: RiskType,
    #[serde(default)]
    raw_score: Option<f64>,
    normalized_score: f64,
    confidence: f64,
    #[serde(default)]
    metadata: SignalMetadata,
    #[serde(default)]
    timestamp: Option<Timestamp>,
}

impl SignalRow {
    fn into_signal(self) -> Result<RiskSignal, String> {
        let entity_id = EntityId::new(self.entity_id).map_err(|e| e.to_string())?;
        let signal = RiskSignal::at(
            entity_id,
            self.risk_type,
            self.raw_score.unwrap_or(self.normalized_score),
            self.normalized_score,
            self.confidence,
            self.timestamp.unwrap_or_else(Timestamp::now),
        )
        .map_err(|e| e.to_string())?;
        Ok(signal.with_metadata_map(self.metadata))
    }
}

/// A validated set of precomputed signals.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedSignals {
    signals: Vec<RiskSignal>,
}

impl PrecomputedSignals {
    /// Wraps signals that are already validated.
    #[must_use]
    pub fn from_signals(signals: Vec<RiskSignal>) -> Self {
        Self { signals }
    }

    /// Loads a signal file.
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError::SourceNotFound` if the file is absent and
    /// `InfrastructureError::Serialization` naming the first invalid row.
    pub fn load(path: &Path) -> Result<Self, InfrastructureError> {
        let rows = read_rows::<SignalRow>(path)?
            .ok_or_else(|| InfrastructureError::source_not_found(path.display().to_string()))?;

        let signals = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_signal().map_err(|e| {
                    InfrastructureError::serialization(format!("{} row {i}: {e}", path.display()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(path = %path.display(), signals = signals.len(), "precomputed signals loaded");
        Ok(Self { signals })
    }

    /// Returns the signals in file order.
    #[must_use]
    pub fn signals(&self) -> &[RiskSignal] {
        &self.signals
    }

    /// Returns every entity in first-seen order.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        let mut seen = HashSet::new();
        self.signals
            .iter()
            .filter(|s| seen.insert(s.entity_id()))
            .map(|s| s.entity_id().clone())
            .collect()
    }

    /// Splits the signals into one producer per risk type present.
    #[must_use]
    pub fn into_producers(self) -> Vec<PrecomputedSignalProducer> {
        let mut by_type: BTreeMap<RiskType, HashMap<EntityId, RiskSignal>> = BTreeMap::new();
        for signal in self.signals {
            let table = by_type.entry(signal.risk_type()).or_default();
            if let Some(previous) = table.insert(signal.entity_id().clone(), signal) {
                debug!(
                    entity_id = %previous.entity_id(),
                    risk_type = %previous.risk_type(),
                    "duplicate precomputed signal, last one wins"
                );
            }
        }
        by_type
            .into_iter()
            .map(|(risk_type, signals)| PrecomputedSignalProducer { risk_type, signals })
            .collect()
    }
}

/// Replays precomputed signals of one risk type.
#[derive(Debug, Clone)]
pub struct PrecomputedSignalProducer {
    risk_type: RiskType,
    signals: HashMap<EntityId, RiskSignal>,
}

impl PrecomputedSignalProducer {
    /// Returns the number of entities covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Returns true if no entity is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

impl RiskSignalProducer for PrecomputedSignalProducer {
    fn risk_type(&self) -> RiskType {
        self.risk_type
    }

    fn analyze(&self, entity_id: &EntityId) -> ApplicationResult<RiskSignal> {
        self.signals.get(entity_id).cloned().ok_or_else(|| {
            ApplicationError::missing_data(
                format!("precomputed {} signal", self.risk_type),
                entity_id.as_str(),
            )
        })
    }

    fn name(&self) -> &'static str {
        "PrecomputedSignalProducer"
    }
}
