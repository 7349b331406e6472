//! # Systemic Risk Engine
//!
//! Entity-level systemic risk from the transaction network.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──ingest──▶ Ingesting ──▶ Ready ──analyze(entity)──▶ RiskSignal
//!                               │
//!                               └─(load error)─▶ Uninitialized
//! ```
//!
//! `ingest` builds the graph and runs the graph-global centrality pass once.
//! It takes `&mut self`, so it can never overlap with itself or with
//! `analyze`; after it returns the engine is read-only and can be shared
//! across threads behind an `Arc`.
//!
//! A missing transaction source is not an error: the engine becomes ready on
//! an empty graph and every entity scores 0.
//!
//! # Examples
//!
//! ```
//! use sentinel_risk::application::services::systemic_engine::{SystemicConfig, SystemicRiskEngine};
//! use sentinel_risk::domain::entities::TransactionRecord;
//! use sentinel_risk::domain::value_objects::EntityId;
//! use sentinel_risk::infrastructure::persistence::InMemoryTransactionSource;
//!
//! let mut engine = SystemicRiskEngine::new(SystemicConfig::default()).unwrap();
//! let entity = EntityId::new("A").unwrap();
//! assert!(engine.analyze(&entity).is_err());
//!
//! let source = InMemoryTransactionSource::new(vec![
//!     TransactionRecord::new("A", "B", 100.0),
//!     TransactionRecord::new("B", "C", 50.0),
//! ]);
//! engine.ingest(&source).unwrap();
//!
//! let signal = engine.analyze(&entity).unwrap();
//! assert_eq!(signal.confidence(), 0.85);
//! ```

use crate::application::error::{ApplicationError, ApplicationResult, InfrastructureError};
use crate::application::services::signal_producer::RiskSignalProducer;
use crate::domain::entities::{RiskSignal, TransactionRecord};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::events::{DatasetIngested, DomainEvent};
use crate::domain::services::centrality::{CentralityCalculator, CentralityConfig};
use crate::domain::services::contagion::{ContagionConfig, ContagionSimulator};
use crate::domain::services::transaction_graph::{GraphBuilder, TransactionGraph};
use crate::domain::value_objects::score::clip_score;
use crate::domain::value_objects::{EntityId, IngestionState, RiskType};
use crate::infrastructure::persistence::JsonFileTransactionSource;
use crate::infrastructure::persistence::traits::TransactionSource;
use std::path::Path;
use tracing::{debug, info, warn};

/// Systemic engine parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemicConfig {
    /// Centrality algorithm parameters.
    pub centrality: CentralityConfig,
    /// Contagion scoring constants.
    pub contagion: ContagionConfig,
    /// Weight of the centrality score in the blend.
    pub centrality_blend: f64,
    /// Weight of the contagion score in the blend.
    pub contagion_blend: f64,
    /// Confidence attached to every systemic signal.
    pub confidence: f64,
}

impl Default for SystemicConfig {
    fn default() -> Self {
        Self {
            centrality: CentralityConfig::default(),
            contagion: ContagionConfig::default(),
            centrality_blend: 0.6,
            contagion_blend: 0.4,
            confidence: 0.85,
        }
    }
}

impl SystemicConfig {
    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` describing the first invalid value.
    pub fn validate(&self) -> DomainResult<()> {
        self.centrality.validate()?;
        self.contagion.validate()?;
        if [self.centrality_blend, self.contagion_blend]
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(DomainError::invalid_graph_config(
                "systemic blend weights must be finite and non-negative",
            ));
        }
        DomainError::check_range("confidence", self.confidence, 0.0, 1.0)?;
        Ok(())
    }
}

/// Systemic risk producer over an ingested transaction graph.
#[derive(Debug)]
pub struct SystemicRiskEngine {
    config: SystemicConfig,
    state: IngestionState,
    graph: TransactionGraph,
    calculator: CentralityCalculator,
    simulator: ContagionSimulator,
    last_ingest: Option<DatasetIngested>,
}

impl SystemicRiskEngine {
    /// Creates an uninitialized engine.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if the configuration is invalid.
    pub fn new(config: SystemicConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self {
            calculator: CentralityCalculator::new(config.centrality.clone())?,
            simulator: ContagionSimulator::new(config.contagion)?,
            config,
            state: IngestionState::Uninitialized,
            graph: TransactionGraph::empty(),
            last_ingest: None,
        })
    }

    /// Returns the lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> IngestionState {
        self.state
    }

    /// Returns the ingested graph.
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &TransactionGraph {
        &self.graph
    }

    /// Returns the centrality cache.
    #[inline]
    #[must_use]
    pub fn calculator(&self) -> &CentralityCalculator {
        &self.calculator
    }

    /// Returns the event recorded by the last successful ingest.
    #[must_use]
    pub fn last_ingest(&self) -> Option<&DatasetIngested> {
        self.last_ingest.as_ref()
    }

    /// Loads a dataset, builds the graph and computes centrality.
    ///
    /// Replaces any previously ingested dataset.
    ///
    /// # Errors
    ///
    /// Returns an infrastructure error if the source exists but cannot be
    /// read; the engine is then back in `Uninitialized`.
    pub fn ingest(&mut self, source: &dyn TransactionSource) -> ApplicationResult<DatasetIngested> {
        self.transition(IngestionState::Ingesting)?;
        info!(source = %source.describe(), "initializing systemic risk engine");

        let records = match source.load() {
            Ok(Some(records)) => records,
            Ok(None) => {
                warn!(
                    source = %source.describe(),
                    "transaction data not found, running on an empty graph"
                );
                Vec::new()
            }
            Err(e) => {
                self.graph = TransactionGraph::empty();
                self.last_ingest = None;
                self.transition(IngestionState::Uninitialized)?;
                return Err(e.into());
            }
        };

        Ok(self.ingest_records(&records)?)
    }

    /// Ingests a JSON transaction file; an absent file yields an empty graph.
    ///
    /// # Errors
    ///
    /// Same as [`ingest`](Self::ingest).
    pub fn ingest_path(&mut self, path: impl AsRef<Path>) -> ApplicationResult<DatasetIngested> {
        let source = JsonFileTransactionSource::new(path.as_ref());
        self.ingest(&source)
    }

    fn ingest_records(&mut self, records: &[TransactionRecord]) -> DomainResult<DatasetIngested> {
        self.graph = GraphBuilder::build(records);
        self.calculator.compute_all(&self.graph);

        let stats = self.graph.stats();
        let event = DatasetIngested::new(
            self.graph.node_count(),
            self.graph.edge_count(),
            stats.accepted,
            stats.skipped,
            self.calculator.betweenness_mode(),
        );
        self.last_ingest = Some(event.clone());
        self.transition(IngestionState::Ready)?;

        info!(
            event = event.event_name(),
            event_id = %event.event_id(),
            nodes = event.nodes,
            edges = event.edges,
            betweenness_mode = %event.betweenness_mode,
            "systemic engine ready"
        );
        Ok(event)
    }

    fn transition(&mut self, target: IngestionState) -> DomainResult<()> {
        if !self.state.can_transition_to(target) {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: target.to_string(),
            });
        }
        self.state = target;
        Ok(())
    }

    /// Scores one entity.
    ///
    /// `centrality * 0.6 + contagion * 0.4` (configurable), clipped to
    /// `[0, 100]`. Entities without transaction history score 0.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotInitialized` before a successful ingest.
    pub fn analyze(&self, entity_id: &EntityId) -> ApplicationResult<RiskSignal> {
        if !self.state.is_ready() {
            return Err(ApplicationError::not_initialized(format!(
                "systemic engine is {}, call ingest first",
                self.state
            )));
        }

        let id = entity_id.as_str();
        let centrality_score = self.calculator.score(id);
        let metrics = self.calculator.metrics(id).unwrap_or_default();
        let contagion = self.simulator.simulate_failure(&self.graph, id);

        let score = clip_score(
            centrality_score * self.config.centrality_blend
                + contagion.contagion_score * self.config.contagion_blend,
        );

        let signal = RiskSignal::new(
            entity_id.clone(),
            RiskType::Systemic,
            score,
            score,
            self.config.confidence,
        )?
        .with_metadata("centrality_metrics", to_json(&metrics)?)
        .with_metadata("stress_test_results", to_json(&contagion)?)
        .with_metadata("network_nodes", self.graph.node_count())
        .with_metadata(
            "betweenness_mode",
            to_json(&self.calculator.betweenness_mode())?,
        );

        debug!(entity_id = %entity_id, score, "systemic score computed");
        Ok(signal)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, InfrastructureError> {
    serde_json::to_value(value).map_err(InfrastructureError::from)
}

impl RiskSignalProducer for SystemicRiskEngine {
    fn risk_type(&self) -> RiskType {
        RiskType::Systemic
    }

    fn analyze(&self, entity_id: &EntityId) -> ApplicationResult<RiskSignal> {
        SystemicRiskEngine::analyze(self, entity_id)
    }

    fn name(&self) -> &'static str {
        "SystemicRiskEngine"
    }
}
