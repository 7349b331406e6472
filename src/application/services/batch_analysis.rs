//! # Batch Analysis
//!
//! Runs every producer for every entity and fuses the results.
//!
//! # Flow
//!
//! ```text
//! entities ──par_iter──▶ producers ─▶ signals ─▶ fusion(pinned method) ─▶ profile
//!                                         │                                  │
//!                                         └── error ─▶ EntityFailure ◀───────┘
//! ```
//!
//! The fusion method is read once before the parallel phase, so every profile
//! in one report was produced with the same strategy unless its own classifier
//! call failed. A recoverable producer error (missing data, model failure)
//! drops that domain for the entity; any other error fails the entity. A
//! failed entity never aborts the batch.

use crate::application::error::ApplicationResult;
use crate::application::services::fusion_engine::RiskFusionEngine;
use crate::application::services::signal_producer::RiskSignalProducer;
use crate::domain::entities::{AggregatedRiskProfile, RiskSignal};
use crate::domain::value_objects::{EntityId, FusionMethod};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// An entity the batch could not score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityFailure {
    /// Entity that failed.
    pub entity_id: EntityId,
    /// Rendered error.
    pub error: String,
}

/// Result of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Run identifier.
    pub run_id: Uuid,
    /// Method pinned for this run.
    pub fusion_method: FusionMethod,
    /// Profiles in input order, failed entities omitted.
    pub profiles: Vec<AggregatedRiskProfile>,
    /// Entities that could not be scored, in input order.
    pub failures: Vec<EntityFailure>,
}

impl BatchReport {
    /// Returns true if every entity was scored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Serializes the profiles array.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; not expected for well-formed profiles.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.profiles)
    }
}

/// Fans entities out to every producer and fuses the signals.
#[derive(Debug, Clone)]
pub struct BatchAnalyzer {
    producers: Vec<Arc<dyn RiskSignalProducer>>,
    fusion: Arc<RiskFusionEngine>,
}

impl BatchAnalyzer {
    /// Creates an analyzer with no producers.
    #[must_use]
    pub fn new(fusion: Arc<RiskFusionEngine>) -> Self {
        Self {
            producers: Vec::new(),
            fusion,
        }
    }

    /// Adds a producer.
    #[must_use]
    pub fn with_producer(mut self, producer: Arc<dyn RiskSignalProducer>) -> Self {
        self.producers.push(producer);
        self
    }

    /// Returns the producers.
    #[must_use]
    pub fn producers(&self) -> &[Arc<dyn RiskSignalProducer>] {
        &self.producers
    }

    /// Returns the fusion engine.
    #[must_use]
    pub fn fusion(&self) -> &RiskFusionEngine {
        &self.fusion
    }

    /// Scores every entity.
    #[must_use]
    pub fn run(&self, entities: &[EntityId]) -> BatchReport {
        let run_id = Uuid::new_v4();
        let method = self.fusion.current_method();
        info!(
            run_id = %run_id,
            entities = entities.len(),
            producers = self.producers.len(),
            method = %method,
            "batch started"
        );

        let outcomes: Vec<ApplicationResult<AggregatedRiskProfile>> = entities
            .par_iter()
            .map(|entity_id| self.score_entity(method, entity_id))
            .collect();

        let mut profiles = Vec::with_capacity(entities.len());
        let mut failures = Vec::new();
        for (entity_id, outcome) in entities.iter().zip(outcomes) {
            match outcome {
                Ok(profile) => profiles.push(profile),
                Err(e) => {
                    error!(run_id = %run_id, entity_id = %entity_id, error = %e, "entity failed");
                    failures.push(EntityFailure {
                        entity_id: entity_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            run_id = %run_id,
            scored = profiles.len(),
            failed = failures.len(),
            "batch finished"
        );
        BatchReport {
            run_id,
            fusion_method: method,
            profiles,
            failures,
        }
    }

    fn score_entity(
        &self,
        method: FusionMethod,
        entity_id: &EntityId,
    ) -> ApplicationResult<AggregatedRiskProfile> {
        let signals = self.collect_signals(entity_id)?;
        self.fusion.aggregate_with(method, entity_id, signals)
    }

    fn collect_signals(&self, entity_id: &EntityId) -> ApplicationResult<Vec<RiskSignal>> {
        let mut signals = Vec::with_capacity(self.producers.len());
        for producer in &self.producers {
            match producer.analyze(entity_id) {
                Ok(signal) => signals.push(signal),
                Err(e) if e.is_recoverable() => {
                    debug!(
                        entity_id = %entity_id,
                        producer = producer.name(),
                        reason = %e,
                        "domain skipped"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(signals)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::{ApplicationError, ClassifierError};
    use crate::application::services::fusion_engine::{FusionConfig, RiskClassifier};
    use crate::domain::services::risk_scorer::RiskScorer;
    use crate::domain::value_objects::{ModelState, RiskType};
    use std::collections::HashMap;

    #[derive(Debug)]
    struct TableProducer {
        risk_type: RiskType,
        scores: HashMap<String, f64>,
    }

    impl RiskSignalProducer for TableProducer {
        fn risk_type(&self) -> RiskType {
            self.risk_type
        }

        fn analyze(&self, entity_id: &EntityId) -> ApplicationResult<RiskSignal> {
            let score = self
                .scores
                .get(entity_id.as_str())
                .ok_or_else(|| ApplicationError::missing_data("table row", entity_id.as_str()))?;
            Ok(RiskSignal::new(entity_id.clone(), self.risk_type, *score, *score, 0.9)?)
        }

        fn name(&self) -> &'static str {
            "TableProducer"
        }
    }

    #[derive(Debug)]
    struct BrokenProducer;

    impl RiskSignalProducer for BrokenProducer {
        fn risk_type(&self) -> RiskType {
            RiskType::Systemic
        }

        fn analyze(&self, _: &EntityId) -> ApplicationResult<RiskSignal> {
            Err(ApplicationError::not_initialized("no graph"))
        }

        fn name(&self) -> &'static str {
            "BrokenProducer"
        }
    }

    #[derive(Debug)]
    struct ModelErrorProducer;

    impl RiskSignalProducer for ModelErrorProducer {
        fn risk_type(&self) -> RiskType {
            RiskType::Credit
        }

        fn analyze(&self, _: &EntityId) -> ApplicationResult<RiskSignal> {
            Err(ClassifierError::prediction("NaN probability").into())
        }

        fn name(&self) -> &'static str {
            "ModelErrorProducer"
        }
    }

    #[derive(Debug)]
    struct FailingClassifier;

    impl RiskClassifier for FailingClassifier {
        fn predict_probability(&self, _: &[f64; 3]) -> Result<[f64; 2], ClassifierError> {
            Err(ClassifierError::prediction("corrupt"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn ids(values: &[&str]) -> Vec<EntityId> {
        values.iter().map(|v| EntityId::new(*v).unwrap()).collect()
    }

    fn table(risk_type: RiskType, rows: &[(&str, f64)]) -> Arc<dyn RiskSignalProducer> {
        Arc::new(TableProducer {
            risk_type,
            scores: rows.iter().map(|(k, v)| ((*k).to_string(), *v)).collect(),
        })
    }

    fn static_engine() -> Arc<RiskFusionEngine> {
        Arc::new(RiskFusionEngine::new(FusionConfig::default(), RiskScorer::default(), None).unwrap())
    }

    #[test]
    fn preserves_input_order() {
        let names: Vec<String> = (0..64).map(|i| format!("E{i:02}")).collect();
        let rows: Vec<(&str, f64)> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i as f64))
            .collect();
        let analyzer = BatchAnalyzer::new(static_engine()).with_producer(table(RiskType::Credit, &rows));
        let entities: Vec<EntityId> = names.iter().map(|n| EntityId::new(n.as_str()).unwrap()).collect();

        let report = analyzer.run(&entities);

        assert!(report.is_complete());
        let order: Vec<&str> = report.profiles.iter().map(|p| p.entity_id().as_str()).collect();
        assert_eq!(order, names.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn missing_domain_is_skipped() {
        let analyzer = BatchAnalyzer::new(static_engine())
            .with_producer(table(RiskType::Credit, &[("A", 80.0), ("B", 20.0)]))
            .with_producer(table(RiskType::Sentiment, &[("A", 40.0)]));

        let report = analyzer.run(&ids(&["A", "B"]));

        assert!(report.is_complete());
        assert_eq!(report.profiles[0].contributing_signals().len(), 2);
        assert_eq!(report.profiles[1].contributing_signals().len(), 1);
        assert_eq!(report.profiles[1].composite_risk_score(), 20.0);
    }

    #[test]
    fn entity_without_any_signal_fails_alone() {
        let analyzer = BatchAnalyzer::new(static_engine())
            .with_producer(table(RiskType::Credit, &[("A", 50.0)]));

        let report = analyzer.run(&ids(&["A", "ghost"]));

        assert_eq!(report.profiles.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].entity_id.as_str(), "ghost");
        assert!(report.failures[0].error.contains("no signals"));
    }

    #[test]
    fn hard_producer_error_fails_entity() {
        let analyzer = BatchAnalyzer::new(static_engine())
            .with_producer(table(RiskType::Credit, &[("A", 50.0)]))
            .with_producer(Arc::new(BrokenProducer));

        let report = analyzer.run(&ids(&["A"]));

        assert!(report.profiles.is_empty());
        assert!(report.failures[0].error.contains("no graph"));
    }

    #[test]
    fn producer_model_error_drops_domain() {
        let analyzer = BatchAnalyzer::new(static_engine())
            .with_producer(Arc::new(ModelErrorProducer))
            .with_producer(table(RiskType::Sentiment, &[("A", 40.0)]));

        let report = analyzer.run(&ids(&["A"]));

        assert!(report.is_complete());
        assert_eq!(report.profiles[0].contributing_signals().len(), 1);
        assert_eq!(report.profiles[0].composite_risk_score(), 40.0);
    }

    #[test]
    fn method_is_pinned_and_model_disabled_once() {
        let classifier: Arc<dyn RiskClassifier> = Arc::new(FailingClassifier);
        let engine =
            RiskFusionEngine::new(FusionConfig::default(), RiskScorer::default(), Some(classifier));
        let fusion = Arc::new(engine.unwrap());
        let analyzer = BatchAnalyzer::new(Arc::clone(&fusion))
            .with_producer(table(RiskType::Credit, &[("A", 10.0), ("B", 90.0)]));

        let report = analyzer.run(&ids(&["A", "B"]));

        assert_eq!(report.fusion_method, FusionMethod::MetaModel);
        assert!(report
            .profiles
            .iter()
            .all(|p| p.fusion_method() == FusionMethod::StaticWeights));
        assert_eq!(fusion.model_state(), ModelState::Disabled);
        assert!(fusion.degradation().is_some());

        let next = analyzer.run(&ids(&["A"]));
        assert_eq!(next.fusion_method, FusionMethod::StaticWeights);
        assert_ne!(next.run_id, report.run_id);
    }

    #[test]
    fn json_is_profiles_array() {
        let analyzer = BatchAnalyzer::new(static_engine())
            .with_producer(table(RiskType::Credit, &[("A", 30.0)]));
        let json = analyzer.run(&ids(&["A"])).to_json().unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["entity_id"], "A");
    }
}
