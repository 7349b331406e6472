//! # Credit Risk Engine
//!
//! Probability-of-default signals from financial statement ratios.
//!
//! The default model is a black box behind [`DefaultProbabilityModel`]; it is
//! loaded when the engine is built, so a missing model fails at startup
//! instead of on the first entity.
//!
//! ```text
//! features ─▶ model ─▶ p ─▶ clip [0, 1] ─▶ round2(p * 100) ─▶ level
//! ```

use crate::application::error::{
    ApplicationError, ApplicationResult, ClassifierError, InfrastructureError,
};
use crate::application::services::signal_producer::RiskSignalProducer;
use crate::domain::entities::RiskSignal;
use crate::domain::services::risk_scorer::RiskScorer;
use crate::domain::value_objects::score::round2;
use crate::domain::value_objects::{EntityId, RiskType};
use crate::infrastructure::models::TreeEnsembleClassifier;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Model input order.
pub const CREDIT_FEATURES: [&str; 4] = ["roa", "debt_ratio", "operating_margin", "net_income_assets"];

/// Default confidence of credit signals.
pub const DEFAULT_CREDIT_CONFIDENCE: f64 = 0.95;

/// Financial ratios fed to the default model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditFeatures {
    /// Return on assets.
    pub roa: f64,
    /// Total debt over total assets.
    pub debt_ratio: f64,
    /// Operating income over revenue.
    pub operating_margin: f64,
    /// Net income over total assets.
    pub net_income_assets: f64,
}

impl CreditFeatures {
    /// Builds features from a name-to-value map.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::MissingData` naming every absent feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_risk::application::services::credit_engine::CreditFeatures;
    /// use std::collections::BTreeMap;
    ///
    /// let mut row = BTreeMap::new();
    /// row.insert("roa".to_string(), 0.05);
    /// let err = CreditFeatures::from_map("ENT-1", &row).unwrap_err();
    /// assert!(err.to_string().contains("debt_ratio"));
    /// ```
    pub fn from_map(entity_id: &str, values: &BTreeMap<String, f64>) -> ApplicationResult<Self> {
        let missing: Vec<&str> = CREDIT_FEATURES
            .iter()
            .copied()
            .filter(|name| !values.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            return Err(ApplicationError::missing_data(
                format!("credit features [{}]", missing.join(", ")),
                entity_id,
            ));
        }

        let get = |name: &str| values.get(name).copied().unwrap_or_default();
        Ok(Self {
            roa: get("roa"),
            debt_ratio: get("debt_ratio"),
            operating_margin: get("operating_margin"),
            net_income_assets: get("net_income_assets"),
        })
    }

    /// Returns the features in model input order.
    #[must_use]
    pub fn to_array(&self) -> [f64; 4] {
        [
            self.roa,
            self.debt_ratio,
            self.operating_margin,
            self.net_income_assets,
        ]
    }
}

/// Black-box probability-of-default model.
pub trait DefaultProbabilityModel: Send + Sync + fmt::Debug {
    /// Returns the probability of default for one feature row.
    ///
    /// # Errors
    ///
    /// Returns a `ClassifierError` if the model cannot score the row.
    fn predict_default(&self, features: &[f64; 4]) -> Result<f64, ClassifierError>;

    /// Returns the model name for logs.
    fn name(&self) -> &str;
}

/// Credit engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditConfig {
    /// Default model file.
    pub model_path: Option<PathBuf>,
    /// Confidence attached to every credit signal.
    pub confidence: f64,
}

impl Default for CreditConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            confidence: DEFAULT_CREDIT_CONFIDENCE,
        }
    }
}

/// Credit risk producer.
#[derive(Debug)]
pub struct CreditRiskEngine {
    model: Arc<dyn DefaultProbabilityModel>,
    scorer: RiskScorer,
    confidence: f64,
    features: HashMap<EntityId, CreditFeatures>,
}

impl CreditRiskEngine {
    /// Creates an engine over an already loaded model.
    #[must_use]
    pub fn new(model: Arc<dyn DefaultProbabilityModel>, scorer: RiskScorer, confidence: f64) -> Self {
        Self {
            model,
            scorer,
            confidence,
            features: HashMap::new(),
        }
    }

    /// Loads the configured model.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::NotFound` when no model is configured or the
    /// file is absent, and `Load`/`FeatureMismatch` when it is unusable.
    pub fn from_config(config: &CreditConfig, scorer: RiskScorer) -> ApplicationResult<Self> {
        let path = config
            .model_path
            .as_ref()
            .ok_or_else(|| ClassifierError::NotFound("no credit model path configured".into()))?;
        let model = TreeEnsembleClassifier::from_path(path)?;
        if model.n_features() != CREDIT_FEATURES.len() {
            return Err(ClassifierError::FeatureMismatch {
                expected: CREDIT_FEATURES.len(),
                actual: model.n_features(),
            }
            .into());
        }
        info!(path = %path.display(), "credit model loaded");
        Ok(Self::new(Arc::new(model), scorer, config.confidence))
    }

    /// Registers per-entity features used by [`RiskSignalProducer::analyze`].
    #[must_use]
    pub fn with_features(mut self, features: HashMap<EntityId, CreditFeatures>) -> Self {
        self.features = features;
        self
    }

    /// Scores one entity from explicit features.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Model` if the model fails or returns a
    /// non-finite probability.
    pub fn assess(&self, entity_id: &EntityId, features: &CreditFeatures) -> ApplicationResult<RiskSignal> {
        let raw = self.model.predict_default(&features.to_array())?;
        if !raw.is_finite() {
            return Err(ClassifierError::prediction(format!(
                "{} returned non-finite probability {raw}",
                self.model.name()
            ))
            .into());
        }

        let probability = raw.clamp(0.0, 1.0);
        let score = round2(probability * 100.0);
        let level = self.scorer.level(score);

        let input_used = serde_json::to_value(features)
            .map_err(InfrastructureError::from)?;
        let signal = RiskSignal::new(
            entity_id.clone(),
            RiskType::Credit,
            probability,
            score,
            self.confidence,
        )?
        .with_metadata("risk_level_label", level.as_str())
        .with_metadata("raw_pd_probability", probability)
        .with_metadata("input_used", input_used);

        info!(entity_id = %entity_id, score, level = %level, "credit risk analyzed");
        Ok(signal)
    }
}

impl RiskSignalProducer for CreditRiskEngine {
    fn risk_type(&self) -> RiskType {
        RiskType::Credit
    }

    fn analyze(&self, entity_id: &EntityId) -> ApplicationResult<RiskSignal> {
        let features = self
            .features
            .get(entity_id)
            .ok_or_else(|| ApplicationError::missing_data("credit features", entity_id.as_str()))?;
        self.assess(entity_id, features)
    }

    fn name(&self) -> &'static str {
        "CreditRiskEngine"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::RiskLevel;
    use serde_json::json;

    #[derive(Debug)]
    struct ConstantModel(f64);

    impl DefaultProbabilityModel for ConstantModel {
        fn predict_default(&self, _: &[f64; 4]) -> Result<f64, ClassifierError> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "constant"
        }
    }

    fn engine(p: f64) -> CreditRiskEngine {
        CreditRiskEngine::new(
            Arc::new(ConstantModel(p)),
            RiskScorer::default(),
            DEFAULT_CREDIT_CONFIDENCE,
        )
    }

    fn features() -> CreditFeatures {
        CreditFeatures {
            roa: 0.02,
            debt_ratio: 0.7,
            operating_margin: 0.1,
            net_income_assets: 0.01,
        }
    }

    fn entity() -> EntityId {
        EntityId::new("ENT-42").unwrap()
    }

    #[test]
    fn probability_to_score() {
        let signal = engine(0.61234).assess(&entity(), &features()).unwrap();
        assert_eq!(signal.normalized_score(), 61.23);
        assert_eq!(signal.raw_score(), 0.61234);
        assert_eq!(signal.confidence(), 0.95);
        assert_eq!(signal.metadata()["risk_level_label"], json!("High"));
        assert_eq!(signal.metadata()["input_used"]["debt_ratio"], json!(0.7));
    }

    #[test]
    fn probability_is_clipped() {
        let signal = engine(1.3).assess(&entity(), &features()).unwrap();
        assert_eq!(signal.normalized_score(), 100.0);
        assert_eq!(signal.metadata()["raw_pd_probability"], json!(1.0));

        let signal = engine(-0.01).assess(&entity(), &features()).unwrap();
        assert_eq!(signal.normalized_score(), 0.0);
    }

    #[test]
    fn nan_probability_is_model_error() {
        let err = engine(f64::NAN).assess(&entity(), &features()).unwrap_err();
        assert!(matches!(err, ApplicationError::Model(ClassifierError::Prediction(_))));
    }

    #[test]
    fn producer_without_features_is_missing_data() {
        let err = RiskSignalProducer::analyze(&engine(0.1), &entity()).unwrap_err();
        assert!(matches!(err, ApplicationError::MissingData { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn producer_uses_registered_features() {
        let mut map = HashMap::new();
        map.insert(entity(), features());
        let engine = engine(0.2).with_features(map);
        let signal = RiskSignalProducer::analyze(&engine, &entity()).unwrap();
        assert_eq!(engine.scorer.level(signal.normalized_score()), RiskLevel::Low);
    }

    #[test]
    fn from_map_lists_every_missing_feature() {
        let mut row = BTreeMap::new();
        row.insert("roa".to_string(), 0.1);
        row.insert("operating_margin".to_string(), 0.2);
        let err = CreditFeatures::from_map("E", &row).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("debt_ratio"));
        assert!(msg.contains("net_income_assets"));
        assert!(!msg.contains("roa,"));
    }

    #[test]
    fn from_map_orders_features() {
        let row: BTreeMap<String, f64> = [
            ("net_income_assets", 4.0),
            ("roa", 1.0),
            ("operating_margin", 3.0),
            ("debt_ratio", 2.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let f = CreditFeatures::from_map("E", &row).unwrap();
        assert_eq!(f.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn missing_model_fails_fast() {
        let err = CreditRiskEngine::from_config(&CreditConfig::default(), RiskScorer::default())
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Model(ClassifierError::NotFound(_))));

        let dir = tempfile::tempdir().unwrap();
        let config = CreditConfig {
            model_path: Some(dir.path().join("credit.json")),
            ..CreditConfig::default()
        };
        let err = CreditRiskEngine::from_config(&config, RiskScorer::default()).unwrap_err();
        assert!(matches!(err, ApplicationError::Model(ClassifierError::NotFound(_))));
    }
}
