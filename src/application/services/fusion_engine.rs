//! # Risk Fusion Engine
//!
//! Combines per-domain [`RiskSignal`]s for one entity into an
//! [`AggregatedRiskProfile`].
//!
//! # Strategies
//!
//! ```text
//! MetaModel      score = P(high risk | [credit, systemic, sentiment]) * 100
//! StaticWeights  score = Σ w(d) * score(d) / Σ w(d)   over present domains d
//! ```
//!
//! The strategy follows the engine's [`ModelState`]. A prediction failure
//! moves the model from `Available` to `Disabled` exactly once, records a
//! [`ModelDegraded`] event, and every later call uses static weights.
//!
//! Batch callers pin the strategy up front with
//! [`current_method`](RiskFusionEngine::current_method) and pass it to
//! [`aggregate_with`](RiskFusionEngine::aggregate_with), so a failure inside a
//! parallel run cannot make the methodology depend on thread scheduling.

use crate::application::error::{ApplicationError, ApplicationResult, ClassifierError};
use crate::domain::entities::{AggregatedRiskProfile, ExcludedSignal, RiskSignal};
use crate::domain::errors::DomainResult;
use crate::domain::events::{DomainEvent, ModelDegraded};
use crate::domain::services::risk_scorer::RiskScorer;
use crate::domain::value_objects::score::{clip_score, round2};
use crate::domain::value_objects::{EntityId, FusionMethod, FusionWeights, ModelState, RiskType};
use crate::infrastructure::models::TreeEnsembleClassifier;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Input width of the fusion classifier.
pub const META_FEATURES: usize = 3;

/// What to do with a signal that names another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityMismatchPolicy {
    /// Log, leave it out, and list it on the profile.
    #[default]
    Exclude,
    /// Fail the whole aggregation.
    Reject,
}

/// Fusion engine configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FusionConfig {
    /// Static strategy weights.
    pub weights: FusionWeights,
    /// Entity mismatch handling.
    pub entity_mismatch: EntityMismatchPolicy,
    /// Whether to load the learned classifier.
    pub use_meta_model: bool,
    /// Classifier file.
    pub meta_model_path: Option<PathBuf>,
}

impl FusionConfig {
    /// Sets the static weights.
    #[must_use]
    pub fn with_weights(mut self, weights: FusionWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the entity mismatch policy.
    #[must_use]
    pub fn with_entity_mismatch(mut self, policy: EntityMismatchPolicy) -> Self {
        self.entity_mismatch = policy;
        self
    }

    /// Enables the learned classifier at `path`.
    #[must_use]
    pub fn with_meta_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.use_meta_model = true;
        self.meta_model_path = Some(path.into());
        self
    }
}

/// Learned binary classifier over `[credit, systemic, sentiment]` scores.
pub trait RiskClassifier: Send + Sync + fmt::Debug {
    /// Returns `[P(class 0), P(class 1)]`, class 1 being high risk.
    ///
    /// # Errors
    ///
    /// Returns a `ClassifierError` if no prediction can be made.
    fn predict_probability(&self, features: &[f64; META_FEATURES]) -> Result<[f64; 2], ClassifierError>;

    /// Returns the classifier name for logs and events.
    fn name(&self) -> &str;
}

#[derive(Debug)]
struct ModelSlot {
    state: ModelState,
    degradation: Option<ModelDegraded>,
}

/// Signal fusion engine.
#[derive(Debug)]
pub struct RiskFusionEngine {
    config: FusionConfig,
    scorer: RiskScorer,
    classifier: Option<Arc<dyn RiskClassifier>>,
    model: RwLock<ModelSlot>,
}

impl RiskFusionEngine {
    /// Creates an engine.
    ///
    /// With a classifier the engine starts in `Available`; without one it is
    /// `Unconfigured` and uses static weights for its whole life.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWeights` if the static weights fail
    /// validation.
    pub fn new(
        config: FusionConfig,
        scorer: RiskScorer,
        classifier: Option<Arc<dyn RiskClassifier>>,
    ) -> DomainResult<Self> {
        config.weights.validate()?;
        let state = if classifier.is_some() {
            ModelState::Available
        } else {
            ModelState::Unconfigured
        };
        Ok(Self {
            config,
            scorer,
            classifier,
            model: RwLock::new(ModelSlot {
                state,
                degradation: None,
            }),
        })
    }

    /// Creates an engine, loading the classifier named by the configuration.
    ///
    /// A missing, unreadable or wrongly shaped model file is logged and the
    /// engine runs on static weights.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_config(config: FusionConfig, scorer: RiskScorer) -> DomainResult<Self> {
        config.weights.validate()?;
        let classifier = match (&config.meta_model_path, config.use_meta_model) {
            (Some(path), true) => match TreeEnsembleClassifier::from_path(path) {
                Ok(model) if model.n_features() == META_FEATURES => {
                    info!(path = %path.display(), "loaded fusion meta-model");
                    Some(Arc::new(model) as Arc<dyn RiskClassifier>)
                }
                Ok(model) => {
                    warn!(
                        path = %path.display(),
                        expected = META_FEATURES,
                        actual = model.n_features(),
                        "meta-model has wrong input width, using static weights"
                    );
                    None
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "meta-model unavailable, using static weights");
                    None
                }
            },
            (None, true) => {
                warn!("meta-model enabled without a path, using static weights");
                None
            }
            (_, false) => None,
        };
        Self::new(config, scorer, classifier)
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Returns the shared level classifier.
    #[inline]
    #[must_use]
    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    /// Returns the classifier state.
    #[must_use]
    pub fn model_state(&self) -> ModelState {
        self.model.read().state
    }

    /// Returns the strategy the next [`aggregate`](Self::aggregate) call will use.
    #[must_use]
    pub fn current_method(&self) -> FusionMethod {
        self.model.read().state.fusion_method()
    }

    /// Returns the degradation event, if the classifier was retired.
    #[must_use]
    pub fn degradation(&self) -> Option<ModelDegraded> {
        self.model.read().degradation.clone()
    }

    /// Fuses `signals` for `entity_id` with the current strategy.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` if `signals` is empty, if every
    /// signal names another entity, or if any does under
    /// [`EntityMismatchPolicy::Reject`].
    pub fn aggregate(
        &self,
        entity_id: &EntityId,
        signals: Vec<RiskSignal>,
    ) -> ApplicationResult<AggregatedRiskProfile> {
        self.aggregate_with(self.current_method(), entity_id, signals)
    }

    /// Fuses `signals` with an explicitly chosen strategy.
    ///
    /// `MetaModel` falls back to static weights for this call when there is
    /// no classifier or the prediction fails.
    ///
    /// # Errors
    ///
    /// Same as [`aggregate`](Self::aggregate).
    pub fn aggregate_with(
        &self,
        method: FusionMethod,
        entity_id: &EntityId,
        signals: Vec<RiskSignal>,
    ) -> ApplicationResult<AggregatedRiskProfile> {
        if signals.is_empty() {
            return Err(ApplicationError::validation(format!(
                "no signals provided for entity {entity_id}"
            )));
        }

        let (accepted, excluded) = self.partition(entity_id, signals)?;
        if accepted.is_empty() {
            return Err(ApplicationError::validation(format!(
                "every signal for entity {entity_id} names another entity"
            )));
        }

        let (score, used) = match method {
            FusionMethod::MetaModel => match self.predict(entity_id, &accepted) {
                Some(probability) => (probability * 100.0, FusionMethod::MetaModel),
                None => (self.weighted_average(&accepted), FusionMethod::StaticWeights),
            },
            FusionMethod::StaticWeights => {
                (self.weighted_average(&accepted), FusionMethod::StaticWeights)
            }
        };

        let composite = round2(clip_score(score));
        let level = self.scorer.level(composite);
        debug!(
            entity_id = %entity_id,
            composite,
            level = %level,
            method = %used,
            "signals fused"
        );

        Ok(AggregatedRiskProfile::new(
            entity_id.clone(),
            composite,
            level,
            used,
            accepted,
            excluded,
        ))
    }

    fn partition(
        &self,
        entity_id: &EntityId,
        signals: Vec<RiskSignal>,
    ) -> ApplicationResult<(Vec<RiskSignal>, Vec<ExcludedSignal>)> {
        let mut accepted = Vec::with_capacity(signals.len());
        let mut excluded = Vec::new();

        for signal in signals {
            if signal.entity_id() == entity_id {
                accepted.push(signal);
                continue;
            }
            error!(
                expected = %entity_id,
                actual = %signal.entity_id(),
                risk_type = %signal.risk_type(),
                "signal entity mismatch"
            );
            if self.config.entity_mismatch == EntityMismatchPolicy::Reject {
                return Err(ApplicationError::validation(format!(
                    "{} signal names entity {} but {} was requested",
                    signal.risk_type(),
                    signal.entity_id(),
                    entity_id
                )));
            }
            excluded.push(ExcludedSignal {
                entity_id: signal.entity_id().clone(),
                risk_type: signal.risk_type(),
            });
        }

        Ok((accepted, excluded))
    }

    /// Probability of the high-risk class, or `None` to fall back.
    fn predict(&self, entity_id: &EntityId, signals: &[RiskSignal]) -> Option<f64> {
        let classifier = self.classifier.as_ref()?;
        let features = meta_features(signals);

        let result = classifier
            .predict_probability(&features)
            .and_then(|[_, high]| {
                if high.is_finite() && (0.0..=1.0).contains(&high) {
                    Ok(high)
                } else {
                    Err(ClassifierError::prediction(format!(
                        "high-risk probability {high} is outside [0, 1]"
                    )))
                }
            });

        match result {
            Ok(probability) => Some(probability),
            Err(e) => {
                self.disable_model(entity_id, classifier.name(), &e);
                None
            }
        }
    }

    fn disable_model(&self, entity_id: &EntityId, classifier: &str, reason: &ClassifierError) {
        let mut slot = self.model.write();
        if !slot.state.can_transition_to(ModelState::Disabled) {
            debug!(entity_id = %entity_id, error = %reason, "meta-model prediction failed again");
            return;
        }
        slot.state = ModelState::Disabled;
        let event = ModelDegraded::new(entity_id.clone(), classifier, reason.to_string());
        warn!(
            event = event.event_name(),
            event_id = %event.event_id(),
            entity_id = %entity_id,
            classifier,
            error = %reason,
            "meta-model prediction failed, switching to static weights for the rest of the process"
        );
        slot.degradation = Some(event);
    }

    /// Static weighted average over the domains present in `signals`.
    fn weighted_average(&self, signals: &[RiskSignal]) -> f64 {
        let mut by_type: HashMap<RiskType, &RiskSignal> = HashMap::with_capacity(signals.len());
        for signal in signals {
            if by_type.insert(signal.risk_type(), signal).is_some() {
                debug!(risk_type = %signal.risk_type(), "duplicate signal type, last one wins");
            }
        }

        let (weighted_sum, total_weight) = self
            .config
            .weights
            .iter()
            .filter_map(|(risk_type, weight)| {
                by_type
                    .get(&risk_type)
                    .map(|s| (s.normalized_score() * weight, weight))
            })
            .fold((0.0, 0.0), |(sum, total), (ws, w)| (sum + ws, total + w));

        if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        }
    }
}

/// `[credit, systemic, sentiment]`, missing domains as 0 and the last signal
/// of a type winning.
fn meta_features(signals: &[RiskSignal]) -> [f64; META_FEATURES] {
    let mut features = [0.0; META_FEATURES];
    for signal in signals {
        let slot = match signal.risk_type() {
            RiskType::Credit => &mut features[0],
            RiskType::Systemic => &mut features[1],
            RiskType::Sentiment => &mut features[2],
            RiskType::Market | RiskType::Liquidity => continue,
        };
        *slot = signal.normalized_score();
    }
    features
}
