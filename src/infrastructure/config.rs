//! # Configuration
//!
//! Layered settings for every engine.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional file (TOML, YAML or JSON, chosen by extension)
//! 3. environment variables prefixed `SENTINEL_`, with `__` between levels
//!
//! ```bash
//! SENTINEL_FUSION__WEIGHTS__CREDIT=0.6
//! SENTINEL_SYSTEMIC__BETWEENNESS_SAMPLE_SIZE=250
//! SENTINEL_LOGGING__FORMAT=json
//! ```
//!
//! The loaded configuration is validated once; engines built from it never
//! re-check their parameters. Every component that classifies a score into a
//! level gets its [`RiskScorer`] from [`SentinelConfig::scorer`], so there is
//! one threshold table per process.

use crate::application::error::InfrastructureError;
use crate::application::services::credit_engine::{CreditConfig, DEFAULT_CREDIT_CONFIDENCE};
use crate::application::services::fusion_engine::{EntityMismatchPolicy, FusionConfig};
use crate::application::services::sentiment_engine::{
    DEFAULT_KEYWORD_PENALTY, DEFAULT_PANIC_KEYWORDS, DEFAULT_SENTIMENT_CONFIDENCE, SentimentConfig,
};
use crate::application::services::systemic_engine::SystemicConfig;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::centrality::{
    CentralityConfig, CentralityWeights, DEFAULT_DAMPING_FACTOR, DEFAULT_EXACT_BETWEENNESS_LIMIT,
    DEFAULT_MAX_ITERATIONS, DEFAULT_SAMPLE_SIZE, DEFAULT_SEED, DEFAULT_TOLERANCE,
};
use crate::domain::services::contagion::ContagionConfig;
use crate::domain::services::risk_scorer::RiskScorer;
use crate::domain::value_objects::thresholds::{
    DEFAULT_CRITICAL, DEFAULT_HIGH, DEFAULT_LOW, DEFAULT_MEDIUM,
};
use crate::domain::value_objects::{FusionWeights, RiskThresholds};
use crate::infrastructure::logging::LogConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SENTINEL";

/// Level boundaries, each defaulted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSettings {
    /// Below this: `Low`.
    pub low: f64,
    /// Below this: `Medium`.
    pub medium: f64,
    /// Below this: `High`.
    pub high: f64,
    /// Upper reporting boundary.
    pub critical: f64,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW,
            medium: DEFAULT_MEDIUM,
            high: DEFAULT_HIGH,
            critical: DEFAULT_CRITICAL,
        }
    }
}

impl ThresholdSettings {
    /// Builds the validated threshold table.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidThresholds` unless strictly ascending.
    pub fn to_thresholds(&self) -> DomainResult<RiskThresholds> {
        RiskThresholds::new(self.low, self.medium, self.high, self.critical)
    }
}

/// Settings shared by every engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Level boundaries.
    pub risk_thresholds: ThresholdSettings,
}

/// Fusion engine settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionSettings {
    /// Load the learned classifier.
    pub use_meta_model: bool,
    /// Classifier file.
    pub meta_model_path: Option<PathBuf>,
    /// Entity mismatch handling.
    pub entity_mismatch: EntityMismatchPolicy,
    /// Static weights.
    pub weights: FusionWeights,
}

/// Systemic engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemicSettings {
    /// PageRank damping factor.
    pub damping_factor: f64,
    /// PageRank iteration cap.
    pub pagerank_max_iterations: usize,
    /// PageRank per-node tolerance.
    pub pagerank_tolerance: f64,
    /// Node count above which betweenness is sampled.
    pub exact_betweenness_limit: usize,
    /// Sampled betweenness source count.
    pub betweenness_sample_size: usize,
    /// Sampling seed.
    pub betweenness_seed: u64,
    /// Optional betweenness wall-clock budget.
    pub betweenness_time_budget_ms: Option<u64>,
    /// Centrality score weights.
    pub centrality_weights: CentralityWeights,
    /// Centrality score multiplier.
    pub centrality_scale: f64,
    /// Contagion score parameters.
    pub contagion: ContagionConfig,
    /// Share of centrality in the systemic score.
    pub centrality_blend: f64,
    /// Share of contagion in the systemic score.
    pub contagion_blend: f64,
    /// Systemic signal confidence.
    pub confidence: f64,
}

impl Default for SystemicSettings {
    fn default() -> Self {
        let defaults = SystemicConfig::default();
        Self {
            damping_factor: DEFAULT_DAMPING_FACTOR,
            pagerank_max_iterations: DEFAULT_MAX_ITERATIONS,
            pagerank_tolerance: DEFAULT_TOLERANCE,
            exact_betweenness_limit: DEFAULT_EXACT_BETWEENNESS_LIMIT,
            betweenness_sample_size: DEFAULT_SAMPLE_SIZE,
            betweenness_seed: DEFAULT_SEED,
            betweenness_time_budget_ms: None,
            centrality_weights: CentralityWeights::default(),
            centrality_scale: defaults.centrality.scale,
            contagion: ContagionConfig::default(),
            centrality_blend: defaults.centrality_blend,
            contagion_blend: defaults.contagion_blend,
            confidence: defaults.confidence,
        }
    }
}

/// Credit engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditSettings {
    /// Default model file.
    pub model_path: Option<PathBuf>,
    /// Credit signal confidence.
    pub confidence: f64,
}

impl Default for CreditSettings {
    fn default() -> Self {
        Self {
            model_path: None,
            confidence: DEFAULT_CREDIT_CONFIDENCE,
        }
    }
}

/// Sentiment engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentSettings {
    /// Keywords that add a penalty.
    pub panic_keywords: Vec<String>,
    /// Penalty per keyword hit.
    pub keyword_penalty: f64,
    /// Sentiment signal confidence.
    pub confidence: f64,
}

impl Default for SentimentSettings {
    fn default() -> Self {
        Self {
            panic_keywords: DEFAULT_PANIC_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            keyword_penalty: DEFAULT_KEYWORD_PENALTY,
            confidence: DEFAULT_SENTIMENT_CONFIDENCE,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    /// Shared settings.
    pub global: GlobalSettings,
    /// Fusion engine.
    pub fusion: FusionSettings,
    /// Systemic engine.
    pub systemic: SystemicSettings,
    /// Credit engine.
    pub credit: CreditSettings,
    /// Sentiment engine.
    pub sentiment: SentimentSettings,
    /// Logging.
    pub logging: LogConfig,
}

impl SentinelConfig {
    /// Loads defaults, then `path` if given, then `SENTINEL_*` variables.
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError::SourceNotFound` if `path` does not exist
    /// and `InfrastructureError::Configuration` if a value cannot be parsed or
    /// fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, InfrastructureError> {
        let env = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);
        Self::load_with_env(path, env)
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, InfrastructureError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(InfrastructureError::source_not_found(
                    path.display().to_string(),
                ));
            }
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(env);

        let config: Self = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| InfrastructureError::configuration(e.to_string()))?;
        config.validate()?;

        info!(
            file = %path.map_or_else(|| "<none>".to_string(), |p| p.display().to_string()),
            meta_model = config.fusion.use_meta_model,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError::Configuration` naming the first invalid
    /// value.
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        self.check().map_err(|e| InfrastructureError::configuration(e.to_string()))
    }

    fn check(&self) -> DomainResult<()> {
        self.global.risk_thresholds.to_thresholds()?;
        self.fusion.weights.validate()?;
        self.systemic_config().validate()?;
        DomainError::check_range("credit.confidence", self.credit.confidence, 0.0, 1.0)?;
        DomainError::check_range("sentiment.confidence", self.sentiment.confidence, 0.0, 1.0)?;
        DomainError::check_range(
            "sentiment.keyword_penalty",
            self.sentiment.keyword_penalty,
            0.0,
            f64::MAX,
        )?;
        Ok(())
    }

    /// Builds the process-wide level classifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidThresholds` for a configuration that was
    /// never validated.
    pub fn scorer(&self) -> DomainResult<RiskScorer> {
        Ok(RiskScorer::new(self.global.risk_thresholds.to_thresholds()?))
    }

    /// Fusion engine configuration.
    #[must_use]
    pub fn fusion_config(&self) -> FusionConfig {
        FusionConfig {
            weights: self.fusion.weights.clone(),
            entity_mismatch: self.fusion.entity_mismatch,
            use_meta_model: self.fusion.use_meta_model,
            meta_model_path: self.fusion.meta_model_path.clone(),
        }
    }

    /// Systemic engine configuration.
    #[must_use]
    pub fn systemic_config(&self) -> SystemicConfig {
        let s = &self.systemic;
        SystemicConfig {
            centrality: CentralityConfig {
                damping_factor: s.damping_factor,
                max_iterations: s.pagerank_max_iterations,
                tolerance: s.pagerank_tolerance,
                exact_betweenness_limit: s.exact_betweenness_limit,
                sample_size: s.betweenness_sample_size,
                seed: s.betweenness_seed,
                time_budget: s.betweenness_time_budget_ms.map(Duration::from_millis),
                weights: s.centrality_weights,
                scale: s.centrality_scale,
            },
            contagion: s.contagion,
            centrality_blend: s.centrality_blend,
            contagion_blend: s.contagion_blend,
            confidence: s.confidence,
        }
    }

    /// Credit engine configuration.
    #[must_use]
    pub fn credit_config(&self) -> CreditConfig {
        CreditConfig {
            model_path: self.credit.model_path.clone(),
            confidence: self.credit.confidence,
        }
    }

    /// Sentiment engine configuration.
    #[must_use]
    pub fn sentiment_config(&self) -> SentimentConfig {
        SentimentConfig {
            panic_keywords: self.sentiment.panic_keywords.clone(),
            keyword_penalty: self.sentiment.keyword_penalty,
            confidence: self.sentiment.confidence,
        }
    }
}
