//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`RiskSignalProducer`]: capability shared by every per-domain engine
//! - [`SystemicRiskEngine`]: transaction-graph centrality and contagion
//! - [`CreditRiskEngine`]: probability of default from financial ratios
//! - [`SentimentRiskEngine`]: news sentiment with a keyword overlay
//! - [`RiskFusionEngine`]: meta-model or static-weight fusion
//! - [`BatchAnalyzer`]: parallel scoring of many entities

pub mod batch_analysis;
pub mod credit_engine;
pub mod fusion_engine;
pub mod sentiment_engine;
pub mod signal_producer;
pub mod systemic_engine;

pub use batch_analysis::{BatchAnalyzer, BatchReport, EntityFailure};
pub use credit_engine::{
    CreditConfig, CreditFeatures, CreditRiskEngine, DefaultProbabilityModel,
};
pub use fusion_engine::{EntityMismatchPolicy, FusionConfig, RiskClassifier, RiskFusionEngine};
pub use sentiment_engine::{
    SentimentAnalyzer, SentimentConfig, SentimentModelSlot, SentimentRiskEngine,
    SentimentScores, StressOverlay,
};
pub use signal_producer::RiskSignalProducer;
pub use systemic_engine::{SystemicConfig, SystemicRiskEngine};
