//! # Sentinel Risk
//!
//! Composite entity risk scoring.
//!
//! Heterogeneous risk signals (credit default probability, transaction-network
//! contagion exposure, news sentiment) are standardized into [`RiskSignal`]s on
//! a common 0-100 scale and fused into one [`AggregatedRiskProfile`] per entity.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ application  SystemicRiskEngine · RiskFusionEngine · Batch  │
//! ├─────────────────────────────────────────────────────────────┤
//! │ domain       signals · profiles · graph · centrality ·      │
//! │              contagion · level classification               │
//! ├─────────────────────────────────────────────────────────────┤
//! │ infrastructure  config · logging · file sources · models    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```
//! use sentinel_risk::application::services::fusion_engine::{FusionConfig, RiskFusionEngine};
//! use sentinel_risk::domain::entities::risk_signal::RiskSignal;
//! use sentinel_risk::domain::services::risk_scorer::RiskScorer;
//! use sentinel_risk::domain::value_objects::{EntityId, RiskLevel, RiskType};
//!
//! let engine = RiskFusionEngine::new(FusionConfig::default(), RiskScorer::default(), None).unwrap();
//! let entity = EntityId::new("ENT-001").unwrap();
//! let signals = vec![
//!     RiskSignal::new(entity.clone(), RiskType::Credit, 0.8, 80.0, 0.95).unwrap(),
//!     RiskSignal::new(entity.clone(), RiskType::Systemic, 40.0, 40.0, 0.85).unwrap(),
//!     RiskSignal::new(entity.clone(), RiskType::Sentiment, 0.2, 20.0, 0.90).unwrap(),
//! ];
//!
//! let profile = engine.aggregate(&entity, signals).unwrap();
//! assert!((profile.composite_risk_score() - 56.0).abs() < 1e-9);
//! assert_eq!(profile.risk_level(), RiskLevel::High);
//! ```
//!
//! [`RiskSignal`]: domain::entities::risk_signal::RiskSignal
//! [`AggregatedRiskProfile`]: domain::entities::risk_profile::AggregatedRiskProfile

pub mod application;
pub mod domain;
pub mod infrastructure;
