//! # Domain Services
//!
//! Pure computations over domain types.
//!
//! ## Services
//!
//! - [`transaction_graph::GraphBuilder`]: transaction records into a weighted digraph
//! - [`centrality::CentralityCalculator`]: bulk PageRank, degree and betweenness
//! - [`contagion::ContagionSimulator`]: single-node failure impact
//! - [`risk_scorer::RiskScorer`]: shared score-to-level classification

pub mod centrality;
pub mod contagion;
pub mod risk_scorer;
pub mod transaction_graph;

pub use centrality::{
    BetweennessMode, CentralityCalculator, CentralityConfig, CentralityMetrics, CentralityWeights,
};
pub use contagion::{ContagionConfig, ContagionReport, ContagionSimulator};
pub use risk_scorer::RiskScorer;
pub use transaction_graph::{BuildStats, GraphBuilder, TransactionGraph};
