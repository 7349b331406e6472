//! # Contagion Simulator
//!
//! On-demand single-node failure impact.
//!
//! The simulated failure of an entity hits its direct successors (the
//! counterparties that stood to receive value from it). Impact combines the
//! fan-out with the density of the entity's radius-1 outgoing neighborhood:
//!
//! ```text
//! score = density * density_weight + min(successors / saturation, 1) * fanout_weight
//! ```
//!
//! clipped at 100. Defaults are 40 / 60 with saturation 20. These constants
//! are uncalibrated heuristics kept configurable.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::transaction_graph::TransactionGraph;
use crate::domain::value_objects::score::{SCORE_MAX, round2};
use petgraph::Direction;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Contagion scoring constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContagionConfig {
    /// Weight of the ego-graph density term.
    pub density_weight: f64,
    /// Weight of the saturated fan-out term.
    pub fanout_weight: f64,
    /// Successor count at which the fan-out term saturates.
    pub fanout_saturation: f64,
}

impl Default for ContagionConfig {
    fn default() -> Self {
        Self {
            density_weight: 40.0,
            fanout_weight: 60.0,
            fanout_saturation: 20.0,
        }
    }
}

impl ContagionConfig {
    /// Checks the constants.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidGraphConfig` if a weight is negative or
    /// non-finite, or the saturation is not positive.
    pub fn validate(&self) -> DomainResult<()> {
        if [self.density_weight, self.fanout_weight]
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(DomainError::invalid_graph_config(
                "contagion weights must be finite and non-negative",
            ));
        }
        if !self.fanout_saturation.is_finite() || self.fanout_saturation <= 0.0 {
            return Err(DomainError::invalid_graph_config(
                "contagion fan-out saturation must be positive",
            ));
        }
        Ok(())
    }
}

/// Impact of a simulated failure.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContagionReport {
    /// 0-100 contagion score, rounded to 2 decimals.
    pub contagion_score: f64,
    /// Distinct direct successors.
    pub direct_neighbors_at_risk: usize,
    /// Summed outgoing edge weight, rounded to 2 decimals.
    pub total_value_at_risk: f64,
    /// Directed density of the radius-1 ego graph, rounded to 2 decimals.
    pub local_network_density: f64,
}

impl ContagionReport {
    /// Report for an entity with no transaction history.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Failure impact simulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContagionSimulator {
    config: ContagionConfig,
}

impl ContagionSimulator {
    /// Creates a simulator.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidGraphConfig` if the configuration is invalid.
    pub fn new(config: ContagionConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ContagionConfig {
        &self.config
    }

    /// Simulates the failure of `entity`.
    ///
    /// Entities absent from the graph yield [`ContagionReport::zero`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_risk::domain::entities::TransactionRecord;
    /// use sentinel_risk::domain::services::contagion::ContagionSimulator;
    /// use sentinel_risk::domain::services::transaction_graph::GraphBuilder;
    ///
    /// let graph = GraphBuilder::build(&[TransactionRecord::new("A", "B", 10.0)]);
    /// let sim = ContagionSimulator::default();
    ///
    /// let report = sim.simulate_failure(&graph, "A");
    /// assert_eq!(report.direct_neighbors_at_risk, 1);
    /// assert_eq!(sim.simulate_failure(&graph, "Z").contagion_score, 0.0);
    /// ```
    #[must_use]
    pub fn simulate_failure(&self, graph: &TransactionGraph, entity: &str) -> ContagionReport {
        let Some(idx) = graph.node_index(entity) else {
            return ContagionReport::zero();
        };
        let g = graph.inner();

        let mut total_value = 0.0;
        let mut ego = HashSet::new();
        ego.insert(idx);
        let mut successors = 0usize;
        for edge in g.edges_directed(idx, Direction::Outgoing) {
            total_value += *edge.weight();
            successors += 1;
            ego.insert(edge.target());
        }

        let ego_edges = ego
            .iter()
            .flat_map(|n| g.edges_directed(*n, Direction::Outgoing))
            .filter(|e| ego.contains(&e.target()))
            .count();
        let density = directed_density(ego.len(), ego_edges);

        let fanout = (successors as f64 / self.config.fanout_saturation).min(1.0);
        let score = (density * self.config.density_weight + fanout * self.config.fanout_weight)
            .min(SCORE_MAX);

        ContagionReport {
            contagion_score: round2(score),
            direct_neighbors_at_risk: successors,
            total_value_at_risk: round2(total_value),
            local_network_density: round2(density),
        }
    }
}

/// `m / (n (n - 1))`, 0 for graphs of at most one node.
fn directed_density(nodes: usize, edges: usize) -> f64 {
    if nodes <= 1 {
        return 0.0;
    }
    let n = nodes as f64;
    edges as f64 / (n * (n - 1.0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::TransactionRecord;
    use crate::domain::services::transaction_graph::GraphBuilder;

    fn build(edges: &[(&str, &str, f64)]) -> TransactionGraph {
        let records: Vec<_> = edges
            .iter()
            .map(|(s, t, a)| TransactionRecord::new(*s, *t, *a))
            .collect();
        GraphBuilder::build(&records)
    }

    #[test]
    fn absent_entity_has_zero_impact() {
        let graph = build(&[("A", "B", 1.0)]);
        let report = ContagionSimulator::default().simulate_failure(&graph, "Z");
        assert_eq!(report, ContagionReport::zero());
    }

    #[test]
    fn star_without_cross_links() {
        let graph = build(&[("A", "B", 10.0), ("A", "C", 20.0)]);
        let report = ContagionSimulator::default().simulate_failure(&graph, "A");

        assert_eq!(report.direct_neighbors_at_risk, 2);
        assert_eq!(report.total_value_at_risk, 30.0);
        // 2 edges among 3 nodes: 2 / 6
        assert_eq!(report.local_network_density, 0.33);
        // 1/3 * 40 + 2/20 * 60 = 13.33 + 6 = 19.33
        assert_eq!(report.contagion_score, 19.33);
    }

    #[test]
    fn cross_links_raise_density() {
        let graph = build(&[("A", "B", 1.0), ("A", "C", 1.0), ("B", "C", 1.0), ("C", "B", 1.0)]);
        let report = ContagionSimulator::default().simulate_failure(&graph, "A");
        // 4 edges among 3 nodes
        assert_eq!(report.local_network_density, 0.67);
    }

    #[test]
    fn sink_has_no_fanout() {
        let graph = build(&[("A", "B", 1.0)]);
        let report = ContagionSimulator::default().simulate_failure(&graph, "B");
        assert_eq!(report.direct_neighbors_at_risk, 0);
        assert_eq!(report.local_network_density, 0.0);
        assert_eq!(report.contagion_score, 0.0);
    }

    #[test]
    fn fanout_saturates() {
        let targets: Vec<String> = (0..40).map(|i| format!("T{i}")).collect();
        let edges: Vec<(&str, &str, f64)> = targets.iter().map(|t| ("HUB", t.as_str(), 1.0)).collect();
        let report = ContagionSimulator::default().simulate_failure(&build(&edges), "HUB");
        assert_eq!(report.direct_neighbors_at_risk, 40);
        // density 40 / (41 * 40) ~ 0.0244 -> 0.98, fan-out term capped at 60
        assert!(report.contagion_score > 60.0 && report.contagion_score < 61.0);
    }

    #[test]
    fn self_loop_counts_as_successor() {
        let graph = build(&[("A", "A", 5.0), ("A", "B", 5.0)]);
        let report = ContagionSimulator::default().simulate_failure(&graph, "A");
        assert_eq!(report.direct_neighbors_at_risk, 2);
        assert_eq!(report.total_value_at_risk, 10.0);
        // ego {A, B} has edges A->A and A->B
        assert_eq!(report.local_network_density, 1.0);
    }

    #[test]
    fn rejects_zero_saturation() {
        let config = ContagionConfig {
            fanout_saturation: 0.0,
            ..ContagionConfig::default()
        };
        assert!(ContagionSimulator::new(config).is_err());
    }
}
