//! # Transaction Graph
//!
//! Directed weighted graph of value transfers between entities.
//!
//! Nodes are [`EntityId`]s; an edge `a → b` carries the summed amount of every
//! transaction from `a` to `b`. Parallel edges are never created and
//! self-loops are kept.
//!
//! # Examples
//!
//! ```
//! use sentinel_risk::domain::entities::TransactionRecord;
//! use sentinel_risk::domain::services::transaction_graph::GraphBuilder;
//!
//! let graph = GraphBuilder::build(&[
//!     TransactionRecord::new("A", "B", 10.0),
//!     TransactionRecord::new("A", "B", 5.0),
//! ]);
//!
//! assert_eq!(graph.edge_count(), 1);
//! assert_eq!(graph.edge_weight("A", "B"), Some(15.0));
//! ```

use crate::domain::entities::TransactionRecord;
use crate::domain::value_objects::EntityId;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Outcome counters of a graph build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildStats {
    /// Records merged into the graph.
    pub accepted: usize,
    /// Records dropped for a missing endpoint or non-finite amount.
    pub skipped: usize,
}

/// In-memory transaction graph.
#[derive(Debug, Clone, Default)]
pub struct TransactionGraph {
    graph: DiGraph<EntityId, f64>,
    index: HashMap<EntityId, NodeIndex>,
    stats: BuildStats,
}

impl TransactionGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of distinct entities.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of distinct directed edges.
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph has no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns true if the entity appears in any transaction.
    #[must_use]
    pub fn contains(&self, entity: &str) -> bool {
        self.index.contains_key(entity)
    }

    /// Returns the node index of an entity.
    #[must_use]
    pub fn node_index(&self, entity: &str) -> Option<NodeIndex> {
        self.index.get(entity).copied()
    }

    /// Returns the summed weight of edge `source → target`.
    #[must_use]
    pub fn edge_weight(&self, source: &str, target: &str) -> Option<f64> {
        let a = self.node_index(source)?;
        let b = self.node_index(target)?;
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Returns the distinct direct successors of an entity.
    ///
    /// The entity itself is included when it has a self-loop.
    #[must_use]
    pub fn successors(&self, entity: &str) -> Vec<&EntityId> {
        let Some(idx) = self.node_index(entity) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|n| self.graph.node_weight(n))
            .collect()
    }

    /// Iterates the entity ids in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityId> + '_ {
        self.graph.node_weights()
    }

    /// Returns the build counters.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Returns the underlying petgraph structure for algorithms.
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &DiGraph<EntityId, f64> {
        &self.graph
    }

    fn intern(&mut self, entity: EntityId) -> NodeIndex {
        if let Some(idx) = self.index.get(&entity) {
            return *idx;
        }
        let idx = self.graph.add_node(entity.clone());
        self.index.insert(entity, idx);
        idx
    }

    fn accumulate(&mut self, source: NodeIndex, target: NodeIndex, amount: f64) {
        match self.graph.find_edge(source, target) {
            Some(edge) => {
                if let Some(weight) = self.graph.edge_weight_mut(edge) {
                    *weight += amount;
                }
            }
            None => {
                self.graph.add_edge(source, target, amount);
            }
        }
    }
}

/// Builds a [`TransactionGraph`] from raw records.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    /// Builds the graph, dropping unusable records.
    ///
    /// A record is skipped when either endpoint is missing or blank, or its
    /// amount is NaN or infinite. A missing amount counts as `1.0`.
    pub fn build<'a>(records: impl IntoIterator<Item = &'a TransactionRecord>) -> TransactionGraph {
        let mut graph = TransactionGraph::empty();

        for (position, record) in records.into_iter().enumerate() {
            let Some((source, target)) = record.endpoints() else {
                debug!(position, "skipping transaction with missing endpoint");
                graph.stats.skipped += 1;
                continue;
            };
            let amount = record.amount_or_default();
            if !amount.is_finite() {
                debug!(position, amount, "skipping transaction with non-finite amount");
                graph.stats.skipped += 1;
                continue;
            }
            let (source, target) = match (EntityId::new(source), EntityId::new(target)) {
                (Ok(source), Ok(target)) => (source, target),
                (Err(e), _) | (_, Err(e)) => {
                    debug!(position, error = %e, "skipping transaction with invalid entity id");
                    graph.stats.skipped += 1;
                    continue;
                }
            };

            let a = graph.intern(source);
            let b = graph.intern(target);
            graph.accumulate(a, b, amount);
            graph.stats.accepted += 1;
        }

        if graph.stats.skipped > 0 {
            warn!(
                skipped = graph.stats.skipped,
                accepted = graph.stats.accepted,
                "dropped unusable transactions while building graph"
            );
        }
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            accepted = graph.stats.accepted,
            skipped = graph.stats.skipped,
            "transaction graph built"
        );

        graph
    }
}
