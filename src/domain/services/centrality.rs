//! # Centrality Calculator
//!
//! Network-wide importance metrics over the transaction graph.
//!
//! Three metrics are computed in one bulk pass ([`CentralityCalculator::compute_all`])
//! and cached per entity:
//!
//! | metric       | definition                                                   |
//! |--------------|--------------------------------------------------------------|
//! | PageRank     | weighted by transaction amount, uniform teleport             |
//! | Degree       | `(in + out) / (n - 1)`, structural only                      |
//! | Betweenness  | Brandes shortest-path counting, unweighted, directed         |
//!
//! Betweenness is exact up to [`CentralityConfig::exact_betweenness_limit`]
//! nodes. Larger graphs use a seeded sample of source nodes, trading accuracy
//! for bounded cost; the mode actually used is reported as a
//! [`BetweennessMode`] so downstream signals can carry it.
//!
//! Per-entity queries never fail: an entity missing from the cache scores 0.
//!
//! # Examples
//!
//! ```
//! use sentinel_risk::domain::entities::TransactionRecord;
//! use sentinel_risk::domain::services::centrality::{CentralityCalculator, CentralityConfig};
//! use sentinel_risk::domain::services::transaction_graph::GraphBuilder;
//!
//! let graph = GraphBuilder::build(&[
//!     TransactionRecord::new("A", "B", 10.0),
//!     TransactionRecord::new("B", "C", 10.0),
//! ]);
//! let mut calc = CentralityCalculator::new(CentralityConfig::default()).unwrap();
//! calc.compute_all(&graph);
//!
//! assert!(calc.score("B") > 0.0);
//! assert_eq!(calc.score("UNKNOWN"), 0.0);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::transaction_graph::TransactionGraph;
use crate::domain::value_objects::EntityId;
use crate::domain::value_objects::score::{SCORE_MAX, SCORE_MIN, round2};
use petgraph::visit::EdgeRef;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Default PageRank damping factor.
pub const DEFAULT_DAMPING_FACTOR: f64 = 0.85;
/// Default PageRank iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
/// Default PageRank per-node tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;
/// Largest graph for which betweenness is exact.
pub const DEFAULT_EXACT_BETWEENNESS_LIMIT: usize = 500;
/// Number of sampled sources above the exact limit.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;
/// Default sampling seed.
pub const DEFAULT_SEED: u64 = 42;

/// Per-metric weights of the centrality score.
///
/// These are heuristic and uncalibrated; they exist as configuration so they
/// can be tuned without a code change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralityWeights {
    /// PageRank weight.
    pub pagerank: f64,
    /// Degree centrality weight.
    pub degree: f64,
    /// Betweenness weight.
    pub betweenness: f64,
}

impl Default for CentralityWeights {
    fn default() -> Self {
        Self {
            pagerank: 50.0,
            degree: 30.0,
            betweenness: 20.0,
        }
    }
}

/// Centrality algorithm parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralityConfig {
    /// PageRank damping factor in `[0, 1]`.
    pub damping_factor: f64,
    /// PageRank iteration cap.
    pub max_iterations: usize,
    /// PageRank per-node tolerance; convergence when L1 change < `n * tolerance`.
    pub tolerance: f64,
    /// Graphs with more nodes use sampled betweenness.
    pub exact_betweenness_limit: usize,
    /// Sampled source count.
    pub sample_size: usize,
    /// Seed for source sampling.
    pub seed: u64,
    /// Optional wall-clock budget for betweenness.
    pub time_budget: Option<Duration>,
    /// Score weights.
    pub weights: CentralityWeights,
    /// Multiplier applied to the weighted sum before clipping.
    pub scale: f64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            damping_factor: DEFAULT_DAMPING_FACTOR,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            exact_betweenness_limit: DEFAULT_EXACT_BETWEENNESS_LIMIT,
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: DEFAULT_SEED,
            time_budget: None,
            weights: CentralityWeights::default(),
            scale: 100.0,
        }
    }
}

impl CentralityConfig {
    /// Sets the damping factor.
    #[must_use]
    pub fn with_damping_factor(mut self, damping_factor: f64) -> Self {
        self.damping_factor = damping_factor;
        self
    }

    /// Sets the exact betweenness limit.
    #[must_use]
    pub fn with_exact_betweenness_limit(mut self, limit: usize) -> Self {
        self.exact_betweenness_limit = limit;
        self
    }

    /// Sets the sampled source count.
    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Sets the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the betweenness time budget.
    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Sets the score weights.
    #[must_use]
    pub fn with_weights(mut self, weights: CentralityWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Checks parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidGraphConfig` on violation.
    pub fn validate(&self) -> DomainResult<()> {
        if !(0.0..=1.0).contains(&self.damping_factor) {
            return Err(DomainError::invalid_graph_config(format!(
                "damping factor must be in [0, 1], got {}",
                self.damping_factor
            )));
        }
        if self.max_iterations == 0 {
            return Err(DomainError::invalid_graph_config(
                "pagerank max iterations must be positive",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(DomainError::invalid_graph_config(
                "pagerank tolerance must be positive",
            ));
        }
        if self.sample_size == 0 {
            return Err(DomainError::invalid_graph_config(
                "betweenness sample size must be positive",
            ));
        }
        let w = self.weights;
        if [w.pagerank, w.degree, w.betweenness, self.scale]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(DomainError::invalid_graph_config(
                "centrality weights and scale must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// How betweenness centrality was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BetweennessMode {
    /// Every node was used as a source.
    #[default]
    Exact,
    /// A random sample of sources was used and the result rescaled.
    Sampled {
        /// Number of sampled sources.
        sources: usize,
    },
    /// The time budget ran out before every planned source was processed.
    Truncated {
        /// Sources actually processed.
        processed: usize,
        /// Sources planned.
        planned: usize,
    },
}

impl BetweennessMode {
    /// Returns true when the values are estimates.
    #[inline]
    #[must_use]
    pub const fn is_approximate(&self) -> bool {
        !matches!(self, Self::Exact)
    }
}

impl fmt::Display for BetweennessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Sampled { sources } => write!(f, "sampled({sources})"),
            Self::Truncated { processed, planned } => {
                write!(f, "truncated({processed}/{planned})")
            }
        }
    }
}

/// Raw (unscaled) centrality values of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CentralityMetrics {
    /// PageRank.
    pub pagerank: f64,
    /// Degree centrality.
    pub degree: f64,
    /// Betweenness centrality.
    pub betweenness: f64,
}

/// Bulk centrality computation with a per-entity cache.
#[derive(Debug, Clone)]
pub struct CentralityCalculator {
    config: CentralityConfig,
    cache: HashMap<EntityId, CentralityMetrics>,
    mode: BetweennessMode,
    computed: bool,
}

impl CentralityCalculator {
    /// Creates a calculator.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidGraphConfig` if the configuration is invalid.
    pub fn new(config: CentralityConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache: HashMap::new(),
            mode: BetweennessMode::Exact,
            computed: false,
        })
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CentralityConfig {
        &self.config
    }

    /// Computes every metric for every node, replacing any previous cache.
    ///
    /// Cost is graph-global; call once per dataset.
    pub fn compute_all(&mut self, graph: &TransactionGraph) {
        self.cache.clear();
        self.mode = BetweennessMode::Exact;
        self.computed = true;

        let n = graph.node_count();
        if n == 0 {
            debug!("empty graph, no centrality to compute");
            return;
        }

        let started = Instant::now();
        info!(nodes = n, edges = graph.edge_count(), "computing centrality metrics");

        let pagerank = self.pagerank(graph).unwrap_or_else(|reason| {
            error!(%reason, "pagerank failed, all nodes degrade to 0.0");
            vec![0.0; n]
        });
        let degree = degree_centrality(graph);
        let (betweenness, mode) = self.betweenness(graph);
        self.mode = mode;

        for (idx, entity) in graph.inner().node_indices().zip(graph.entities()) {
            let i = idx.index();
            let metrics = CentralityMetrics {
                pagerank: pagerank.get(i).copied().unwrap_or(0.0),
                degree: degree.get(i).copied().unwrap_or(0.0),
                betweenness: betweenness.get(i).copied().unwrap_or(0.0),
            };
            self.cache.insert(entity.clone(), metrics);
        }

        info!(
            nodes = n,
            betweenness_mode = %self.mode,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "centrality metrics computed"
        );
    }

    /// Returns true once [`compute_all`](Self::compute_all) has run.
    #[inline]
    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.computed
    }

    /// Returns the betweenness mode of the last computation.
    #[inline]
    #[must_use]
    pub fn betweenness_mode(&self) -> BetweennessMode {
        self.mode
    }

    /// Returns the raw metrics of an entity.
    #[must_use]
    pub fn metrics(&self, entity: &str) -> Option<CentralityMetrics> {
        self.cache.get(entity).copied()
    }

    /// Returns the 0-100 centrality score of an entity.
    ///
    /// `(pagerank * wp + degree * wd + betweenness * wb) * scale`, clipped to
    /// `[0, 100]` and rounded to 2 decimals. Entities missing from the cache
    /// score 0.
    #[must_use]
    pub fn score(&self, entity: &str) -> f64 {
        let Some(m) = self.cache.get(entity) else {
            return 0.0;
        };
        let w = self.config.weights;
        let raw = (m.pagerank * w.pagerank + m.degree * w.degree + m.betweenness * w.betweenness)
            * self.config.scale;
        round2(raw.clamp(SCORE_MIN, SCORE_MAX))
    }

    /// Weighted power-iteration PageRank.
    ///
    /// Dangling nodes spread their mass uniformly. Returns an error string on
    /// invalid weights or non-convergence.
    #[allow(clippy::indexing_slicing)]
    fn pagerank(&self, graph: &TransactionGraph) -> Result<Vec<f64>, String> {
        let g = graph.inner();
        let n = g.node_count();
        let alpha = self.config.damping_factor;

        let mut out_weight = vec![0.0_f64; n];
        for edge in g.edge_references() {
            let w = *edge.weight();
            if !w.is_finite() || w < 0.0 {
                return Err(format!("edge weight {w} is negative or non-finite"));
            }
            out_weight[edge.source().index()] += w;
        }

        let nf = n as f64;
        let uniform = 1.0 / nf;
        let mut x = vec![uniform; n];

        for _ in 0..self.config.max_iterations {
            let last = std::mem::replace(&mut x, vec![0.0; n]);
            let dangling_sum: f64 = alpha
                * last
                    .iter()
                    .zip(&out_weight)
                    .filter(|(_, w)| **w == 0.0)
                    .map(|(v, _)| *v)
                    .sum::<f64>();

            for edge in g.edge_references() {
                let s = edge.source().index();
                let t = edge.target().index();
                let total = out_weight[s];
                if total > 0.0 {
                    x[t] += alpha * last[s] * *edge.weight() / total;
                }
            }
            for value in &mut x {
                *value += dangling_sum * uniform + (1.0 - alpha) * uniform;
            }

            let err: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
            if err < nf * self.config.tolerance {
                return Ok(x);
            }
        }

        Err(format!(
            "power iteration did not converge within {} iterations",
            self.config.max_iterations
        ))
    }

    /// Brandes betweenness, exact or sampled depending on graph size.
    #[allow(clippy::indexing_slicing)]
    fn betweenness(&self, graph: &TransactionGraph) -> (Vec<f64>, BetweennessMode) {
        let g = graph.inner();
        let n = g.node_count();

        let successors: Vec<Vec<usize>> = g
            .node_indices()
            .map(|idx| g.neighbors(idx).map(|nb| nb.index()).collect())
            .collect();

        let sampled = n > self.config.exact_betweenness_limit;
        let sources: Vec<usize> = if sampled {
            let k = self.config.sample_size.min(n);
            let mut rng = StdRng::seed_from_u64(self.config.seed);
            rand::seq::index::sample(&mut rng, n, k).into_iter().collect()
        } else {
            (0..n).collect()
        };
        let planned = sources.len();

        let started = Instant::now();
        let mut processed = 0usize;
        let mut betweenness = vec![0.0_f64; n];
        for source in sources {
            if let Some(budget) = self.config.time_budget
                && processed > 0
                && started.elapsed() >= budget
            {
                break;
            }
            accumulate_single_source(&successors, source, &mut betweenness);
            processed += 1;
        }

        let mode = if processed < planned {
            BetweennessMode::Truncated { processed, planned }
        } else if sampled {
            BetweennessMode::Sampled { sources: planned }
        } else {
            BetweennessMode::Exact
        };

        if n > 2 {
            let nf = n as f64;
            let mut scale = 1.0 / ((nf - 1.0) * (nf - 2.0));
            if processed < n {
                scale *= nf / processed.max(1) as f64;
            }
            for value in &mut betweenness {
                *value *= scale;
            }
        }

        (betweenness, mode)
    }
}

/// One Brandes pass from `source`, adding its dependencies into `acc`.
#[allow(clippy::indexing_slicing)]
fn accumulate_single_source(successors: &[Vec<usize>], source: usize, acc: &mut [f64]) {
    let n = successors.len();
    let mut stack = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut queue = VecDeque::new();

    sigma[source] = 1.0;
    dist[source] = Some(0);
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        stack.push(v);
        let dv = dist[v].unwrap_or(0);
        for &w in &successors[v] {
            if dist[w].is_none() {
                dist[w] = Some(dv + 1);
                queue.push_back(w);
            }
            if dist[w] == Some(dv + 1) {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    let mut delta = vec![0.0_f64; n];
    while let Some(w) = stack.pop() {
        let coeff = (1.0 + delta[w]) / sigma[w];
        for &v in &predecessors[w] {
            delta[v] += sigma[v] * coeff;
        }
        if w != source {
            acc[w] += delta[w];
        }
    }
}

/// `(in + out) / (n - 1)` per node; a self-loop counts twice.
#[allow(clippy::indexing_slicing)]
fn degree_centrality(graph: &TransactionGraph) -> Vec<f64> {
    let g = graph.inner();
    let n = g.node_count();
    if n == 1 {
        return vec![1.0];
    }
    let mut degree = vec![0.0_f64; n];
    for edge in g.edge_references() {
        degree[edge.source().index()] += 1.0;
        degree[edge.target().index()] += 1.0;
    }
    let norm = 1.0 / (n as f64 - 1.0);
    for value in &mut degree {
        *value *= norm;
    }
    degree
}
