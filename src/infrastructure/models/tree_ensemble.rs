//! # Tree Ensemble Classifier
//!
//! Binary classifier evaluated from a JSON export of a tree ensemble
//! (random forest or bagged trees).
//!
//! # File Format
//!
//! ```json
//! {
//!   "n_features": 3,
//!   "trees": [
//!     {"nodes": [
//!       {"feature": 0, "threshold": 50.0, "left": 1, "right": 2},
//!       {"value": [8.0, 2.0]},
//!       {"value": [1.0, 9.0]}
//!     ]}
//!   ]
//! }
//! ```
//!
//! Evaluation starts at node 0 of every tree; a split goes `left` when
//! `x[feature] <= threshold`. Leaf class counts are normalized per tree and the
//! per-tree distributions are averaged.
//!
//! Children must have a larger index than their parent, which rules out cycles
//! and bounds every walk by the tree size.

use crate::application::error::ClassifierError;
use crate::application::services::credit_engine::DefaultProbabilityModel;
use crate::application::services::fusion_engine::RiskClassifier;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: [f64; 2],
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    fn validate(&self, index: usize, n_features: usize) -> Result<(), ClassifierError> {
        if self.nodes.is_empty() {
            return Err(ClassifierError::load(format!("tree {index} has no nodes")));
        }
        for (position, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(ClassifierError::load(format!(
                            "tree {index} node {position} splits on feature {feature} of {n_features}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ClassifierError::load(format!(
                            "tree {index} node {position} has a non-finite threshold"
                        )));
                    }
                    let in_order = |child: usize| child > position && child < self.nodes.len();
                    if !in_order(left) || !in_order(right) {
                        return Err(ClassifierError::load(format!(
                            "tree {index} node {position} has out-of-order children"
                        )));
                    }
                }
                TreeNode::Leaf { value } => {
                    let valid = value.iter().all(|c| c.is_finite() && *c >= 0.0)
                        && value[0] + value[1] > 0.0;
                    if !valid {
                        return Err(ClassifierError::load(format!(
                            "tree {index} node {position} has an invalid class distribution"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf reached by `x`.
    fn distribution(&self, x: &[f64]) -> Option<[f64; 2]> {
        let mut position = 0;
        loop {
            match self.nodes.get(position)? {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    position = if *x.get(*feature)? <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => {
                    let total = value[0] + value[1];
                    return Some([value[0] / total, value[1] / total]);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct EnsembleFile {
    n_features: usize,
    trees: Vec<Tree>,
}

/// Tree ensemble loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsembleClassifier {
    name: String,
    n_features: usize,
    trees: Vec<Tree>,
}

impl TreeEnsembleClassifier {
    /// Loads and validates a model file.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::NotFound` if the file is absent and
    /// `ClassifierError::Load` if it cannot be read, parsed or validated.
    pub fn from_path(path: &Path) -> Result<Self, ClassifierError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ClassifierError::NotFound(path.display().to_string())
            } else {
                ClassifierError::load(format!("{}: {e}", path.display()))
            }
        })?;
        let name = path
            .file_stem()
            .map_or_else(|| "tree-ensemble".to_string(), |s| s.to_string_lossy().into_owned());
        Self::from_json(name, &text)
    }

    /// Parses and validates a model from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::Load` if the text is not a valid ensemble.
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self, ClassifierError> {
        let file: EnsembleFile =
            serde_json::from_str(json).map_err(|e| ClassifierError::load(e.to_string()))?;
        if file.n_features == 0 {
            return Err(ClassifierError::load("n_features must be positive"));
        }
        if file.trees.is_empty() {
            return Err(ClassifierError::load("ensemble has no trees"));
        }
        for (index, tree) in file.trees.iter().enumerate() {
            tree.validate(index, file.n_features)?;
        }
        Ok(Self {
            name: name.into(),
            n_features: file.n_features,
            trees: file.trees,
        })
    }

    /// Returns the input width the model was trained on.
    #[inline]
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Returns the number of trees.
    #[inline]
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Returns `[P(class 0), P(class 1)]` for one row.
    ///
    /// # Errors
    ///
    /// Returns `FeatureMismatch` for a row of the wrong width and `Prediction`
    /// for non-finite input.
    pub fn predict_proba(&self, x: &[f64]) -> Result<[f64; 2], ClassifierError> {
        if x.len() != self.n_features {
            return Err(ClassifierError::FeatureMismatch {
                expected: self.n_features,
                actual: x.len(),
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::prediction("non-finite feature value"));
        }

        let mut sum = [0.0, 0.0];
        for tree in &self.trees {
            let [p0, p1] = tree
                .distribution(x)
                .ok_or_else(|| ClassifierError::prediction("tree walk left the node table"))?;
            sum[0] += p0;
            sum[1] += p1;
        }
        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }
}

impl RiskClassifier for TreeEnsembleClassifier {
    fn predict_probability(&self, features: &[f64; 3]) -> Result<[f64; 2], ClassifierError> {
        self.predict_proba(features)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl DefaultProbabilityModel for TreeEnsembleClassifier {
    fn predict_default(&self, features: &[f64; 4]) -> Result<f64, ClassifierError> {
        self.predict_proba(features).map(|[_, default]| default)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
