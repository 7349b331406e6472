//! # Learned Models
//!
//! Loaders for classifiers exported from the training pipeline.
//!
//! - [`TreeEnsembleClassifier`]: fusion meta-model and credit default model

pub mod tree_ensemble;

pub use tree_ensemble::TreeEnsembleClassifier;
