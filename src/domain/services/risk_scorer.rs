//! # Risk Scorer
//!
//! Single source of truth for score-to-level classification.
//!
//! Every component that turns a number into a [`RiskLevel`] (fusion engine,
//! credit producer, reporting) holds a clone of the same [`RiskScorer`], which
//! shares one [`RiskThresholds`] table behind an `Arc`. Thresholds are loaded
//! once from configuration and never re-read independently.
//!
//! # Examples
//!
//! ```
//! use sentinel_risk::domain::services::risk_scorer::RiskScorer;
//! use sentinel_risk::domain::value_objects::RiskLevel;
//!
//! let scorer = RiskScorer::default();
//! let shared = scorer.clone();
//!
//! assert_eq!(scorer.level(56.0), RiskLevel::High);
//! assert!(scorer.shares_thresholds_with(&shared));
//! ```

use crate::domain::value_objects::{RiskLevel, RiskThresholds};
use std::sync::Arc;

/// Threshold-based level classifier.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    thresholds: Arc<RiskThresholds>,
}

impl RiskScorer {
    /// Creates a scorer over a validated threshold table.
    #[must_use]
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self {
            thresholds: Arc::new(thresholds),
        }
    }

    /// Maps a 0-100 score to its level.
    #[inline]
    #[must_use]
    pub fn level(&self, score: f64) -> RiskLevel {
        self.thresholds.classify(score)
    }

    /// Returns the threshold table.
    #[inline]
    #[must_use]
    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Returns true if both scorers read the same threshold table instance.
    #[must_use]
    pub fn shares_thresholds_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.thresholds, &other.thresholds)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_levels() {
        let scorer = RiskScorer::default();
        assert_eq!(scorer.level(0.0), RiskLevel::Low);
        assert_eq!(scorer.level(25.0), RiskLevel::Medium);
        assert_eq!(scorer.level(50.0), RiskLevel::High);
        assert_eq!(scorer.level(75.0), RiskLevel::Critical);
    }

    #[test]
    fn independent_scorers_do_not_share() {
        let a = RiskScorer::default();
        let b = RiskScorer::default();
        assert!(!a.shares_thresholds_with(&b));
    }

    #[test]
    fn custom_thresholds() {
        let scorer = RiskScorer::new(RiskThresholds::new(10.0, 20.0, 30.0, 40.0).unwrap());
        assert_eq!(scorer.level(25.0), RiskLevel::High);
        assert_eq!(scorer.thresholds().low(), 10.0);
    }

    proptest! {
        #[test]
        fn level_is_monotonic(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
            let scorer = RiskScorer::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scorer.level(lo) <= scorer.level(hi));
        }
    }
}
