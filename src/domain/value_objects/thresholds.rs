//! # Risk Thresholds
//!
//! Ascending score boundaries that map a 0-100 score to a [`RiskLevel`].
//!
//! Boundaries are strict-less-than:
//!
//! ```text
//! score < low     → Low
//! score < medium  → Medium
//! score < high    → High
//! otherwise       → Critical
//! ```
//!
//! `critical` is carried for configuration compatibility and must stay above
//! `high`; it does not open a fifth band.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::enums::RiskLevel;
use serde::{Deserialize, Serialize};

/// Default `low` boundary.
pub const DEFAULT_LOW: f64 = 25.0;
/// Default `medium` boundary.
pub const DEFAULT_MEDIUM: f64 = 50.0;
/// Default `high` boundary.
pub const DEFAULT_HIGH: f64 = 75.0;
/// Default `critical` boundary.
pub const DEFAULT_CRITICAL: f64 = 90.0;

/// Threshold table for level classification.
///
/// # Invariants
///
/// - `low < medium < high < critical`, all finite
///
/// # Examples
///
/// ```
/// use sentinel_risk::domain::value_objects::thresholds::RiskThresholds;
/// use sentinel_risk::domain::value_objects::RiskLevel;
///
/// let t = RiskThresholds::default();
/// assert_eq!(t.classify(24.99), RiskLevel::Low);
/// assert_eq!(t.classify(25.0), RiskLevel::Medium);
/// assert_eq!(t.classify(75.0), RiskLevel::Critical);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    low: f64,
    medium: f64,
    high: f64,
    critical: f64,
}

impl RiskThresholds {
    /// Creates a validated threshold table.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidThresholds` if any value is not finite or
    /// the values are not strictly ascending.
    pub fn new(low: f64, medium: f64, high: f64, critical: f64) -> DomainResult<Self> {
        let thresholds = Self {
            low,
            medium,
            high,
            critical,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Re-checks the invariants, used after deserialization.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidThresholds` on violation.
    pub fn validate(&self) -> DomainResult<()> {
        let values = [self.low, self.medium, self.high, self.critical];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::invalid_thresholds("values must be finite"));
        }
        if !values.windows(2).all(|w| matches!(w, [a, b] if a < b)) {
            return Err(DomainError::invalid_thresholds(format!(
                "must be strictly ascending, got low={} medium={} high={} critical={}",
                self.low, self.medium, self.high, self.critical
            )));
        }
        Ok(())
    }

    /// Maps a score to its level.
    ///
    /// NaN compares false against every boundary and therefore lands in
    /// `Critical`.
    #[must_use]
    pub fn classify(&self, score: f64) -> RiskLevel {
        if score < self.low {
            RiskLevel::Low
        } else if score < self.medium {
            RiskLevel::Medium
        } else if score < self.high {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    /// Returns the `low` boundary.
    #[inline]
    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Returns the `medium` boundary.
    #[inline]
    #[must_use]
    pub fn medium(&self) -> f64 {
        self.medium
    }

    /// Returns the `high` boundary.
    #[inline]
    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Returns the `critical` boundary.
    #[inline]
    #[must_use]
    pub fn critical(&self) -> f64 {
        self.critical
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW,
            medium: DEFAULT_MEDIUM,
            high: DEFAULT_HIGH,
            critical: DEFAULT_CRITICAL,
        }
    }
}
