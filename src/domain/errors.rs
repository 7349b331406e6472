//! # Domain Errors
//!
//! Errors raised when a value object or entity invariant is violated.
//!
//! # Examples
//!
//! ```
//! use sentinel_risk::domain::errors::DomainError;
//!
//! let err = DomainError::score_out_of_range("normalized_score", 120.0, 0.0, 100.0);
//! assert!(err.to_string().contains("normalized_score"));
//! ```

use thiserror::Error;

/// Domain invariant violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A numeric field is outside its allowed range.
    #[error("{field} = {value} is outside [{min}, {max}]")]
    ScoreOutOfRange {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// A numeric field is NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite {
        /// Field name.
        field: &'static str,
    },

    /// Entity identifier is empty.
    #[error("entity id must not be empty")]
    EmptyEntityId,

    /// Threshold table is not strictly ascending.
    #[error("invalid risk thresholds: {0}")]
    InvalidThresholds(String),

    /// Fusion weight table is unusable.
    #[error("invalid fusion weights: {0}")]
    InvalidWeights(String),

    /// Graph algorithm parameters are unusable.
    #[error("invalid graph configuration: {0}")]
    InvalidGraphConfig(String),

    /// A string could not be parsed into a domain enum.
    #[error("invalid {kind} value: {value}")]
    InvalidEnumValue {
        /// Enum name.
        kind: &'static str,
        /// Rejected input.
        value: String,
    },

    /// Illegal state machine transition.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current state.
        from: String,
        /// Requested state.
        to: String,
    },
}

impl DomainError {
    /// Creates a range violation error.
    #[must_use]
    pub fn score_out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::ScoreOutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// Creates a threshold table error.
    #[must_use]
    pub fn invalid_thresholds(message: impl Into<String>) -> Self {
        Self::InvalidThresholds(message.into())
    }

    /// Creates a fusion weight error.
    #[must_use]
    pub fn invalid_weights(message: impl Into<String>) -> Self {
        Self::InvalidWeights(message.into())
    }

    /// Creates a graph configuration error.
    #[must_use]
    pub fn invalid_graph_config(message: impl Into<String>) -> Self {
        Self::InvalidGraphConfig(message.into())
    }

    /// Checks that `value` is finite and within `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns `NonFinite` or `ScoreOutOfRange` on violation.
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> DomainResult<f64> {
        if !value.is_finite() {
            return Err(Self::NonFinite { field });
        }
        if value < min || value > max {
            return Err(Self::score_out_of_range(field, value, min, max));
        }
        Ok(value)
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_range_accepts_bounds() {
        assert_eq!(DomainError::check_range("s", 0.0, 0.0, 100.0), Ok(0.0));
        assert_eq!(DomainError::check_range("s", 100.0, 0.0, 100.0), Ok(100.0));
    }

    #[test]
    fn check_range_rejects_outside() {
        let err = DomainError::check_range("s", 100.5, 0.0, 100.0);
        assert!(matches!(err, Err(DomainError::ScoreOutOfRange { .. })));
    }

    #[test]
    fn check_range_rejects_nan() {
        let err = DomainError::check_range("s", f64::NAN, 0.0, 100.0);
        assert_eq!(err, Err(DomainError::NonFinite { field: "s" }));
    }

    #[test]
    fn display_includes_field() {
        let err = DomainError::score_out_of_range("confidence", 1.5, 0.0, 1.0);
        assert_eq!(err.to_string(), "confidence = 1.5 is outside [0, 1]");
    }
}
