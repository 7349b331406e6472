//! # Application Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)                 - Invariant violations
//! ├── Infrastructure(InfrastructureError) - File, config and parse failures
//! ├── Model(ClassifierError)              - Learned model load/prediction failures
//! ├── Validation(String)                  - Unusable call input
//! ├── NotInitialized(String)              - Engine queried before ingest
//! └── MissingData { kind, entity_id }     - Producer has no input for an entity
//! ```
//!
//! Missing data and model failures are recoverable: the caller can degrade to
//! a neutral or static result. Validation and not-initialized errors are fatal
//! to the call but never to the process.
//!
//! # Examples
//!
//! ```
//! use sentinel_risk::application::error::{ApplicationError, InfrastructureError};
//!
//! let err = ApplicationError::validation("signals must not be empty");
//! assert!(err.is_validation());
//!
//! let err = ApplicationError::missing_data("credit features", "ENT-1");
//! assert!(err.is_recoverable());
//!
//! let infra_err = InfrastructureError::source_not_found("data/transactions.json");
//! let app_err: ApplicationError = infra_err.into();
//! assert!(app_err.to_string().contains("infrastructure"));
//! ```

use crate::domain::errors::DomainError;
use thiserror::Error;

/// Infrastructure layer error.
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// Filesystem error.
    #[error("io error: {0}")]
    Io(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required input source does not exist.
    #[error("source not found: {0}")]
    SourceNotFound(String),
}

impl InfrastructureError {
    /// Creates an io error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a source not found error.
    #[must_use]
    pub fn source_not_found(location: impl Into<String>) -> Self {
        Self::SourceNotFound(location.into())
    }
}

impl From<std::io::Error> for InfrastructureError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for InfrastructureError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Learned model error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    /// Model file does not exist.
    #[error("model not found: {0}")]
    NotFound(String),

    /// Model file exists but cannot be parsed or is structurally invalid.
    #[error("model load failed: {0}")]
    Load(String),

    /// Input width differs from what the model was trained on.
    #[error("feature mismatch: expected {expected} features, got {actual}")]
    FeatureMismatch {
        /// Model input width.
        expected: usize,
        /// Supplied input width.
        actual: usize,
    },

    /// Prediction produced no usable probability.
    #[error("prediction failed: {0}")]
    Prediction(String),
}

impl ClassifierError {
    /// Creates a load error.
    #[must_use]
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load(message.into())
    }

    /// Creates a prediction error.
    #[must_use]
    pub fn prediction(message: impl Into<String>) -> Self {
        Self::Prediction(message.into())
    }
}

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from an invariant check.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Infrastructure error from files, config or parsing.
    #[error("infrastructure error: {0}")]
    Infrastructure(#[from] InfrastructureError),

    /// Learned model error.
    #[error("model error: {0}")]
    Model(#[from] ClassifierError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Engine queried before its data was ingested.
    #[error("not initialized: {0}")]
    NotInitialized(String),

    /// A producer has no input for the entity.
    #[error("missing {kind} for entity {entity_id}")]
    MissingData {
        /// What is missing.
        kind: String,
        /// Entity that was requested.
        entity_id: String,
    },
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not initialized error.
    #[must_use]
    pub fn not_initialized(message: impl Into<String>) -> Self {
        Self::NotInitialized(message.into())
    }

    /// Creates a missing data error.
    #[must_use]
    pub fn missing_data(kind: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::MissingData {
            kind: kind.into(),
            entity_id: entity_id.into(),
        }
    }

    /// Returns true if the caller can degrade instead of failing.
    ///
    /// Batch analysis drops the producer's domain for the entity on these.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingData { .. } | Self::Model(_))
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a not initialized error.
    #[must_use]
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Self::NotInitialized(_))
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infrastructure_error_source_not_found() {
        let err = InfrastructureError::source_not_found("tx.json");
        assert!(err.to_string().contains("tx.json"));
    }

    #[test]
    fn infrastructure_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: InfrastructureError = io.into();
        assert!(matches!(err, InfrastructureError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn infrastructure_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: InfrastructureError = json_err.into();
        assert!(err.to_string().starts_with("serialization error"));
    }

    #[test]
    fn classifier_error_feature_mismatch() {
        let err = ClassifierError::FeatureMismatch {
            expected: 3,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "feature mismatch: expected 3 features, got 4"
        );
    }

    #[test]
    fn application_error_validation() {
        let err = ApplicationError::validation("signals must not be empty");
        assert!(err.is_validation());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn application_error_not_initialized() {
        let err = ApplicationError::not_initialized("call ingest first");
        assert!(err.is_not_initialized());
        assert!(err.to_string().contains("ingest"));
    }

    #[test]
    fn application_error_missing_data() {
        let err = ApplicationError::missing_data("credit features", "ENT-9");
        assert_eq!(err.to_string(), "missing credit features for entity ENT-9");
        assert!(err.is_recoverable());
    }

    #[test]
    fn application_error_from_domain_error() {
        let app_err: ApplicationError = DomainError::EmptyEntityId.into();
        assert!(app_err.to_string().contains("entity id"));
    }

    #[test]
    fn application_error_from_classifier_error() {
        let app_err: ApplicationError = ClassifierError::prediction("NaN").into();
        assert!(app_err.is_recoverable());
    }
}
