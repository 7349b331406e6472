//! # Source Traits
//!
//! Port definitions for input data.
//!
//! Engines depend on these traits, not on files, so tests and embedders can
//! hand data over directly.
//!
//! # Available Sources
//!
//! - [`TransactionSource`]: raw transfers for the systemic engine

use crate::application::error::InfrastructureError;
use crate::domain::entities::TransactionRecord;
use std::fmt;

/// Supplies the transaction dataset.
pub trait TransactionSource: Send + Sync + fmt::Debug {
    /// Loads every record.
    ///
    /// `Ok(None)` means the source does not exist, which callers treat as an
    /// empty dataset rather than a failure.
    ///
    /// # Errors
    ///
    /// Returns an `InfrastructureError` if the source exists but cannot be
    /// read or parsed.
    fn load(&self) -> Result<Option<Vec<TransactionRecord>>, InfrastructureError>;

    /// Describes the source for logs.
    fn describe(&self) -> String;
}
