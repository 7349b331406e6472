//! # Transaction Record
//!
//! One observed value transfer between two entities, as delivered by a
//! transaction source. Records are deliberately lenient: endpoints may be
//! missing and are filtered by the graph builder, not rejected at parse time.
//!
//! Common column spellings are accepted as aliases:
//!
//! | field    | aliases                                   |
//! |----------|-------------------------------------------|
//! | `source` | `src`, `sender`, `from`, `origin`, `source_id` |
//! | `target` | `dst`, `receiver`, `to`, `dest`, `target_id`   |
//! | `amount` | `amt`, `value`, `weight`                  |

use serde::{Deserialize, Serialize};

/// Amount used when a record carries none.
pub const DEFAULT_AMOUNT: f64 = 1.0;

/// A raw transaction between two entities.
///
/// # Examples
///
/// ```
/// use sentinel_risk::domain::entities::transaction::TransactionRecord;
///
/// let txn: TransactionRecord = serde_json::from_str(r#"{"sender":"A","receiver":"B"}"#).unwrap();
/// assert_eq!(txn.endpoints(), Some(("A", "B")));
/// assert_eq!(txn.amount_or_default(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Paying entity.
    #[serde(
        default,
        alias = "src",
        alias = "sender",
        alias = "from",
        alias = "origin",
        alias = "source_id"
    )]
    pub source: Option<String>,
    /// Receiving entity.
    #[serde(
        default,
        alias = "dst",
        alias = "receiver",
        alias = "to",
        alias = "dest",
        alias = "target_id"
    )]
    pub target: Option<String>,
    /// Transferred value.
    #[serde(default, alias = "amt", alias = "value", alias = "weight")]
    pub amount: Option<f64>,
}

impl TransactionRecord {
    /// Creates a complete record.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, amount: f64) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
            amount: Some(amount),
        }
    }

    /// Returns both endpoints when present and non-blank.
    #[must_use]
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        let source = self.source.as_deref().filter(|s| !s.trim().is_empty())?;
        let target = self.target.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((source, target))
    }

    /// Returns the amount, defaulting to [`DEFAULT_AMOUNT`].
    #[inline]
    #[must_use]
    pub fn amount_or_default(&self) -> f64 {
        self.amount.unwrap_or(DEFAULT_AMOUNT)
    }
}
