//! # Transaction Sources
//!
//! [`TransactionSource`] implementations.
//!
//! - [`JsonFileTransactionSource`]: JSON array of transaction rows
//! - [`InMemoryTransactionSource`]: records held in memory, for tests and embedding

use crate::application::error::InfrastructureError;
use crate::domain::entities::TransactionRecord;
use crate::infrastructure::persistence::json_file::read_rows;
use crate::infrastructure::persistence::traits::TransactionSource;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reads transactions from a JSON array file.
///
/// Column aliases (`src`, `receiver`, `amt`, ...) are accepted per row.
#[derive(Debug, Clone)]
pub struct JsonFileTransactionSource {
    path: PathBuf,
}

impl JsonFileTransactionSource {
    /// Creates a source for `path`. The file is read on [`load`](TransactionSource::load).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionSource for JsonFileTransactionSource {
    fn load(&self) -> Result<Option<Vec<TransactionRecord>>, InfrastructureError> {
        read_rows(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory implementation of [`TransactionSource`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionSource {
    records: Arc<RwLock<Vec<TransactionRecord>>>,
}

impl InMemoryTransactionSource {
    /// Creates a source holding `records`.
    #[must_use]
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Appends a record.
    pub fn push(&self, record: TransactionRecord) {
        self.records.write().push(record);
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if the source holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionSource for InMemoryTransactionSource {
    fn load(&self) -> Result<Option<Vec<TransactionRecord>>, InfrastructureError> {
        Ok(Some(self.records.read().clone()))
    }

    fn describe(&self) -> String {
        format!("in-memory ({} records)", self.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn json_file_with_aliases() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"source": "A", "target": "B", "amount": 10.0}},
                {{"sender": "B", "receiver": "C"}},
                {{"src": "C", "dst": "A", "value": 2.5}}
            ]"#
        )
        .unwrap();

        let records = JsonFileTransactionSource::new(file.path()).load().unwrap().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].endpoints(), Some(("B", "C")));
        assert_eq!(records[1].amount_or_default(), 1.0);
        assert_eq!(records[2].amount_or_default(), 2.5);
    }

    #[test]
    fn absent_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileTransactionSource::new(dir.path().join("tx.json"));
        assert!(source.load().unwrap().is_none());
        assert!(source.describe().ends_with("tx.json"));
    }

    #[test]
    fn in_memory_push() {
        let source = InMemoryTransactionSource::default();
        assert!(source.is_empty());
        source.push(TransactionRecord::new("A", "B", 1.0));
        assert_eq!(source.load().unwrap().unwrap().len(), 1);
        assert_eq!(source.describe(), "in-memory (1 records)");
    }
}
