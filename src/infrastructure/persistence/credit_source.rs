//! # Credit Feature Source
//!
//! Loads per-entity financial ratios for the credit producer.

use crate::application::error::InfrastructureError;
use crate::application::services::credit_engine::CreditFeatures;
use crate::domain::value_objects::EntityId;
use crate::infrastructure::persistence::json_file::read_rows;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct CreditRow {
    entity_id: String,
    #[serde(flatten)]
    columns: BTreeMap<String, Value>,
}

/// Reads `{entity_id, roa, debt_ratio, operating_margin, net_income_assets}`
/// rows from a JSON array file.
///
/// Rows missing a feature are skipped with a warning; the credit producer then
/// reports missing data for that entity.
#[derive(Debug, Clone)]
pub struct JsonFileCreditFeatureSource {
    path: PathBuf,
}

impl JsonFileCreditFeatureSource {
    /// Creates a source for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads features keyed by entity. An absent file yields an empty map.
    ///
    /// # Errors
    ///
    /// Returns an `InfrastructureError` if the file exists but is unreadable.
    pub fn load(&self) -> Result<HashMap<EntityId, CreditFeatures>, InfrastructureError> {
        let Some(rows) = read_rows::<CreditRow>(&self.path)? else {
            warn!(path = %self.path.display(), "credit feature file not found");
            return Ok(HashMap::new());
        };

        let mut features = HashMap::with_capacity(rows.len());
        for row in rows {
            let Ok(entity_id) = EntityId::new(row.entity_id) else {
                warn!("credit row without entity id skipped");
                continue;
            };
            let numeric: BTreeMap<String, f64> = row
                .columns
                .into_iter()
                .filter_map(|(name, value)| value.as_f64().map(|v| (name, v)))
                .collect();
            match CreditFeatures::from_map(entity_id.as_str(), &numeric) {
                Ok(f) => {
                    features.insert(entity_id, f);
                }
                Err(e) => warn!(entity_id = %entity_id, error = %e, "credit row skipped"),
            }
        }

        info!(path = %self.path.display(), entities = features.len(), "credit features loaded");
        Ok(features)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn complete_rows_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"entity_id": "A", "roa": 0.05, "debt_ratio": 0.4, "operating_margin": 0.12, "net_income_assets": 0.03, "sector": "energy"}},
                {{"entity_id": "B", "roa": 0.01}}
            ]"#
        )
        .unwrap();

        let features = JsonFileCreditFeatureSource::new(file.path()).load().unwrap();

        assert_eq!(features.len(), 1);
        assert_eq!(features["A"].to_array(), [0.05, 0.4, 0.12, 0.03]);
    }

    #[test]
    fn absent_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileCreditFeatureSource::new(dir.path().join("credit.json"));
        assert!(source.load().unwrap().is_empty());
    }
}
