//! # News Source
//!
//! Loads headlines for the sentiment producer.

use crate::application::error::InfrastructureError;
use crate::domain::entities::{NewsHeadline, NewsIndex};
use crate::infrastructure::persistence::json_file::read_rows;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Reads `{entity_id, headline|text}` rows from a JSON array file.
#[derive(Debug, Clone)]
pub struct JsonFileNewsSource {
    path: PathBuf,
}

impl JsonFileNewsSource {
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

    /// Builds the news index. An absent file yields an empty index.
    ///
    /// # Errors
    ///
    /// Returns an `InfrastructureError` if the file exists but is unreadable.
    pub fn load(&self) -> Result<NewsIndex, InfrastructureError> {
        let Some(rows) = read_rows::<NewsHeadline>(&self.path)? else {
            warn!(path = %self.path.display(), "news file not found, sentiment will be neutral");
            return Ok(NewsIndex::empty());
        };
        let index = NewsIndex::from_rows(rows);
        info!(
            path = %self.path.display(),
            entities = index.entity_count(),
            "news index loaded"
        );
        Ok(index)
    }
}
