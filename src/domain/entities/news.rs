//! # News Index
//!
//! Headlines grouped by entity, the input of the sentiment producer.

use crate::domain::value_objects::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One headline row as it appears in a news file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsHeadline {
    /// Entity the headline is about.
    pub entity_id: String,
    /// Headline text.
    #[serde(alias = "text")]
    pub headline: String,
}

/// Headlines per entity, in file order.
#[derive(Debug, Clone, Default)]
pub struct NewsIndex {
    headlines: HashMap<EntityId, Vec<String>>,
}

impl NewsIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Groups rows by entity. Rows with an empty entity id or headline are dropped.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = NewsHeadline>) -> Self {
        let mut headlines: HashMap<EntityId, Vec<String>> = HashMap::new();
        for row in rows {
            if row.headline.trim().is_empty() {
                continue;
            }
            let Ok(entity_id) = EntityId::new(row.entity_id) else {
                continue;
            };
            headlines.entry(entity_id).or_default().push(row.headline);
        }
        Self { headlines }
    }

    /// Returns the headlines for an entity, empty when it has none.
    #[must_use]
    pub fn headlines(&self, entity_id: &str) -> &[String] {
        self.headlines
            .get(entity_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the number of entities with at least one headline.
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.headlines.len()
    }

    /// Returns true if no entity has headlines.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
    }
}
