//! Vocabulary catalog port (read-only).
//!
//! The catalog itself is maintained elsewhere; the cycle engine only looks
//! words up and draws distractor definitions from it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, WordId};
use crate::domain::vocabulary::WordMetadata;

/// Catalog word counts grouped by level and by topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogDistribution {
    pub by_level: BTreeMap<String, u64>,
    pub by_topic: BTreeMap<String, u64>,
}

impl CatalogDistribution {
    /// Tallies an in-memory word set; blank topics are left out.
    pub fn tally<'a>(words: impl IntoIterator<Item = &'a WordMetadata>) -> Self {
        let mut distribution = Self::default();
        for word in words {
            *distribution
                .by_level
                .entry(word.level.as_str().to_string())
                .or_default() += 1;
            if !word.topic.trim().is_empty() {
                *distribution.by_topic.entry(word.topic.clone()).or_default() += 1;
            }
        }
        distribution
    }
}

/// Reader port for catalog word metadata.
#[async_trait]
pub trait VocabularyCatalog: Send + Sync {
    /// Look up one word.
    ///
    /// Returns `None` if the id is not in the catalog.
    async fn lookup(&self, word_id: WordId) -> Result<Option<WordMetadata>, DomainError>;

    /// Look up several words. Unknown ids are omitted; order is unspecified.
    async fn lookup_many(&self, word_ids: &[WordId]) -> Result<Vec<WordMetadata>, DomainError>;

    /// Every definition in the catalog, used as the distractor pool.
    async fn all_definitions(&self) -> Result<Vec<String>, DomainError>;

    /// Number of words in the catalog.
    async fn count(&self) -> Result<u64, DomainError>;

    /// Word counts per level and per topic.
    async fn distribution(&self) -> Result<CatalogDistribution, DomainError>;
}
