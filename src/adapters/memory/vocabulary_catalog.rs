//! In-memory vocabulary catalog, optionally seeded from a JSON file.
//!
//! The seed file is a JSON array of word objects:
//!
//! ```json
//! [{"word_id": 1, "word": "apple", "definition": "a round fruit",
//!   "level": "a1", "topic": "food", "part_of_speech": "noun"}]
//! ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::foundation::{DomainError, ErrorCode, WordId};
use crate::domain::vocabulary::WordMetadata;
use crate::ports::{CatalogDistribution, VocabularyCatalog};

/// Read-only catalog held in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryVocabularyCatalog {
    words: BTreeMap<WordId, WordMetadata>,
}

impl InMemoryVocabularyCatalog {
    /// Builds a catalog; a later word with the same id replaces an earlier one.
    pub fn new(words: impl IntoIterator<Item = WordMetadata>) -> Self {
        Self {
            words: words.into_iter().map(|w| (w.word_id, w)).collect(),
        }
    }

    /// Loads the catalog from a JSON seed file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Cannot read catalog seed {}: {}", path.display(), e),
            )
        })?;
        let words: Vec<WordMetadata> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Invalid catalog seed {}: {}", path.display(), e),
            )
        })?;
        Ok(Self::new(words))
    }

    /// Every word, ordered by id.
    pub fn words(&self) -> Vec<WordMetadata> {
        self.words.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[async_trait]
impl VocabularyCatalog for InMemoryVocabularyCatalog {
    async fn lookup(&self, word_id: WordId) -> Result<Option<WordMetadata>, DomainError> {
        Ok(self.words.get(&word_id).cloned())
    }

    async fn lookup_many(&self, word_ids: &[WordId]) -> Result<Vec<WordMetadata>, DomainError> {
        Ok(word_ids
            .iter()
            .filter_map(|id| self.words.get(id).cloned())
            .collect())
    }

    async fn all_definitions(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.words.values().map(|w| w.definition.clone()).collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.words.len() as u64)
    }

    async fn distribution(&self) -> Result<CatalogDistribution, DomainError> {
        Ok(CatalogDistribution::tally(self.words.values()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SEED: &str = r#"[
        {"word_id": 1, "word": "apple", "definition": "a round fruit", "level": "a1", "topic": "food"},
        {"word_id": 2, "word": "run", "definition": "move fast on foot", "level": "a2", "topic": "sport", "part_of_speech": "verb"}
    ]"#;

    #[tokio::test]
    async fn loads_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let catalog = InMemoryVocabularyCatalog::from_json_file(file.path()).unwrap();

        assert_eq!(catalog.count().await.unwrap(), 2);
        let run = catalog.lookup(WordId::new(2).unwrap()).await.unwrap().unwrap();
        assert_eq!(run.word, "run");
    }

    #[tokio::test]
    async fn missing_seed_file_is_an_error() {
        let result = InMemoryVocabularyCatalog::from_json_file("/nonexistent/catalog.json");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn lookup_many_skips_unknown_ids() {
        let words: Vec<WordMetadata> = serde_json::from_str(SEED).unwrap();
        let catalog = InMemoryVocabularyCatalog::new(words);

        let found = catalog
            .lookup_many(&[WordId::new(1).unwrap(), WordId::new(99).unwrap()])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(catalog.all_definitions().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn distribution_counts_levels_and_skips_blank_topics() {
        let mut words: Vec<WordMetadata> = serde_json::from_str(SEED).unwrap();
        let mut untagged = words[0].clone();
        untagged.word_id = WordId::new(3).unwrap();
        untagged.topic = "  ".to_string();
        words.push(untagged);
        let catalog = InMemoryVocabularyCatalog::new(words);

        let distribution = catalog.distribution().await.unwrap();

        assert_eq!(distribution.by_level.get("a1"), Some(&2));
        assert_eq!(distribution.by_level.get("a2"), Some(&1));
        assert_eq!(distribution.by_topic.len(), 2);
        assert_eq!(distribution.by_topic.get("food"), Some(&1));
    }
}
