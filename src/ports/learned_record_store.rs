//! Learned record store port.
//!
//! Records outlive cycles and are never deleted by the engine.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId, WordId};
use crate::domain::vocabulary::LearnedRecord;

/// Persistence port for per-learner learned records.
#[async_trait]
pub trait LearnedRecordStore: Send + Sync {
    /// Insert the record, or refresh `learned_at` if it already exists.
    async fn upsert(&self, record: &LearnedRecord) -> Result<(), DomainError>;

    /// Find the record for one word.
    async fn find(
        &self,
        user_id: &UserId,
        word_id: WordId,
    ) -> Result<Option<LearnedRecord>, DomainError>;

    /// Number of words the learner has learned.
    async fn count(&self, user_id: &UserId) -> Result<u64, DomainError>;

    /// The learner's records, most recently learned first (ties by word id).
    async fn list(
        &self,
        user_id: &UserId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<LearnedRecord>, DomainError>;

    /// Check whether the learner has learned the word.
    async fn exists(&self, user_id: &UserId, word_id: WordId) -> Result<bool, DomainError> {
        Ok(self.find(user_id, word_id).await?.is_some())
    }
}
