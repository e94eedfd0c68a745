//! Cycle store port.
//!
//! Owns the learner's `LearningCycle` and its `CycleVocabularyEntry` rows.
//! Handlers mutate cycle state through this contract only.
//!
//! # Design
//!
//! - **Keyed by user**: at most one cycle row per learner
//! - **Entries follow the user**: entries survive create-or-replace and,
//!   unless discarded, renewal
//! - **Atomic renewal**: swapping the cycle identity and clearing entries
//!   happen together or not at all
//! - **Atomic learning**: learned records and the entry changes that go with
//!   them are written as one unit, per batch

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::cycle::{CycleVocabularyEntry, LearningCycle};
use crate::domain::foundation::{CycleId, DomainError, UserId, WordId};
use crate::domain::vocabulary::LearnedRecord;

/// Entry counts for one learner's cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryCounts {
    pub pending: u64,
    pub learned: u64,
}

impl EntryCounts {
    pub fn total(&self) -> u64 {
        self.pending + self.learned
    }
}

/// What happens to a cycle entry when its word is recorded as learned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryChange {
    /// Overwrite the stored entry (status and `updated_at`).
    Update(CycleVocabularyEntry),
    /// Delete the entry from the cycle.
    Delete,
    /// Leave the entry as it is; only the record moves.
    Keep,
}

/// One learned transition: the record to upsert and the entry change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnedChange {
    pub record: LearnedRecord,
    pub entry: EntryChange,
}

/// Persistence port for cycles and their entries.
#[async_trait]
pub trait CycleStore: Send + Sync {
    /// Find the learner's cycle.
    ///
    /// Returns `None` if the learner has never created one.
    async fn find_cycle(&self, user_id: &UserId) -> Result<Option<LearningCycle>, DomainError>;

    /// Insert the learner's cycle, or overwrite the existing row in place.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save_cycle(&self, cycle: &LearningCycle) -> Result<(), DomainError>;

    /// Replace the cycle `previous` with `next`, optionally dropping every entry.
    ///
    /// # Errors
    ///
    /// - `CycleNotFound` if `previous` is no longer the learner's cycle
    /// - `DatabaseError` on persistence failure
    async fn renew_cycle(
        &self,
        previous: &CycleId,
        next: &LearningCycle,
        discard_entries: bool,
    ) -> Result<(), DomainError>;

    /// Find one entry.
    async fn find_entry(
        &self,
        user_id: &UserId,
        word_id: WordId,
    ) -> Result<Option<CycleVocabularyEntry>, DomainError>;

    /// All entries of the learner's cycle, ordered by word id.
    async fn list_entries(&self, user_id: &UserId)
        -> Result<Vec<CycleVocabularyEntry>, DomainError>;

    /// Insert a new entry.
    ///
    /// # Errors
    ///
    /// - `WordAlreadyInCycle` if the (user, word) pair exists
    /// - `DatabaseError` on persistence failure
    async fn insert_entry(&self, entry: &CycleVocabularyEntry) -> Result<(), DomainError>;

    /// Update an existing entry's status.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if the entry doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_entry(&self, entry: &CycleVocabularyEntry) -> Result<(), DomainError>;

    /// Delete an entry. Returns `false` if it did not exist.
    async fn delete_entry(&self, user_id: &UserId, word_id: WordId) -> Result<bool, DomainError>;

    /// Upsert every learned record and apply every entry change in `changes`,
    /// all or nothing.
    ///
    /// Changes apply in order; a word may appear more than once.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if an `Update` or `Delete` targets a missing entry;
    ///   nothing is written
    /// - `DatabaseError` on persistence failure; nothing is written
    async fn apply_learned(
        &self,
        user_id: &UserId,
        changes: &[LearnedChange],
    ) -> Result<(), DomainError>;

    /// Pending and learned counts for the learner's cycle.
    async fn count_entries(&self, user_id: &UserId) -> Result<EntryCounts, DomainError>;
}
