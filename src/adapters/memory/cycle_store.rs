//! In-memory cycle store.
//!
//! Used when no database is configured and by handler tests. Learned
//! records live in a map shared with [`InMemoryLearnedRecordStore`]; take the
//! matching record store from [`InMemoryCycleStore::learned_records`].

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::domain::cycle::{CycleVocabularyEntry, EntryStatus, LearningCycle};
use crate::domain::foundation::{CycleId, DomainError, ErrorCode, UserId, WordId};
use crate::ports::{CycleStore, EntryChange, EntryCounts, LearnedChange};

use super::learned_record_store::{InMemoryLearnedRecordStore, RecordMap};

#[derive(Default)]
struct State {
    cycles: HashMap<UserId, LearningCycle>,
    entries: HashMap<UserId, BTreeMap<WordId, CycleVocabularyEntry>>,
}

/// `CycleStore` backed by process memory.
#[derive(Default)]
pub struct InMemoryCycleStore {
    state: RwLock<State>,
    learned: RecordMap,
}

impl InMemoryCycleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record store over the same learned records this store writes.
    pub fn learned_records(&self) -> InMemoryLearnedRecordStore {
        InMemoryLearnedRecordStore::shared(self.learned.clone())
    }
}

fn missing_entry(word_id: WordId) -> DomainError {
    DomainError::new(
        ErrorCode::EntryNotFound,
        format!("Word {} is not in the cycle", word_id),
    )
}

#[async_trait]
impl CycleStore for InMemoryCycleStore {
    async fn find_cycle(&self, user_id: &UserId) -> Result<Option<LearningCycle>, DomainError> {
        Ok(self.state.read().await.cycles.get(user_id).cloned())
    }

    async fn save_cycle(&self, cycle: &LearningCycle) -> Result<(), DomainError> {
        self.state
            .write()
            .await
            .cycles
            .insert(cycle.user_id().clone(), cycle.clone());
        Ok(())
    }

    async fn renew_cycle(
        &self,
        previous: &CycleId,
        next: &LearningCycle,
        discard_entries: bool,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        let current = state.cycles.get(next.user_id()).map(|c| c.id());
        if current != Some(*previous) {
            return Err(DomainError::new(
                ErrorCode::CycleNotFound,
                format!("Cycle {} is no longer current", previous),
            ));
        }

        state.cycles.insert(next.user_id().clone(), next.clone());
        if discard_entries {
            state.entries.remove(next.user_id());
        }
        Ok(())
    }

    async fn find_entry(
        &self,
        user_id: &UserId,
        word_id: WordId,
    ) -> Result<Option<CycleVocabularyEntry>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .entries
            .get(user_id)
            .and_then(|entries| entries.get(&word_id))
            .cloned())
    }

    async fn list_entries(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CycleVocabularyEntry>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .entries
            .get(user_id)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_entry(&self, entry: &CycleVocabularyEntry) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let entries = state.entries.entry(entry.user_id().clone()).or_default();

        if entries.contains_key(&entry.word_id()) {
            return Err(DomainError::new(
                ErrorCode::WordAlreadyInCycle,
                format!("Word {} is already in the cycle", entry.word_id()),
            ));
        }
        entries.insert(entry.word_id(), entry.clone());
        Ok(())
    }

    async fn update_entry(&self, entry: &CycleVocabularyEntry) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state
            .entries
            .get_mut(entry.user_id())
            .and_then(|entries| entries.get_mut(&entry.word_id()))
        {
            Some(stored) => {
                *stored = entry.clone();
                Ok(())
            }
            None => Err(missing_entry(entry.word_id())),
        }
    }

    async fn delete_entry(&self, user_id: &UserId, word_id: WordId) -> Result<bool, DomainError> {
        Ok(self
            .state
            .write()
            .await
            .entries
            .get_mut(user_id)
            .and_then(|entries| entries.remove(&word_id))
            .is_some())
    }

    async fn apply_learned(
        &self,
        user_id: &UserId,
        changes: &[LearnedChange],
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let mut records = self.learned.write().await;

        // Validate against a working copy so a failure leaves nothing applied.
        let mut entries = state.entries.get(user_id).cloned().unwrap_or_default();
        for change in changes {
            let word_id = change.record.word_id;
            match &change.entry {
                EntryChange::Update(entry) => match entries.get_mut(&word_id) {
                    Some(stored) => *stored = entry.clone(),
                    None => return Err(missing_entry(word_id)),
                },
                EntryChange::Delete => {
                    if entries.remove(&word_id).is_none() {
                        return Err(missing_entry(word_id));
                    }
                }
                EntryChange::Keep => {}
            }
        }

        state.entries.insert(user_id.clone(), entries);
        for change in changes {
            records.insert(
                (change.record.user_id.clone(), change.record.word_id),
                change.record.clone(),
            );
        }
        Ok(())
    }

    async fn count_entries(&self, user_id: &UserId) -> Result<EntryCounts, DomainError> {
        let state = self.state.read().await;
        let mut counts = EntryCounts::default();
        if let Some(entries) = state.entries.get(user_id) {
            for entry in entries.values() {
                match entry.status() {
                    EntryStatus::Pending => counts.pending += 1,
                    EntryStatus::Learned => counts.learned += 1,
                }
            }
        }
        Ok(counts)
    }
}
