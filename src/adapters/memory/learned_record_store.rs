//! In-memory learned record store.
//!
//! The record map can be shared with [`InMemoryCycleStore`] so that learned
//! transitions write records and entries under one critical section.
//!
//! [`InMemoryCycleStore`]: super::InMemoryCycleStore

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId, WordId};
use crate::domain::vocabulary::LearnedRecord;
use crate::ports::LearnedRecordStore;

pub(crate) type RecordMap = Arc<RwLock<HashMap<(UserId, WordId), LearnedRecord>>>;

/// `LearnedRecordStore` backed by process memory.
#[derive(Default, Clone)]
pub struct InMemoryLearnedRecordStore {
    records: RecordMap,
}

impl InMemoryLearnedRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn shared(records: RecordMap) -> Self {
        Self { records }
    }
}

#[async_trait]
impl LearnedRecordStore for InMemoryLearnedRecordStore {
    async fn upsert(&self, record: &LearnedRecord) -> Result<(), DomainError> {
        self.records
            .write()
            .await
            .insert((record.user_id.clone(), record.word_id), record.clone());
        Ok(())
    }

    async fn find(
        &self,
        user_id: &UserId,
        word_id: WordId,
    ) -> Result<Option<LearnedRecord>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .get(&(user_id.clone(), word_id))
            .cloned())
    }

    async fn count(&self, user_id: &UserId) -> Result<u64, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .keys()
            .filter(|(owner, _)| owner == user_id)
            .count() as u64)
    }

    async fn list(
        &self,
        user_id: &UserId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<LearnedRecord>, DomainError> {
        let records = self.records.read().await;
        let mut owned: Vec<&LearnedRecord> = records
            .values()
            .filter(|r| &r.user_id == user_id)
            .collect();
        owned.sort_by(|a, b| {
            b.learned_at
                .cmp(&a.learned_at)
                .then_with(|| a.word_id.cmp(&b.word_id))
        });

        Ok(owned
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    #[tokio::test]
    async fn upsert_refreshes_timestamp() {
        let store = InMemoryLearnedRecordStore::new();
        let user = UserId::new("learner").unwrap();
        let word = WordId::new(5).unwrap();
        let first = Timestamp::from_unix_secs(100).unwrap();
        let second = Timestamp::from_unix_secs(200).unwrap();

        store.upsert(&LearnedRecord::new(user.clone(), word, first)).await.unwrap();
        store.upsert(&LearnedRecord::new(user.clone(), word, second)).await.unwrap();

        let record = store.find(&user, word).await.unwrap().unwrap();
        assert_eq!(record.learned_at, second);
        assert_eq!(store.count(&user).await.unwrap(), 1);
        assert!(store.exists(&user, word).await.unwrap());
    }

    #[tokio::test]
    async fn count_is_per_learner() {
        let store = InMemoryLearnedRecordStore::new();
        let now = Timestamp::from_unix_secs(100).unwrap();
        let a = UserId::new("a").unwrap();
        let b = UserId::new("b").unwrap();

        store.upsert(&LearnedRecord::new(a.clone(), WordId::new(1).unwrap(), now)).await.unwrap();
        store.upsert(&LearnedRecord::new(a.clone(), WordId::new(2).unwrap(), now)).await.unwrap();
        store.upsert(&LearnedRecord::new(b.clone(), WordId::new(1).unwrap(), now)).await.unwrap();

        assert_eq!(store.count(&a).await.unwrap(), 2);
        assert_eq!(store.count(&b).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paged() {
        let store = InMemoryLearnedRecordStore::new();
        let user = UserId::new("learner").unwrap();
        let other = UserId::new("other").unwrap();
        for (word, secs) in [(1, 300), (2, 100), (3, 200)] {
            let at = Timestamp::from_unix_secs(secs).unwrap();
            store.upsert(&LearnedRecord::new(user.clone(), WordId::new(word).unwrap(), at)).await.unwrap();
        }
        let at = Timestamp::from_unix_secs(999).unwrap();
        store.upsert(&LearnedRecord::new(other, WordId::new(4).unwrap(), at)).await.unwrap();

        let ids = |records: Vec<LearnedRecord>| -> Vec<i64> {
            records.iter().map(|r| r.word_id.value()).collect()
        };

        assert_eq!(ids(store.list(&user, 0, 10).await.unwrap()), vec![1, 3, 2]);
        assert_eq!(ids(store.list(&user, 1, 1).await.unwrap()), vec![3]);
        assert!(store.list(&user, 5, 10).await.unwrap().is_empty());
    }
}
