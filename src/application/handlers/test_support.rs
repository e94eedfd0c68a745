//! Shared fixture for handler tests: in-memory adapters, a pinned clock
//! and a seeded random source.

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::events::InMemoryEventBus;
use crate::adapters::memory::{
    InMemoryCycleStore, InMemoryLearnedRecordStore, InMemoryVocabularyCatalog,
};
use crate::adapters::{FixedClock, SeededRandomSource};
use crate::application::{EngineSettings, UserLocks};
use crate::domain::cycle::{CyclePolicy, CycleVocabularyEntry, EntryStatus, LearningCycle};
use crate::domain::foundation::{
    CommandMetadata, CycleId, DomainError, Timestamp, UserId, WordId,
};
use crate::domain::vocabulary::{LearnedRecord, PartOfSpeech, VocabLevel, WordMetadata};
use crate::ports::{CycleStore, EntryCounts, LearnedChange, LearnedRecordStore};

pub(crate) const LEARNER: &str = "learner-1";

pub(crate) fn start_time() -> Timestamp {
    Timestamp::from_unix_secs(1_700_000_000).unwrap()
}

pub(crate) fn word_id(id: i64) -> WordId {
    WordId::new(id).unwrap()
}

pub(crate) fn user() -> UserId {
    UserId::new(LEARNER).unwrap()
}

pub(crate) fn metadata() -> CommandMetadata {
    CommandMetadata::for_user(LEARNER)
}

pub(crate) fn catalog_word(id: i64, level: VocabLevel, topic: &str) -> WordMetadata {
    WordMetadata {
        word_id: word_id(id),
        word: format!("word{:02}", id),
        definition: format!("definition of word {}", id),
        example: None,
        level,
        topic: topic.to_string(),
        pronunciation: None,
        part_of_speech: if id % 2 == 0 {
            PartOfSpeech::Verb
        } else {
            PartOfSpeech::Noun
        },
    }
}

/// Ten words: ids 1-5 are A1 "food", 6-10 are B2 "travel".
pub(crate) fn sample_catalog() -> InMemoryVocabularyCatalog {
    InMemoryVocabularyCatalog::new((1..=10).map(|id| {
        if id <= 5 {
            catalog_word(id, VocabLevel::A1, "food")
        } else {
            catalog_word(id, VocabLevel::B2, "travel")
        }
    }))
}

pub(crate) struct Fixture {
    pub store: Arc<InMemoryCycleStore>,
    pub catalog: Arc<InMemoryVocabularyCatalog>,
    pub learned: Arc<InMemoryLearnedRecordStore>,
    pub bus: Arc<InMemoryEventBus>,
    pub clock: Arc<FixedClock>,
    pub random: Arc<SeededRandomSource>,
    pub locks: Arc<UserLocks>,
    pub settings: EngineSettings,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_policy(CyclePolicy::default())
    }

    pub fn with_policy(policy: CyclePolicy) -> Self {
        let store = InMemoryCycleStore::new();
        let learned = store.learned_records();
        Self {
            store: Arc::new(store),
            catalog: Arc::new(sample_catalog()),
            learned: Arc::new(learned),
            bus: Arc::new(InMemoryEventBus::new()),
            clock: Arc::new(FixedClock::at(start_time())),
            random: Arc::new(SeededRandomSource::new(7)),
            locks: Arc::new(UserLocks::new()),
            settings: EngineSettings {
                policy,
                ..EngineSettings::default()
            },
        }
    }
}

impl Fixture {
    /// Stores a cycle starting now and lasting `seconds`.
    pub async fn seed_cycle(&self, seconds: i64) -> LearningCycle {
        let cycle = LearningCycle::open(user(), start_time(), start_time().plus_secs(seconds)).unwrap();
        self.store.save_cycle(&cycle).await.unwrap();
        cycle
    }

    pub async fn seed_entry(&self, id: i64, status: EntryStatus) {
        let entry = CycleVocabularyEntry::reconstitute(
            user(),
            word_id(id),
            status,
            start_time(),
            start_time(),
        );
        self.store.insert_entry(&entry).await.unwrap();
    }

    pub async fn seed_learned(&self, id: i64) {
        self.learned
            .upsert(&LearnedRecord::new(user(), word_id(id), start_time()))
            .await
            .unwrap();
    }

    pub async fn entry_status(&self, id: i64) -> Option<EntryStatus> {
        self.store
            .find_entry(&user(), word_id(id))
            .await
            .unwrap()
            .map(|e| e.status())
    }
}

/// Cycle store whose learned writes always fail; everything else delegates.
pub(crate) struct RejectingLearnedWrites(pub Arc<InMemoryCycleStore>);

#[async_trait]
impl CycleStore for RejectingLearnedWrites {
    async fn find_cycle(&self, user_id: &UserId) -> Result<Option<LearningCycle>, DomainError> {
        self.0.find_cycle(user_id).await
    }

    async fn save_cycle(&self, cycle: &LearningCycle) -> Result<(), DomainError> {
        self.0.save_cycle(cycle).await
    }

    async fn renew_cycle(
        &self,
        previous: &CycleId,
        next: &LearningCycle,
        discard_entries: bool,
    ) -> Result<(), DomainError> {
        self.0.renew_cycle(previous, next, discard_entries).await
    }

    async fn find_entry(
        &self,
        user_id: &UserId,
        word_id: WordId,
    ) -> Result<Option<CycleVocabularyEntry>, DomainError> {
        self.0.find_entry(user_id, word_id).await
    }

    async fn list_entries(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CycleVocabularyEntry>, DomainError> {
        self.0.list_entries(user_id).await
    }

    async fn insert_entry(&self, entry: &CycleVocabularyEntry) -> Result<(), DomainError> {
        self.0.insert_entry(entry).await
    }

    async fn update_entry(&self, entry: &CycleVocabularyEntry) -> Result<(), DomainError> {
        self.0.update_entry(entry).await
    }

    async fn delete_entry(&self, user_id: &UserId, word_id: WordId) -> Result<bool, DomainError> {
        self.0.delete_entry(user_id, word_id).await
    }

    async fn apply_learned(
        &self,
        _user_id: &UserId,
        _changes: &[LearnedChange],
    ) -> Result<(), DomainError> {
        Err(DomainError::database("connection reset"))
    }

    async fn count_entries(&self, user_id: &UserId) -> Result<EntryCounts, DomainError> {
        self.0.count_entries(user_id).await
    }
}
