//! ListCycleWordsHandler - Filtered, sorted, paginated cycle listing.
//!
//! Entries are joined with their catalog metadata. A catalog miss does not
//! hide the entry; it is listed with `word: None` and fails every metadata
//! filter.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::application::EngineError;
use crate::domain::cycle::{CycleVocabularyEntry, EntryStatus};
use crate::domain::foundation::{UserId, ValidationError, WordId};
use crate::domain::vocabulary::{PartOfSpeech, VocabLevel, WordMetadata};
use crate::ports::{CycleStore, VocabularyCatalog};

/// Default page size.
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Sortable fields. Anything else falls back to `WordId`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    WordId,
    Word,
    Level,
    Topic,
    PartOfSpeech,
    Status,
}

impl SortField {
    /// Parses a caller-supplied field name, ignoring unknown names.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "word" => SortField::Word,
            "level" => SortField::Level,
            "topic" => SortField::Topic,
            "part_of_speech" => SortField::PartOfSpeech,
            "status" => SortField::Status,
            _ => SortField::WordId,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ValidationError::invalid_format(
                "order",
                format!("expected 'asc' or 'desc', got '{}'", other),
            )),
        }
    }
}

/// Filters; `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct WordFilters {
    pub status: Option<EntryStatus>,
    pub level: Option<VocabLevel>,
    pub topic: Option<String>,
    pub part_of_speech: Option<PartOfSpeech>,
}

/// Query for a page of cycle words.
#[derive(Debug, Clone)]
pub struct ListCycleWordsQuery {
    pub user_id: UserId,
    pub filters: WordFilters,
    pub sort_by: SortField,
    pub order: SortOrder,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl ListCycleWordsQuery {
    /// Unfiltered first page in default order.
    pub fn first_page(user_id: UserId) -> Self {
        Self {
            user_id,
            filters: WordFilters::default(),
            sort_by: SortField::default(),
            order: SortOrder::default(),
            offset: 0,
            limit: None,
        }
    }
}

/// One listed entry.
#[derive(Debug, Clone, Serialize)]
pub struct CycleWordView {
    pub word_id: WordId,
    pub status: EntryStatus,
    pub added_at: String,
    pub word: Option<WordMetadata>,
}

/// A page of entries plus the filtered total.
#[derive(Debug, Clone, Serialize)]
pub struct CycleWordsPage {
    pub items: Vec<CycleWordView>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

/// Handler for [`ListCycleWordsQuery`].
pub struct ListCycleWordsHandler {
    cycle_store: Arc<dyn CycleStore>,
    catalog: Arc<dyn VocabularyCatalog>,
}

impl ListCycleWordsHandler {
    pub fn new(cycle_store: Arc<dyn CycleStore>, catalog: Arc<dyn VocabularyCatalog>) -> Self {
        Self {
            cycle_store,
            catalog,
        }
    }

    pub async fn handle(&self, query: ListCycleWordsQuery) -> Result<CycleWordsPage, EngineError> {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(
                ValidationError::out_of_range("limit", 1, MAX_PAGE_LIMIT as i64, limit as i64).into(),
            );
        }

        self.cycle_store
            .find_cycle(&query.user_id)
            .await?
            .ok_or_else(EngineError::cycle_not_found)?;

        let entries = self.cycle_store.list_entries(&query.user_id).await?;
        let ids: Vec<WordId> = entries.iter().map(|e| e.word_id()).collect();
        let mut words: HashMap<WordId, WordMetadata> = self
            .catalog
            .lookup_many(&ids)
            .await?
            .into_iter()
            .map(|w| (w.word_id, w))
            .collect();

        let mut views: Vec<CycleWordView> = entries
            .into_iter()
            .map(|entry| join(entry, &mut words))
            .filter(|view| matches(view, &query.filters))
            .collect();

        views.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort_by);
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = views.len();
        let items: Vec<CycleWordView> = views.into_iter().skip(query.offset).take(limit).collect();

        tracing::debug!(
            user_id = %query.user_id,
            total,
            returned = items.len(),
            "Listed cycle words"
        );

        Ok(CycleWordsPage {
            items,
            total,
            offset: query.offset,
            limit,
        })
    }
}

fn join(entry: CycleVocabularyEntry, words: &mut HashMap<WordId, WordMetadata>) -> CycleWordView {
    let word = words.remove(&entry.word_id());
    CycleWordView {
        word_id: entry.word_id(),
        status: entry.status(),
        added_at: entry.added_at().to_rfc3339(),
        word,
    }
}

fn matches(view: &CycleWordView, filters: &WordFilters) -> bool {
    if filters.status.is_some_and(|s| s != view.status) {
        return false;
    }

    let needs_metadata =
        filters.level.is_some() || filters.topic.is_some() || filters.part_of_speech.is_some();
    let Some(word) = &view.word else {
        return !needs_metadata;
    };

    filters.level.map_or(true, |level| level == word.level)
        && filters
            .topic
            .as_deref()
            .map_or(true, |topic| topic.eq_ignore_ascii_case(&word.topic))
        && filters
            .part_of_speech
            .map_or(true, |pos| pos == word.part_of_speech)
}

fn compare(a: &CycleWordView, b: &CycleWordView, field: SortField) -> Ordering {
    let primary = match field {
        SortField::WordId => Ordering::Equal,
        SortField::Status => a.status.cmp(&b.status),
        SortField::Word => by_metadata(a, b, |w| w.word.to_lowercase()),
        SortField::Topic => by_metadata(a, b, |w| w.topic.to_lowercase()),
        SortField::Level => by_metadata(a, b, |w| w.level),
        SortField::PartOfSpeech => by_metadata(a, b, |w| w.part_of_speech),
    };
    primary.then_with(|| a.word_id.cmp(&b.word_id))
}

/// Entries without catalog data sort after those with it.
fn by_metadata<K: Ord>(
    a: &CycleWordView,
    b: &CycleWordView,
    key: impl Fn(&WordMetadata) -> K,
) -> Ordering {
    match (&a.word, &b.word) {
        (Some(x), Some(y)) => key(x).cmp(&key(y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Fixture};
    use crate::domain::foundation::ErrorCode;

    fn handler(fx: &Fixture) -> ListCycleWordsHandler {
        ListCycleWordsHandler::new(fx.store.clone(), fx.catalog.clone())
    }

    async fn seeded() -> Fixture {
        let fx = Fixture::new();
        fx.seed_cycle(600).await;
        for id in [7, 2, 9, 4] {
            fx.seed_entry(id, EntryStatus::Pending).await;
        }
        fx.seed_entry(5, EntryStatus::Learned).await;
        fx
    }

    fn ids(page: &CycleWordsPage) -> Vec<i64> {
        page.items.iter().map(|i| i.word_id.value()).collect()
    }

    #[tokio::test]
    async fn default_listing_is_word_id_ascending() {
        let fx = seeded().await;

        let page = handler(&fx)
            .handle(ListCycleWordsQuery::first_page(user()))
            .await
            .unwrap();

        assert_eq!(ids(&page), vec![2, 4, 5, 7, 9]);
        assert_eq!(page.total, 5);
        assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(page.items[0].word.as_ref().unwrap().word, "word02");
    }

    #[tokio::test]
    async fn filters_by_status_and_level() {
        let fx = seeded().await;
        let mut query = ListCycleWordsQuery::first_page(user());
        query.filters.status = Some(EntryStatus::Pending);
        query.filters.level = Some(VocabLevel::A1);

        let page = handler(&fx).handle(query).await.unwrap();

        assert_eq!(ids(&page), vec![2, 4]);
    }

    #[tokio::test]
    async fn filters_by_topic_case_insensitively() {
        let fx = seeded().await;
        let mut query = ListCycleWordsQuery::first_page(user());
        query.filters.topic = Some("TRAVEL".to_string());
        query.filters.part_of_speech = Some(PartOfSpeech::Noun);

        let page = handler(&fx).handle(query).await.unwrap();

        assert_eq!(ids(&page), vec![7, 9]);
    }

    #[tokio::test]
    async fn sorts_by_status_descending_with_word_id_tiebreak() {
        let fx = seeded().await;
        let mut query = ListCycleWordsQuery::first_page(user());
        query.sort_by = SortField::Status;
        query.order = SortOrder::Desc;

        let page = handler(&fx).handle(query).await.unwrap();

        assert_eq!(ids(&page), vec![5, 9, 7, 4, 2]);
    }

    #[tokio::test]
    async fn paginates_after_filtering() {
        let fx = seeded().await;
        let mut query = ListCycleWordsQuery::first_page(user());
        query.offset = 1;
        query.limit = Some(2);

        let page = handler(&fx).handle(query).await.unwrap();

        assert_eq!(ids(&page), vec![4, 5]);
        assert_eq!(page.total, 5);
    }

    #[tokio::test]
    async fn oversized_limit_is_rejected() {
        let fx = seeded().await;
        let mut query = ListCycleWordsQuery::first_page(user());
        query.limit = Some(MAX_PAGE_LIMIT + 1);

        let err = handler(&fx).handle(query).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::OutOfRange);
    }

    #[tokio::test]
    async fn no_cycle_is_not_found() {
        let fx = Fixture::new();

        let err = handler(&fx)
            .handle(ListCycleWordsQuery::first_page(user()))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::CycleNotFound);
    }

    #[test]
    fn unknown_sort_field_falls_back_to_word_id() {
        assert_eq!(SortField::parse_lenient("Topic"), SortField::Topic);
        assert_eq!(SortField::parse_lenient("drop table"), SortField::WordId);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
