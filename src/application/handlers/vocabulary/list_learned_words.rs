//! ListLearnedWordsHandler - The learner's mastered words, newest first.
//!
//! Learned records are independent of any cycle, so no cycle is required.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::application::EngineError;
use crate::domain::foundation::{Timestamp, UserId, ValidationError, WordId};
use crate::domain::vocabulary::WordMetadata;
use crate::ports::{LearnedRecordStore, VocabularyCatalog};

use super::list_cycle_words::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Query for one page of learned words.
#[derive(Debug, Clone)]
pub struct ListLearnedWordsQuery {
    pub user_id: UserId,
    pub offset: usize,
    /// `None` means [`DEFAULT_PAGE_LIMIT`].
    pub limit: Option<usize>,
}

/// One learned word with its catalog data, if the catalog still has it.
#[derive(Debug, Clone, Serialize)]
pub struct LearnedWordView {
    pub word_id: WordId,
    pub learned_at: Timestamp,
    pub word: Option<WordMetadata>,
}

/// A page of learned words plus the learner's total.
#[derive(Debug, Clone, Serialize)]
pub struct LearnedWordsPage {
    pub items: Vec<LearnedWordView>,
    pub total: u64,
    pub offset: usize,
    pub limit: usize,
}

/// Handler for [`ListLearnedWordsQuery`].
pub struct ListLearnedWordsHandler {
    learned_store: Arc<dyn LearnedRecordStore>,
    catalog: Arc<dyn VocabularyCatalog>,
}

impl ListLearnedWordsHandler {
    pub fn new(
        learned_store: Arc<dyn LearnedRecordStore>,
        catalog: Arc<dyn VocabularyCatalog>,
    ) -> Self {
        Self {
            learned_store,
            catalog,
        }
    }

    pub async fn handle(&self, query: ListLearnedWordsQuery) -> Result<LearnedWordsPage, EngineError> {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(
                ValidationError::out_of_range("limit", 1, MAX_PAGE_LIMIT as i64, limit as i64).into(),
            );
        }

        let user_id = &query.user_id;
        let total = self.learned_store.count(user_id).await?;
        let records = self.learned_store.list(user_id, query.offset, limit).await?;

        let ids: Vec<WordId> = records.iter().map(|r| r.word_id).collect();
        let mut words: HashMap<WordId, WordMetadata> = self
            .catalog
            .lookup_many(&ids)
            .await?
            .into_iter()
            .map(|w| (w.word_id, w))
            .collect();

        let items: Vec<LearnedWordView> = records
            .into_iter()
            .map(|record| LearnedWordView {
                word_id: record.word_id,
                learned_at: record.learned_at,
                word: words.remove(&record.word_id),
            })
            .collect();

        tracing::debug!(
            user_id = %user_id,
            total,
            returned = items.len(),
            "Listed learned words"
        );

        Ok(LearnedWordsPage {
            items,
            total,
            offset: query.offset,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{start_time, user, word_id, Fixture};
    use crate::domain::vocabulary::LearnedRecord;
    use crate::ports::LearnedRecordStore;

    fn handler(fx: &Fixture) -> ListLearnedWordsHandler {
        ListLearnedWordsHandler::new(fx.learned.clone(), fx.catalog.clone())
    }

    fn query(offset: usize, limit: Option<usize>) -> ListLearnedWordsQuery {
        ListLearnedWordsQuery {
            user_id: user(),
            offset,
            limit,
        }
    }

    async fn learn_at(fx: &Fixture, id: i64, secs: i64) {
        fx.learned
            .upsert(&LearnedRecord::new(user(), word_id(id), start_time().plus_secs(secs)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn lists_newest_first_with_catalog_data() {
        let fx = Fixture::new();
        learn_at(&fx, 2, 10).await;
        learn_at(&fx, 7, 30).await;
        learn_at(&fx, 4, 20).await;

        let page = handler(&fx).handle(query(0, None)).await.unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);
        let ids: Vec<i64> = page.items.iter().map(|v| v.word_id.value()).collect();
        assert_eq!(ids, vec![7, 4, 2]);
        assert_eq!(page.items[0].word.as_ref().map(|w| w.topic.as_str()), Some("travel"));
    }

    #[tokio::test]
    async fn pages_and_keeps_uncatalogued_words() {
        let fx = Fixture::new();
        learn_at(&fx, 1, 10).await;
        learn_at(&fx, 99, 20).await;

        let page = handler(&fx).handle(query(0, Some(1))).await.unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].word_id.value(), 99);
        assert!(page.items[0].word.is_none());
    }

    #[tokio::test]
    async fn works_without_a_cycle_and_when_empty() {
        let fx = Fixture::new();

        let page = handler(&fx).handle(query(0, None)).await.unwrap();

        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn limit_out_of_range_is_rejected() {
        let fx = Fixture::new();

        let err = handler(&fx)
            .handle(query(0, Some(MAX_PAGE_LIMIT + 1)))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation(_)));
    }
}
