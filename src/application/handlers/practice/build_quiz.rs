//! BuildQuizHandler - Generate a multiple-choice practice set.
//!
//! Every question draws three distractors from the whole catalog's
//! definitions. Without a `count` every entry is quizzed; with one, pending
//! entries are preferred and learned ones pad the set.

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::EngineError;
use crate::domain::cycle::CycleVocabularyEntry;
use crate::domain::foundation::{DomainError, ErrorCode, UserId, ValidationError, WordId};
use crate::domain::practice::{PracticeQuestion, QuizBuilder, QuizItem};
use crate::ports::{CycleStore, RandomSource, VocabularyCatalog};

/// Query for a practice set.
#[derive(Debug, Clone)]
pub struct BuildQuizQuery {
    pub user_id: UserId,
    pub count: Option<usize>,
}

/// Handler for [`BuildQuizQuery`].
pub struct BuildQuizHandler {
    cycle_store: Arc<dyn CycleStore>,
    catalog: Arc<dyn VocabularyCatalog>,
    random: Arc<dyn RandomSource>,
    max_question_count: usize,
}

impl BuildQuizHandler {
    pub fn new(
        cycle_store: Arc<dyn CycleStore>,
        catalog: Arc<dyn VocabularyCatalog>,
        random: Arc<dyn RandomSource>,
        max_question_count: usize,
    ) -> Self {
        Self {
            cycle_store,
            catalog,
            random,
            max_question_count,
        }
    }

    pub async fn handle(&self, query: BuildQuizQuery) -> Result<Vec<PracticeQuestion>, EngineError> {
        if let Some(count) = query.count {
            if !(1..=self.max_question_count).contains(&count) {
                return Err(ValidationError::out_of_range(
                    "count",
                    1,
                    self.max_question_count as i64,
                    count as i64,
                )
                .into());
            }
        }

        let user_id = &query.user_id;
        self.cycle_store
            .find_cycle(user_id)
            .await?
            .ok_or_else(EngineError::cycle_not_found)?;

        let entries = self.cycle_store.list_entries(user_id).await?;
        let items = self.join_catalog(entries).await?;
        if items.is_empty() {
            return Err(DomainError::new(
                ErrorCode::EmptyCycle,
                "The cycle has no words to practice",
            )
            .into());
        }

        let mut rng = self.random.rng();
        let selected = QuizBuilder::select_items(&mut rng, items, query.count);

        let builder = QuizBuilder::new(self.catalog.all_definitions().await?);
        let questions = builder.build(&mut rng, selected);

        tracing::debug!(
            user_id = %user_id,
            requested = ?query.count,
            questions = questions.len(),
            "Built practice set"
        );
        Ok(questions)
    }

    async fn join_catalog(
        &self,
        entries: Vec<CycleVocabularyEntry>,
    ) -> Result<Vec<QuizItem>, DomainError> {
        let ids: Vec<WordId> = entries.iter().map(|e| e.word_id()).collect();
        let mut words: HashMap<WordId, _> = self
            .catalog
            .lookup_many(&ids)
            .await?
            .into_iter()
            .map(|w| (w.word_id, w))
            .collect();

        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            match words.remove(&entry.word_id()) {
                Some(word) => items.push(QuizItem {
                    word,
                    status: entry.status(),
                }),
                None => tracing::warn!(
                    word_id = %entry.word_id(),
                    "Cycle entry has no catalog word; left out of practice set"
                ),
            }
        }
        Ok(items)
    }
}
