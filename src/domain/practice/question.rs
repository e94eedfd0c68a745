//! Multiple-choice practice questions.

use serde::{Deserialize, Serialize};

use crate::domain::cycle::EntryStatus;
use crate::domain::foundation::WordId;

/// Number of incorrect choices per question.
pub const DISTRACTOR_COUNT: usize = 3;

/// Total choices per question (distractors plus the correct definition).
pub const CHOICE_COUNT: usize = DISTRACTOR_COUNT + 1;

/// One generated question; ephemeral and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeQuestion {
    pub word_id: WordId,
    /// The word being practiced.
    pub prompt: String,
    /// Entry status at generation time.
    pub status: EntryStatus,
    pub choices: Vec<String>,
    pub correct_index: usize,
}

impl PracticeQuestion {
    pub fn correct_choice(&self) -> Option<&str> {
        self.choices.get(self.correct_index).map(String::as_str)
    }
}
