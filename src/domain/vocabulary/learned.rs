//! Per-learner record of a confirmed learned word.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId, WordId};

/// Independent of any cycle; `learned_at` is the most recent confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedRecord {
    pub user_id: UserId,
    pub word_id: WordId,
    pub learned_at: Timestamp,
}

impl LearnedRecord {
    pub fn new(user_id: UserId, word_id: WordId, learned_at: Timestamp) -> Self {
        Self {
            user_id,
            word_id,
            learned_at,
        }
    }
}
