//! Practice outcomes and batch scoring.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Percentage, WordId};

/// One submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeOutcome {
    pub word_id: WordId,
    pub is_correct: bool,
}

impl PracticeOutcome {
    pub fn new(word_id: WordId, is_correct: bool) -> Self {
        Self { word_id, is_correct }
    }
}

/// How a single outcome was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeResolution {
    /// Correct answer on a cycle entry.
    Learned,
    /// Incorrect answer on a cycle entry; nothing changes.
    StillPending,
    /// The word is not in the cycle.
    Skipped,
}

impl OutcomeResolution {
    /// Resolves an outcome given whether its word has an entry in the cycle.
    pub fn resolve(outcome: &PracticeOutcome, has_entry: bool) -> Self {
        match (has_entry, outcome.is_correct) {
            (false, _) => OutcomeResolution::Skipped,
            (true, true) => OutcomeResolution::Learned,
            (true, false) => OutcomeResolution::StillPending,
        }
    }
}

/// Aggregate result of one batch submission.
///
/// `learned_words + pending_words + skipped_words == total_words`, and
/// `score = round(100 * learned_words / total_words)`, zero for an empty batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSummary {
    pub total_words: u64,
    pub learned_words: u64,
    pub pending_words: u64,
    pub skipped_words: u64,
    pub score: Percentage,
}

impl PracticeSummary {
    pub fn tally(resolutions: impl IntoIterator<Item = OutcomeResolution>) -> Self {
        let mut summary = Self::default();
        for resolution in resolutions {
            summary.total_words += 1;
            match resolution {
                OutcomeResolution::Learned => summary.learned_words += 1,
                OutcomeResolution::StillPending => summary.pending_words += 1,
                OutcomeResolution::Skipped => summary.skipped_words += 1,
            }
        }
        summary.score = Percentage::rounded_ratio(summary.learned_words, summary.total_words);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn outcome(correct: bool) -> PracticeOutcome {
        PracticeOutcome::new(WordId::new(1).unwrap(), correct)
    }

    #[test]
    fn unknown_word_is_skipped_regardless_of_answer() {
        assert_eq!(OutcomeResolution::resolve(&outcome(true), false), OutcomeResolution::Skipped);
        assert_eq!(OutcomeResolution::resolve(&outcome(false), false), OutcomeResolution::Skipped);
    }

    #[test]
    fn known_word_follows_correctness() {
        assert_eq!(OutcomeResolution::resolve(&outcome(true), true), OutcomeResolution::Learned);
        assert_eq!(
            OutcomeResolution::resolve(&outcome(false), true),
            OutcomeResolution::StillPending
        );
    }

    #[test]
    fn empty_batch_scores_zero() {
        let summary = PracticeSummary::tally(Vec::new());
        assert_eq!(summary.total_words, 0);
        assert_eq!(summary.score, Percentage::ZERO);
    }

    #[test]
    fn two_of_three_rounds_to_sixty_seven() {
        use OutcomeResolution::*;
        let summary = PracticeSummary::tally(vec![Learned, Learned, StillPending]);
        assert_eq!(summary.learned_words, 2);
        assert_eq!(summary.pending_words, 1);
        assert_eq!(summary.score.value(), 67);
    }

    #[test]
    fn skipped_outcomes_count_toward_total() {
        use OutcomeResolution::*;
        let summary = PracticeSummary::tally(vec![Learned, Skipped]);
        assert_eq!(summary.total_words, 2);
        assert_eq!(summary.skipped_words, 1);
        assert_eq!(summary.score.value(), 50);
    }

    fn resolution() -> impl Strategy<Value = OutcomeResolution> {
        prop_oneof![
            Just(OutcomeResolution::Learned),
            Just(OutcomeResolution::StillPending),
            Just(OutcomeResolution::Skipped),
        ]
    }

    proptest! {
        #[test]
        fn counts_add_up_and_score_matches_formula(batch in prop::collection::vec(resolution(), 0..60)) {
            let summary = PracticeSummary::tally(batch.clone());

            prop_assert_eq!(summary.total_words, batch.len() as u64);
            prop_assert_eq!(
                summary.learned_words + summary.pending_words + summary.skipped_words,
                summary.total_words
            );
            let expected = if batch.is_empty() {
                0
            } else {
                ((100.0 * summary.learned_words as f64) / summary.total_words as f64 + 0.5).floor() as u8
            };
            prop_assert_eq!(summary.score.value(), expected);
        }
    }
}
