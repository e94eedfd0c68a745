//! Quiz generation: entry selection, distractor drawing and shuffling.
//!
//! Pure functions over an injected `Rng` so callers can seed them.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::cycle::EntryStatus;
use crate::domain::vocabulary::WordMetadata;

use super::{PracticeQuestion, DISTRACTOR_COUNT};

/// A cycle word paired with its catalog data, ready to become a question.
#[derive(Debug, Clone)]
pub struct QuizItem {
    pub word: WordMetadata,
    pub status: EntryStatus,
}

impl QuizItem {
    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }
}

/// Builds questions against a fixed pool of catalog definitions.
#[derive(Debug, Clone)]
pub struct QuizBuilder {
    pool: Vec<String>,
}

impl QuizBuilder {
    /// Creates a builder over the catalog's definitions; duplicates are
    /// collapsed so no question shows the same text twice.
    pub fn new(definitions: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let pool = definitions
            .into_iter()
            .filter(|d| seen.insert(d.clone()))
            .collect();
        Self { pool }
    }

    /// Picks the items to quiz.
    ///
    /// `None` takes every item. `Some(n)` takes up to `n` random pending
    /// items and pads with random learned ones.
    pub fn select_items<R: Rng + ?Sized>(
        rng: &mut R,
        items: Vec<QuizItem>,
        count: Option<usize>,
    ) -> Vec<QuizItem> {
        let Some(count) = count else {
            return items;
        };

        let (mut pending, mut learned): (Vec<_>, Vec<_>) =
            items.into_iter().partition(QuizItem::is_pending);

        pending.shuffle(rng);
        pending.truncate(count);

        let remaining = count - pending.len();
        if remaining > 0 {
            learned.shuffle(rng);
            pending.extend(learned.into_iter().take(remaining));
        }
        pending
    }

    /// Builds one question per item, then shuffles question order.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R, items: Vec<QuizItem>) -> Vec<PracticeQuestion> {
        let mut questions: Vec<PracticeQuestion> = items
            .into_iter()
            .map(|item| self.question(rng, item))
            .collect();
        questions.shuffle(rng);
        questions
    }

    /// Builds a single question with three distractors.
    pub fn question<R: Rng + ?Sized>(&self, rng: &mut R, item: QuizItem) -> PracticeQuestion {
        let correct = item.word.definition;

        let mut distractors: Vec<String> = self
            .pool
            .iter()
            .filter(|d| **d != correct)
            .cloned()
            .collect();
        distractors.shuffle(rng);
        distractors.truncate(DISTRACTOR_COUNT);

        // Catalog too small: pad with placeholders that cannot collide.
        let mut filler = 1;
        while distractors.len() < DISTRACTOR_COUNT {
            let candidate = format!("No matching definition ({})", filler);
            filler += 1;
            if candidate != correct && !distractors.contains(&candidate) {
                distractors.push(candidate);
            }
        }

        let mut choices: Vec<(String, bool)> = distractors
            .into_iter()
            .map(|d| (d, false))
            .chain(std::iter::once((correct, true)))
            .collect();
        choices.shuffle(rng);

        let correct_index = choices
            .iter()
            .position(|(_, is_correct)| *is_correct)
            .unwrap_or_default();

        PracticeQuestion {
            word_id: item.word.word_id,
            prompt: item.word.word,
            status: item.status,
            choices: choices.into_iter().map(|(text, _)| text).collect(),
            correct_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::WordId;
    use crate::domain::practice::CHOICE_COUNT;
    use crate::domain::vocabulary::{PartOfSpeech, VocabLevel};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn word(id: i64, definition: &str) -> WordMetadata {
        WordMetadata {
            word_id: WordId::new(id).unwrap(),
            word: format!("word-{}", id),
            definition: definition.to_string(),
            example: None,
            level: VocabLevel::A1,
            topic: "general".to_string(),
            pronunciation: None,
            part_of_speech: PartOfSpeech::Noun,
        }
    }

    fn item(id: i64, definition: &str) -> QuizItem {
        QuizItem {
            word: word(id, definition),
            status: EntryStatus::Pending,
        }
    }

    fn entry(id: i64, status: EntryStatus) -> QuizItem {
        QuizItem {
            word: word(id, &format!("definition {}", id)),
            status,
        }
    }

    fn pool(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("definition {}", i)).collect()
    }

    #[test]
    fn question_has_four_distinct_choices() {
        let builder = QuizBuilder::new(pool(10));
        let mut rng = StdRng::seed_from_u64(7);

        let q = builder.question(&mut rng, item(1, "definition 3"));

        assert_eq!(q.choices.len(), CHOICE_COUNT);
        let unique: HashSet<_> = q.choices.iter().collect();
        assert_eq!(unique.len(), CHOICE_COUNT);
        assert_eq!(q.correct_choice(), Some("definition 3"));
        assert_eq!(q.prompt, "word-1");
    }

    #[test]
    fn small_catalog_is_padded_with_placeholders() {
        let builder = QuizBuilder::new(vec!["only".to_string(), "other".to_string()]);
        let mut rng = StdRng::seed_from_u64(1);

        let q = builder.question(&mut rng, item(1, "only"));

        assert_eq!(q.choices.len(), CHOICE_COUNT);
        assert!(q.choices.contains(&"other".to_string()));
        let placeholders = q
            .choices
            .iter()
            .filter(|c| c.starts_with("No matching definition"))
            .count();
        assert_eq!(placeholders, 2);
        assert_eq!(q.correct_choice(), Some("only"));
    }

    #[test]
    fn duplicate_definitions_in_pool_never_repeat_in_choices() {
        let definitions = vec!["same".to_string(); 5];
        let builder = QuizBuilder::new(definitions);
        let mut rng = StdRng::seed_from_u64(3);

        let q = builder.question(&mut rng, item(1, "right"));

        let unique: HashSet<_> = q.choices.iter().collect();
        assert_eq!(unique.len(), CHOICE_COUNT);
    }

    #[test]
    fn build_returns_one_question_per_item() {
        let builder = QuizBuilder::new(pool(6));
        let mut rng = StdRng::seed_from_u64(11);

        let items = vec![item(1, "definition 0"), item(2, "definition 1"), item(3, "definition 2")];
        let questions = builder.build(&mut rng, items);

        let mut ids: Vec<i64> = questions.iter().map(|q| q.word_id.value()).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let builder = QuizBuilder::new(pool(20));
        let a = builder.build(&mut StdRng::seed_from_u64(5), vec![item(1, "definition 1")]);
        let b = builder.build(&mut StdRng::seed_from_u64(5), vec![item(1, "definition 1")]);
        assert_eq!(a, b);
    }

    #[test]
    fn select_without_count_takes_everything() {
        let mut rng = StdRng::seed_from_u64(0);
        let entries = vec![entry(1, EntryStatus::Pending), entry(2, EntryStatus::Learned)];
        assert_eq!(QuizBuilder::select_items(&mut rng, entries, None).len(), 2);
    }

    #[test]
    fn select_prioritizes_pending_entries() {
        let mut rng = StdRng::seed_from_u64(0);
        let entries = vec![
            entry(1, EntryStatus::Learned),
            entry(2, EntryStatus::Pending),
            entry(3, EntryStatus::Learned),
            entry(4, EntryStatus::Pending),
        ];

        let picked = QuizBuilder::select_items(&mut rng, entries, Some(2));

        assert_eq!(picked.len(), 2);
        assert!(picked.iter().all(|e| e.is_pending()));
    }

    #[test]
    fn select_pads_with_learned_entries() {
        let mut rng = StdRng::seed_from_u64(0);
        let entries = vec![
            entry(1, EntryStatus::Learned),
            entry(2, EntryStatus::Pending),
            entry(3, EntryStatus::Learned),
        ];

        let picked = QuizBuilder::select_items(&mut rng, entries, Some(2));

        assert_eq!(picked.len(), 2);
        assert!(picked[0].is_pending());
        assert_eq!(picked[1].status, EntryStatus::Learned);
    }

    #[test]
    fn select_with_count_above_size_returns_all() {
        let mut rng = StdRng::seed_from_u64(0);
        let entries = vec![entry(1, EntryStatus::Pending), entry(2, EntryStatus::Learned)];
        assert_eq!(QuizBuilder::select_items(&mut rng, entries, Some(10)).len(), 2);
    }

    proptest! {
        #[test]
        fn correct_index_always_points_at_definition(
            pool_size in 0usize..12,
            correct in 0usize..12,
            seed in any::<u64>(),
        ) {
            let builder = QuizBuilder::new(pool(pool_size));
            let mut rng = StdRng::seed_from_u64(seed);
            let definition = format!("definition {}", correct);

            let q = builder.question(&mut rng, item(1, &definition));

            prop_assert_eq!(q.choices.len(), CHOICE_COUNT);
            prop_assert_eq!(q.correct_choice(), Some(definition.as_str()));
            prop_assert_eq!(q.choices.iter().filter(|c| **c == definition).count(), 1);
            let unique: HashSet<_> = q.choices.iter().collect();
            prop_assert_eq!(unique.len(), CHOICE_COUNT);
        }
    }
}
