//! Shared "word became learned" step for status updates and practice results.

use crate::domain::cycle::{CycleVocabularyEntry, EntryStatus, LearnedDisposition};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::vocabulary::LearnedRecord;
use crate::ports::{EntryChange, LearnedChange};

/// What happened to the entry.
#[derive(Debug, Clone)]
pub(crate) enum LearnedEffect {
    /// Pending entry now marked learned.
    Marked(CycleVocabularyEntry),
    /// Entry was already learned; only the record timestamp moved.
    Refreshed(CycleVocabularyEntry),
    /// Entry deleted from the cycle.
    Removed,
}

/// Plans the learned transition for `entry` without writing anything.
///
/// The returned change goes to `CycleStore::apply_learned`, batched with
/// any others from the same command.
pub(crate) fn plan_learned(
    mut entry: CycleVocabularyEntry,
    disposition: LearnedDisposition,
    now: Timestamp,
) -> Result<(LearnedChange, LearnedEffect), DomainError> {
    let record = LearnedRecord::new(entry.user_id().clone(), entry.word_id(), now);

    let (change, effect) = match disposition {
        LearnedDisposition::Remove => (EntryChange::Delete, LearnedEffect::Removed),
        LearnedDisposition::MarkLearned if entry.status() == EntryStatus::Learned => {
            (EntryChange::Keep, LearnedEffect::Refreshed(entry))
        }
        LearnedDisposition::MarkLearned => {
            entry.transition(EntryStatus::Learned, now)?;
            (EntryChange::Update(entry.clone()), LearnedEffect::Marked(entry))
        }
    };

    Ok((LearnedChange { record, entry: change }, effect))
}
