//! Learning-cycle domain events.
//!
//! Emitted after every committed state change and consumed by the audit
//! sink. The learner's id is the aggregate id, since a learner has exactly
//! one cycle at a time.
//!
//! - `CycleStarted` - Cycle created or its window replaced
//! - `CycleRenewed` - Cycle ended and a successor opened
//! - `WordAssigned` / `WordUnassigned` - Entry added or removed
//! - `WordStatusChanged` - Entry moved between pending and learned
//! - `PracticeSubmitted` - Batch of practice outcomes applied

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, CycleId, EventId, Percentage, Timestamp, UserId, WordId};

use super::EntryStatus;

// ════════════════════════════════════════════════════════════════════════════
// CycleStarted
// ════════════════════════════════════════════════════════════════════════════

/// Published when a cycle is created, or an existing one is overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleStarted {
    pub event_id: EventId,
    pub user_id: UserId,
    pub cycle_id: CycleId,
    pub started_at: Timestamp,
    pub ends_at: Timestamp,
    /// True when an existing cycle's window was replaced in place.
    pub replaced: bool,
    pub occurred_at: Timestamp,
}

domain_event!(
    CycleStarted,
    event_type = "cycle.started.v1",
    aggregate_id = user_id,
    aggregate_type = "LearningCycle",
    occurred_at = occurred_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// CycleRenewed
// ════════════════════════════════════════════════════════════════════════════

/// Published when the current cycle is ended and replaced by a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRenewed {
    pub event_id: EventId,
    pub user_id: UserId,
    pub previous_cycle_id: CycleId,
    pub cycle_id: CycleId,
    pub ends_at: Timestamp,
    /// Pending entries at the moment of renewal.
    pub carried_pending: u64,
    /// Whether the old entries were dropped instead of carried over.
    pub entries_discarded: bool,
    pub occurred_at: Timestamp,
}

domain_event!(
    CycleRenewed,
    event_type = "cycle.renewed.v1",
    aggregate_id = user_id,
    aggregate_type = "LearningCycle",
    occurred_at = occurred_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// WordAssigned
// ════════════════════════════════════════════════════════════════════════════

/// Published when a word is added to the cycle as pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordAssigned {
    pub event_id: EventId,
    pub user_id: UserId,
    pub cycle_id: CycleId,
    pub word_id: WordId,
    pub occurred_at: Timestamp,
}

domain_event!(
    WordAssigned,
    event_type = "cycle.word_assigned.v1",
    aggregate_id = user_id,
    aggregate_type = "LearningCycle",
    occurred_at = occurred_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// WordUnassigned
// ════════════════════════════════════════════════════════════════════════════

/// Published when a word is explicitly removed from the cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordUnassigned {
    pub event_id: EventId,
    pub user_id: UserId,
    pub word_id: WordId,
    pub previous_status: EntryStatus,
    pub occurred_at: Timestamp,
}

domain_event!(
    WordUnassigned,
    event_type = "cycle.word_unassigned.v1",
    aggregate_id = user_id,
    aggregate_type = "LearningCycle",
    occurred_at = occurred_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// WordStatusChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published when an entry's status is set directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordStatusChanged {
    pub event_id: EventId,
    pub user_id: UserId,
    pub word_id: WordId,
    pub from: EntryStatus,
    pub to: EntryStatus,
    /// The entry left the cycle because learned words are not retained.
    pub entry_removed: bool,
    pub occurred_at: Timestamp,
}

domain_event!(
    WordStatusChanged,
    event_type = "cycle.word_status_changed.v1",
    aggregate_id = user_id,
    aggregate_type = "LearningCycle",
    occurred_at = occurred_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// PracticeSubmitted
// ════════════════════════════════════════════════════════════════════════════

/// Published after a batch of practice outcomes is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeSubmitted {
    pub event_id: EventId,
    pub user_id: UserId,
    pub cycle_id: CycleId,
    pub total_words: u64,
    pub learned_words: u64,
    pub pending_words: u64,
    pub skipped_words: u64,
    pub score: Percentage,
    pub occurred_at: Timestamp,
}

domain_event!(
    PracticeSubmitted,
    event_type = "cycle.practice_submitted.v1",
    aggregate_id = user_id,
    aggregate_type = "LearningCycle",
    occurred_at = occurred_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainEvent, SerializableDomainEvent};

    #[test]
    fn word_assigned_envelope_is_keyed_by_learner() {
        let event = WordAssigned {
            event_id: EventId::new(),
            user_id: UserId::new("learner-9").unwrap(),
            cycle_id: CycleId::new(),
            word_id: WordId::new(4).unwrap(),
            occurred_at: Timestamp::now(),
        };

        let envelope = event.to_envelope().unwrap();

        assert_eq!(envelope.aggregate_id, "learner-9");
        assert_eq!(envelope.aggregate_type, "LearningCycle");
        assert_eq!(envelope.event_type, event.event_type());
        assert_eq!(envelope.payload["word_id"], 4);
    }
}
