//! Cycle vocabulary entries and their pending/learned state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    DomainError, StateMachine, Timestamp, UserId, ValidationError, WordId,
};

/// Status of a word assigned to a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Assigned and still being practiced.
    Pending,
    /// Confirmed learned, kept in the cycle under the retain policy.
    Learned,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Learned => "learned",
        }
    }
}

impl StateMachine for EntryStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use EntryStatus::*;
        // learned -> pending only happens through an explicit status update
        matches!((self, target), (Pending, Learned) | (Learned, Pending))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            EntryStatus::Pending => vec![EntryStatus::Learned],
            EntryStatus::Learned => vec![EntryStatus::Pending],
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(EntryStatus::Pending),
            "learned" => Ok(EntryStatus::Learned),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("expected 'pending' or 'learned', got '{}'", other),
            )),
        }
    }
}

/// A word assigned to a learner's cycle, keyed by (user, word).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleVocabularyEntry {
    user_id: UserId,
    word_id: WordId,
    status: EntryStatus,
    added_at: Timestamp,
    updated_at: Timestamp,
}

impl CycleVocabularyEntry {
    /// Creates a freshly assigned, pending entry.
    pub fn pending(user_id: UserId, word_id: WordId, now: Timestamp) -> Self {
        Self {
            user_id,
            word_id,
            status: EntryStatus::Pending,
            added_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes an entry from persisted data.
    pub fn reconstitute(
        user_id: UserId,
        word_id: WordId,
        status: EntryStatus,
        added_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            user_id,
            word_id,
            status,
            added_at,
            updated_at,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn word_id(&self) -> WordId {
        self.word_id
    }

    pub fn status(&self) -> EntryStatus {
        self.status
    }

    pub fn added_at(&self) -> Timestamp {
        self.added_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }

    /// Moves the entry to `target`, validating the transition.
    pub fn transition(&mut self, target: EntryStatus, now: Timestamp) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn entry() -> CycleVocabularyEntry {
        CycleVocabularyEntry::pending(
            UserId::new("learner").unwrap(),
            WordId::new(3).unwrap(),
            Timestamp::from_unix_secs(1_000).unwrap(),
        )
    }

    #[test]
    fn new_entries_are_pending() {
        let entry = entry();
        assert!(entry.is_pending());
        assert_eq!(entry.added_at(), entry.updated_at());
    }

    #[test]
    fn pending_can_become_learned_and_back() {
        assert!(EntryStatus::Pending.can_transition_to(&EntryStatus::Learned));
        assert!(EntryStatus::Learned.can_transition_to(&EntryStatus::Pending));
        assert!(!EntryStatus::Pending.is_terminal());
    }

    #[test]
    fn same_state_transition_is_rejected() {
        let err = EntryStatus::Pending
            .transition_to(EntryStatus::Pending)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn transition_updates_timestamp() {
        let mut entry = entry();
        let later = Timestamp::from_unix_secs(2_000).unwrap();
        entry.transition(EntryStatus::Learned, later).unwrap();

        assert_eq!(entry.status(), EntryStatus::Learned);
        assert_eq!(entry.updated_at(), later);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Learned".parse::<EntryStatus>().unwrap(), EntryStatus::Learned);
        assert_eq!(" pending ".parse::<EntryStatus>().unwrap(), EntryStatus::Pending);
        assert!("mastered".parse::<EntryStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&EntryStatus::Learned).unwrap();
        assert_eq!(json, "\"learned\"");
    }
}
