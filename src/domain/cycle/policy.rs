//! Entry retention policy, resolved once from configuration.

use serde::{Deserialize, Serialize};

/// Decides what happens to entries when they are learned and when the
/// cycle is renewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePolicy {
    /// Keep learned words in the cycle as `learned` instead of removing them.
    pub retain_learned_entries: bool,
    /// Keep the cycle's entries when it is ended and renewed.
    pub carry_pending_on_renew: bool,
}

impl CyclePolicy {
    pub fn new(retain_learned_entries: bool, carry_pending_on_renew: bool) -> Self {
        Self {
            retain_learned_entries,
            carry_pending_on_renew,
        }
    }

    /// What to do with an entry that just became learned.
    pub fn learned_disposition(&self) -> LearnedDisposition {
        if self.retain_learned_entries {
            LearnedDisposition::MarkLearned
        } else {
            LearnedDisposition::Remove
        }
    }
}

impl Default for CyclePolicy {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Effect of a learned transition on the cycle entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearnedDisposition {
    /// The entry stays with `status = learned`.
    MarkLearned,
    /// The entry is deleted from the cycle.
    Remove,
}
