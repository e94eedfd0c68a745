//! Learning-cycle behaviour settings

use serde::Deserialize;

use crate::domain::cycle::CyclePolicy;

use super::error::ValidationError;

/// Cycle configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CycleConfig {
    /// Length of a cycle created without a duration or end
    #[serde(default = "default_duration_days")]
    pub default_duration_days: u32,

    /// Keep learned words in the cycle instead of removing them
    #[serde(default = "default_true")]
    pub retain_learned_entries: bool,

    /// Keep entries when a cycle is ended and renewed
    #[serde(default = "default_true")]
    pub carry_pending_on_renew: bool,
}

impl CycleConfig {
    pub fn policy(&self) -> CyclePolicy {
        CyclePolicy::new(self.retain_learned_entries, self.carry_pending_on_renew)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=365).contains(&self.default_duration_days) {
            return Err(ValidationError::InvalidCycleDuration);
        }
        Ok(())
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            default_duration_days: default_duration_days(),
            retain_learned_entries: true,
            carry_pending_on_renew: true,
        }
    }
}

fn default_duration_days() -> u32 {
    7
}

fn default_true() -> bool {
    true
}
