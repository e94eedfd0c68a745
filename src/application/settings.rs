//! Engine settings resolved from configuration at startup.

use crate::domain::cycle::CyclePolicy;

/// Knobs the handlers need; built from `AppConfig` in `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Cycle length when the caller gives neither a duration nor an end.
    pub default_duration_days: u32,
    /// Entry retention on learn and on renewal.
    pub policy: CyclePolicy,
    /// Upper bound for a practice subset's `count`.
    pub max_question_count: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_duration_days: 7,
            policy: CyclePolicy::default(),
            max_question_count: 100,
        }
    }
}
