//! Practice-set settings

use serde::Deserialize;

use super::error::ValidationError;

/// Practice configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeConfig {
    /// Largest `count` a practice-set request may ask for
    #[serde(default = "default_max_question_count")]
    pub max_question_count: usize,
}

impl PracticeConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=1000).contains(&self.max_question_count) {
            return Err(ValidationError::InvalidQuestionCount);
        }
        Ok(())
    }
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            max_question_count: default_max_question_count(),
        }
    }
}

fn default_max_question_count() -> usize {
    100
}
