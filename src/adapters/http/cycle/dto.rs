//! Data Transfer Objects for the learning cycle HTTP API.
//!
//! Request bodies are deserialized into these types and converted into
//! application commands; handler results are mapped into the response types.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::application::handlers::{
    CreateCycleResult, CycleStatistics, CycleWordView, CycleWordsPage, EndAndRenewCycleResult,
    LearnedWordView, LearnedWordsPage,
};
use crate::domain::cycle::{CycleVocabularyEntry, LearningCycle, TimeRemaining};
use crate::domain::practice::{PracticeQuestion, PracticeSummary};
use crate::domain::vocabulary::WordMetadata;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Duration components; every field defaults to zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct DurationDto {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Request body for creating (or renewing) a cycle.
///
/// Exactly one of `duration` and `end_datetime` may be given; neither means
/// the configured default length.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CycleWindowRequest {
    #[serde(default)]
    pub duration: Option<DurationDto>,
    /// RFC 3339 timestamp, e.g. `2024-06-01T12:00:00Z`.
    #[serde(default)]
    pub end_datetime: Option<String>,
}

/// Request body for quick-create.
pub type QuickCreateRequest = DurationDto;

/// Request body for assigning a catalog word.
#[derive(Debug, Clone, Deserialize)]
pub struct AddWordRequest {
    pub word_id: i64,
}

/// Request body for changing an entry's status.
#[derive(Debug, Clone, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// Query parameters for listing cycle words.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListWordsParams {
    pub status: Option<String>,
    pub level: Option<String>,
    pub topic: Option<String>,
    pub part_of_speech: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

/// Query parameters for listing learned words.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LearnedWordsParams {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

/// Query parameters for a practice set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PracticeSetParams {
    pub count: Option<usize>,
}

/// One answered question.
#[derive(Debug, Clone, Deserialize)]
pub struct WordResultDto {
    pub word_id: i64,
    pub is_correct: bool,
}

/// Request body for submitting practice results.
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeResultsRequest {
    pub word_results: Vec<WordResultDto>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A learner's cycle window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleResponse {
    pub id: String,
    pub user_id: String,
    pub started_at: String,
    pub ends_at: String,
}

impl From<&LearningCycle> for CycleResponse {
    fn from(cycle: &LearningCycle) -> Self {
        Self {
            id: cycle.id().to_string(),
            user_id: cycle.user_id().to_string(),
            started_at: cycle.started_at().to_rfc3339(),
            ends_at: cycle.ends_at().to_rfc3339(),
        }
    }
}

/// Response to create and quick-create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCycleResponse {
    pub cycle: CycleResponse,
    pub replaced: bool,
}

impl From<&CreateCycleResult> for CreateCycleResponse {
    fn from(result: &CreateCycleResult) -> Self {
        Self {
            cycle: CycleResponse::from(&result.cycle),
            replaced: result.replaced,
        }
    }
}

/// Response to end-and-renew.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewCycleResponse {
    pub cycle: CycleResponse,
    pub previous_cycle_id: String,
    pub carried_pending_count: u64,
    pub entries_discarded: bool,
}

impl From<&EndAndRenewCycleResult> for RenewCycleResponse {
    fn from(result: &EndAndRenewCycleResult) -> Self {
        Self {
            cycle: CycleResponse::from(&result.cycle),
            previous_cycle_id: result.previous_cycle_id.to_string(),
            carried_pending_count: result.carried_pending_count,
            entries_discarded: result.entries_discarded,
        }
    }
}

/// Remaining time split into components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemainingDto {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_seconds: i64,
}

/// Status, remaining time and progress of the learner's cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRemainingResponse {
    /// `active` or `expired`.
    pub status: String,
    pub ends_at: String,
    pub remaining: RemainingDto,
    pub progress_percentage: u8,
}

impl From<&TimeRemaining> for TimeRemainingResponse {
    fn from(t: &TimeRemaining) -> Self {
        Self {
            status: if t.is_expired() { "expired" } else { "active" }.to_string(),
            ends_at: t.ends_at.to_rfc3339(),
            remaining: RemainingDto {
                days: t.remaining.days,
                hours: t.remaining.hours,
                minutes: t.remaining.minutes,
                seconds: t.remaining.seconds,
                total_seconds: t.remaining.total_seconds,
            },
            progress_percentage: t.progress.value(),
        }
    }
}

/// Counts for the learner's cycle and learning history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub total_entries: u64,
    pub pending_entries: u64,
    pub learned_entries: u64,
    pub learned_total: u64,
    pub catalog_total: u64,
    pub remaining_total: u64,
    pub level_distribution: BTreeMap<String, u64>,
    pub topic_distribution: BTreeMap<String, u64>,
    pub time_remaining: TimeRemainingResponse,
}

impl From<&CycleStatistics> for StatisticsResponse {
    fn from(s: &CycleStatistics) -> Self {
        Self {
            total_entries: s.total_entries,
            pending_entries: s.pending_entries,
            learned_entries: s.learned_entries,
            learned_total: s.learned_total,
            catalog_total: s.catalog_total,
            remaining_total: s.remaining_total,
            level_distribution: s.level_distribution.clone(),
            topic_distribution: s.topic_distribution.clone(),
            time_remaining: TimeRemainingResponse::from(&s.time_remaining),
        }
    }
}

/// Catalog metadata of a word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordResponse {
    pub word: String,
    pub definition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    pub level: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    pub part_of_speech: String,
}

impl From<&WordMetadata> for WordResponse {
    fn from(w: &WordMetadata) -> Self {
        Self {
            word: w.word.clone(),
            definition: w.definition.clone(),
            example: w.example.clone(),
            level: w.level.to_string(),
            topic: w.topic.clone(),
            pronunciation: w.pronunciation.clone(),
            part_of_speech: w.part_of_speech.to_string(),
        }
    }
}

/// A cycle entry, with catalog metadata when it is available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResponse {
    pub word_id: i64,
    pub status: String,
    pub added_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<WordResponse>,
}

impl EntryResponse {
    pub fn from_entry(entry: &CycleVocabularyEntry, word: Option<&WordMetadata>) -> Self {
        Self {
            word_id: entry.word_id().value(),
            status: entry.status().to_string(),
            added_at: entry.added_at().to_rfc3339(),
            word: word.map(WordResponse::from),
        }
    }
}

impl From<&CycleWordView> for EntryResponse {
    fn from(view: &CycleWordView) -> Self {
        Self {
            word_id: view.word_id.value(),
            status: view.status.to_string(),
            added_at: view.added_at.clone(),
            word: view.word.as_ref().map(WordResponse::from),
        }
    }
}

/// A page of cycle words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordListResponse {
    pub items: Vec<EntryResponse>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

impl From<&CycleWordsPage> for WordListResponse {
    fn from(page: &CycleWordsPage) -> Self {
        Self {
            items: page.items.iter().map(EntryResponse::from).collect(),
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        }
    }
}

/// A learned word and when it was learned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedWordResponse {
    pub word_id: i64,
    pub learned_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<WordResponse>,
}

impl From<&LearnedWordView> for LearnedWordResponse {
    fn from(view: &LearnedWordView) -> Self {
        Self {
            word_id: view.word_id.value(),
            learned_at: view.learned_at.to_rfc3339(),
            word: view.word.as_ref().map(WordResponse::from),
        }
    }
}

/// A page of learned words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedWordListResponse {
    pub items: Vec<LearnedWordResponse>,
    pub total: u64,
    pub offset: usize,
    pub limit: usize,
}

impl From<&LearnedWordsPage> for LearnedWordListResponse {
    fn from(page: &LearnedWordsPage) -> Self {
        Self {
            items: page.items.iter().map(LearnedWordResponse::from).collect(),
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        }
    }
}

/// Result of a status change; `status` is absent when the entry was removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStatusResponse {
    pub word_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub removed: bool,
}

/// Generic confirmation for commands without a richer result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub message: String,
}

/// One multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeQuestionResponse {
    pub word_id: i64,
    pub word: String,
    pub status: String,
    pub choices: Vec<String>,
    pub correct_answer_index: usize,
}

impl From<&PracticeQuestion> for PracticeQuestionResponse {
    fn from(q: &PracticeQuestion) -> Self {
        Self {
            word_id: q.word_id.value(),
            word: q.prompt.clone(),
            status: q.status.to_string(),
            choices: q.choices.clone(),
            correct_answer_index: q.correct_index,
        }
    }
}

/// A generated practice set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeSetResponse {
    pub questions: Vec<PracticeQuestionResponse>,
    pub total: usize,
}

impl From<&[PracticeQuestion]> for PracticeSetResponse {
    fn from(questions: &[PracticeQuestion]) -> Self {
        Self {
            questions: questions.iter().map(PracticeQuestionResponse::from).collect(),
            total: questions.len(),
        }
    }
}

/// Tally of a submitted practice round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeResultResponse {
    pub total_words: u64,
    pub learned_words: u64,
    pub pending_words: u64,
    pub skipped_words: u64,
    pub score: u8,
}

impl From<&PracticeSummary> for PracticeResultResponse {
    fn from(s: &PracticeSummary) -> Self {
        Self {
            total_words: s.total_words,
            learned_words: s.learned_words,
            pending_words: s.pending_words,
            skipped_words: s.skipped_words,
            score: s.score.value(),
        }
    }
}

/// Liveness response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error body: `{code, message, details?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: HashMap<String, String>) -> Self {
        if !details.is_empty() {
            self.details = Some(details);
        }
        self
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cycle::EntryStatus;
    use crate::domain::foundation::{Timestamp, UserId, WordId};

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs).unwrap()
    }

    #[test]
    fn window_request_accepts_empty_object() {
        let req: CycleWindowRequest = serde_json::from_str("{}").unwrap();
        assert!(req.duration.is_none());
        assert!(req.end_datetime.is_none());
    }

    #[test]
    fn duration_components_default_to_zero() {
        let req: CycleWindowRequest =
            serde_json::from_str(r#"{"duration": {"hours": 2}}"#).unwrap();
        let d = req.duration.unwrap();
        assert_eq!((d.days, d.hours, d.minutes, d.seconds), (0, 2, 0, 0));
    }

    #[test]
    fn time_remaining_reports_expired_status() {
        let t = TimeRemaining::at(ts(0), ts(100), ts(150));
        let dto = TimeRemainingResponse::from(&t);

        assert_eq!(dto.status, "expired");
        assert_eq!(dto.remaining.total_seconds, 0);
        assert_eq!(dto.progress_percentage, 100);
    }

    #[test]
    fn entry_without_metadata_omits_word() {
        let entry = CycleVocabularyEntry::pending(
            UserId::new("learner").unwrap(),
            WordId::new(5).unwrap(),
            ts(1_000),
        );
        let dto = EntryResponse::from_entry(&entry, None);
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["word_id"], 5);
        assert_eq!(json["status"], EntryStatus::Pending.as_str());
        assert!(json.get("word").is_none());
    }

    #[test]
    fn error_response_omits_empty_details() {
        let body = ErrorResponse::internal("boom").with_details(HashMap::new());
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert!(json.get("details").is_none());
    }
}
