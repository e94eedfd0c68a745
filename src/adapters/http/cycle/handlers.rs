//! HTTP handlers for learning cycle endpoints.
//!
//! These handlers connect Axum routes to application layer command/query
//! handlers. The learner is identified by the `X-User-Id` header.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};

use crate::application::handlers::{
    AddWordCommand, AddWordHandler, ApplyOutcomesCommand, ApplyOutcomesHandler, BuildQuizHandler,
    BuildQuizQuery, CreateCycleCommand, CreateCycleHandler, EndAndRenewCycleCommand,
    EndAndRenewCycleHandler, GetActiveCycleHandler, GetActiveCycleQuery,
    GetCycleStatisticsHandler, GetCycleStatisticsQuery, GetTimeRemainingHandler,
    GetTimeRemainingQuery, ListCycleWordsHandler, ListCycleWordsQuery, ListLearnedWordsHandler,
    ListLearnedWordsQuery, QuickCreateCycleCommand,
    QuickCreateCycleHandler, RemoveWordCommand, RemoveWordHandler, SetWordStatusCommand,
    SetWordStatusHandler, SetWordStatusResult, SortField, SortOrder, WordFilters,
};
use crate::application::{EngineError, EngineSettings, UserLocks};
use crate::domain::cycle::{CycleDuration, CycleSpan, EntryStatus};
use crate::domain::foundation::{
    CommandMetadata, DomainError, Timestamp, UserId, ValidationError, WordId,
};
use crate::ports::{
    Clock, CycleStore, EventPublisher, LearnedRecordStore, RandomSource, VocabularyCatalog,
};

use super::dto::{
    AddWordRequest, CommandResponse, CreateCycleResponse, CycleResponse, CycleWindowRequest,
    EntryResponse, ErrorResponse, HealthResponse, LearnedWordListResponse, LearnedWordsParams,
    ListWordsParams, PracticeResultResponse,
    PracticeResultsRequest, PracticeSetParams, PracticeSetResponse, QuickCreateRequest,
    RenewCycleResponse, SetStatusRequest, SetStatusResponse, StatisticsResponse,
    TimeRemainingResponse, WordListResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct CycleAppState {
    pub cycle_store: Arc<dyn CycleStore>,
    pub learned_store: Arc<dyn LearnedRecordStore>,
    pub catalog: Arc<dyn VocabularyCatalog>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub clock: Arc<dyn Clock>,
    pub random: Arc<dyn RandomSource>,
    pub locks: Arc<UserLocks>,
    pub settings: EngineSettings,
}

impl CycleAppState {
    pub fn create_cycle_handler(&self) -> CreateCycleHandler {
        CreateCycleHandler::new(
            self.cycle_store.clone(),
            self.event_publisher.clone(),
            self.clock.clone(),
            self.locks.clone(),
            self.settings.default_duration_days,
        )
    }

    pub fn quick_create_cycle_handler(&self) -> QuickCreateCycleHandler {
        QuickCreateCycleHandler::new(self.create_cycle_handler())
    }

    pub fn get_active_cycle_handler(&self) -> GetActiveCycleHandler {
        GetActiveCycleHandler::new(self.cycle_store.clone())
    }

    pub fn get_time_remaining_handler(&self) -> GetTimeRemainingHandler {
        GetTimeRemainingHandler::new(self.cycle_store.clone(), self.clock.clone())
    }

    pub fn get_cycle_statistics_handler(&self) -> GetCycleStatisticsHandler {
        GetCycleStatisticsHandler::new(
            self.cycle_store.clone(),
            self.learned_store.clone(),
            self.catalog.clone(),
            self.clock.clone(),
        )
    }

    pub fn end_and_renew_cycle_handler(&self) -> EndAndRenewCycleHandler {
        EndAndRenewCycleHandler::new(
            self.cycle_store.clone(),
            self.event_publisher.clone(),
            self.clock.clone(),
            self.locks.clone(),
            self.settings.policy,
            self.settings.default_duration_days,
        )
    }

    pub fn add_word_handler(&self) -> AddWordHandler {
        AddWordHandler::new(
            self.cycle_store.clone(),
            self.catalog.clone(),
            self.learned_store.clone(),
            self.event_publisher.clone(),
            self.clock.clone(),
            self.locks.clone(),
        )
    }

    pub fn list_cycle_words_handler(&self) -> ListCycleWordsHandler {
        ListCycleWordsHandler::new(self.cycle_store.clone(), self.catalog.clone())
    }

    pub fn list_learned_words_handler(&self) -> ListLearnedWordsHandler {
        ListLearnedWordsHandler::new(self.learned_store.clone(), self.catalog.clone())
    }

    pub fn set_word_status_handler(&self) -> SetWordStatusHandler {
        SetWordStatusHandler::new(
            self.cycle_store.clone(),
            self.event_publisher.clone(),
            self.clock.clone(),
            self.locks.clone(),
            self.settings.policy,
        )
    }

    pub fn remove_word_handler(&self) -> RemoveWordHandler {
        RemoveWordHandler::new(
            self.cycle_store.clone(),
            self.event_publisher.clone(),
            self.clock.clone(),
            self.locks.clone(),
        )
    }

    pub fn build_quiz_handler(&self) -> BuildQuizHandler {
        BuildQuizHandler::new(
            self.cycle_store.clone(),
            self.catalog.clone(),
            self.random.clone(),
            self.settings.max_question_count,
        )
    }

    pub fn apply_outcomes_handler(&self) -> ApplyOutcomesHandler {
        ApplyOutcomesHandler::new(
            self.cycle_store.clone(),
            self.event_publisher.clone(),
            self.clock.clone(),
            self.locks.clone(),
            self.settings.policy,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated learner extracted from the request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub correlation_id: Option<String>,
}

impl AuthenticatedUser {
    fn metadata(self) -> CommandMetadata {
        let metadata = CommandMetadata::new(self.user_id).with_source("api");
        match self.correlation_id {
            Some(id) => metadata.with_correlation_id(id),
            None => metadata,
        }
    }
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::unauthorized("X-User-Id header is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

#[async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| UserId::new(s).ok())
            .ok_or(AuthenticationRequired)?;

        let correlation_id = parts
            .headers
            .get("X-Correlation-Id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(AuthenticatedUser {
            user_id,
            correlation_id,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request Parsing
// ════════════════════════════════════════════════════════════════════════════════

fn window_span(request: CycleWindowRequest) -> Result<CycleSpan, ValidationError> {
    match (request.duration, request.end_datetime) {
        (Some(_), Some(_)) => Err(ValidationError::invalid_format(
            "duration",
            "provide either duration or end_datetime, not both",
        )),
        (Some(d), None) => Ok(CycleSpan::Duration(CycleDuration::new(
            d.days, d.hours, d.minutes, d.seconds,
        )?)),
        (None, Some(raw)) => {
            let end = DateTime::parse_from_rfc3339(raw.trim()).map_err(|e| {
                ValidationError::invalid_format("end_datetime", e.to_string())
            })?;
            Ok(CycleSpan::EndsAt(Timestamp::from_datetime(
                end.with_timezone(&Utc),
            )))
        }
        (None, None) => Ok(CycleSpan::Default),
    }
}

/// Parses an optional JSON window body; an empty body means "no window".
fn optional_window(body: &[u8]) -> Result<CycleWindowRequest, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CycleWindowRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| ValidationError::invalid_format("body", e.to_string()))
}

fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>, ValidationError>
where
    T: std::str::FromStr<Err = ValidationError>,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse::<T>)
        .transpose()
}

fn list_query(user_id: UserId, params: ListWordsParams) -> Result<ListCycleWordsQuery, ValidationError> {
    let filters = WordFilters {
        status: parse_optional(params.status.as_deref())?,
        level: parse_optional(params.level.as_deref())?,
        topic: params.topic.filter(|t| !t.trim().is_empty()),
        part_of_speech: parse_optional(params.part_of_speech.as_deref())?,
    };

    Ok(ListCycleWordsQuery {
        user_id,
        filters,
        sort_by: params
            .sort_by
            .as_deref()
            .map(SortField::parse_lenient)
            .unwrap_or_default(),
        order: parse_optional::<SortOrder>(params.order.as_deref())?.unwrap_or_default(),
        offset: params.offset.unwrap_or(0),
        limit: params.limit,
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Cycle Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/cycles - Create the learner's cycle, or replace its window
pub async fn create_cycle(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
    Json(request): Json<CycleWindowRequest>,
) -> Result<impl IntoResponse, CycleApiError> {
    let span = window_span(request)?;

    let result = state
        .create_cycle_handler()
        .handle(CreateCycleCommand { span }, user.metadata())
        .await?;

    let status = if result.replaced {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(CreateCycleResponse::from(&result))))
}

/// POST /api/cycles/quick - Create from a days/hours/minutes/seconds reading
pub async fn quick_create_cycle(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
    Json(request): Json<QuickCreateRequest>,
) -> Result<impl IntoResponse, CycleApiError> {
    let cmd = QuickCreateCycleCommand {
        days: request.days,
        hours: request.hours,
        minutes: request.minutes,
        seconds: request.seconds,
    };

    let result = state
        .quick_create_cycle_handler()
        .handle(cmd, user.metadata())
        .await?;

    let status = if result.replaced {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(CreateCycleResponse::from(&result))))
}

/// GET /api/cycles/current - The learner's cycle
pub async fn get_current_cycle(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
) -> Result<Json<CycleResponse>, CycleApiError> {
    let cycle = state
        .get_active_cycle_handler()
        .handle(GetActiveCycleQuery {
            user_id: user.user_id,
        })
        .await?;

    Ok(Json(CycleResponse::from(&cycle)))
}

/// GET /api/cycles/current/time-remaining
pub async fn get_time_remaining(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
) -> Result<Json<TimeRemainingResponse>, CycleApiError> {
    let remaining = state
        .get_time_remaining_handler()
        .handle(GetTimeRemainingQuery {
            user_id: user.user_id,
        })
        .await?;

    Ok(Json(TimeRemainingResponse::from(&remaining)))
}

/// GET /api/cycles/current/statistics
pub async fn get_cycle_statistics(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
) -> Result<Json<StatisticsResponse>, CycleApiError> {
    let stats = state
        .get_cycle_statistics_handler()
        .handle(GetCycleStatisticsQuery {
            user_id: user.user_id,
        })
        .await?;

    Ok(Json(StatisticsResponse::from(&stats)))
}

/// POST /api/cycles/current/renew - End the current cycle and start the next
///
/// The body is optional; without one the new cycle gets the default length.
/// A body that is present but malformed is rejected before anything changes.
pub async fn renew_cycle(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
    body: Bytes,
) -> Result<impl IntoResponse, CycleApiError> {
    let span = window_span(optional_window(&body)?)?;

    let result = state
        .end_and_renew_cycle_handler()
        .handle(EndAndRenewCycleCommand { span }, user.metadata())
        .await?;

    Ok((StatusCode::CREATED, Json(RenewCycleResponse::from(&result))))
}

// ════════════════════════════════════════════════════════════════════════════════
// Vocabulary Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/cycles/vocabulary - Assign a catalog word
pub async fn add_word(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
    Json(request): Json<AddWordRequest>,
) -> Result<impl IntoResponse, CycleApiError> {
    let word_id = WordId::new(request.word_id)?;

    let result = state
        .add_word_handler()
        .handle(AddWordCommand { word_id }, user.metadata())
        .await?;

    let body = EntryResponse::from_entry(&result.entry, Some(&result.word));
    Ok((StatusCode::CREATED, Json(body)))
}

/// GET /api/cycles/vocabulary - Filtered, sorted, paginated listing
pub async fn list_words(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
    Query(params): Query<ListWordsParams>,
) -> Result<Json<WordListResponse>, CycleApiError> {
    let query = list_query(user.user_id, params)?;

    let page = state.list_cycle_words_handler().handle(query).await?;

    Ok(Json(WordListResponse::from(&page)))
}

/// GET /api/learned-words - Learned words, newest first
pub async fn list_learned_words(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
    Query(params): Query<LearnedWordsParams>,
) -> Result<Json<LearnedWordListResponse>, CycleApiError> {
    let query = ListLearnedWordsQuery {
        user_id: user.user_id,
        offset: params.offset.unwrap_or(0),
        limit: params.limit,
    };

    let page = state.list_learned_words_handler().handle(query).await?;

    Ok(Json(LearnedWordListResponse::from(&page)))
}

/// PUT /api/cycles/vocabulary/:word_id - Mark pending or learned
pub async fn set_word_status(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
    Path(word_id): Path<i64>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<SetStatusResponse>, CycleApiError> {
    let word_id = WordId::new(word_id)?;
    let status: EntryStatus = request.status.parse()?;

    let result = state
        .set_word_status_handler()
        .handle(SetWordStatusCommand { word_id, status }, user.metadata())
        .await?;

    let body = match result {
        SetWordStatusResult::Updated(entry) => SetStatusResponse {
            word_id: entry.word_id().value(),
            status: Some(entry.status().to_string()),
            removed: false,
        },
        SetWordStatusResult::Removed { word_id } => SetStatusResponse {
            word_id: word_id.value(),
            status: None,
            removed: true,
        },
    };
    Ok(Json(body))
}

/// DELETE /api/cycles/vocabulary/:word_id - Remove a word from the cycle
pub async fn remove_word(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
    Path(word_id): Path<i64>,
) -> Result<Json<CommandResponse>, CycleApiError> {
    let word_id = WordId::new(word_id)?;

    state
        .remove_word_handler()
        .handle(RemoveWordCommand { word_id }, user.metadata())
        .await?;

    Ok(Json(CommandResponse {
        message: format!("Word {} removed from cycle", word_id),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Practice Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/cycles/practice-set - Multiple-choice questions over cycle words
pub async fn get_practice_set(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
    Query(params): Query<PracticeSetParams>,
) -> Result<Json<PracticeSetResponse>, CycleApiError> {
    let questions = state
        .build_quiz_handler()
        .handle(BuildQuizQuery {
            user_id: user.user_id,
            count: params.count,
        })
        .await?;

    Ok(Json(PracticeSetResponse::from(questions.as_slice())))
}

/// POST /api/cycles/practice-results - Apply a batch of answers
pub async fn submit_practice_results(
    State(state): State<CycleAppState>,
    user: AuthenticatedUser,
    Json(request): Json<PracticeResultsRequest>,
) -> Result<Json<PracticeResultResponse>, CycleApiError> {
    let cmd = ApplyOutcomesCommand::from_raw(
        request
            .word_results
            .into_iter()
            .map(|r| (r.word_id, r.is_correct)),
    );

    let summary = state
        .apply_outcomes_handler()
        .handle(cmd, user.metadata())
        .await?;

    Ok(Json(PracticeResultResponse::from(&summary)))
}

/// GET /health - Liveness
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts engine errors to HTTP responses.
#[derive(Debug)]
pub struct CycleApiError(EngineError);

impl From<EngineError> for CycleApiError {
    fn from(err: EngineError) -> Self {
        CycleApiError(err)
    }
}

impl From<ValidationError> for CycleApiError {
    fn from(err: ValidationError) -> Self {
        CycleApiError(err.into())
    }
}

impl From<DomainError> for CycleApiError {
    fn from(err: DomainError) -> Self {
        CycleApiError(err.into())
    }
}

impl IntoResponse for CycleApiError {
    fn into_response(self) -> axum::response::Response {
        let domain = self.0.domain().clone();

        let (status, error) = match &self.0 {
            EngineError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(domain.code.to_string(), domain.message),
            ),
            EngineError::Conflict(_) | EngineError::InvalidState(_) => (
                StatusCode::CONFLICT,
                ErrorResponse::new(domain.code.to_string(), domain.message),
            ),
            EngineError::Validation(_) => {
                let mut details = domain.details;
                details.insert("reason".to_string(), domain.code.to_string());
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse::new("VALIDATION_FAILED", domain.message).with_details(details),
                )
            }
            EngineError::Infrastructure(_) => {
                tracing::error!(error = %self.0, "Request failed on infrastructure error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal("An internal error occurred"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}
