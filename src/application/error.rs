//! Engine error taxonomy shared by every handler.
//!
//! Each variant keeps the underlying `DomainError` so callers still see the
//! precise code (e.g. `WORD_ALREADY_LEARNED` vs `WORD_ALREADY_IN_CYCLE`).

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// User-visible failure kinds plus the generic infrastructure failure.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Referenced cycle, entry or word is absent.
    #[error("{0}")]
    NotFound(DomainError),

    /// Duplicate assignment or re-adding a learned word.
    #[error("{0}")]
    Conflict(DomainError),

    /// Action not allowed in the cycle's current state (e.g. expired).
    #[error("{0}")]
    InvalidState(DomainError),

    /// Malformed input such as out-of-bounds durations.
    #[error("{0}")]
    Validation(DomainError),

    /// Storage or other transient failure; the caller may retry.
    #[error("{0}")]
    Infrastructure(DomainError),
}

impl EngineError {
    pub fn domain(&self) -> &DomainError {
        match self {
            EngineError::NotFound(e)
            | EngineError::Conflict(e)
            | EngineError::InvalidState(e)
            | EngineError::Validation(e)
            | EngineError::Infrastructure(e) => e,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.domain().code
    }

    pub(crate) fn cycle_not_found() -> Self {
        EngineError::NotFound(DomainError::new(
            ErrorCode::CycleNotFound,
            "No learning cycle found",
        ))
    }
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        let code = err.code;
        if code.is_not_found() {
            EngineError::NotFound(err)
        } else if code.is_conflict() {
            EngineError::Conflict(err)
        } else if code.is_validation() {
            EngineError::Validation(err)
        } else {
            match code {
                ErrorCode::CycleExpired | ErrorCode::InvalidStateTransition => {
                    EngineError::InvalidState(err)
                }
                _ => EngineError::Infrastructure(err),
            }
        }
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Validation(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_taxonomy() {
        let cases = [
            (ErrorCode::CycleNotFound, "NotFound"),
            (ErrorCode::EmptyCycle, "NotFound"),
            (ErrorCode::WordAlreadyLearned, "Conflict"),
            (ErrorCode::CycleExpired, "InvalidState"),
            (ErrorCode::OutOfRange, "Validation"),
            (ErrorCode::DatabaseError, "Infrastructure"),
        ];

        for (code, expected) in cases {
            let kind = match EngineError::from(DomainError::new(code, "x")) {
                EngineError::NotFound(_) => "NotFound",
                EngineError::Conflict(_) => "Conflict",
                EngineError::InvalidState(_) => "InvalidState",
                EngineError::Validation(_) => "Validation",
                EngineError::Infrastructure(_) => "Infrastructure",
            };
            assert_eq!(kind, expected, "{:?}", code);
        }
    }

    #[test]
    fn validation_error_keeps_field_detail() {
        let err: EngineError = ValidationError::out_of_range("hours", 0, 23, 24).into();
        assert_eq!(err.code(), ErrorCode::OutOfRange);
        assert_eq!(err.domain().details.get("field").map(String::as_str), Some("hours"));
    }
}
