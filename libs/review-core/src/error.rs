//! Error types for review-core.

use thiserror::Error;

use crate::types::CardId;

/// Result type alias using ScheduleError.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors raised by the scheduling engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("invalid grade value {0}, expected 1-4")]
    InvalidGrade(u8),

    #[error("unknown grade {0:?}")]
    UnknownGrade(String),

    #[error("card {0} is suspended")]
    CardSuspended(CardId),
}

/// Errors raised by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("card not found: {0}")]
    CardNotFound(CardId),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors raised while driving a study session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("no cards left in session")]
    Empty,

    #[error("review outcome for card {found} does not match front card {expected}")]
    CardMismatch { expected: CardId, found: CardId },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Errors raised while loading or validating settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("malformed settings: {0}")]
    Json(String),

    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error("invalid session limit {0:?}, expected 10, 20, 30, 50, 100 or \"all\"")]
    InvalidSessionLimit(String),
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
