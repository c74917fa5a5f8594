//! Error taxonomy for quizdesk.
//!
//! Validation errors block activation and editor saves, session errors are
//! surfaced to the student as rejected requests, and persistence errors are
//! either fatal (quiz saves) or only logged (result files).

use std::path::PathBuf;

use thiserror::Error;

/// A quiz record (or a submission) failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The record could not be parsed into the quiz shape.
    #[error("malformed quiz record: {0}")]
    Malformed(String),

    /// A required top-level field is absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The quiz name is empty or cannot be used as a file name.
    #[error("invalid quiz name: {0:?}")]
    InvalidName(String),

    /// The quiz title is empty.
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    /// A quiz must have at least one question before it can be served.
    #[error("quiz must have at least one question")]
    NoQuestions,

    /// The timer must be a positive number of minutes.
    #[error("timer must be a positive number of minutes")]
    InvalidTimer,

    /// A specific question is invalid. `number` is 1-based.
    #[error("question {number}: {reason}")]
    Question { number: usize, reason: String },

    /// The quiz requires a full name and none was given.
    #[error("full name is required")]
    NameRequired,
}

/// Errors from the session/scoring service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No quiz has been activated.
    #[error("no quiz is currently active")]
    NoActiveQuiz,

    /// The session id is unknown (never issued, or issued for a previous quiz).
    #[error("invalid session")]
    SessionInvalid,

    /// The session has already submitted once.
    #[error("already submitted")]
    AlreadySubmitted,

    /// The submission arrived after the enforced deadline.
    #[error("time limit expired")]
    SessionExpired,

    /// The submission itself is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A disk write or read failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write CSV {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl PersistenceError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistenceError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Errors from the quiz store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this name exists.
    #[error("quiz not found: {0}")]
    NotFound(String),

    /// The stored (or to-be-stored) record is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The record could not be read or written.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl SessionError {
    /// Returns `true` when the error is the caller's fault rather than a
    /// problem with the session itself.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, SessionError::Validation(_))
    }
}
