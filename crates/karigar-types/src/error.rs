use thiserror::Error;

/// A rejected input value (empty required text, out-of-range rating, ...).
#[derive(Debug, Clone, Error)]
#[error("validation error: {0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Errors from repository operations (used by trait definitions in karigar-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to booking lifecycle operations.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("booking not found")]
    NotFound,

    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("actor not permitted to apply this transition")]
    NotPermitted,

    #[error("booking was modified concurrently, reload and retry")]
    VersionConflict,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors related to per-booking messaging.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("booking not found")]
    BookingNotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors related to review submission.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("booking not found")]
    BookingNotFound,

    #[error("booking is not completed")]
    NotCompleted,

    #[error("reviewer is not the booking's customer")]
    NotBookingCustomer,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from directory search.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from the query interpreter collaborator.
///
/// Interpretation is best-effort: callers are expected to degrade to a plain
/// term search when it fails, never to surface this to the user flow.
#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("interpreter unavailable: {0}")]
    Unavailable(String),
}

/// Errors from session restore (cache plus user lookup).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session cache io error: {0}")]
    Io(String),

    #[error("storage error: {0}")]
    Storage(String),
}
