//! Engine error taxonomy.
//!
//! `Transient` is the only retryable class. Not-found, validation, and
//! corrupt-state failures are rethrown immediately by the retry layer.

use thiserror::Error;

/// Errors surfaced by the navigation engine.
///
/// `Clone` so a failed shared in-flight request can be fanned out to every
/// coalesced caller.
#[derive(Debug, Clone, Error)]
pub enum NavigationError {
    /// The session service has no record of the session.
    #[error("session {session_id} not found")]
    SessionNotFound { session_id: String },

    /// Malformed input reached the engine.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A network-bound operation failed in a way worth retrying.
    #[error("transient failure: {0}")]
    Transient(String),

    /// A persisted payload could not be decoded.
    #[error("corrupt persisted state at {key}: {reason}")]
    CorruptState { key: String, reason: String },
}

impl NavigationError {
    pub fn not_found(session_id: impl Into<String>) -> Self {
        NavigationError::SessionNotFound {
            session_id: session_id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        NavigationError::Validation(message.into())
    }

    pub fn transient(message: impl Into<String>) -> Self {
        NavigationError::Transient(message.into())
    }

    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        NavigationError::CorruptState {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether the retry layer may re-attempt the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NavigationError::Transient(_))
    }
}
