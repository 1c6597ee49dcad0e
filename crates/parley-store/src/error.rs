//! Store error types.

use uuid::Uuid;

/// Errors raised by the in-memory stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The session id is not (or no longer) registered.
    #[error("session not found: {session_id}")]
    SessionNotFound { session_id: Uuid },
}

/// Convenience alias used throughout the store crate.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
