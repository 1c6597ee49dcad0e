//! Web error types.

use parley_agent::AgentError;
use parley_intent::IntentError;

/// Errors raised while assembling or running the server.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// The provider chain could not be built.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// The language or intent matchers could not be compiled.
    #[error(transparent)]
    Intent(#[from] IntentError),
}

/// Convenience alias used throughout the web crate.
pub type Result<T> = std::result::Result<T, WebError>;
