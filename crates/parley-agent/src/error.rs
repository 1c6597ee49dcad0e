//! Agent error types.
//!
//! Stage failures surface through [`AgentError`] so the chain runner can log
//! them with enough context; they never reach the caller of the chain.

use std::path::PathBuf;

use crate::provider::ProviderId;

/// Unified error type for the provider crate.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The HTTP request to a provider failed (connect, timeout, body read).
    #[error("{provider} request failed: {reason}")]
    RequestFailed { provider: ProviderId, reason: String },

    /// The provider answered with a non-success status code.
    #[error("{provider} returned status {status}")]
    BadStatus { provider: ProviderId, status: u16 },

    /// The provider's payload did not have the expected shape.
    #[error("{provider} response parse error: {reason}")]
    ParseFailed { provider: ProviderId, reason: String },

    /// The local model corpus could not be read.
    #[error("failed to read corpus {path}: {source}")]
    CorpusRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The local model corpus produced no word transitions.
    #[error("corpus {path} is too small to train a model")]
    EmptyCorpus { path: PathBuf },

    /// A configured value is unusable.
    #[error("config error: {reason}")]
    Config { reason: String },

    /// A configured URL does not parse.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience alias used throughout the agent crate.
pub type Result<T> = std::result::Result<T, AgentError>;

impl AgentError {
    /// Wrap a transport error from `provider`.
    pub fn request(provider: ProviderId, err: reqwest::Error) -> Self {
        Self::RequestFailed {
            provider,
            reason: err.to_string(),
        }
    }

    /// Wrap a payload decoding error from `provider`.
    pub fn parse(provider: ProviderId, err: impl std::fmt::Display) -> Self {
        Self::ParseFailed {
            provider,
            reason: err.to_string(),
        }
    }
}
