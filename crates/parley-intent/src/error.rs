//! Intent engine error types.
//!
//! The detector and classifier are total once built; the only fallible step
//! is compiling their phrase automata.

/// Unified error type for the intent crate.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    /// A phrase list could not be compiled into a matcher.
    #[error("failed to build keyword matcher `{name}`: {reason}")]
    MatcherBuild { name: &'static str, reason: String },
}

/// Convenience alias used throughout the intent crate.
pub type Result<T> = std::result::Result<T, IntentError>;
