//! The fallback chain runner.
//!
//! Stages are tried in order, each at most once and each under its own
//! timeout.  The first stage to return an answer longer than the minimum
//! usable length wins.  Errors, timeouts, declines and too-short answers are
//! logged and the runner moves on; the terminal responder ends the walk.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::provider::{ProviderId, ResponseProvider, TerminalResponder, Turn};

/// Answers with this many characters or fewer (after trimming) are treated
/// as no answer at all.
pub const DEFAULT_MIN_USABLE_CHARS: usize = 10;

/// Final output of the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainReply {
    pub text: String,
    pub provider: ProviderId,
    /// Set when the winning stage overrides the classifier's confidence.
    pub confidence: Option<f64>,
}

/// Whether `text` is long enough to count as a genuine answer.
pub fn is_usable(text: &str, min_chars: usize) -> bool {
    text.trim().chars().count() > min_chars
}

/// An ordered list of fallible stages closed by an infallible terminal.
pub struct FallbackChain {
    stages: Vec<Box<dyn ResponseProvider>>,
    terminal: Box<dyn TerminalResponder>,
    min_usable_chars: usize,
}

impl FallbackChain {
    /// A chain with no stages that always answers from `terminal`.
    pub fn new(terminal: Box<dyn TerminalResponder>) -> Self {
        Self {
            stages: Vec::new(),
            terminal,
            min_usable_chars: DEFAULT_MIN_USABLE_CHARS,
        }
    }

    /// Append a stage after the existing ones.
    pub fn with_stage(mut self, stage: Box<dyn ResponseProvider>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn with_min_usable_chars(mut self, min_usable_chars: usize) -> Self {
        self.min_usable_chars = min_usable_chars;
        self
    }

    /// Identifiers of the fallible stages, in order.
    pub fn stage_ids(&self) -> Vec<ProviderId> {
        self.stages.iter().map(|s| s.id()).collect()
    }

    /// Identifier of the terminal responder.
    pub fn terminal_id(&self) -> ProviderId {
        self.terminal.id()
    }

    /// Whether a stage with `id` is part of this chain.
    pub fn has_stage(&self, id: ProviderId) -> bool {
        self.stages.iter().any(|s| s.id() == id)
    }

    /// Walk the chain for one turn.  Always returns a reply.
    pub async fn respond(&self, turn: &Turn<'_>) -> ChainReply {
        for stage in &self.stages {
            let provider = stage.id();
            let started = Instant::now();

            match tokio::time::timeout(stage.timeout(), stage.attempt(turn)).await {
                Ok(Ok(Some(answer))) if is_usable(&answer.text, self.min_usable_chars) => {
                    info!(
                        %provider,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "stage answered"
                    );
                    return ChainReply {
                        text: answer.text.trim().to_owned(),
                        provider,
                        confidence: answer.confidence,
                    };
                }
                Ok(Ok(Some(answer))) => {
                    debug!(
                        %provider,
                        len = answer.text.trim().chars().count(),
                        min = self.min_usable_chars,
                        "stage answer too short, trying next"
                    );
                }
                Ok(Ok(None)) => {
                    debug!(%provider, "stage declined, trying next");
                }
                Ok(Err(e)) => {
                    warn!(%provider, error = %e, "stage failed, trying next");
                }
                Err(_) => {
                    warn!(
                        %provider,
                        timeout_secs = stage.timeout().as_secs_f64(),
                        "stage timed out, trying next"
                    );
                }
            }
        }

        let provider = self.terminal.id();
        debug!(%provider, "falling back to terminal responder");
        ChainReply {
            text: self.terminal.respond(turn),
            provider,
            confidence: None,
        }
    }
}
