//! The stage contract shared by every response provider.
//!
//! A [`ResponseProvider`] is one fallible step of the chain: it either
//! produces an [`Answer`], declines with `Ok(None)`, or fails.  The chain
//! treats the last two identically.  A [`TerminalResponder`] closes the
//! chain and cannot fail.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use parley_intent::{Classification, Intent, Language, TemplateStore};

use crate::error::Result;

/// Default per-stage timeout when a stage does not override it.
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Identifies which stage produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    HostedInference,
    LocalDaemon,
    LocalModel,
    WebLookup,
    Rules,
    Demo,
}

impl ProviderId {
    /// Snake-case identifier, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::HostedInference => "hosted_inference",
            ProviderId::LocalDaemon => "local_daemon",
            ProviderId::LocalModel => "local_model",
            ProviderId::WebLookup => "web_lookup",
            ProviderId::Rules => "rules",
            ProviderId::Demo => "demo",
        }
    }

    /// Human-readable label reported to clients as `model_used`.
    pub fn label(self) -> &'static str {
        match self {
            ProviderId::HostedInference => "Hugging Face Inference",
            ProviderId::LocalDaemon => "Ollama",
            ProviderId::LocalModel => "Local Model",
            ProviderId::WebLookup => "Web Search",
            ProviderId::Rules => "Rule Engine",
            ProviderId::Demo => "Demo",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a stage may look at for one inbound message.
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    pub utterance: &'a str,
    pub language: Language,
    pub classification: Classification,
}

impl<'a> Turn<'a> {
    pub fn new(utterance: &'a str, language: Language, classification: Classification) -> Self {
        Self {
            utterance,
            language,
            classification,
        }
    }

    pub fn intent(&self) -> Intent {
        self.classification.intent
    }

    pub fn confidence(&self) -> f64 {
        self.classification.confidence
    }
}

/// A candidate reply from one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    /// Replaces the classifier's confidence in the final reply when set.
    pub confidence: Option<f64>,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// One fallible stage of the fallback chain.
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    /// Which stage this is.
    fn id(&self) -> ProviderId;

    /// Upper bound the chain runner allows this stage.
    fn timeout(&self) -> Duration {
        DEFAULT_STAGE_TIMEOUT
    }

    /// Try to answer the turn.  `Ok(None)` means "not me, ask the next
    /// stage".
    async fn attempt(&self, turn: &Turn<'_>) -> Result<Option<Answer>>;
}

/// The last stage of a chain.  Always answers.
pub trait TerminalResponder: Send + Sync {
    fn id(&self) -> ProviderId;

    fn respond(&self, turn: &Turn<'_>) -> String;
}

impl TerminalResponder for TemplateStore {
    fn id(&self) -> ProviderId {
        ProviderId::Rules
    }

    fn respond(&self, turn: &Turn<'_>) -> String {
        self.render(turn.language, turn.intent(), turn.utterance)
    }
}
