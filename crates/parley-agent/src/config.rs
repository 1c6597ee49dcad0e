//! Provider settings.
//!
//! Deserialised from the `[providers]` table of `config/default.toml`.  Every
//! field has a default so an absent table, or a partial one, is valid.  The
//! hosted inference API key never comes from the file; it is filled in from
//! the environment by the binary.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chain::DEFAULT_MIN_USABLE_CHARS;

/// Settings for every stage of every variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub hosted: HostedConfig,
    pub daemon: DaemonConfig,
    pub local_model: LocalModelConfig,
    pub web_lookup: WebLookupConfig,
    /// Trimmed answers of this many characters or fewer are discarded.
    pub min_usable_chars: usize,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            hosted: HostedConfig::default(),
            daemon: DaemonConfig::default(),
            local_model: LocalModelConfig::default(),
            web_lookup: WebLookupConfig::default(),
            min_usable_chars: DEFAULT_MIN_USABLE_CHARS,
        }
    }
}

// ---------------------------------------------------------------------------
// Hosted inference
// ---------------------------------------------------------------------------

/// Hugging Face inference API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedConfig {
    /// Model endpoint; the request is POSTed here directly.
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Bearer token.  The stage is only built when this is set.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models/microsoft/DialoGPT-medium"
                .into(),
            timeout_secs: 10,
            api_key: None,
        }
    }
}

impl HostedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// Local daemon
// ---------------------------------------------------------------------------

/// Ollama daemon on the local machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub num_predict: u32,
    pub timeout_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:11434".into(),
            model: "llama2".into(),
            temperature: 0.7,
            num_predict: 150,
            timeout_secs: 15,
        }
    }
}

impl DaemonConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// Local model
// ---------------------------------------------------------------------------

/// In-process Markov generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalModelConfig {
    /// Training corpus.  No corpus, no stage.
    pub corpus_path: Option<PathBuf>,
    pub max_words: usize,
    pub timeout_secs: u64,
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            corpus_path: None,
            max_words: 60,
            timeout_secs: 5,
        }
    }
}

impl LocalModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// Web lookup
// ---------------------------------------------------------------------------

/// Wikipedia and DuckDuckGo lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebLookupConfig {
    /// Wikipedia base URL; `{lang}` is replaced with the two-letter code.
    pub wikipedia_url: String,
    pub duckduckgo_url: String,
    /// Budget for each of the two HTTP lookups.
    pub request_timeout_secs: u64,
    /// Budget for the whole stage.
    pub timeout_secs: u64,
}

impl Default for WebLookupConfig {
    fn default() -> Self {
        Self {
            wikipedia_url: "https://{lang}.wikipedia.org".into(),
            duckduckgo_url: "https://api.duckduckgo.com/".into(),
            request_timeout_secs: 10,
            timeout_secs: 20,
        }
    }
}

impl WebLookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
