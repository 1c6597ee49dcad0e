//! Chain variants and their assembly.
//!
//! | variant  | stages                                      | terminal  |
//! |----------|---------------------------------------------|-----------|
//! | `rules`  | hosted inference, local daemon, local model | templates |
//! | `search` | web lookup, local model                     | templates |
//! | `demo`   | none                                        | demo      |
//!
//! Optional stages are left out when unconfigured: hosted inference without
//! an API key, a disabled daemon, or a local model whose corpus is missing or
//! unreadable.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use parley_intent::{Picker, TemplateStore};

use crate::chain::FallbackChain;
use crate::config::ProviderSettings;
use crate::daemon::LocalDaemon;
use crate::demo::DemoResponder;
use crate::error::{AgentError, Result};
use crate::hosted::HostedInference;
use crate::local_model::LocalModel;
use crate::provider::ResponseProvider;
use crate::web_lookup::WebLookup;

/// Which chain configuration the process runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Rules,
    Search,
    Demo,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Rules, Variant::Search, Variant::Demo];

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Rules => "rules",
            Variant::Search => "search",
            Variant::Demo => "demo",
        }
    }

    /// Port the variant listens on unless overridden.
    pub fn default_port(self) -> u16 {
        match self {
            Variant::Rules => 8002,
            Variant::Search => 8006,
            Variant::Demo => 8000,
        }
    }

    /// Name reported by the root endpoint.
    pub fn service_name(self) -> &'static str {
        match self {
            Variant::Rules => "Multilingual AI Chatbot",
            Variant::Search => "Free Chatbot with Web Search",
            Variant::Demo => "AI Chatbot API",
        }
    }

    /// Capability labels reported by the root and intents endpoints.
    pub fn features(self) -> &'static [&'static str] {
        match self {
            Variant::Rules => &[
                "Hugging Face Inference",
                "Ollama",
                "Local Model",
                "Rule Engine",
                "6 Languages",
            ],
            Variant::Search => &["Web Search", "Local Model", "Rule Engine", "6 Languages"],
            Variant::Demo => &["Demo Responses"],
        }
    }

    /// Whether replies are preceded by a `{"typing": true}` frame.
    pub fn sends_typing_indicator(self) -> bool {
        self == Variant::Search
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AgentError::Config {
                reason: format!("unknown variant `{s}` (expected rules, search or demo)"),
            })
    }
}

/// Assemble the chain for `variant`.
///
/// Misconfigured URLs are errors.  A local model that fails to load is
/// logged and skipped.
pub fn build_chain(
    variant: Variant,
    settings: &ProviderSettings,
    picker: Arc<dyn Picker>,
) -> Result<FallbackChain> {
    let mut stages: Vec<Box<dyn ResponseProvider>> = Vec::new();

    match variant {
        Variant::Rules => {
            if settings.hosted.api_key.is_some() {
                stages.push(Box::new(HostedInference::new(&settings.hosted)?));
            } else {
                info!("no hosted inference API key, stage disabled");
            }
            if settings.daemon.enabled {
                stages.push(Box::new(LocalDaemon::new(&settings.daemon)?));
            }
            if let Some(model) = load_local_model(settings) {
                stages.push(Box::new(model));
            }
        }
        Variant::Search => {
            stages.push(Box::new(WebLookup::new(&settings.web_lookup)?));
            if let Some(model) = load_local_model(settings) {
                stages.push(Box::new(model));
            }
        }
        Variant::Demo => {
            info!(%variant, "chain assembled with demo responder");
            return Ok(FallbackChain::new(Box::new(DemoResponder::new(picker))));
        }
    }

    let chain = stages.into_iter().fold(
        FallbackChain::new(Box::new(TemplateStore::new(picker)))
            .with_min_usable_chars(settings.min_usable_chars),
        FallbackChain::with_stage,
    );

    info!(
        %variant,
        stages = ?chain.stage_ids(),
        terminal = %chain.terminal_id(),
        "chain assembled"
    );
    Ok(chain)
}

fn load_local_model(settings: &ProviderSettings) -> Option<LocalModel> {
    match LocalModel::from_config(&settings.local_model) {
        Ok(model) => model,
        Err(e) => {
            warn!(error = %e, "local model unavailable, stage skipped");
            None
        }
    }
}
