//! Response providers and the fallback chain for parley.
//!
//! ## Architecture
//!
//! ```text
//!  Turn ──> ┌────────────┐   ┌────────┐   ┌─────────────┐   ┌──────────┐
//!           │  hosted    │──>│ daemon │──>│ local model │──>│ terminal │
//!           │ inference  │   │(Ollama)│   │  (Markov)   │   │ (rules)  │
//!           └────────────┘   └────────┘   └─────────────┘   └──────────┘
//!                 first usable answer wins; failures only advance
//! ```
//!
//! ## Modules
//!
//! - [`provider`] -- the stage trait, turn/answer types and terminal
//!   responders.
//! - [`chain`] -- the generic runner that walks stages with per-stage
//!   timeouts.
//! - [`hosted`] -- Hugging Face inference API stage.
//! - [`daemon`] -- local Ollama daemon stage.
//! - [`local_model`] -- in-process Markov text generator stage.
//! - [`web_lookup`] -- Wikipedia / DuckDuckGo knowledge lookup stage.
//! - [`demo`] -- demo terminal responder.
//! - [`variant`] -- which chain a process runs and how it is assembled.
//! - [`config`] -- provider settings.
//! - [`error`] -- agent error types.

pub mod chain;
pub mod config;
pub mod daemon;
pub mod demo;
pub mod error;
pub mod hosted;
pub mod local_model;
pub mod prompts;
pub mod provider;
pub mod variant;
pub mod web_lookup;

pub use chain::{ChainReply, DEFAULT_MIN_USABLE_CHARS, FallbackChain, is_usable};
pub use config::{DaemonConfig, HostedConfig, LocalModelConfig, ProviderSettings, WebLookupConfig};
pub use daemon::LocalDaemon;
pub use demo::DemoResponder;
pub use error::{AgentError, Result};
pub use hosted::HostedInference;
pub use local_model::{LocalModel, MarkovModel};
pub use provider::{Answer, ProviderId, ResponseProvider, TerminalResponder, Turn};
pub use variant::{Variant, build_chain};
pub use web_lookup::WebLookup;
