//! Shared application state for the web server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared by every request handler
//! and WebSocket connection.

use parley_agent::{FallbackChain, ProviderId, Variant};
use parley_store::{ConversationHistory, SessionRegistry};

use crate::WebConfig;
use crate::dispatch::Dispatcher;
use crate::error::Result;

/// Shared state accessible from every Axum handler.
pub struct AppState {
    /// Runs detection, classification and the provider chain.
    pub dispatcher: Dispatcher,

    /// Open WebSocket sessions.
    pub sessions: SessionRegistry,

    /// Web server configuration.
    pub config: WebConfig,
}

impl AppState {
    pub fn new(variant: Variant, chain: FallbackChain, config: WebConfig) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(variant, chain, ConversationHistory::default())?,
            sessions: SessionRegistry::new(),
            config,
        })
    }

    pub fn variant(&self) -> Variant {
        self.dispatcher.variant()
    }

    pub fn history(&self) -> &ConversationHistory {
        self.dispatcher.history()
    }

    /// Whether the running chain includes `stage`.
    pub fn has_stage(&self, stage: ProviderId) -> bool {
        self.dispatcher.chain().has_stage(stage)
    }
}
