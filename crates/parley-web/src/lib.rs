//! HTTP and WebSocket front end for parley.
//!
//! - A small REST API: chat, capability discovery, history and sessions.
//! - A WebSocket endpoint at `/ws` for duplex chat.
//! - [`dispatch`] holds the per-message pipeline both transports share.

pub mod api;
pub mod dispatch;
pub mod error;
pub mod server;
pub mod state;
pub mod ws;

pub use dispatch::{ChatReply, ChatRequest, Dispatcher, INVALID_JSON, Outbound};
pub use error::{Result, WebError};
pub use server::WebServer;
pub use state::AppState;

use serde::{Deserialize, Serialize};

/// Web server configuration, the `[server]` table of `config/default.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 8002,
            allowed_origins: vec![
                "http://localhost:3000".into(),
                "http://127.0.0.1:3000".into(),
            ],
        }
    }
}
