//! Router assembly and server startup.

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::api;
use crate::error::{Result, WebError};
use crate::state::AppState;
use crate::ws;

/// The parley web server.
pub struct WebServer {
    state: Arc<AppState>,
}

impl WebServer {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.state.config.bind_addr, self.state.config.port)
    }

    /// Build the Axum router with all routes registered.
    pub fn router(&self) -> Router {
        router(Arc::clone(&self.state))
    }

    /// Bind the configured address and serve until shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound or the server
    /// fails.
    pub async fn start(self) -> Result<()> {
        let addr = self.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| WebError::Bind {
                addr: addr.clone(),
                source,
            })?;
        self.serve(listener).await
    }

    /// Serve on an already-bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let local = listener.local_addr().map_err(WebError::Serve)?;
        tracing::info!(
            addr = %local,
            variant = %self.state.variant(),
            "starting web server"
        );
        axum::serve(listener, self.router())
            .await
            .map_err(WebError::Serve)
    }
}

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route("/chat", post(api::chat))
        .route("/models", get(api::models))
        .route("/intents", get(api::intents))
        .route("/conversation/history", get(api::history))
        .route("/sessions", get(api::sessions))
        .route("/ws", get(ws::ws_handler))
        .layer(cors_layer(&state.config.allowed_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any)
}
