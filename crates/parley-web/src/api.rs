//! REST API route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde_json::{Value, json};

use parley_agent::ProviderId;
use parley_intent::{Intent, Language};

use crate::dispatch::{ChatReply, ChatRequest, INVALID_JSON};
use crate::state::AppState;

/// Error response: a status code and a `{"error": ...}` body.
pub type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, msg: &str) -> ApiError {
    (status, Json(json!({ "error": msg })))
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// Liveness and identity.
pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    let variant = state.variant();
    Json(json!({
        "message": format!("{} is running", variant.service_name()),
        "version": env!("CARGO_PKG_VERSION"),
        "variant": variant,
        "features": variant.features(),
    }))
}

// ---------------------------------------------------------------------------
// POST /chat
// ---------------------------------------------------------------------------

/// One-shot chat.  Any string is a valid message, the empty one included.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "rejecting chat body");
        api_error(StatusCode::BAD_REQUEST, INVALID_JSON)
    })?;

    Ok(Json(state.dispatcher.dispatch(&request.message).await))
}

// ---------------------------------------------------------------------------
// GET /models
// ---------------------------------------------------------------------------

/// Which stages the running chain has.
pub async fn models(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "variant": state.variant(),
        "hosted_inference_enabled": state.has_stage(ProviderId::HostedInference),
        "local_daemon_enabled": state.has_stage(ProviderId::LocalDaemon),
        "local_model_loaded": state.has_stage(ProviderId::LocalModel),
        "web_search_enabled": state.has_stage(ProviderId::WebLookup),
        "supported_languages": Language::ALL,
    }))
}

// ---------------------------------------------------------------------------
// GET /intents
// ---------------------------------------------------------------------------

/// Recognised intents and variant features.
pub async fn intents(State(state): State<Arc<AppState>>) -> Json<Value> {
    let terminal = state.dispatcher.chain().terminal_id();
    let technology = if terminal == ProviderId::Demo {
        "Canned demo responses"
    } else {
        "Rule-based intent classification with provider fallback"
    };

    Json(json!({
        "capabilities": Intent::ALL,
        "technology": technology,
        "features": state.variant().features(),
    }))
}

// ---------------------------------------------------------------------------
// GET /conversation/history
// ---------------------------------------------------------------------------

/// Recent exchanges, oldest first.
pub async fn history(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "history": state.history().snapshot() }))
}

// ---------------------------------------------------------------------------
// GET /sessions
// ---------------------------------------------------------------------------

/// Open WebSocket sessions.
pub async fn sessions(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "active": state.sessions.count(),
        "sessions": state.sessions.snapshot(),
    }))
}
