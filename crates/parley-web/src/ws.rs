//! WebSocket handler for duplex chat.
//!
//! Clients connect to `/ws` and send `{"message": "..."}` text frames.  Each
//! frame is answered with a reply envelope (preceded by a typing indicator
//! on the search variant).  Malformed frames get an error frame and the
//! session stays open.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::dispatch::Outbound;
use crate::state::AppState;

/// Axum handler that upgrades the HTTP connection to a WebSocket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Process a single WebSocket connection.
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let session_id = state.sessions.register();

    while let Some(Ok(msg)) = socket.recv().await {
        let text = match msg {
            Message::Text(t) => t,
            Message::Close(_) => break,
            // Ignore binary, ping, pong.
            _ => continue,
        };

        let frames = state.dispatcher.handle_frame(&text).await;
        if let Err(e) = send_all(&mut socket, session_id, &state, &frames).await {
            tracing::debug!(session_id = %session_id, error = %e, "send failed, closing session");
            break;
        }
    }

    state.sessions.deregister(session_id);
}

async fn send_all(
    socket: &mut WebSocket,
    session_id: Uuid,
    state: &AppState,
    frames: &[Outbound],
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    for frame in frames {
        if matches!(frame, Outbound::Reply(_)) {
            state.sessions.record_message(session_id)?;
        }
        send(socket, frame).await?;
    }
    Ok(())
}

/// Serialize and send a JSON frame over the WebSocket.
async fn send(
    socket: &mut WebSocket,
    frame: &Outbound,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let json = frame.to_json()?;
    socket.send(Message::Text(json.into())).await?;
    Ok(())
}
