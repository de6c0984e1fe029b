//! Real-time update stream (WebSocket).

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::app::AppState;
use crate::services::UpdateBroadcaster;

/// HTTP handler that upgrades the connection to WebSocket.
///
/// GET /api/v1/updates
///
/// Each accepted location sample is forwarded as one JSON text frame, in
/// acceptance order. There is no replay: clients that need current state
/// on connect should query the latest snapshot first.
pub async fn subscribe_updates(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.updates.clone()))
}

/// Manage one observer connection after upgrade.
///
/// The subscription is taken before splitting the socket, so the observer
/// misses nothing published after the upgrade completes. A sender task
/// forwards broadcast samples to the sink; the receive loop only watches
/// for close. Dropping the receiver on disconnect releases the
/// subscription slot.
async fn handle_socket(socket: WebSocket, updates: UpdateBroadcaster) {
    let conn_id = Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "Observer connected");

    let mut rx = updates.subscribe();
    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(sample) => {
                    let payload = match serde_json::to_string(&sample) {
                        Ok(payload) => payload,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to serialize sample");
                            continue;
                        }
                    };
                    if sink.send(Message::Text(payload)).await.is_err() {
                        tracing::debug!(conn_id = %sender_conn_id, "Observer sink closed");
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // This observer fell behind; it loses its own backlog
                    // and nothing else.
                    tracing::debug!(
                        conn_id = %sender_conn_id,
                        skipped = skipped,
                        "Observer lagged, dropping missed samples"
                    );
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "Observer receive error");
                break;
            }
        }
    }

    send_task.abort();
    tracing::info!(conn_id = %conn_id, "Observer disconnected");
}
