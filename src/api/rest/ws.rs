use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};
use uuid::Uuid;

use crate::notify::Event;
use crate::state::AppState;

/// Global firehose: every workflow event.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rx = state.notifications.subscribe_global();
    ws.on_upgrade(move |socket| relay_events(socket, rx, "global"))
}

/// Per-delivery channel: status changes, location updates and payment for
/// one delivery only.
pub async fn delivery_ws_handler(
    ws: WebSocketUpgrade,
    Path(delivery_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rx = state.notifications.subscribe_delivery(delivery_id);
    ws.on_upgrade(move |socket| relay_events(socket, rx, "delivery"))
}

async fn relay_events(socket: WebSocket, rx: broadcast::Receiver<Event>, channel: &'static str) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = BroadcastStream::new(rx);

    info!(channel, "websocket client connected");

    let send_task = tokio::spawn(async move {
        while let Some(result) = events.next().await {
            // A lagged receiver skips ahead; live relay has no replay.
            let Ok(event) = result else { continue };

            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize event for ws");
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    info!(channel, "websocket client disconnected");
}
