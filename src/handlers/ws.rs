use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::store::Snapshot;
use crate::AppState;

/// Live collection feed. Sends the full current collection as soon as the
/// socket opens and again after every committed change.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn snapshot_message(habits: &Snapshot) -> Message {
    let msg = serde_json::json!({
        "type": "snapshot",
        "habits": habits,
    });
    Message::Text(msg.to_string())
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    tracing::debug!("WebSocket connection established");

    // Subscribe before the initial read so no change slips between them.
    let mut rx = state.store.subscribe();
    let store = state.store.clone();

    let mut send_task = tokio::spawn(async move {
        match store.list().await {
            Ok(habits) => {
                if sender.send(snapshot_message(&habits)).await.is_err() {
                    return;
                }
            }
            Err(e) => {
                let msg = serde_json::json!({ "type": "error", "message": e.to_string() });
                let _ = sender.send(Message::Text(msg.to_string())).await;
            }
        }

        loop {
            match rx.recv().await {
                Ok(snapshot) => {
                    if sender.send(snapshot_message(&snapshot)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Only the latest state matters; resync from the store.
                    tracing::debug!(skipped, "Snapshot receiver lagged, resyncing");
                    match store.list().await {
                        Ok(habits) => {
                            if sender.send(snapshot_message(&habits)).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            let msg = serde_json::json!({
                                "type": "error",
                                "message": e.to_string(),
                            });
                            if sender.send(Message::Text(msg.to_string())).await.is_err() {
                                break;
                            }
                        }
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Drain the client side; only Close matters.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::debug!("WebSocket connection closed");
}
