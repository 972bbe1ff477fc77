//! WebSocket handler for real-time rule table updates.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::server::events;
use crate::server::state::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handles an individual WebSocket connection.
///
/// The client first receives the current rule table, then every snapshot
/// broadcast after an update until it disconnects.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before taking the snapshot so no update falls in between.
    let mut rx = state.subscribe();
    tracing::info!(clients = state.client_count(), "Client connected to WebSocket");

    let initial = match state.store.snapshot() {
        Ok(table) => events::all_rules_updated(&table),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read rule table for new client");
            None
        }
    };
    let Some(initial) = initial else {
        let _ = sender.send(Message::Close(None)).await;
        return;
    };
    if sender.send(Message::Text(initial)).await.is_err() {
        tracing::debug!("Client went away before the initial snapshot");
        return;
    }

    // Forward broadcasts to this client
    let send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(msg) => {
                    if sender.send(Message::Text(msg)).await.is_err() {
                        break;
                    }
                }
                // Every message is a full snapshot, so skipping ahead is safe.
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Slow WebSocket client skipped snapshots");
                }
                Err(RecvError::Closed) => break,
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    });

    // Clients never send commands; only watch for close
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    let send_abort = send_task.abort_handle();
    let recv_abort = recv_task.abort_handle();

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
        _ = state.shutdown.wait() => {},
    }

    send_abort.abort();
    recv_abort.abort();

    tracing::info!("Client disconnected from WebSocket");
}
