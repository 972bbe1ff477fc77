//! Shared application state for the HTTP server.

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::server::events;
use crate::shutdown::Shutdown;
use crate::store::{RuleStore, RuleTable};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The rule table and its data file.
    pub store: Arc<RuleStore>,
    /// Broadcast channel for WebSocket updates. Each subscriber is one client.
    pub broadcast_tx: broadcast::Sender<String>,
    /// Closes open WebSocket connections on shutdown.
    pub shutdown: Shutdown,
}

impl AppState {
    /// Creates new app state with a fresh broadcast channel of `capacity`.
    pub fn new(store: Arc<RuleStore>, capacity: usize, shutdown: Shutdown) -> Self {
        let (broadcast_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            store,
            broadcast_tx,
            shutdown,
        }
    }

    /// Subscribe to the broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.broadcast_tx.subscribe()
    }

    /// Number of currently connected realtime clients.
    pub fn client_count(&self) -> usize {
        self.broadcast_tx.receiver_count()
    }

    /// Pushes `table` to every connected client as `all_rules_updated`.
    pub fn broadcast_rules(&self, table: &RuleTable) {
        let Some(message) = events::all_rules_updated(table) else {
            return;
        };

        match self.broadcast_tx.send(message) {
            Ok(receivers) => {
                tracing::debug!(receivers, "Emitted 'all_rules_updated' event to clients")
            }
            Err(_) => tracing::debug!("No realtime clients connected, skipping broadcast"),
        }
    }
}
