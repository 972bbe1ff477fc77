//! HTTP server module for the webhook, API and WebSocket endpoints.
//!
//! Receives endpoint notifications from Lucky STUN webhooks and pushes the
//! resulting rule table to dashboards in real time.

pub mod error;
pub mod events;
pub mod routes;
pub mod state;
pub mod ws;

use crate::server::routes::{dashboard, health, lucky_ip};
use crate::server::state::AppState;
use crate::server::ws::ws_handler;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Builds the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Webhook callers and dashboards may live on any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Dashboard
        .route("/", get(dashboard::index))
        // Health check
        .route("/health", get(health::health_check))
        // Rule API
        .route("/update_lucky_ip", post(lucky_ip::update_lucky_ip))
        .route("/get_lucky_ip", get(lucky_ip::get_lucky_ip))
        // WebSocket
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}

/// Binds `addr` and serves until shutdown is triggered.
pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}

/// Serves on an already bound listener until shutdown is triggered.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let shutdown = state.shutdown.clone();
    let app = build_router(state);

    tracing::info!("HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
}
