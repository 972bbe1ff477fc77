//! Lucky Dashboard
//!
//! Webhook receiver and realtime dashboard for Lucky STUN endpoints.

use lucky_dashboard::config::Config;
use lucky_dashboard::server::{self, state::AppState};
use lucky_dashboard::shutdown::Shutdown;
use lucky_dashboard::store::RuleStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lucky_dashboard=info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(?config, "Starting Lucky Dashboard backend");

    let store = Arc::new(RuleStore::load(&config.data_file));

    // Ctrl+C stops accepting requests and closes realtime connections
    let shutdown = Shutdown::new();
    let shutdown_ctrlc = shutdown.clone();
    ctrlc::set_handler(move || {
        tracing::info!("Shutdown signal received");
        shutdown_ctrlc.trigger();
    })?;

    let state = Arc::new(AppState::new(
        Arc::clone(&store),
        config.broadcast_capacity,
        shutdown,
    ));

    let addr = config.bind_addr();
    println!("🌐 Lucky Dashboard available at http://{}", addr);
    println!("   • POST /update_lucky_ip - Webhook receiver");
    println!("   • GET  /get_lucky_ip    - Current rules");
    println!("   • WS   /ws              - Real-time updates");

    server::run_server(addr, state).await?;

    match store.len() {
        Ok(rules) => tracing::info!(rules, "Lucky Dashboard stopped"),
        Err(e) => tracing::warn!(error = %e, "Lucky Dashboard stopped"),
    }
    Ok(())
}
