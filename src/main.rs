mod catalog;
mod config;
mod error;
mod handlers;
mod state;
mod suggest;

use crate::config::Config;
use crate::handlers::{
    get_config_handler, health_handler, ready_handler, suggest_handler, tools_handler,
    update_config_handler, ws_handler,
};
use crate::state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toolsense=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Toolsense suggestion service");

    // Load configuration
    let config = Config::from_env()?;
    let shutdown_timeout = config.shutdown_timeout_secs;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Set up Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    // Initialize application state (loads and indexes the catalog)
    let start = std::time::Instant::now();
    let state = AppState::new(config)?;
    let state = Arc::new(state);
    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        tools = state.engine().tool_count(),
        "State initialized",
    );

    // Build router
    let app = Router::new()
        // Real-time suggestion protocol
        .route("/ws/suggest", get(ws_handler))
        // REST fallback and catalog inspection
        .route("/api/suggest", post(suggest_handler))
        .route("/api/tools", get(tools_handler))
        .route(
            "/api/config",
            get(get_config_handler).post(update_config_handler),
        )
        // Health endpoints
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        // Metrics endpoint
        .route(
            "/metrics",
            get(move || {
                let handle = prometheus_handle.clone();
                async move { handle.render() }
            }),
        )
        // Middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        // State
        .with_state(state);

    // Create TCP listener
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolve once a shutdown signal arrives, then hold the server open for
/// `drain_secs` so in-flight suggestion requests can finish.
async fn shutdown_signal(drain_secs: u64) {
    let signal_name = tokio::select! {
        _ = wait_for_ctrl_c() => "ctrl-c",
        _ = wait_for_sigterm() => "sigterm",
    };
    tracing::info!(signal = signal_name, drain_secs, "Shutdown signal received, draining");

    if drain_secs > 0 {
        tokio::time::sleep(Duration::from_secs(drain_secs)).await;
    }
}

async fn wait_for_ctrl_c() {
    signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .expect("Failed to install SIGTERM handler")
        .recv()
        .await;
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await;
}
