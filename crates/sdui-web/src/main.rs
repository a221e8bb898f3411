//! SDUI Web Server
//!
//! Loads the panel graph, builds the dispatcher and serves it over HTTP and
//! WebSocket until SIGINT/SIGTERM.

use anyhow::{Context, Result};
use sdui::{graph, Dispatcher, GraphStore};
use sdui_web::{build_router, ServerConfig, ServerState};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sdui_web=debug,sdui=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SDUI Web Server");

    let config = ServerConfig::from_env().context("invalid server configuration")?;

    let graph = match &config.graph_path {
        Some(path) => GraphStore::load(path)
            .with_context(|| format!("failed to load graph from {}", path.display()))?,
        None => {
            tracing::info!("No graph document configured, using the sample graph");
            graph::sample_graph().context("built-in sample graph is invalid")?
        }
    };

    tracing::info!("Serving static files from: {}", config.static_dir.display());

    let addr = config.bind_addr;
    let state = ServerState::new(Dispatcher::standard(graph), config);
    let connections = state.connections.clone();
    let app = build_router(state);

    tracing::info!("");
    tracing::info!("===========================================");
    tracing::info!("  SDUI Web Server running on http://{}", addr);
    tracing::info!("===========================================");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  /api/server           - Dispatch an action (GET/POST/PUT)");
    tracing::info!("  /ws?instance=<id>     - WebSocket command channel");
    tracing::info!("  /status               - Server status");
    tracing::info!("  /help                 - Endpoint list");
    tracing::info!("");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Port {} is already in use. Try: lsof -ti:{} | xargs kill -9",
                    addr.port(),
                    addr.port()
                );
            }
            return Err(e).with_context(|| format!("failed to bind to {}", addr));
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let closed = connections.close_all().await;
            tracing::info!("Sent close to {} WebSocket connection(s)", closed);
        })
        .await
        .context("server exited with an error")?;

    tracing::info!("Server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
