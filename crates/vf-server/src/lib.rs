//! vf-server: HTTP API server and transcode pipeline orchestration.
//!
//! This crate ties together the other vf-* crates into a running server
//! application. It provides:
//!
//! - Axum-based HTTP API: upload intake, asset listing, tool report
//! - Static serving of the published HLS tree
//! - The per-upload pipeline with bounded encode concurrency
//! - Graceful shutdown via signal handling, cancelling in-flight encodes

pub mod context;
pub mod error;
pub mod pipeline;
pub mod router;
pub mod routes;

use std::net::SocketAddr;

use tokio_util::sync::CancellationToken;

use vf_core::config::Config;

use crate::context::AppContext;

/// Start the vodforge server.
///
/// This is the main entry point. It constructs the [`AppContext`] and serves
/// the HTTP API until a shutdown signal is received; shutdown cancels
/// in-flight encodes so their partial output directories are discarded.
pub async fn start(config: Config) -> vf_core::Result<()> {
    // Validate configuration.
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let ctx = AppContext::new(config)?;

    // Report external tools.
    for info in ctx.tools.check_all() {
        if info.available {
            tracing::info!(
                "Tool found: {} ({})",
                info.name,
                info.version.as_deref().unwrap_or("unknown version")
            );
        } else {
            tracing::warn!("Tool not found: {}; uploads will fail until it is installed", info.name);
        }
    }

    let addr: SocketAddr = format!("{}:{}", ctx.config.server.host, ctx.config.server.port)
        .parse()
        .map_err(|e| vf_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let app = router::build_router(ctx.clone());

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| vf_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    let cancel = ctx.shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await
        .map_err(|e| vf_core::Error::Internal(format!("Server error: {e}")))?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM), then cancel the context
/// token so in-flight encodes stop before connection draining begins.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => {}
    }

    tracing::info!("Shutdown signal received");
    cancel.cancel();
}
