//! HTTP server initialization and runtime setup.
//!
//! Opens the configured store, spawns the hit worker and runs Axum until a
//! shutdown signal arrives. Shutdown order: stop accepting requests, close the
//! hit queue, drain the worker, close the store.

use crate::application::services::LinkService;
use crate::config::Config;
use crate::domain::hit_worker::run_hit_worker;
use crate::infrastructure::persistence::open_store;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be opened
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = open_store(&config).await?;

    let (hit_tx, hit_rx) = mpsc::channel(config.hit_queue_capacity);
    let worker = tokio::spawn(run_hit_worker(
        hit_rx,
        store.clone(),
        config.hit_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.hit_worker_concurrency,
        "Hit worker started"
    );

    let link_service = Arc::new(LinkService::new(
        store.clone(),
        Arc::new(RandomCodeGenerator),
    ));
    let state = AppState::new(link_service, hit_tx, config.public_base_url.clone());

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and every hit sender clone in its state) is gone now.
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Hit worker panicked");
    }
    store.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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
