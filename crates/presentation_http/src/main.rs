//! Smart tagging HTTP server
//!
//! Main entry point for the HTTP API server.

use std::{future::IntoFuture, time::Duration};

use infrastructure::{AppConfig, DEFAULT_LOG_FILTER, LogFormat, init_tracing};
use presentation_http::{build_state, create_router, set_expose_internal_errors};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config is loaded before tracing so the log format can come from it
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_tracing(
        LogFormat::from_config(&config.server.log_format),
        DEFAULT_LOG_FILTER,
    )?;

    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }
    for warning in config.warnings() {
        warn!("{warning}");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        host = %config.server.host,
        port = config.server.port,
        classifier = config.classifier_enabled(),
        "Smart tagging server starting"
    );

    set_expose_internal_errors(!config.is_production());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    let state = build_state(config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Server listening");

    let (stopping_tx, stopping_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = stopping_tx.send(());
        })
        .into_future();

    // Connections still open `shutdown_timeout` after the signal are dropped
    let deadline = async move {
        if stopping_rx.await.is_err() {
            std::future::pending::<()>().await;
        }
        info!(?shutdown_timeout, "Draining open connections");
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = server => result?,
        () = deadline => warn!("Shutdown timeout elapsed, closing remaining connections"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
