mod routes;
mod singleton;
mod state;
mod views;

use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use clap::Parser;
use eventboard_core::{BoardConfig, EventBoard};

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "eventboard-server")]
#[command(about = "Serve events and their RSVPs as HTML pages and a JSON API")]
struct Cli {
    /// Config file (default: ~/.config/eventboard/config.toml, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding PORT and the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON document holding the events
    #[arg(long)]
    data_file: Option<PathBuf>,
}

/// Install the global `tracing` subscriber, filtered by `RUST_LOG` (default
/// `info`).
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = BoardConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }

    // Ensure only one instance serves this document
    let data_path = config.data_path();
    let _lock = singleton::acquire_lock(&data_path)?;

    let board = EventBoard::from_config(&config);
    // Creates the document, or resets a corrupt one, before the first request
    board.list()?;

    let app = routes::app(AppState::new(board));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        data_file = %data_path.display(),
        id_assignment = ?config.id_assignment,
        "eventboard-server listening"
    );

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
