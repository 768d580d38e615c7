//! Notes API server.
//!
//! # Architecture Overview
//!
//! ```text
//!   client ──▶ http::server (request id, trace, timeout, body limit)
//!                 │
//!                 ├─▶ /health
//!                 ├─▶ /integrations/webhooks/demo ──▶ security::signature
//!                 ├─▶ /notes/* ──▶ security::api_key ──▶ store / export
//!                 └─▶ /integrations/github/* ──▶ integrations::github
//!                                                   │
//!                                                   ▼
//!                                        integrations::http_client
//!                                        (retries + capped backoff)
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use notes_api::config::load_from_env;
use notes_api::lifecycle::{wait_for_shutdown_signal, Shutdown};
use notes_api::observability::{init_logging, metrics};
use notes_api::HttpServer;

#[derive(Parser)]
#[command(name = "notes-api", version, about = "Notes API server")]
struct Args {
    /// Path to a TOML config file (overrides NOTES_API_CONFIG).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_from_env(args.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "notes-api starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        metrics_enabled = config.observability.metrics_enabled,
        slack = config.slack.webhook_url.is_some(),
        github = config.github.token.is_some(),
        "Configuration loaded"
    );

    let metrics_handle = if config.observability.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install metrics recorder");
                None
            }
        }
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, metrics_handle)?;
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
