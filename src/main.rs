//! Form handlers server.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 FORM HANDLERS                │
//!                         │                                              │
//!     Client Request      │  ┌─────────┐    ┌──────────┐                 │
//!     ────────────────────┼─▶│  axum   │───▶│  router  │                 │
//!                         │  │ server  │    └────┬─────┘                 │
//!                         │  └─────────┘         │                       │
//!                         │        ┌─────────────┼──────────────┐        │
//!                         │        ▼             ▼              ▼        │
//!                         │  ┌──────────┐  ┌──────────┐  ┌──────────┐    │
//!                         │  │  upload  │  │   echo   │  │  poster  │────┼──▶ Remote
//!                         │  └────┬─────┘  └──────────┘  └──────────┘    │    endpoint
//!                         │       ▼                                      │
//!                         │  upload directory                            │
//!                         │                                              │
//!                         │  Cross-cutting: config, observability,       │
//!                         │  lifecycle (graceful shutdown)               │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use form_handlers::config::{load_config, validate_config, AppConfig, ConfigError};
use form_handlers::lifecycle::{shutdown_signal, Shutdown};
use form_handlers::observability::{logging, metrics};
use form_handlers::HttpServer;

#[derive(Parser)]
#[command(name = "form-handlers")]
#[command(about = "Upload, echo and form-post handlers over HTTP", long_about = None)]
struct Args {
    /// TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long, env = "FORM_HANDLERS_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);

    tracing::info!("form-handlers v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        upload_dir = %config.upload.directory.display(),
        poster_endpoint = %config.poster.endpoint,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config)?;

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
