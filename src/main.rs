//! Edge redirect emulator.
//!
//! Runs the redirect engine behind a local HTTP listener so a rule set can be
//! previewed with a browser or curl before it is deployed to the edge.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request     ┌──────────────────────────────────────────────┐
//!     ───────────────────┼─▶ http::server ──▶ engine::decide ──┐       │
//!                        │                        │             │       │
//!                        │                 routing::table   engine::query
//!     301/302 + Location │                                      │       │
//!     ◀──────────────────┼──────────────────────────────────────┘       │
//!                        │                                              │
//!                        │  config (TOML, hot reload) · observability   │
//!                        │  lifecycle (signals, graceful shutdown)      │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use edge_redirect::config::{load_config, watcher::ConfigWatcher, RedirectConfig};
use edge_redirect::observability::{logging, metrics};
use edge_redirect::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "edge-redirect")]
#[command(about = "Local edge emulator for the redirect rule engine", long_about = None)]
struct Args {
    /// Rule file (TOML). Without it the canonical table for --domain is served.
    #[arg(short, long, env = "EDGE_REDIRECT_CONFIG")]
    config: Option<PathBuf>,

    /// Domain for the canonical table.
    #[arg(short, long, default_value = "example.com")]
    domain: String,

    /// Reload rules when the config file changes.
    #[arg(short, long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RedirectConfig::canonical(&args.domain),
    };

    logging::init_logging(&config.observability);

    tracing::info!("edge-redirect v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        canonical_domain = %config.canonical_domain,
        rules = config.rules.len(),
        encoding = ?config.query.encoding,
        prefix_match = ?config.matching.prefix_match,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    // The watcher must outlive the server; dropping it stops notifications.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (Some(watcher.run()?), rx)
        }
        _ => {
            let (_, rx) = mpsc::unbounded_channel();
            (None, rx)
        }
    };

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
