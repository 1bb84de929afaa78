//! Lyrics Edge Proxy
//!
//! An edge proxy for a lyrics metadata API, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                 LYRICS PROXY                  │
//!                    │                                               │
//!   Client Request   │  ┌────────┐   ┌───────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│ secret │──▶│rate limit │──▶│   cache   │  │
//!                    │  │  gate  │   │   gate    │   │   gate    │  │
//!                    │  └────────┘   └───────────┘   └─────┬─────┘  │
//!                    │                                     │ miss   │
//!                    │                                     ▼        │
//!                    │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │     Upstream
//!   Client Response  │  │response │◀──│ flatten  │◀──│ upstream  │◀─┼──── lyrics API
//!   ◀────────────────┼──│+ cache  │   │   DOM    │   │  client   │  │
//!                    │  │  write  │   └──────────┘   └───────────┘  │
//!                    │  └─────────┘                                 │
//!                    │                                               │
//!                    │  config · observability · lifecycle           │
//!                    └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lyrics_proxy::config::loader;
use lyrics_proxy::lifecycle::Shutdown;
use lyrics_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "lyrics-proxy")]
#[command(about = "Edge proxy for a lyrics metadata API", long_about = None)]
struct Cli {
    /// Path to the TOML config file. Defaults are used when absent.
    #[arg(short, long, default_value = "lyrics-proxy.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lyrics_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("lyrics-proxy v0.1.0 starting");

    let cli = Cli::parse();
    let config = if cli.config.exists() {
        loader::load_config(&cli.config)?
    } else {
        tracing::warn!(path = %cli.config.display(), "Config file not found, using defaults");
        loader::default_config()?
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        auth_configured = config.auth.shared_secret.is_some(),
        rate_limit_enabled = config.rate_limit.enabled,
        cache_enabled = config.cache.enabled,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Initialize metrics server
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            lyrics_proxy::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Wire Ctrl+C into the shutdown coordinator
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.trigger();
        }
    });

    // Create and run HTTP server
    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
