//! holonet-ag - paginated REST aggregator
//!
//! Fetches the planets and people collections from the remote API on first
//! use, keeps them for the life of the process and serves them back with
//! resident-name enrichment, sorting and pagination.

use anyhow::Result;
use clap::Parser;
use holonet_common::config::{AggregatorConfig, ConfigOverrides};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use holonet_ag::{build_router, AppState};

/// Command-line arguments; each overrides environment and config file
#[derive(Debug, Parser)]
#[command(name = "holonet-ag", version, about = "Paginated REST aggregator")]
struct Args {
    /// Config file (default: <config dir>/holonet/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Remote API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Listen address
    #[arg(long)]
    bind: Option<String>,

    /// Remote request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Merge the first page instead of refetching it (`--reuse-first-page=false`
    /// overrides a `true` from the environment or config file)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    reuse_first_page: Option<bool>,

    /// Default log level (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            base_url: self.base_url.clone(),
            bind_addr: self.bind.clone(),
            request_timeout_secs: self.timeout_secs,
            reuse_first_page: self.reuse_first_page,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config resolution logs (missing config file) before the final level is known
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(env_filter(args.log_level.as_deref().unwrap_or("info")))
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || {
        AggregatorConfig::resolve(&args.overrides())
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.log_level))
        .init();

    info!(
        "Starting holonet-ag v{} (remote: {}, timeout: {}s, reuse first page: {})",
        env!("CARGO_PKG_VERSION"),
        config.base_url,
        config.request_timeout_secs,
        config.reuse_first_page
    );

    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("holonet-ag listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// RUST_LOG if set, otherwise `default_level`
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
