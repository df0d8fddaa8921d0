//! logdash-web - Logistics reporting dashboard
//!
//! Loads the shipments CSV, serves the single-page dashboard and its JSON
//! and CSV endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use logdash_common::config::{load_toml_config_or_default, CliOverrides, DashboardConfig};
use logdash_common::pipeline::load_and_summarize;
use logdash_common::{DatasetCache, FilterSelection};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logdash_web::{build_router, AppState};

/// Command-line arguments for logdash-web
#[derive(Parser, Debug)]
#[command(name = "logdash-web")]
#[command(about = "Interactive reporting dashboard over a logistics CSV")]
#[command(version)]
struct Args {
    /// Source CSV file (default: logistica.csv)
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Read ambiguous numeric dates as day/month/year
    #[arg(long)]
    day_first: Option<bool>,

    /// Field delimiter (single character, or "tab")
    #[arg(long)]
    delimiter: Option<String>,

    /// Load the dataset, log the unfiltered summary and exit
    #[arg(long)]
    check: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            data_file: self.data_file.clone(),
            host: self.host.clone(),
            port: self.port,
            day_first: self.day_first,
            delimiter: self.delimiter.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "logdash_web=info,logdash_common=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Log build identification immediately after tracing init
    info!(
        "Starting logdash-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    let toml = load_toml_config_or_default();
    let config = DashboardConfig::resolve(&args.overrides(), &toml)
        .context("Failed to resolve configuration")?;
    info!("Data file: {}", config.data_file.display());

    if args.check {
        return run_check(&config);
    }

    let cache = Arc::new(DatasetCache::new(&config.data_file, config.load.clone()));

    // Warm the cache; a failure here is reported per request, not fatal
    if let Err(e) = cache.get() {
        warn!("Dataset not loaded at startup: {}", e);
    }

    let app = build_router(AppState::new(cache));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("logdash-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Headless mode: load, summarize the unfiltered view, exit
fn run_check(config: &DashboardConfig) -> Result<()> {
    match load_and_summarize(&config.data_file, &config.load, &FilterSelection::default()) {
        Ok(summary) => {
            info!(
                "total={} on_time={} ({}) late={}",
                summary.total, summary.on_time, summary.on_time_pct, summary.late
            );
            for (ejecutivo, trips) in &summary.trips_per_executive {
                info!("  {}: {} trip(s)", ejecutivo, trips);
            }
            if summary.no_delays() {
                info!("No delays");
            } else {
                for (cliente, delays) in &summary.delays_per_client {
                    info!("  {}: {} delay(s)", cliente, delays);
                }
            }
            Ok(())
        }
        Err(e) => {
            error!("Failed to load dataset: {}", e);
            Err(e.into())
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
