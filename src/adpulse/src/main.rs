//! AdPulse — Meta-ads performance analytics service.
//!
//! Main entry point that wires the record store, session cache, ingest
//! client, and REST server together.

use adpulse_api::{ApiServer, AppState};
use adpulse_cache::{RecordStore, SessionCache};
use adpulse_core::config::AppConfig;
use adpulse_ingest::RecordFetcher;
use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "adpulse")]
#[command(about = "Meta-ads performance analytics service")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "ADPULSE__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "ADPULSE__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Upstream records backend base URL (overrides config)
    #[arg(long, env = "ADPULSE__INGEST__BASE_URL")]
    base_url: Option<String>,

    /// Session cache file path; empty disables persistence
    #[arg(long, env = "ADPULSE__CACHE__PATH")]
    cache_path: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adpulse=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("AdPulse starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(base_url) = cli.base_url {
        config.ingest.base_url = base_url;
    }
    if let Some(path) = cli.cache_path {
        config.cache.path = path;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        base_url = %config.ingest.base_url,
        "Configuration loaded"
    );

    // Session cache, optionally file-backed
    let session = Arc::new(if config.cache.path.is_empty() {
        SessionCache::new(config.cache.validity_hours)
    } else {
        SessionCache::with_persistence(&config.cache.path, config.cache.validity_hours)
    });

    // Upstream ingest client
    let fetcher = Arc::new(RecordFetcher::new(&config.ingest)?);

    let state = AppState {
        records: Arc::new(RecordStore::new()),
        session: session.clone(),
        fetcher,
        node_id: config.node_id.clone(),
        start_time: Instant::now(),
    };

    let api_server = ApiServer::new(config.clone(), state);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    // Persist the session cache periodically
    let session_for_persist = session.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            if let Err(e) = session_for_persist.persist() {
                error!(error = %e, "Periodic session cache persist failed");
            }
        }
    });

    info!("AdPulse is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
