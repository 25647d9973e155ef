// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use crate::application::chart_service::ChartService;
use crate::infrastructure::config::load_stats_config;
use crate::infrastructure::http_metric_source::HttpMetricSource;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let stats_config = load_stats_config()?;

    // Create metric source (infrastructure layer)
    let source = Arc::new(HttpMetricSource::new(&stats_config.metrics_api));

    // Create services (application layer)
    let chart_service = ChartService::new(source, stats_config.chart.palette.clone());

    let state = Arc::new(AppState { chart_service });

    // Build router (presentation layer)
    let router = router(state);

    let addr: SocketAddr = stats_config.server.bind.parse()?;
    tracing::info!(
        "Starting chain-stats-charts on {} (stats api: {})",
        addr,
        stats_config.metrics_api.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
