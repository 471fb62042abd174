pub mod api;
pub mod models;
pub mod processor;
pub mod services;
pub mod storage;


use std::sync::Arc;
use common::config::Settings;
use common::{Error, Result};
use serde_json::{Map, Value};
use services::MetricsService;
use tokio::net::TcpListener;
use std::net::{IpAddr, SocketAddr};
use tracing::info;

/// Connects to the search index and serves the metrics process over HTTP.
pub async fn run_metrics_server(config_path: &str) -> Result<()> {
    // Load configuration
    let config = Settings::new(config_path)?;

    // Initialize metrics service
    let service = Arc::new(MetricsService::new(&config).await?);

    // Create API router
    let api_router = api::routes(Arc::clone(&service));

    // Start the server
    let host: IpAddr = config
        .api_host
        .parse()
        .map_err(|e| Error::Configuration(format!("invalid api_host '{}': {}", config.api_host, e)))?;
    let addr = SocketAddr::new(host, config.api_port);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Metrics API server listening");
    axum::serve(listener, api_router).await?;

    Ok(())
}

/// Runs a single metrics request and returns the decomposed response.
pub async fn run_metrics_query(config_path: &str, inputs: &Map<String, Value>) -> Result<Value> {
    let config = Settings::new(config_path)?;
    let service = MetricsService::new(&config).await?;

    service.execute(inputs).await
}
