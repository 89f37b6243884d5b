//! # cmgr-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the content manager.
//! Binds to configurable port (default 8080).

use cmgr_api::state::{AppConfig, LogFormat};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Build configuration from environment.
    let config = AppConfig::from_env();

    // Initialize structured tracing.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let metrics = PrometheusBuilder::new().install_recorder().map_err(|e| {
        tracing::error!("Metrics recorder installation failed: {e}");
        e
    })?;

    let port = config.port;
    let state = cmgr_api::bootstrap::bootstrap(config)
        .map_err(|e| {
            tracing::error!("Bootstrap failed: {e}");
            e
        })?
        .with_metrics(metrics);

    let app = cmgr_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Content manager API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
