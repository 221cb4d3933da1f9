//! # fcv-api — Binary Entry Point
//!
//! Loads the consent schema once, then starts the Axum HTTP server.
//! Configured through `SCHEMA_PATH` and `PORT` (default 8080).

use anyhow::Context;
use fcv_api::state::{AppConfig, AppState};
use fcv_schema::SchemaStore;
use metrics_exporter_prometheus::PrometheusBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;

    // A schema that fails to load is fatal.
    let store = SchemaStore::new();
    let schema = store
        .load(config.schema_source())
        .context("failed to load consent schema")?;

    let mut state = AppState::new(config, schema);
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => tracing::warn!("Prometheus recorder not installed: {e}. /metrics will return 404."),
    }

    let app = fcv_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("fcv API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
