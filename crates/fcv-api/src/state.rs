//! # Application State
//!
//! Configuration is read once at startup into [`AppConfig`]; the schema is
//! loaded once into the [`ConsentProjector`] held by [`AppState`] and shared
//! read-only across all requests.

use std::sync::Arc;

use fcv_engine::ConsentProjector;
use fcv_schema::{ConformanceChecker, Schema, SchemaSource, SchemaStoreError};
use metrics_exporter_prometheus::PrometheusHandle;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Location of the consent schema. `None` selects the embedded schema.
    pub schema_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            schema_path: None,
        }
    }
}

impl AppConfig {
    /// Build configuration from `PORT` and `SCHEMA_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// An unparseable `PORT` falls back to [`DEFAULT_PORT`]. A blank
    /// `SCHEMA_PATH` is treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(port = %raw, default = DEFAULT_PORT, "ignoring invalid PORT");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };
        let schema_path = lookup("SCHEMA_PATH").filter(|p| !p.trim().is_empty());
        Self { port, schema_path }
    }

    /// The schema source this configuration selects.
    pub fn schema_source(&self) -> SchemaSource {
        SchemaSource::from_config(self.schema_path.as_deref())
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub projector: ConsentProjector,
    metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("projector", &self.projector)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// Create state around an already-loaded schema.
    pub fn new(config: AppConfig, schema: Arc<Schema>) -> Self {
        Self {
            config,
            projector: ConsentProjector::new(ConformanceChecker::new(schema)),
            metrics: None,
        }
    }

    /// Create state with default configuration and the embedded schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaStoreError`] if the embedded schema fails to compile.
    pub fn with_embedded_schema() -> Result<Self, SchemaStoreError> {
        let schema = Schema::load(&SchemaSource::Embedded)?;
        Ok(Self::new(AppConfig::default(), Arc::new(schema)))
    }

    /// Attach a Prometheus handle so `/metrics` can render it.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub(crate) fn metrics(&self) -> Option<&PrometheusHandle> {
        self.metrics.as_ref()
    }
}
