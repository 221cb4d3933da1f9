//! # fcv-api — Axum HTTP Service for Consent Validation
//!
//! Exposes the consent projector over HTTP.
//!
//! ## API Surface
//!
//! | Route                    | Module                | Purpose                       |
//! |--------------------------|-----------------------|-------------------------------|
//! | `POST /consent/validate` | [`routes::consent`]   | Validate and project a document |
//! | `GET /openapi.json`      | [`openapi`]           | Generated OpenAPI spec        |
//! | `GET /metrics`           | this module           | Prometheus exposition         |
//! | `GET /health/*`          | this module           | Liveness and readiness probes |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers; delegates to `fcv-engine`.
//! - Validation outcomes are always `200`; `AppError` covers transport
//!   failures only.

pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::consent::router())
        .merge(openapi::router())
        .route("/metrics", get(render_metrics))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — the schema is loaded before the listener binds, so a
/// serving process is ready.
async fn readiness() -> &'static str {
    "ready"
}

/// GET /metrics — Prometheus text exposition.
async fn render_metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics()
        .map(|handle| handle.render())
        .ok_or_else(|| AppError::NotFound("metrics recorder not installed".to_string()))
}
