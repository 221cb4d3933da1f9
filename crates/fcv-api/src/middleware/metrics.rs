//! # Prometheus Metrics
//!
//! Per-request counters and latency histograms recorded through the
//! `metrics` facade. With no recorder installed (tests, embedding) the
//! macros are no-ops; the binary installs the Prometheus recorder and the
//! router renders it at `/metrics`.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Counter of handled HTTP requests, labelled by method, route and status.
pub const REQUESTS_TOTAL: &str = "fcv_http_requests_total";
/// Histogram of request latency in seconds.
pub const REQUEST_DURATION_SECONDS: &str = "fcv_http_request_duration_seconds";

/// Middleware that records request count and latency.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    // Label by route template, not raw path, to bound cardinality.
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    ::metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status
    )
    .increment(1);
    ::metrics::histogram!(
        REQUEST_DURATION_SECONDS,
        "method" => method,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());

    response
}
