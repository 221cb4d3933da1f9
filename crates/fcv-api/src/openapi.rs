//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FHIR Consent Validator",
        version = "0.1.0",
        description = "Validates FHIR Consent documents against the reference schema and projects valid ones into a simplified consent record.",
        license(name = "GPL-3.0-or-later")
    ),
    paths(crate::routes::consent::validate_consent),
    components(schemas(
        crate::routes::consent::ValidationResponse,
        crate::routes::consent::Outcome,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "consent", description = "Consent validation"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
