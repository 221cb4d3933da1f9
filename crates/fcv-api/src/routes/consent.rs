//! # Consent Validation API
//!
//! `POST /consent/validate` takes a raw FHIR `Consent` document and always
//! answers `200 OK`. The body carries either the simplified consent or the
//! complete list of violations.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use fcv_core::{SimplifiedConsent, Violation};
use fcv_engine::ProjectionResult;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// Overall verdict on a submitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Valid,
    Invalid,
}

/// Response body of `POST /consent/validate`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationResponse {
    pub outcome: Outcome,
    /// Present when the document is valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub consent: Option<SimplifiedConsent>,
    /// Present when the document is invalid; one entry per violation.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub errors: Option<Vec<Violation>>,
}

impl From<ProjectionResult> for ValidationResponse {
    fn from(result: ProjectionResult) -> Self {
        match result {
            ProjectionResult::Accepted(consent) => Self {
                outcome: Outcome::Valid,
                consent: Some(consent),
                errors: None,
            },
            rejected => Self {
                outcome: Outcome::Invalid,
                consent: None,
                errors: Some(rejected.violations()),
            },
        }
    }
}

/// Build the consent router.
pub fn router() -> Router<AppState> {
    Router::new().route("/consent/validate", post(validate_consent))
}

/// POST /consent/validate — Validate and project a consent document.
#[utoipa::path(
    post,
    path = "/consent/validate",
    request_body(content = String, description = "FHIR Consent document", content_type = "application/json"),
    responses(
        (status = 200, description = "Validation outcome", body = ValidationResponse),
        (status = 400, description = "Request body could not be read", body = crate::error::ErrorBody),
    ),
    tag = "consent"
)]
pub(crate) async fn validate_consent(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ValidationResponse>, AppError> {
    let body = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let result = state.projector.project(&body);
    let label = if result.is_accepted() { "valid" } else { "invalid" };
    metrics::counter!("fcv_consent_validations_total", "outcome" => label).increment(1);

    Ok(Json(ValidationResponse::from(result)))
}
