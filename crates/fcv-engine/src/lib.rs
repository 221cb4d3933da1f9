//! # fcv-engine — Field Extraction & Consent Projection
//!
//! Turns a schema-valid FHIR `Consent` document into a
//! [`SimplifiedConsent`](fcv_core::SimplifiedConsent).
//!
//! ## Components
//!
//! - [`extract`] — one pure function per summary field, over a parsed
//!   `serde_json::Value`.
//! - [`ConsentProjector`] — parse, check, then extract. Produces a
//!   [`ProjectionResult`] that is `Rejected`, `Malformed` or `Accepted`.
//!
//! ## Crate Policy
//!
//! - Depends on `fcv-core` and `fcv-schema` only.
//! - Extraction problems are values ([`ExtractError`]), never panics.
//! - Stateless apart from the shared, read-only schema; every call is
//!   independent and idempotent.

pub mod extract;
pub mod project;

pub use extract::{
    extract_actors, extract_consent, extract_custodian, extract_data_classes, extract_period,
    extract_subject, extract_version, ExtractError,
};
pub use project::{ConsentProjector, ProjectionResult};
