//! # Consent Projector
//!
//! Composes the [`ConformanceChecker`] and the field extractors into a
//! single gate: raw bytes in, a [`ProjectionResult`] out.
//!
//! ```text
//! bytes ──parse──▶ Value ──check──▶ valid ──extract──▶ Accepted
//!          │                  │                 │
//!          ▼                  ▼                 ▼
//!      Malformed           Rejected         Malformed
//! ```
//!
//! Extraction only runs on documents the checker accepted, so an extraction
//! failure indicates a mismatch between the schema and the extraction rules.
//! It is reported as `Malformed` and logged at error level rather than
//! propagated as a fault.

use std::path::Path;

use fcv_core::{SimplifiedConsent, Violation};
use fcv_schema::{read_document, ConformanceChecker, DocumentError};
use serde_json::Value;

use crate::extract::extract_consent;

/// Outcome of projecting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionResult {
    /// The document parsed but failed schema validation.
    Rejected {
        /// Every violation, in evaluator order.
        violations: Vec<Violation>,
    },
    /// The bytes are not JSON, or a schema-valid document could not be
    /// projected.
    Malformed {
        /// Parser or extractor message.
        reason: String,
    },
    /// The document is valid and was projected.
    Accepted(SimplifiedConsent),
}

impl ProjectionResult {
    /// Whether the document was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Flatten into the violations a client sees.
    ///
    /// `Malformed` becomes a single `syntax` violation; `Accepted` has none.
    pub fn violations(&self) -> Vec<Violation> {
        match self {
            Self::Rejected { violations } => violations.clone(),
            Self::Malformed { reason } => vec![Violation::syntax(reason.clone())],
            Self::Accepted(_) => Vec::new(),
        }
    }
}

/// Validates documents and projects the valid ones into a
/// [`SimplifiedConsent`].
#[derive(Debug, Clone)]
pub struct ConsentProjector {
    checker: ConformanceChecker,
}

impl ConsentProjector {
    pub fn new(checker: ConformanceChecker) -> Self {
        Self { checker }
    }

    /// The checker used as the schema gate.
    pub fn checker(&self) -> &ConformanceChecker {
        &self.checker
    }

    /// Project raw document bytes.
    pub fn project(&self, raw: &[u8]) -> ProjectionResult {
        match serde_json::from_slice::<Value>(raw) {
            Ok(doc) => self.project_value(&doc),
            Err(e) => {
                tracing::warn!(error = %e, "rejecting unparseable document");
                ProjectionResult::Malformed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Project an already-parsed document.
    pub fn project_value(&self, doc: &Value) -> ProjectionResult {
        let outcome = self.checker.check_value(doc);
        if !outcome.is_valid() {
            tracing::warn!(
                violations = outcome.violations().len(),
                "rejecting non-conformant document"
            );
            return ProjectionResult::Rejected {
                violations: outcome.into_violations(),
            };
        }

        match extract_consent(doc) {
            Ok(consent) => ProjectionResult::Accepted(consent),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    schema = %self.checker.schema().source(),
                    "schema-valid document failed extraction; schema and extraction rules disagree"
                );
                ProjectionResult::Malformed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Read and project the document stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if the file cannot be read.
    pub fn project_file(&self, path: &Path) -> Result<ProjectionResult, DocumentError> {
        let raw = read_document(path)?;
        Ok(self.project(&raw))
    }
}
