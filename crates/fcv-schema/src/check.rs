//! # Conformance Checker
//!
//! Validates candidate documents against a compiled [`Schema`].
//!
//! Evaluation is never short-circuited: every violation the evaluator emits
//! is collected, in emission order, so callers can render all complaints at
//! once. Each violation message is prefixed with the location of the
//! offending value: `(root)` for the document itself, otherwise the JSON
//! Pointer into the instance (e.g. `/provision/actor/0`).
//!
//! A failed root `oneOf` is followed by the violations of the branch the
//! document was meant to match, so nested defects are reported where they
//! occur. Messages are rendered from the error kind and never quote the
//! offending value, keeping patient data out of responses and logs.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use fcv_core::{ValidationOutcome, Violation};
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::ValidationError;
use serde_json::Value;

use crate::document::read_document;
use crate::error::DocumentError;
use crate::schema::Schema;

/// Location label used for violations at the document root.
const ROOT_LOCATION: &str = "(root)";

/// Validates documents against a shared, read-only [`Schema`].
///
/// Cheap to clone; all clones share the same compiled schema.
#[derive(Debug, Clone)]
pub struct ConformanceChecker {
    schema: Arc<Schema>,
}

impl ConformanceChecker {
    /// Create a checker over an already-loaded schema.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// The schema this checker validates against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validate raw document bytes.
    ///
    /// Bytes that are not JSON yield exactly one `syntax` violation carrying
    /// the parser's message.
    pub fn check(&self, document: &[u8]) -> ValidationOutcome {
        match serde_json::from_slice::<Value>(document) {
            Ok(value) => self.check_value(&value),
            Err(e) => {
                tracing::info!(error = %e, "document is not valid JSON");
                ValidationOutcome::with_violations(vec![Violation::syntax(e.to_string())])
            }
        }
    }

    /// Validate an already-parsed document.
    ///
    /// Every schema violation becomes one `constraint` violation. Identical
    /// messages are reported once, at their first position.
    pub fn check_value(&self, document: &Value) -> ValidationOutcome {
        let mut messages = Vec::new();
        for err in self.schema.validator().iter_errors(document) {
            messages.push(render(&err));
            if matches!(err.kind, ValidationErrorKind::OneOfNotValid)
                && err.instance_path.as_str().is_empty()
            {
                if let Some(branch) = self.schema.root_branches().select(document) {
                    messages.extend(branch.iter_errors(document).map(|e| render(&e)));
                }
            }
        }

        let mut seen = HashSet::new();
        let violations: Vec<Violation> = messages
            .into_iter()
            .filter(|m| seen.insert(m.clone()))
            .map(Violation::constraint)
            .collect();

        if violations.is_empty() {
            tracing::info!("the document is valid");
        } else {
            tracing::info!(count = violations.len(), "the document is invalid");
            for v in &violations {
                tracing::debug!("- {}", v.message);
            }
        }

        ValidationOutcome::with_violations(violations)
    }

    /// Validate the document stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if the file cannot be read. Parse and schema
    /// failures are reported in the returned outcome.
    pub fn check_file(&self, path: &Path) -> Result<ValidationOutcome, DocumentError> {
        let bytes = read_document(path)?;
        Ok(self.check(&bytes))
    }
}

/// `<location>: <description>` for one evaluator error.
fn render(err: &ValidationError<'_>) -> String {
    let location = err.instance_path.as_str();
    let location = if location.is_empty() {
        ROOT_LOCATION
    } else {
        location
    };
    format!("{location}: {}", describe(&err.kind))
}

fn describe(kind: &ValidationErrorKind) -> String {
    use ValidationErrorKind as K;

    match kind {
        K::OneOfNotValid => "must validate one and only one schema (oneOf)".to_string(),
        K::OneOfMultipleValid => "matches more than one schema (oneOf)".to_string(),
        K::AnyOf => "must validate at least one schema (anyOf)".to_string(),
        K::Not { .. } => "must not validate the schema (not)".to_string(),
        K::Required { property } => format!("{} is required", unquoted(property)),
        K::AdditionalProperties { unexpected } => {
            format!("additional property {} is not allowed", unexpected.join(", "))
        }
        K::Type { kind } => {
            let expected = match kind {
                TypeKind::Single(t) => t.to_string(),
                TypeKind::Multiple(types) => types
                    .into_iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            format!("invalid type, expected {expected}")
        }
        K::Constant { expected_value } => format!("must be {expected_value}"),
        K::Enum { options } => format!("must be one of {options}"),
        K::Pattern { pattern } => format!("does not match pattern '{pattern}'"),
        K::Format { format } => format!("does not match format '{format}'"),
        K::MinLength { limit } => format!("must be at least {limit} characters long"),
        K::MaxLength { limit } => format!("must be at most {limit} characters long"),
        K::MinItems { limit } => format!("must have at least {limit} items"),
        K::MaxItems { limit } => format!("must have at most {limit} items"),
        K::MinProperties { limit } => format!("must have at least {limit} properties"),
        K::MaxProperties { limit } => format!("must have at most {limit} properties"),
        K::Minimum { limit } => format!("must be greater than or equal to {limit}"),
        K::Maximum { limit } => format!("must be less than or equal to {limit}"),
        K::ExclusiveMinimum { limit } => format!("must be greater than {limit}"),
        K::ExclusiveMaximum { limit } => format!("must be less than {limit}"),
        K::MultipleOf { multiple_of } => format!("must be a multiple of {multiple_of}"),
        K::UniqueItems => "items must be unique".to_string(),
        K::Contains => "does not contain a matching item".to_string(),
        K::FalseSchema => "is not allowed".to_string(),
        K::PropertyNames { .. } => "has a property name that is not allowed".to_string(),
        K::AdditionalItems { limit } => format!("must have at most {limit} items"),
        K::UnevaluatedProperties { unexpected } => {
            format!("unevaluated property {} is not allowed", unexpected.join(", "))
        }
        K::UnevaluatedItems { .. } => "has unevaluated items".to_string(),
        K::ContentEncoding { content_encoding } => {
            format!("is not valid {content_encoding} content")
        }
        K::ContentMediaType { content_media_type } => {
            format!("is not valid {content_media_type} content")
        }
        K::Custom { message } => message.clone(),
        K::FromUtf8 { .. } => "is not valid UTF-8".to_string(),
        K::BacktrackLimitExceeded { .. } => "pattern evaluation exceeded its limit".to_string(),
        K::Referencing(e) => format!("unresolvable reference: {e}"),
    }
}

fn unquoted(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
