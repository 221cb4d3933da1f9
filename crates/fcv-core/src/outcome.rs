//! # Validation Outcomes
//!
//! Result of running a document through the schema gate. Two violation
//! kinds reach users:
//!
//! - `syntax` — the document is not parseable JSON, or the engine hit an
//!   internal extraction contract violation.
//! - `constraint` — the document parsed but broke one or more schema rules.

use serde::{Deserialize, Serialize};

/// Category of a reported violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    Syntax,
    Constraint,
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax => f.write_str("syntax"),
            Self::Constraint => f.write_str("constraint"),
        }
    }
}

/// A single human-readable violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    /// A syntax-kind violation.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::Syntax,
            message: message.into(),
        }
    }

    /// A constraint-kind violation.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::Constraint,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Outcome of a conformance check.
///
/// The violation list is empty iff the document is valid. Order follows the
/// evaluator's emission order, which is not guaranteed stable across schema
/// versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    violations: Vec<Violation>,
}

impl ValidationOutcome {
    /// A passing outcome.
    pub fn valid() -> Self {
        Self::default()
    }

    /// An outcome carrying the given violations.
    pub fn with_violations(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
