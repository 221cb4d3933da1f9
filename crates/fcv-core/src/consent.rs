//! # Simplified Consent
//!
//! The compact summary record projected from a schema-valid consent
//! document.

use serde::{Deserialize, Serialize};

use crate::identity::{DataClass, Identifier};
use crate::temporal::Period;

/// Summary of a consent: who it is about, who holds it, who may act on it,
/// which data it covers, when it applies, and which version it is.
///
/// Only built after the document passed schema validation. Fields are
/// private; the record is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedConsent {
    subject: Identifier,
    custodian: Identifier,
    actors: Vec<Identifier>,
    data_classes: Vec<DataClass>,
    period: Period,
    version: String,
}

impl SimplifiedConsent {
    /// Assemble a summary record from already-extracted parts.
    pub fn new(
        subject: Identifier,
        custodian: Identifier,
        actors: Vec<Identifier>,
        data_classes: Vec<DataClass>,
        period: Period,
        version: String,
    ) -> Self {
        Self {
            subject,
            custodian,
            actors,
            data_classes,
            period,
            version,
        }
    }

    /// The patient the consent is about.
    pub fn subject(&self) -> &Identifier {
        &self.subject
    }

    /// The organization holding the consent.
    pub fn custodian(&self) -> &Identifier {
        &self.custodian
    }

    /// Authorized actors, in document order.
    pub fn actors(&self) -> &[Identifier] {
        &self.actors
    }

    /// Authorized data classes, flattened in document order.
    pub fn data_classes(&self) -> &[DataClass] {
        &self.data_classes
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}
