//! # Field Extractor
//!
//! Pure functions that lift individual fields out of a parsed consent
//! document. Each one navigates the `serde_json::Value` tree with JSON
//! Pointers and returns a typed [`ExtractError`] when an expected field is
//! absent or has the wrong shape.
//!
//! ## Precondition
//!
//! The extractors assume the document has already passed the
//! [`ConformanceChecker`](fcv_schema::ConformanceChecker). They do not
//! re-validate the document; an error from this module on a schema-valid
//! document means the schema and the extraction rules disagree.
//!
//! ## Divider Rules
//!
//! | Field        | Path                                      | Divider |
//! |--------------|-------------------------------------------|---------|
//! | actors       | `/provision/actor/*/reference/identifier` | `#`     |
//! | data classes | `/provision/provision/*/class/*`          | per `system` |
//! | subject      | `/patient/identifier`                     | `:`     |
//! | custodian    | `/organization/0/identifier`              | `:`     |

use chrono::{DateTime, FixedOffset};
use fcv_core::{DataClass, Divider, Identifier, Period, SimplifiedConsent};
use serde_json::Value;
use thiserror::Error;

const ACTORS: &str = "/provision/actor";
const NESTED_PROVISIONS: &str = "/provision/provision";
const SUBJECT: &str = "/patient/identifier";
const CUSTODIAN: &str = "/organization/0/identifier";
const PERIOD_START: &str = "/provision/period/start";
const PERIOD_END: &str = "/provision/period/end";
const VERSION: &str = "/meta/versionId";

/// A field the extraction rules rely on is missing or mis-shaped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Required field absent (or `null`).
    #[error("missing field {path}")]
    MissingField {
        /// JSON Pointer of the missing field.
        path: String,
    },

    /// Field present but of the wrong JSON type.
    #[error("field {path} is not {expected}")]
    UnexpectedType {
        /// JSON Pointer of the offending field.
        path: String,
        /// The JSON type the extractor needed.
        expected: &'static str,
    },

    /// Timestamp present but not RFC 3339.
    #[error("field {path} holds invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        path: String,
        value: String,
        reason: String,
    },
}

/// Authorized actors, in document order, as `system#value`.
pub fn extract_actors(doc: &Value) -> Result<Vec<Identifier>, ExtractError> {
    let actors = require_array(doc, ACTORS)?;
    (0..actors.len())
        .map(|i| {
            identifier_at(
                doc,
                &format!("{ACTORS}/{i}/reference/identifier"),
                Divider::Hash,
            )
        })
        .collect()
}

/// Data classes from every nested provision, flattened in document order.
///
/// No nested provisions means no data classes. A nested provision without
/// a `class` list contributes nothing.
pub fn extract_data_classes(doc: &Value) -> Result<Vec<DataClass>, ExtractError> {
    let provisions = match doc.pointer(NESTED_PROVISIONS) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(v) => v.as_array().ok_or_else(|| unexpected(NESTED_PROVISIONS, "an array"))?,
    };

    let mut classes = Vec::new();
    for (i, provision) in provisions.iter().enumerate() {
        let path = format!("{NESTED_PROVISIONS}/{i}/class");
        let leaves = match provision.get("class") {
            None | Some(Value::Null) => continue,
            Some(v) => v.as_array().ok_or_else(|| unexpected(&path, "an array"))?,
        };
        for j in 0..leaves.len() {
            let system = require_str(doc, &format!("{path}/{j}/system"))?;
            let code = require_str(doc, &format!("{path}/{j}/code"))?;
            classes.push(DataClass::new(system, code));
        }
    }
    Ok(classes)
}

/// The patient, as `system:value`.
pub fn extract_subject(doc: &Value) -> Result<Identifier, ExtractError> {
    identifier_at(doc, SUBJECT, Divider::Colon)
}

/// The first listed organization, as `system:value`.
pub fn extract_custodian(doc: &Value) -> Result<Identifier, ExtractError> {
    identifier_at(doc, CUSTODIAN, Divider::Colon)
}

/// The validity window of the root provision.
///
/// `start` is mandatory. A missing or `null` `end` leaves the period open.
pub fn extract_period(doc: &Value) -> Result<Period, ExtractError> {
    let valid_from = parse_timestamp(PERIOD_START, require_str(doc, PERIOD_START)?)?;
    let valid_to = match doc.pointer(PERIOD_END) {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => Some(parse_timestamp(PERIOD_END, raw)?),
        Some(_) => return Err(unexpected(PERIOD_END, "a string")),
    };
    Ok(Period::new(valid_from, valid_to))
}

/// The document version from `meta.versionId`.
pub fn extract_version(doc: &Value) -> Result<String, ExtractError> {
    require_str(doc, VERSION).map(str::to_owned)
}

/// Run every extractor and assemble the summary record.
///
/// Stops at the first failing extractor.
pub fn extract_consent(doc: &Value) -> Result<SimplifiedConsent, ExtractError> {
    Ok(SimplifiedConsent::new(
        extract_subject(doc)?,
        extract_custodian(doc)?,
        extract_actors(doc)?,
        extract_data_classes(doc)?,
        extract_period(doc)?,
        extract_version(doc)?,
    ))
}

// -- Navigation helpers -------------------------------------------------------

fn require<'a>(doc: &'a Value, path: &str) -> Result<&'a Value, ExtractError> {
    match doc.pointer(path) {
        None | Some(Value::Null) => Err(ExtractError::MissingField {
            path: path.to_string(),
        }),
        Some(v) => Ok(v),
    }
}

fn require_str<'a>(doc: &'a Value, path: &str) -> Result<&'a str, ExtractError> {
    require(doc, path)?
        .as_str()
        .ok_or_else(|| unexpected(path, "a string"))
}

fn require_array<'a>(doc: &'a Value, path: &str) -> Result<&'a [Value], ExtractError> {
    require(doc, path)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| unexpected(path, "an array"))
}

fn identifier_at(doc: &Value, base: &str, divider: Divider) -> Result<Identifier, ExtractError> {
    let system = require_str(doc, &format!("{base}/system"))?;
    let value = require_str(doc, &format!("{base}/value"))?;
    Ok(Identifier::join(system, value, divider))
}

fn parse_timestamp(path: &str, raw: &str) -> Result<DateTime<FixedOffset>, ExtractError> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| ExtractError::InvalidTimestamp {
        path: path.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn unexpected(path: &str, expected: &'static str) -> ExtractError {
    ExtractError::UnexpectedType {
        path: path.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn consent() -> Value {
        json!({
            "resourceType": "Consent",
            "meta": { "versionId": "1" },
            "patient": {
                "identifier": { "system": "urn:oid:2.16.840.1.113883.2.4.6.3", "value": "999999990" }
            },
            "organization": [
                { "identifier": { "system": "urn:oid:2.16.840.1.113883.2.4.6.1", "value": "00000000" } },
                { "identifier": { "system": "urn:oid:2.16.840.1.113883.2.4.6.1", "value": "00000001" } }
            ],
            "provision": {
                "period": {
                    "start": "2016-06-23T17:02:33+10:00",
                    "end": "2016-06-23T17:32:33+10:00"
                },
                "actor": [
                    { "reference": { "identifier": { "system": "urn:oid:2.16.840.1.113883.2.4.6.1", "value": "00000007" } } },
                    { "reference": { "identifier": { "system": "urn:oid:2.16.840.1.113883.2.4.6.1", "value": "00000008" } } }
                ],
                "provision": [
                    { "class": [ { "system": "http://hl7.org/fhir/resource-types", "code": "Observation" } ] },
                    { "action": [] },
                    { "class": [ { "system": "urn:oid:1.3.6.1.4.1.54851.1", "code": "MEDICAL" } ] }
                ]
            }
        })
    }

    #[test]
    fn actors_use_hash_and_keep_order() {
        let actors = extract_actors(&consent()).unwrap();
        let actors: Vec<&str> = actors.iter().map(Identifier::as_str).collect();
        assert_eq!(
            actors,
            [
                "urn:oid:2.16.840.1.113883.2.4.6.1#00000007",
                "urn:oid:2.16.840.1.113883.2.4.6.1#00000008",
            ]
        );
    }

    #[test]
    fn missing_actor_list_is_missing_field() {
        let mut doc = consent();
        doc["provision"].as_object_mut().unwrap().remove("actor");
        assert_eq!(
            extract_actors(&doc).unwrap_err(),
            ExtractError::MissingField {
                path: "/provision/actor".to_string()
            }
        );
    }

    #[test]
    fn actor_without_identifier_names_its_index() {
        let mut doc = consent();
        doc["provision"]["actor"][1] = json!({ "reference": {} });
        assert_eq!(
            extract_actors(&doc).unwrap_err(),
            ExtractError::MissingField {
                path: "/provision/actor/1/reference/identifier/system".to_string()
            }
        );
    }

    #[test]
    fn data_classes_pick_divider_per_system() {
        let classes = extract_data_classes(&consent()).unwrap();
        let classes: Vec<&str> = classes.iter().map(DataClass::as_str).collect();
        assert_eq!(
            classes,
            [
                "http://hl7.org/fhir/resource-types#Observation",
                "urn:oid:1.3.6.1.4.1.54851.1:MEDICAL",
            ]
        );
    }

    #[test]
    fn no_nested_provisions_means_no_data_classes() {
        let mut doc = consent();
        doc["provision"].as_object_mut().unwrap().remove("provision");
        assert!(extract_data_classes(&doc).unwrap().is_empty());
    }

    #[test]
    fn non_array_class_is_unexpected_type() {
        let mut doc = consent();
        doc["provision"]["provision"][0]["class"] = json!({ "system": "x", "code": "y" });
        assert_eq!(
            extract_data_classes(&doc).unwrap_err(),
            ExtractError::UnexpectedType {
                path: "/provision/provision/0/class".to_string(),
                expected: "an array",
            }
        );
    }

    #[test]
    fn subject_and_custodian_use_colon() {
        let doc = consent();
        assert_eq!(
            extract_subject(&doc).unwrap().as_str(),
            "urn:oid:2.16.840.1.113883.2.4.6.3:999999990"
        );
        // Only the first organization counts.
        assert_eq!(
            extract_custodian(&doc).unwrap().as_str(),
            "urn:oid:2.16.840.1.113883.2.4.6.1:00000000"
        );
    }

    #[test]
    fn subject_colon_even_for_url_systems() {
        let mut doc = consent();
        doc["patient"]["identifier"]["system"] = json!("http://example.org/patients");
        assert_eq!(
            extract_subject(&doc).unwrap().as_str(),
            "http://example.org/patients:999999990"
        );
    }

    #[test]
    fn period_with_and_without_end() {
        let mut doc = consent();
        let closed = extract_period(&doc).unwrap();
        assert_eq!(
            closed.valid_from(),
            &DateTime::parse_from_rfc3339("2016-06-23T17:02:33+10:00").unwrap()
        );
        assert_eq!(
            closed.valid_to(),
            Some(&DateTime::parse_from_rfc3339("2016-06-23T17:32:33+10:00").unwrap())
        );

        doc["provision"]["period"].as_object_mut().unwrap().remove("end");
        assert!(extract_period(&doc).unwrap().valid_to().is_none());

        doc["provision"]["period"]["end"] = Value::Null;
        assert!(extract_period(&doc).unwrap().is_open_ended());
    }

    #[test]
    fn date_only_start_is_invalid_timestamp() {
        let mut doc = consent();
        doc["provision"]["period"]["start"] = json!("2016-06-23");
        match extract_period(&doc).unwrap_err() {
            ExtractError::InvalidTimestamp { path, value, .. } => {
                assert_eq!(path, "/provision/period/start");
                assert_eq!(value, "2016-06-23");
            }
            other => panic!("expected InvalidTimestamp, got: {other}"),
        }
    }

    #[test]
    fn version_is_read_verbatim() {
        assert_eq!(extract_version(&consent()).unwrap(), "1");
    }

    #[test]
    fn numeric_version_is_unexpected_type() {
        let mut doc = consent();
        doc["meta"]["versionId"] = json!(1);
        assert!(matches!(
            extract_version(&doc),
            Err(ExtractError::UnexpectedType { .. })
        ));
    }

    #[test]
    fn extract_consent_assembles_every_field() {
        let summary = extract_consent(&consent()).unwrap();
        assert_eq!(summary.actors().len(), 2);
        assert_eq!(summary.data_classes().len(), 2);
        assert_eq!(summary.version(), "1");
        assert!(!summary.period().is_open_ended());
    }

    #[test]
    fn extractors_do_not_panic_on_arbitrary_shapes() {
        for doc in [json!(null), json!([]), json!("Consent"), json!({"provision": 3})] {
            assert!(extract_consent(&doc).is_err());
            assert!(extract_data_classes(&doc).map_or(true, |c| c.is_empty()));
        }
    }
}
