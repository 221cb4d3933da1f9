//! Integration tests: projecting the fixture documents end to end through
//! the embedded schema.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fcv_engine::{ConsentProjector, ProjectionResult};
use fcv_schema::{ConformanceChecker, SchemaSource, SchemaStore};
use serde_json::{json, Value};

fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn fixture(name: &str) -> PathBuf {
    repo_root().join("fixtures").join(name)
}

fn fixture_value(name: &str) -> Value {
    let bytes = std::fs::read(fixture(name)).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn projector() -> ConsentProjector {
    let store = SchemaStore::new();
    let schema = store.load(SchemaSource::Embedded).unwrap();
    ConsentProjector::new(ConformanceChecker::new(schema))
}

fn accepted(result: ProjectionResult) -> fcv_core::SimplifiedConsent {
    match result {
        ProjectionResult::Accepted(consent) => consent,
        other => panic!("expected Accepted, got: {other:?}"),
    }
}

#[test]
fn test_observation_consent_projects_all_fields() {
    let consent = accepted(
        projector()
            .project_file(&fixture("observation_consent.json"))
            .unwrap(),
    );

    let classes: Vec<&str> = consent.data_classes().iter().map(|c| c.as_str()).collect();
    assert_eq!(
        classes,
        [
            "http://hl7.org/fhir/resource-types#Observation",
            "urn:oid:1.3.6.1.4.1.54851.1:MEDICAL",
        ]
    );
    let actors: Vec<&str> = consent.actors().iter().map(|a| a.as_str()).collect();
    assert_eq!(actors, ["urn:oid:2.16.840.1.113883.2.4.6.1#00000007"]);
    assert_eq!(
        consent.subject().as_str(),
        "urn:oid:2.16.840.1.113883.2.4.6.3:999999990"
    );
    assert_eq!(
        consent.custodian().as_str(),
        "urn:oid:2.16.840.1.113883.2.4.6.1:00000000"
    );
    assert_eq!(
        consent.period().valid_to().map(|t| t.to_rfc3339()),
        Some("2016-06-23T17:32:33+10:00".to_string())
    );
}

#[test]
fn test_minimal_consent_is_open_ended() {
    let consent = accepted(
        projector()
            .project_file(&fixture("minimal_consent.json"))
            .unwrap(),
    );
    assert!(consent.period().valid_to().is_none());
    assert_eq!(
        consent.period().valid_from().to_rfc3339(),
        "2016-06-23T17:02:33+10:00"
    );
    assert_eq!(consent.version(), "1");
    assert!(consent.data_classes().is_empty());
}

#[test]
fn test_projection_is_idempotent() {
    let projector = projector();
    let bytes = std::fs::read(fixture("observation_consent.json")).unwrap();
    let first = projector.project(&bytes);
    let second = projector.project(&bytes);
    assert_eq!(first, second);

    let first = serde_json::to_string(&accepted(first)).unwrap();
    let second = serde_json::to_string(&accepted(second)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_rejected_iff_checker_reports_invalid() {
    let projector = projector();
    let checker = projector.checker().clone();

    let mut missing_actor = fixture_value("minimal_consent.json");
    missing_actor["provision"].as_object_mut().unwrap().remove("actor");
    let mut wrong_type = fixture_value("minimal_consent.json");
    wrong_type["resourceType"] = json!("Patient");
    let mut extra_field = fixture_value("minimal_consent.json");
    extra_field["unexpected"] = json!(true);

    let documents = [
        json!({}),
        json!([]),
        json!("Consent"),
        missing_actor,
        wrong_type,
        extra_field,
        fixture_value("minimal_consent.json"),
        fixture_value("observation_consent.json"),
    ];

    for doc in &documents {
        let valid = checker.check_value(doc).is_valid();
        let result = projector.project_value(doc);
        assert_eq!(
            matches!(result, ProjectionResult::Rejected { .. }),
            !valid,
            "document {doc} gave {result:?}"
        );
    }
}

#[test]
fn test_date_only_start_passes_schema_but_is_malformed() {
    let projector = projector();
    let mut doc = fixture_value("minimal_consent.json");
    doc["provision"]["period"]["start"] = json!("2016-06-23");

    assert!(projector.checker().check_value(&doc).is_valid());
    match projector.project_value(&doc) {
        ProjectionResult::Malformed { reason } => {
            assert!(reason.contains("/provision/period/start"), "got: {reason}");
        }
        other => panic!("expected Malformed, got: {other:?}"),
    }
}

#[test]
fn test_missing_file_is_document_error() {
    let err = projector()
        .project_file(Path::new("../fixtures/does_not_exist.json"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "open ../fixtures/does_not_exist.json: no such file or directory"
    );
}

#[test]
fn test_projector_shared_across_threads() {
    let projector = Arc::new(projector());
    let bytes = Arc::new(std::fs::read(fixture("observation_consent.json")).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let projector = Arc::clone(&projector);
            let bytes = Arc::clone(&bytes);
            std::thread::spawn(move || projector.project(&bytes).is_accepted())
        })
        .collect();

    assert!(handles.into_iter().all(|h| h.join().unwrap()));
}
