//! # Validate Subcommand
//!
//! `validate consent` runs the full gate and prints either the simplified
//! consent or every violation. The field subcommands print one extracted
//! field and skip the schema check, which makes them useful for inspecting
//! documents the schema rejects.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use fcv_engine::{
    extract_actors, extract_custodian, extract_data_classes, extract_subject, ConsentProjector,
    ProjectionResult,
};
use fcv_schema::{read_document, ConformanceChecker, SchemaSource, SchemaStore};
use serde_json::Value;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(subcommand)]
    pub target: ValidateTarget,
}

/// What to validate or extract.
#[derive(Subcommand, Debug)]
pub enum ValidateTarget {
    /// Validate a consent document and print its simplified form.
    Consent {
        /// Path to the consent JSON document.
        path: PathBuf,
    },
    /// Print the patient identifier (`system:value`).
    Subject { path: PathBuf },
    /// Print the custodian organization identifier (`system:value`).
    Organization { path: PathBuf },
    /// Print the authorized actors (`system#value`), one per line.
    Actors { path: PathBuf },
    /// Print the authorized data classes, one per line.
    Resources { path: PathBuf },
}

/// Execute the validate subcommand, printing to stdout.
///
/// Returns the process exit code: 0 when the document is valid (or the
/// field was extracted), 1 when it is not.
pub fn run_validate(args: &ValidateArgs, schema: &SchemaSource) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_validate_to(args, schema, &mut out)
}

/// Execute the validate subcommand, writing output to `out`.
pub fn run_validate_to(args: &ValidateArgs, schema: &SchemaSource, out: &mut dyn Write) -> Result<u8> {
    match &args.target {
        ValidateTarget::Consent { path } => validate_consent(path, schema, out),
        ValidateTarget::Subject { path } => {
            let subject = extract_subject(&read_json(path)?)?;
            writeln!(out, "{subject}")?;
            Ok(0)
        }
        ValidateTarget::Organization { path } => {
            let custodian = extract_custodian(&read_json(path)?)?;
            writeln!(out, "{custodian}")?;
            Ok(0)
        }
        ValidateTarget::Actors { path } => {
            for actor in extract_actors(&read_json(path)?)? {
                writeln!(out, "{actor}")?;
            }
            Ok(0)
        }
        ValidateTarget::Resources { path } => {
            for class in extract_data_classes(&read_json(path)?)? {
                writeln!(out, "{class}")?;
            }
            Ok(0)
        }
    }
}

fn validate_consent(path: &Path, schema: &SchemaSource, out: &mut dyn Write) -> Result<u8> {
    let store = SchemaStore::new();
    let schema = store
        .load(schema.clone())
        .context("failed to load consent schema")?;
    let projector = ConsentProjector::new(ConformanceChecker::new(schema));

    match projector.project_file(path)? {
        ProjectionResult::Accepted(consent) => {
            writeln!(out, "OK: {}", path.display())?;
            writeln!(out, "{}", serde_json::to_string_pretty(&consent)?)?;
            Ok(0)
        }
        failed => {
            writeln!(out, "FAIL: {}", path.display())?;
            for violation in failed.violations() {
                writeln!(out, "  - {violation}")?;
            }
            Ok(1)
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let bytes = read_document(path)?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.pop(); // crates/
        path.pop(); // repo root
        path.join("fixtures").join(name)
    }

    fn run(target: ValidateTarget) -> (Result<u8>, String) {
        let args = ValidateArgs { target };
        let mut out = Vec::new();
        let result = run_validate_to(&args, &SchemaSource::Embedded, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn valid_consent_prints_ok_and_summary() {
        let path = fixture("observation_consent.json");
        let (result, output) = run(ValidateTarget::Consent { path: path.clone() });
        assert_eq!(result.unwrap(), 0);

        let mut lines = output.splitn(2, '\n');
        assert_eq!(lines.next().unwrap(), format!("OK: {}", path.display()));
        let summary: Value = serde_json::from_str(lines.next().unwrap()).unwrap();
        assert_eq!(summary["version"], "1");
        assert_eq!(summary["dataClasses"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn invalid_consent_prints_each_violation() {
        let path = fixture("empty.json");
        let (result, output) = run(ValidateTarget::Consent { path: path.clone() });
        assert_eq!(result.unwrap(), 1);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], format!("FAIL: {}", path.display()));
        assert_eq!(lines.len(), 3, "got: {output}");
        assert!(lines[1..].iter().all(|l| l.starts_with("  - [constraint] ")));
    }

    #[test]
    fn unparseable_consent_is_a_syntax_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let (result, output) = run(ValidateTarget::Consent { path });
        assert_eq!(result.unwrap(), 1);
        assert!(output.contains("  - [syntax] "), "got: {output}");
    }

    #[test]
    fn missing_file_reports_open_error() {
        let (result, output) = run(ValidateTarget::Consent {
            path: PathBuf::from("../fixtures/does_not_exist.json"),
        });
        let err = result.unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "open ../fixtures/does_not_exist.json: no such file or directory"
        );
        assert!(output.is_empty());
    }

    #[test]
    fn missing_schema_file_is_an_error() {
        let args = ValidateArgs {
            target: ValidateTarget::Consent {
                path: fixture("minimal_consent.json"),
            },
        };
        let source = SchemaSource::File(PathBuf::from("/nonexistent/consent.schema.json"));
        let err = run_validate_to(&args, &source, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load consent schema"));
    }

    #[test]
    fn subject_and_organization_use_colon() {
        let (result, output) = run(ValidateTarget::Subject {
            path: fixture("observation_consent.json"),
        });
        assert_eq!(result.unwrap(), 0);
        assert_eq!(output, "urn:oid:2.16.840.1.113883.2.4.6.3:999999990\n");

        let (result, output) = run(ValidateTarget::Organization {
            path: fixture("observation_consent.json"),
        });
        assert_eq!(result.unwrap(), 0);
        assert_eq!(output, "urn:oid:2.16.840.1.113883.2.4.6.1:00000000\n");
    }

    #[test]
    fn actors_and_resources_print_one_per_line() {
        let (_, actors) = run(ValidateTarget::Actors {
            path: fixture("observation_consent.json"),
        });
        assert_eq!(actors, "urn:oid:2.16.840.1.113883.2.4.6.1#00000007\n");

        let (_, resources) = run(ValidateTarget::Resources {
            path: fixture("observation_consent.json"),
        });
        assert_eq!(
            resources,
            "http://hl7.org/fhir/resource-types#Observation\nurn:oid:1.3.6.1.4.1.54851.1:MEDICAL\n"
        );
    }

    #[test]
    fn field_extraction_skips_schema_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(
            &path,
            br#"{"patient": {"identifier": {"system": "http://example.org", "value": "42"}}}"#,
        )
        .unwrap();

        let (result, output) = run(ValidateTarget::Subject { path: path.clone() });
        assert_eq!(result.unwrap(), 0);
        assert_eq!(output, "http://example.org:42\n");

        let (result, _) = run(ValidateTarget::Actors { path });
        assert!(result.is_err());
    }
}
