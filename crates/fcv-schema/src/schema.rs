//! # Compiled Schema
//!
//! A [`Schema`] pairs the raw JSON Schema document with the compiled
//! `jsonschema::Validator` built from it (Draft 7, matching the HL7 FHIR
//! JSON schema). Internal `$ref`s of the form `#/definitions/<name>` are
//! resolved by the jsonschema crate natively.
//!
//! The FHIR schema wraps every resource in a root `oneOf`, so a failing
//! document only yields a single root error from the full validator. Each
//! root `oneOf` branch is therefore also compiled on its own. The checker
//! uses [`RootBranches::select`] to find the branch a document was meant to
//! match and reports that branch's violations.

use std::collections::HashMap;
use std::path::PathBuf;

use jsonschema::Validator;
use serde_json::Value;

use crate::error::SchemaStoreError;

/// Built-in default schema, used when no schema path is configured.
pub const EMBEDDED_SCHEMA: &str = include_str!("../../../schemas/consent.schema.json");

/// Label used in diagnostics for the embedded schema.
const EMBEDDED_LABEL: &str = "<embedded consent.schema.json>";

/// Where a schema is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// The built-in default payload.
    Embedded,
    /// A JSON Schema file on disk.
    File(PathBuf),
}

impl SchemaSource {
    /// Map the configured schema location to a source.
    ///
    /// An absent, empty or whitespace-only value selects the embedded schema.
    pub fn from_config(path: Option<&str>) -> Self {
        match path.map(str::trim) {
            Some(p) if !p.is_empty() => Self::File(PathBuf::from(p)),
            _ => Self::Embedded,
        }
    }
}

impl std::fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => f.write_str(EMBEDDED_LABEL),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// An immutable, compiled reference schema.
///
/// `Schema` is `Send + Sync`; share it behind an `Arc` across any number of
/// concurrent validations.
pub struct Schema {
    source: SchemaSource,
    raw: Value,
    validator: Validator,
    branches: RootBranches,
}

/// Standalone validators for the alternatives of a root `oneOf`.
#[derive(Default)]
pub(crate) struct RootBranches {
    discriminator: Option<Discriminator>,
    validators: Vec<Validator>,
}

/// OpenAPI-style `discriminator`: a property whose value names the branch.
struct Discriminator {
    property: String,
    mapping: HashMap<String, usize>,
}

impl RootBranches {
    fn compile(source: &SchemaSource, raw: &Value) -> Result<Self, SchemaStoreError> {
        let Some(branches) = raw.get("oneOf").and_then(Value::as_array) else {
            return Ok(Self::default());
        };

        let mut validators = Vec::with_capacity(branches.len());
        for branch in branches {
            // Keep `definitions` reachable so `#/definitions/..` refs resolve.
            let mut doc = serde_json::Map::new();
            for key in ["$schema", "definitions"] {
                if let Some(v) = raw.get(key) {
                    doc.insert(key.to_string(), v.clone());
                }
            }
            doc.insert("allOf".to_string(), Value::Array(vec![branch.clone()]));
            validators.push(compile(source, &Value::Object(doc))?);
        }

        let discriminator = raw.get("discriminator").and_then(|d| {
            let property = d.get("propertyName")?.as_str()?.to_string();
            let mapping = d
                .get("mapping")
                .and_then(Value::as_object)
                .map(|mapping| {
                    mapping
                        .iter()
                        .filter_map(|(name, target)| {
                            let target = target.as_str()?;
                            let index = branches
                                .iter()
                                .position(|b| b.get("$ref").and_then(Value::as_str) == Some(target))?;
                            Some((name.clone(), index))
                        })
                        .collect()
                })
                .unwrap_or_default();
            Some(Discriminator { property, mapping })
        });

        Ok(Self {
            discriminator,
            validators,
        })
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.validators.len()
    }

    /// The branch `instance` was meant to match.
    ///
    /// With a discriminator, the branch named by the discriminating property;
    /// `None` when the property is absent or names no branch. Without one, the
    /// branch reporting the fewest violations.
    pub(crate) fn select(&self, instance: &Value) -> Option<&Validator> {
        match &self.discriminator {
            Some(d) => {
                let name = instance.get(d.property.as_str())?.as_str()?;
                self.validators.get(*d.mapping.get(name)?)
            }
            None => self
                .validators
                .iter()
                .min_by_key(|v| v.iter_errors(instance).count()),
        }
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("source", &self.source)
            .field("title", &self.raw.get("title").and_then(Value::as_str))
            .finish()
    }
}

impl Schema {
    /// Load, parse and compile a schema from the given source.
    ///
    /// # Errors
    ///
    /// - [`SchemaStoreError::SchemaLoadError`] if the file cannot be read.
    /// - [`SchemaStoreError::SchemaParseError`] if the bytes are not JSON.
    /// - [`SchemaStoreError::SchemaCompileError`] if the JSON is not a usable
    ///   JSON Schema.
    pub fn load(source: &SchemaSource) -> Result<Self, SchemaStoreError> {
        let content = match source {
            SchemaSource::Embedded => EMBEDDED_SCHEMA.to_string(),
            SchemaSource::File(path) => std::fs::read_to_string(path).map_err(|e| {
                SchemaStoreError::SchemaLoadError {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?,
        };
        Self::from_json_str(source.clone(), &content)
    }

    /// Parse and compile a schema from a JSON string.
    pub fn from_json_str(source: SchemaSource, content: &str) -> Result<Self, SchemaStoreError> {
        let raw: Value =
            serde_json::from_str(content).map_err(|e| SchemaStoreError::SchemaParseError {
                path: source.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_value(source, raw)
    }

    /// Compile an already-parsed schema.
    pub fn from_value(source: SchemaSource, raw: Value) -> Result<Self, SchemaStoreError> {
        let validator = compile(&source, &raw)?;
        let branches = RootBranches::compile(&source, &raw)?;

        Ok(Self {
            source,
            raw,
            validator,
            branches,
        })
    }

    /// Where this schema came from.
    pub fn source(&self) -> &SchemaSource {
        &self.source
    }

    /// The schema document as parsed JSON.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub(crate) fn validator(&self) -> &Validator {
        &self.validator
    }

    pub(crate) fn root_branches(&self) -> &RootBranches {
        &self.branches
    }
}

fn compile(source: &SchemaSource, raw: &Value) -> Result<Validator, SchemaStoreError> {
    jsonschema::options()
        .with_draft(jsonschema::Draft::Draft7)
        .build(raw)
        .map_err(|e| SchemaStoreError::SchemaCompileError {
            path: source.to_string(),
            reason: e.to_string(),
        })
}
