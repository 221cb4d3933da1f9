//! # Error Types
//!
//! Schema errors are startup-time configuration failures. Document errors
//! cover reading a candidate document from disk; they are reported with the
//! `open <path>: <reason>` shape operators already grep for.

use thiserror::Error;

/// Errors raised while loading or compiling the reference schema.
#[derive(Error, Debug)]
pub enum SchemaStoreError {
    /// The schema file could not be read.
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoadError {
        /// Path or label of the schema source.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The schema bytes are not valid JSON.
    #[error("failed to parse schema {path}: {reason}")]
    SchemaParseError {
        /// Path or label of the schema source.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The schema is JSON but could not be compiled into a validator.
    #[error("failed to compile schema {path}: {reason}")]
    SchemaCompileError {
        /// Path or label of the schema source.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },
}

/// Errors raised while reading a candidate document from disk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The file does not exist.
    #[error("open {path}: no such file or directory")]
    NotFound {
        /// Path as given by the caller.
        path: String,
    },

    /// The file exists but could not be read.
    #[error("open {path}: {reason}")]
    Read {
        /// Path as given by the caller.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_shape() {
        let err = DocumentError::NotFound {
            path: "../fixtures/does_not_exist.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "open ../fixtures/does_not_exist.json: no such file or directory"
        );
    }

    #[test]
    fn schema_errors_name_their_source() {
        let err = SchemaStoreError::SchemaParseError {
            path: "/etc/fcv/consent.schema.json".to_string(),
            reason: "expected value at line 1 column 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/fcv/consent.schema.json"));
        assert!(msg.contains("expected value"));
    }
}
