//! # fcv-schema — Schema Store & Conformance Checking
//!
//! Loads the reference consent schema once, compiles it with the
//! `jsonschema` crate, and validates candidate documents against it.
//!
//! ## Components
//!
//! - [`Schema`] — an immutable compiled schema plus the raw JSON it was built
//!   from. Sourced from a file or from the embedded default
//!   (`schemas/consent.schema.json`).
//! - [`SchemaStore`] — loads a [`Schema`] at most once. Concurrent first
//!   callers wait for the loader instead of racing it.
//! - [`ConformanceChecker`] — runs the full validation pass and reports every
//!   violation in evaluator order.
//!
//! ## Crate Policy
//!
//! - Depends only on `fcv-core` internally.
//! - Schema-load failures are configuration errors; per-document problems are
//!   reported through [`fcv_core::ValidationOutcome`], never as `Err`.

pub mod check;
pub mod document;
pub mod error;
pub mod schema;
pub mod store;

pub use check::ConformanceChecker;
pub use document::read_document;
pub use error::{DocumentError, SchemaStoreError};
pub use schema::{Schema, SchemaSource, EMBEDDED_SCHEMA};
pub use store::{SchemaStore, StoreStatus};
