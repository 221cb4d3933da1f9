//! # fcv-core — Foundational Types for Consent Validation
//!
//! Defines the strongly-shaped values that the validation engine produces
//! from a loosely-typed FHIR `Consent` document. Every other crate in the
//! workspace depends on `fcv-core`; it depends on nothing internal.
//!
//! ## Key Types
//!
//! - [`Identifier`] and [`DataClass`] — `system` + divider + `value` strings.
//!   The [`Divider`] is chosen per field: fixed `:` for subject and custodian,
//!   fixed `#` for actors, content-sensitive for data classes.
//! - [`Period`] — validity window with a mandatory start and optional end.
//! - [`SimplifiedConsent`] — the projected summary record.
//! - [`ValidationOutcome`] / [`Violation`] — result of a schema gate, with
//!   `syntax` and `constraint` violation kinds.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `fcv-*` crates (this is the leaf of the DAG).
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod consent;
pub mod identity;
pub mod outcome;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use consent::SimplifiedConsent;
pub use identity::{DataClass, Divider, Identifier, URN_OID_MARKER};
pub use outcome::{ValidationOutcome, Violation, ViolationKind};
pub use temporal::Period;
