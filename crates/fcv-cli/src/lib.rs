//! # fcv-cli — Consent Validation Command-Line Interface
//!
//! ## Subcommands
//!
//! - `validate consent <path>` — full schema check and projection
//! - `validate subject|organization|actors|resources <path>` — print one
//!   extracted field without the schema check
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `fcv-engine`; no business logic here.
//! - Handlers return an exit code; operational failures are `Err` and map
//!   to exit code 1 in `main`.

pub mod validate;
