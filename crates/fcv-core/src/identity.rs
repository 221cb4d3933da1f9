//! # Identifier Newtypes
//!
//! Consent documents carry identifiers as `{system, value}` pairs. The
//! summary record flattens each pair into a single string joined by a
//! [`Divider`]. Which divider is used depends on the field:
//!
//! | Field        | Divider                                   |
//! |--------------|-------------------------------------------|
//! | subject      | always `:`                                |
//! | custodian    | always `:`                                |
//! | actors       | always `#`                                |
//! | data classes | `:` if `system` contains `urn:oid`, else `#` |
//!
//! The divergence between fields is part of the published contract and must
//! not be unified.

use serde::{Deserialize, Serialize};

/// Substring that marks a `system` token as a URN-OID namespace.
pub const URN_OID_MARKER: &str = "urn:oid";

/// Character joining a `system` token to a `value` or `code` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Divider {
    /// `:` — used for URN-OID systems and for fixed-format fields.
    Colon,
    /// `#` — used for URL-style systems.
    Hash,
}

impl Divider {
    /// Pick the divider for a `system` token by inspecting its content.
    ///
    /// Returns [`Divider::Colon`] iff `system` contains `"urn:oid"`.
    pub fn for_system(system: &str) -> Self {
        if system.contains(URN_OID_MARKER) {
            Self::Colon
        } else {
            Self::Hash
        }
    }

    /// The divider as a character.
    pub fn as_char(self) -> char {
        match self {
            Self::Colon => ':',
            Self::Hash => '#',
        }
    }
}

impl std::fmt::Display for Divider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A flattened `system` + divider + `value` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Join `system` and `value` with the given divider.
    pub fn join(system: &str, value: &str, divider: Divider) -> Self {
        Self(format!("{system}{divider}{value}"))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One authorized category of data, shaped like an [`Identifier`].
///
/// Always built with the content-sensitive divider rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataClass(String);

impl DataClass {
    /// Build a data class from a `system`/`code` pair using
    /// [`Divider::for_system`].
    pub fn new(system: &str, code: &str) -> Self {
        let divider = Divider::for_system(system);
        Self(format!("{system}{divider}{code}"))
    }

    /// Access the data class string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DataClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
