//! # Temporal Types
//!
//! Validity window of a consent. Timestamps keep the UTC offset they were
//! written with so the summary echoes the document's own representation.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Validity period of a consent: a mandatory start and an optional end.
///
/// `valid_to` is `None` when the source document has no end. It is never
/// defaulted to the start or to any sentinel value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    valid_from: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    valid_to: Option<DateTime<FixedOffset>>,
}

impl Period {
    /// Create a period from its bounds.
    pub fn new(valid_from: DateTime<FixedOffset>, valid_to: Option<DateTime<FixedOffset>>) -> Self {
        Self {
            valid_from,
            valid_to,
        }
    }

    /// Start of the validity window.
    pub fn valid_from(&self) -> &DateTime<FixedOffset> {
        &self.valid_from
    }

    /// End of the validity window, if the document sets one.
    pub fn valid_to(&self) -> Option<&DateTime<FixedOffset>> {
        self.valid_to.as_ref()
    }

    /// True when the document did not specify an end.
    pub fn is_open_ended(&self) -> bool {
        self.valid_to.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn open_ended_period_omits_valid_to() {
        let period = Period::new(ts("2016-06-23T17:02:33+10:00"), None);
        assert!(period.is_open_ended());
        let json = serde_json::to_value(&period).unwrap();
        assert_eq!(json["validFrom"], "2016-06-23T17:02:33+10:00");
        assert!(json.get("validTo").is_none());
    }

    #[test]
    fn closed_period_keeps_offset() {
        let period = Period::new(
            ts("2016-06-23T17:02:33+10:00"),
            Some(ts("2016-06-23T17:32:33+10:00")),
        );
        assert_eq!(period.valid_to().unwrap().offset().local_minus_utc(), 36000);
        let json = serde_json::to_value(&period).unwrap();
        assert_eq!(json["validTo"], "2016-06-23T17:32:33+10:00");
    }
}
