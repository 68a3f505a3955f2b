//! Serializable outcome of a validation pass.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a [`FormValidator`](crate::FormValidator) after `validate()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    /// True when the pass ran every rule and no field failed
    pub valid: bool,

    /// Field to first failing message
    pub errors: BTreeMap<String, String>,

    /// Sanitized field values
    pub entries: BTreeMap<String, String>,

    /// Number of rules registered
    pub rules_registered: usize,

    /// Number of rules actually dispatched; rules behind an already-failed
    /// field are skipped
    pub rules_evaluated: usize,

    /// When the snapshot was taken
    pub validated_at: DateTime<Utc>,
}

impl ValidationReport {
    /// Message recorded for `field`, if it failed.
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}
