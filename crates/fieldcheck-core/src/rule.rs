//! Rule definitions.
//!
//! A rule ties a field identifier to a kind of check, the criteria that
//! check needs, and the message recorded when it fails. Rules are built
//! once at registration time and never mutated afterwards.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validator::FormValidator;

/// Errors raised for misconfigured rules.
///
/// These are programmer mistakes, not data problems: a failing value is
/// recorded in the error store, a broken rule stops evaluation.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Rule for field '{field}' of kind '{kind}' expects {expected} criteria, got {found}")]
    CriteriaMismatch {
        field: String,
        kind: RuleKind,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Unknown rule kind: {0}")]
    UnknownKind(String),
}

/// The closed set of checks a rule can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    #[serde(rename = "required")]
    Required,
    #[serde(rename = "minlength")]
    MinLength,
    #[serde(rename = "maxlength")]
    MaxLength,
    #[serde(rename = "numeric")]
    Numeric,
    #[serde(rename = "numeric-range")]
    NumericRange,
    #[serde(rename = "in-array")]
    Membership,
    #[serde(rename = "regex")]
    Regex,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "zip")]
    Zip,
    #[serde(rename = "creditcard")]
    CreditCard,
    #[serde(rename = "callback")]
    Predicate,
}

impl RuleKind {
    /// Every kind, in declaration order.
    pub const ALL: [RuleKind; 12] = [
        RuleKind::Required,
        RuleKind::MinLength,
        RuleKind::MaxLength,
        RuleKind::Numeric,
        RuleKind::NumericRange,
        RuleKind::Membership,
        RuleKind::Regex,
        RuleKind::Email,
        RuleKind::Phone,
        RuleKind::Zip,
        RuleKind::CreditCard,
        RuleKind::Predicate,
    ];

    /// Canonical name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::MinLength => "minlength",
            RuleKind::MaxLength => "maxlength",
            RuleKind::Numeric => "numeric",
            RuleKind::NumericRange => "numeric-range",
            RuleKind::Membership => "in-array",
            RuleKind::Regex => "regex",
            RuleKind::Email => "email",
            RuleKind::Phone => "phone",
            RuleKind::Zip => "zip",
            RuleKind::CreditCard => "creditcard",
            RuleKind::Predicate => "callback",
        }
    }

    /// Name of the criteria variant this kind reads, if any.
    pub fn expected_criteria(&self) -> &'static str {
        match self {
            RuleKind::MinLength | RuleKind::MaxLength => "length",
            RuleKind::NumericRange => "range",
            RuleKind::Membership => "set",
            RuleKind::Regex => "pattern",
            RuleKind::Predicate => "predicate",
            _ => "none",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "required" => RuleKind::Required,
            "minlength" | "min-length" => RuleKind::MinLength,
            "maxlength" | "max-length" => RuleKind::MaxLength,
            "numeric" => RuleKind::Numeric,
            "numeric-range" => RuleKind::NumericRange,
            "in-array" | "membership" => RuleKind::Membership,
            "regex" => RuleKind::Regex,
            "email" => RuleKind::Email,
            "phone" | "phonenumber" => RuleKind::Phone,
            "zip" => RuleKind::Zip,
            "creditcard" | "credit-card" => RuleKind::CreditCard,
            "callback" | "predicate" => RuleKind::Predicate,
            _ => return Err(RuleError::UnknownKind(s.to_string())),
        };
        Ok(kind)
    }
}

/// A user-supplied check that can read any field of the validator.
pub type Predicate = Arc<dyn Fn(&FormValidator) -> bool + Send + Sync>;

/// Extra input a rule needs beyond the field value.
#[derive(Clone, Default)]
pub enum Criteria {
    #[default]
    None,
    /// Character-count bound for `minlength` / `maxlength`.
    Length(usize),
    /// Inclusive `[min, max]` bounds for `numeric-range`.
    Range(f64, f64),
    /// Allowed values for `in-array`.
    Set(BTreeSet<String>),
    /// Compiled pattern for `regex`; matched anywhere in the value.
    Pattern(Regex),
    /// Callable for `callback`.
    Predicate(Predicate),
}

impl Criteria {
    pub fn length(bound: usize) -> Self {
        Criteria::Length(bound)
    }

    pub fn range(min: f64, max: f64) -> Self {
        Criteria::Range(min, max)
    }

    pub fn set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Criteria::Set(values.into_iter().map(Into::into).collect())
    }

    /// Compile `pattern` into regex criteria.
    pub fn pattern(pattern: &str) -> Result<Self, RuleError> {
        Ok(Criteria::Pattern(Regex::new(pattern)?))
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&FormValidator) -> bool + Send + Sync + 'static,
    {
        Criteria::Predicate(Arc::new(f))
    }

    /// Short name of the variant, used in configuration errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Criteria::None => "none",
            Criteria::Length(_) => "length",
            Criteria::Range(..) => "range",
            Criteria::Set(_) => "set",
            Criteria::Pattern(_) => "pattern",
            Criteria::Predicate(_) => "predicate",
        }
    }
}

impl fmt::Debug for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criteria::None => f.write_str("None"),
            Criteria::Length(n) => f.debug_tuple("Length").field(n).finish(),
            Criteria::Range(min, max) => f.debug_tuple("Range").field(min).field(max).finish(),
            Criteria::Set(values) => f.debug_tuple("Set").field(values).finish(),
            Criteria::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Criteria::Predicate(_) => f.write_str("Predicate(<fn>)"),
        }
    }
}

/// A single registered check.
#[derive(Debug, Clone)]
pub struct Rule {
    field: String,
    message: String,
    kind: RuleKind,
    criteria: Criteria,
}

impl Rule {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        kind: RuleKind,
        criteria: Criteria,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
            criteria,
        }
    }

    /// Field identifier this rule checks.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Message recorded when the rule fails.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Build the error for criteria that do not fit this rule's kind.
    pub(crate) fn mismatch(&self) -> RuleError {
        RuleError::CriteriaMismatch {
            field: self.field.clone(),
            kind: self.kind,
            expected: self.kind.expected_criteria(),
            found: self.criteria.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in RuleKind::ALL {
            assert_eq!(kind.as_str().parse::<RuleKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!("min-length".parse::<RuleKind>().unwrap(), RuleKind::MinLength);
        assert_eq!("membership".parse::<RuleKind>().unwrap(), RuleKind::Membership);
        assert_eq!("credit-card".parse::<RuleKind>().unwrap(), RuleKind::CreditCard);
        assert_eq!("predicate".parse::<RuleKind>().unwrap(), RuleKind::Predicate);
        assert_eq!("PhoneNumber".parse::<RuleKind>().unwrap(), RuleKind::Phone);
    }

    #[test]
    fn test_unknown_kind() {
        let result = "postcode".parse::<RuleKind>();
        assert!(matches!(result, Err(RuleError::UnknownKind(ref s)) if s == "postcode"));
    }

    #[test]
    fn test_kind_serializes_to_canonical_name() {
        let json = serde_json::to_string(&RuleKind::NumericRange).unwrap();
        assert_eq!(json, "\"numeric-range\"");
        let kind: RuleKind = serde_json::from_str("\"in-array\"").unwrap();
        assert_eq!(kind, RuleKind::Membership);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            Criteria::pattern("(unclosed"),
            Err(RuleError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_mismatch_message() {
        let rule = Rule::new("age", "bad age", RuleKind::NumericRange, Criteria::length(3));
        let err = rule.mismatch();
        assert_eq!(
            err.to_string(),
            "Rule for field 'age' of kind 'numeric-range' expects range criteria, got length"
        );
    }
}
