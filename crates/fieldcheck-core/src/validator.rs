//! Rule registry and evaluator.
//!
//! Rules run in registration order. The first failing rule for a field
//! records its message; later rules for that field are skipped.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::report::ValidationReport;
use crate::rule::{Criteria, Rule, RuleError, RuleKind};
use crate::sanitize::sanitize;
use crate::validators;

/// Holds the registered rules, the sanitized field values, and the errors
/// found by the last [`validate`](FormValidator::validate) pass.
///
/// One instance per submission is the intended usage.
#[derive(Debug, Default)]
pub struct FormValidator {
    rules: Vec<Rule>,
    fields: BTreeMap<String, String>,
    errors: BTreeMap<String, String>,
    rules_evaluated: usize,
    /// Set when the last `validate()` call ran every rule
    completed: bool,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule. Kind and criteria are not cross-checked until
    /// the rule is evaluated.
    pub fn add_rule(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        kind: RuleKind,
        criteria: Criteria,
    ) -> &mut Self {
        self.rules.push(Rule::new(field, message, kind, criteria));
        self
    }

    /// Sanitize and store each `(field, value)` pair, replacing earlier values.
    pub fn load_fields<I, K, V>(&mut self, raw: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        for (field, value) in raw {
            self.fields.insert(field.into(), sanitize(value.as_ref()));
        }
        self
    }

    /// Evaluate every rule once, in registration order.
    ///
    /// Errors from a previous pass are replaced only when the whole pass
    /// succeeds. A rule whose criteria do not fit its kind aborts the pass
    /// with a [`RuleError`], leaves the previous error map untouched, and
    /// marks the validator as not validated.
    pub fn validate(&mut self) -> Result<(), RuleError> {
        self.completed = false;
        let mut errors = BTreeMap::new();
        let mut evaluated = 0;

        for rule in &self.rules {
            if errors.contains_key(rule.field()) {
                tracing::trace!(field = rule.field(), kind = %rule.kind(), "Field already failed, skipping rule");
                continue;
            }

            let passed = self.check(rule).inspect_err(|e| {
                tracing::error!(field = rule.field(), kind = %rule.kind(), error = %e, "Misconfigured rule");
            })?;
            evaluated += 1;

            if !passed {
                tracing::debug!(field = rule.field(), kind = %rule.kind(), "Rule failed");
                errors.insert(rule.field().to_string(), rule.message().to_string());
            }
        }

        tracing::debug!(
            rules = self.rules.len(),
            evaluated,
            failed_fields = errors.len(),
            "Validation pass complete"
        );
        self.errors = errors;
        self.rules_evaluated = evaluated;
        self.completed = true;
        Ok(())
    }

    /// Run one rule against its field's stored value.
    fn check(&self, rule: &Rule) -> Result<bool, RuleError> {
        // Absent fields (unchecked boxes, omitted inputs) read as empty
        let value = self.entry(rule.field()).unwrap_or("");

        let passed = match (rule.kind(), rule.criteria()) {
            (RuleKind::Required, _) => !value.is_empty(),
            (RuleKind::MinLength, Criteria::Length(min)) => validators::longer_than(value, *min),
            (RuleKind::MaxLength, Criteria::Length(max)) => validators::shorter_than(value, *max),
            (RuleKind::Numeric, _) => validators::is_number(value),
            (RuleKind::NumericRange, Criteria::Range(min, max)) => {
                validators::number_in_range(value, *min, *max)
            }
            (RuleKind::Membership, Criteria::Set(allowed)) => allowed.contains(value),
            (RuleKind::Regex, Criteria::Pattern(pattern)) => pattern.is_match(value),
            (RuleKind::Email, _) => validators::is_email(value),
            (RuleKind::Phone, _) => validators::is_phone_number(value),
            (RuleKind::Zip, _) => validators::is_zip(value),
            (RuleKind::CreditCard, _) => validators::is_credit_card(value),
            (RuleKind::Predicate, Criteria::Predicate(predicate)) => predicate(self),
            _ => return Err(rule.mismatch()),
        };
        Ok(passed)
    }

    /// True iff the last pass recorded at least one error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Field to first failing message.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Sanitized field values.
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Sanitized value of one field.
    pub fn entry(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// True iff the last `validate()` call ran to completion.
    pub fn is_validated(&self) -> bool {
        self.completed
    }

    /// Snapshot of the last pass. Only a completed pass with no errors
    /// reports `valid`.
    pub fn report(&self) -> ValidationReport {
        ValidationReport {
            valid: self.completed && !self.has_errors(),
            errors: self.errors.clone(),
            entries: self.fields.clone(),
            rules_registered: self.rules.len(),
            rules_evaluated: self.rules_evaluated,
            validated_at: Utc::now(),
        }
    }
}
