//! Built-in registration form.
//!
//! Collects a name, ZIP code, state, and birthday. The birthday is entered
//! as separate `month` and `year` inputs and checked as one logical field.

use chrono::{Datelike, Utc};
use fieldcheck_core::validators::number_in_range;
use fieldcheck_core::{Criteria, FormValidator, RuleKind};

pub const STATES: [&str; 51] = [
    "AK", "AL", "AR", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "HI", "IA", "ID", "IL",
    "IN", "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MS", "MT", "NC", "ND", "NE",
    "NH", "NJ", "NM", "NV", "NY", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VA", "VT", "WA", "WI", "WV", "WY",
];

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const EARLIEST_BIRTH_YEAR: i32 = 1900;

/// Birthday check over the `month` and `year` entries.
fn valid_birthday(validator: &FormValidator) -> bool {
    let month = validator.entry("month").unwrap_or("");
    let year = validator.entry("year").unwrap_or("");
    MONTHS.iter().any(|m| *m == month)
        && number_in_range(year, f64::from(EARLIEST_BIRTH_YEAR), f64::from(Utc::now().year()))
}

/// A validator with the registration form's rules registered.
pub fn registration_form() -> FormValidator {
    let mut validator = FormValidator::new();
    validator
        .add_rule("name", "Name is a required field", RuleKind::Required, Criteria::None)
        .add_rule(
            "name",
            "Name must be longer than 2 characters",
            RuleKind::MinLength,
            Criteria::length(2),
        )
        .add_rule("zip", "Zip Code is a required field", RuleKind::Required, Criteria::None)
        .add_rule("zip", "Invalid Zip Code", RuleKind::Zip, Criteria::None)
        .add_rule("state", "Please select a state", RuleKind::Membership, Criteria::set(STATES))
        .add_rule(
            "birthday",
            "Please select your birthday",
            RuleKind::Predicate,
            Criteria::predicate(valid_birthday),
        );
    validator
}
