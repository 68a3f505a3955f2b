//! Standalone value checks.
//!
//! Every function here is a pure predicate over one value: malformed input
//! yields `false`, never a panic. The rule evaluator dispatches to these,
//! and callback rules are free to call them directly for cross-field checks.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    // =========================================================================
    // FORMAT PATTERNS
    // =========================================================================

    /// Integer or decimal literal with optional sign
    static ref NUMBER_PATTERN: Regex = Regex::new(
        r"^[-+]?[0-9]*\.?[0-9]+$"
    ).unwrap();

    /// US ZIP or ZIP+4, spaces allowed around the dash
    static ref ZIP_PATTERN: Regex = Regex::new(
        r"^[0-9]{5}( *- *[0-9]{4})?$"
    ).unwrap();

    /// US phone number: optional parens on the area code, optional spaces/dash between groups
    static ref PHONE_PATTERN: Regex = Regex::new(
        r"^\(?[0-9]{3}\)? *-? *[0-9]{3} *-? *[0-9]{4}$"
    ).unwrap();

    /// Dot-atom local part @ dotted hostname
    static ref EMAIL_PATTERN: Regex = Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$"
    ).unwrap();

    // =========================================================================
    // CARD ISSUER PATTERNS (digits only)
    // =========================================================================

    static ref VISA_PATTERN: Regex = Regex::new(r"^4[0-9]{12}(?:[0-9]{3})?$").unwrap();
    static ref MASTERCARD_PATTERN: Regex = Regex::new(r"^5[1-5][0-9]{14}$").unwrap();
    static ref DISCOVER_PATTERN: Regex = Regex::new(r"^6(?:011|5[0-9]{2})[0-9]{12}$").unwrap();
    static ref AMEX_PATTERN: Regex = Regex::new(r"^3[47][0-9]{13}$").unwrap();
}

const EMAIL_MAX_LEN: usize = 254;
const EMAIL_LOCAL_MAX_LEN: usize = 64;

/// Card networks recognised by [`card_issuer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardIssuer {
    Visa,
    Mastercard,
    Discover,
    AmericanExpress,
}

/// True iff `value` has at least `min` characters.
pub fn longer_than(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

/// True iff `value` has at most `max` characters.
pub fn shorter_than(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

/// True iff `value` is an integer or decimal literal (`-3`, `+0.5`, `.25`).
pub fn is_number(value: &str) -> bool {
    NUMBER_PATTERN.is_match(value)
}

/// True iff `value` is a number within `[min, max]`.
pub fn number_in_range(value: &str, min: f64, max: f64) -> bool {
    if !is_number(value) {
        return false;
    }
    match value.parse::<f64>() {
        Ok(n) => n >= min && n <= max,
        Err(_) => false,
    }
}

/// True iff `value` is a five digit ZIP code, optionally with a `-NNNN` suffix.
pub fn is_zip(value: &str) -> bool {
    ZIP_PATTERN.is_match(value)
}

/// True iff `value` is a `local@domain` address.
pub fn is_email(value: &str) -> bool {
    if value.len() > EMAIL_MAX_LEN {
        return false;
    }
    match value.rsplit_once('@') {
        Some((local, _)) if local.len() <= EMAIL_LOCAL_MAX_LEN => EMAIL_PATTERN.is_match(value),
        _ => false,
    }
}

/// True iff `value` is a ten digit US phone number.
pub fn is_phone_number(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

/// Identify the issuer of a digit-only card number by prefix and length.
pub fn card_issuer(digits: &str) -> Option<CardIssuer> {
    if VISA_PATTERN.is_match(digits) {
        Some(CardIssuer::Visa)
    } else if MASTERCARD_PATTERN.is_match(digits) {
        Some(CardIssuer::Mastercard)
    } else if DISCOVER_PATTERN.is_match(digits) {
        Some(CardIssuer::Discover)
    } else if AMEX_PATTERN.is_match(digits) {
        Some(CardIssuer::AmericanExpress)
    } else {
        None
    }
}

/// Mod-10 checksum over a digit-only string.
///
/// The last digit is the check digit. Walking the rest from right to left,
/// every other digit starting with the one next to the check digit is
/// doubled, with doubled values above 9 reduced to their digit sum.
pub fn luhn_checksum_valid(digits: &str) -> bool {
    let Some(values) = digits
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
    else {
        return false;
    };
    let Some((check, rest)) = values.split_last() else {
        return false;
    };

    let sum: u32 = rest
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled / 10 + doubled % 10
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    (sum + check) % 10 == 0
}

/// True iff `value` is a known-issuer card number with a valid checksum.
///
/// Spaces and dashes are ignored.
pub fn is_credit_card(value: &str) -> bool {
    let digits: String = value.chars().filter(|c| *c != ' ' && *c != '-').collect();
    card_issuer(&digits).is_some() && luhn_checksum_valid(&digits)
}
