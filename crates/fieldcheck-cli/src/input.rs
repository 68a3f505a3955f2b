//! Field document loading.
//!
//! A field document is a flat JSON or YAML mapping of field name to value.
//! Strings, booleans, and integers are accepted and rendered as text;
//! `null` means the field was not submitted. Non-integer numbers are
//! rejected since their text form would not match what was written.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// Guess from a file extension, defaulting to JSON.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => InputFormat::Yaml,
            _ => InputFormat::Json,
        }
    }
}

/// Render an integer scalar exactly; reject anything that could lose digits.
fn integer_text(field: &str, number: impl std::fmt::Display, is_float: bool) -> Result<String> {
    if is_float {
        bail!(
            "Field '{}' holds the non-integer number {}; quote it as a string to validate it verbatim",
            field,
            number
        );
    }
    Ok(number.to_string())
}

fn json_text(field: &str, value: serde_json::Value) -> Result<Option<String>> {
    use serde_json::Value;

    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => integer_text(field, &n, n.is_f64()).map(Some),
        Value::Array(_) | Value::Object(_) => {
            bail!("Field '{}' must be a scalar, found a nested value", field)
        }
    }
}

fn yaml_text(field: &str, value: serde_yaml::Value) -> Result<Option<String>> {
    use serde_yaml::Value;

    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => integer_text(field, &n, n.is_f64()).map(Some),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
            bail!("Field '{}' must be a scalar, found a nested value", field)
        }
    }
}

/// Parse a field document from text.
pub fn parse_fields(contents: &str, format: InputFormat) -> Result<BTreeMap<String, String>> {
    let mut fields = BTreeMap::new();

    match format {
        InputFormat::Json => {
            let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(contents)
                .context("Field document is not a flat JSON object")?;
            for (field, value) in raw {
                if let Some(text) = json_text(&field, value)? {
                    fields.insert(field, text);
                }
            }
        }
        InputFormat::Yaml => {
            let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(contents)
                .context("Field document is not a flat YAML mapping")?;
            for (field, value) in raw {
                if let Some(text) = yaml_text(&field, value)? {
                    fields.insert(field, text);
                }
            }
        }
    }

    Ok(fields)
}

/// Read a field document from `path`, or stdin when `path` is `-`.
pub fn read_fields(path: &Path, format: Option<InputFormat>) -> Result<BTreeMap<String, String>> {
    let format = format.unwrap_or_else(|| InputFormat::detect(path));

    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read field document from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read field document {}", path.display()))?
    };

    tracing::debug!(path = %path.display(), format = ?format, "Parsing field document");
    parse_fields(&contents, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_scalars() {
        let fields = parse_fields(
            r#"{"name": "Al", "year": 1984, "subscribe": true, "phone": null}"#,
            InputFormat::Json,
        )
        .unwrap();

        assert_eq!(fields["name"], "Al");
        assert_eq!(fields["year"], "1984");
        assert_eq!(fields["subscribe"], "true");
        assert!(!fields.contains_key("phone"));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "name: \"<b>Al</b>\"\nzip: \"90210\"\nstate: CA\n";
        let fields = parse_fields(yaml, InputFormat::Yaml).unwrap();

        assert_eq!(fields["name"], "<b>Al</b>");
        assert_eq!(fields["zip"], "90210");
        assert_eq!(fields["state"], "CA");
    }

    #[test]
    fn test_integers_keep_every_digit() {
        let fields = parse_fields(
            r#"{"card": 12345678901234567890, "delta": -42}"#,
            InputFormat::Json,
        )
        .unwrap();

        assert_eq!(fields["card"], "12345678901234567890");
        assert_eq!(fields["delta"], "-42");
    }

    #[test]
    fn test_yaml_leading_zero_stays_text() {
        let fields = parse_fields("zip: 02134\nyear: 1984\n", InputFormat::Yaml).unwrap();

        assert_eq!(fields["zip"], "02134");
        assert_eq!(fields["year"], "1984");
    }

    #[test]
    fn test_float_scalars_rejected() {
        for yaml in ["year: 1984.0\n", "n: 1e3\n"] {
            let err = parse_fields(yaml, InputFormat::Yaml).unwrap_err();
            assert!(err.to_string().contains("quote it as a string"), "{}", err);
        }

        let err = parse_fields(r#"{"amount": 2.50}"#, InputFormat::Json).unwrap_err();
        assert!(err.to_string().contains("'amount'"), "{}", err);
    }

    #[test]
    fn test_quoted_float_kept_verbatim() {
        let fields = parse_fields("year: \"1984.0\"\nn: \"1e3\"\n", InputFormat::Yaml).unwrap();

        assert_eq!(fields["year"], "1984.0");
        assert_eq!(fields["n"], "1e3");
    }

    #[test]
    fn test_nested_values_rejected() {
        let result = parse_fields(r#"{"name": {"first": "Al"}}"#, InputFormat::Json);
        assert!(result.is_err());
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(InputFormat::detect(Path::new("form.yml")), InputFormat::Yaml);
        assert_eq!(InputFormat::detect(Path::new("form.yaml")), InputFormat::Yaml);
        assert_eq!(InputFormat::detect(Path::new("form.json")), InputFormat::Json);
        assert_eq!(InputFormat::detect(Path::new("-")), InputFormat::Json);
    }
}
