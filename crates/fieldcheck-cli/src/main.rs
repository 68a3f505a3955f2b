//! `fieldcheck` command line.
//!
//! Runs the built-in registration form against a submitted field document,
//! prints sanitized entries, or probes a single validator.

mod form;
mod input;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fieldcheck_core::{validators, RuleKind, ValidationReport};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::input::{read_fields, InputFormat};

#[derive(Debug, Parser)]
#[command(name = "fieldcheck", version, about = "Validate submitted form fields")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a field document against the registration form
    Check {
        /// Field document path, or `-` for stdin
        input: PathBuf,

        /// Input format (detected from the extension when omitted)
        #[arg(long, value_enum)]
        format: Option<InputFormat>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Print the sanitized entries of a field document
    Sanitize {
        /// Field document path, or `-` for stdin
        input: PathBuf,

        #[arg(long, value_enum)]
        format: Option<InputFormat>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Run a single validator against a value
    Probe {
        /// Rule kind (numeric, numeric-range, zip, email, phone, creditcard, minlength, maxlength)
        kind: RuleKind,

        value: String,

        /// Lower bound for minlength / numeric-range
        #[arg(long)]
        min: Option<f64>,

        /// Upper bound for maxlength / numeric-range
        #[arg(long)]
        max: Option<f64>,
    },

    /// List the supported rule kinds
    Kinds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "fieldcheck_core=debug,fieldcheck=debug",
        _ => "fieldcheck_core=trace,fieldcheck=trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Print a structured value. Text output has no generic rendering and
/// falls back to JSON.
fn emit<T: Serialize>(value: &T, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Json | OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(value)?)
        }
    }
    Ok(())
}

fn print_report(report: &ValidationReport, output: OutputFormat) -> Result<()> {
    if output != OutputFormat::Text {
        return emit(report, output);
    }

    if report.valid {
        println!("OK: all fields valid ({} rules evaluated)", report.rules_evaluated);
    } else {
        println!("{} field(s) failed:", report.errors.len());
        for (field, message) in &report.errors {
            println!("  {}: {}", field, message);
        }
    }
    Ok(())
}

fn check(input: PathBuf, format: Option<InputFormat>, output: OutputFormat) -> Result<ExitCode> {
    let fields = read_fields(&input, format)?;

    let mut validator = form::registration_form();
    validator.load_fields(&fields);
    validator.validate()?;

    let report = validator.report();
    tracing::info!(valid = report.valid, failed = report.errors.len(), "Form checked");
    print_report(&report, output)?;

    Ok(if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn sanitize(input: PathBuf, format: Option<InputFormat>, output: OutputFormat) -> Result<()> {
    let fields = read_fields(&input, format)?;

    let mut validator = fieldcheck_core::FormValidator::new();
    validator.load_fields(&fields);

    if output == OutputFormat::Text {
        for (field, value) in validator.entries() {
            println!("{}: {}", field, value);
        }
        return Ok(());
    }
    emit(validator.entries(), output)
}

/// A character-count bound must be a whole, non-negative number.
fn length_bound(kind: &str, flag: &str, bound: Option<f64>) -> Result<usize> {
    match bound {
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(n as usize),
        Some(n) => bail!("{} needs a whole non-negative {}, got {}", kind, flag, n),
        None => bail!("{} needs {}", kind, flag),
    }
}

fn probe(kind: RuleKind, value: &str, min: Option<f64>, max: Option<f64>) -> Result<bool> {
    let passed = match kind {
        RuleKind::Numeric => validators::is_number(value),
        RuleKind::Zip => validators::is_zip(value),
        RuleKind::Email => validators::is_email(value),
        RuleKind::Phone => validators::is_phone_number(value),
        RuleKind::CreditCard => validators::is_credit_card(value),
        RuleKind::Required => !fieldcheck_core::sanitize(value).is_empty(),
        RuleKind::NumericRange => match (min, max) {
            (Some(min), Some(max)) => validators::number_in_range(value, min, max),
            _ => bail!("numeric-range needs both --min and --max"),
        },
        RuleKind::MinLength => validators::longer_than(value, length_bound("minlength", "--min", min)?),
        RuleKind::MaxLength => validators::shorter_than(value, length_bound("maxlength", "--max", max)?),
        RuleKind::Membership | RuleKind::Regex | RuleKind::Predicate => {
            bail!("'{}' rules need criteria that cannot be given on the command line", kind)
        }
    };
    Ok(passed)
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Check {
            input,
            format,
            output,
        } => check(input, format, output),
        Command::Sanitize {
            input,
            format,
            output,
        } => {
            sanitize(input, format, output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Probe {
            kind,
            value,
            min,
            max,
        } => {
            let passed = probe(kind, &value, min, max)?;
            if passed {
                println!("valid");
                if kind == RuleKind::CreditCard {
                    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
                    if let Some(issuer) = validators::card_issuer(&digits) {
                        println!("issuer: {:?}", issuer);
                    }
                }
                Ok(ExitCode::SUCCESS)
            } else {
                println!("invalid");
                Ok(ExitCode::from(1))
            }
        }
        Command::Kinds => {
            for kind in RuleKind::ALL {
                println!("{:<14} criteria: {}", kind.as_str(), kind.expected_criteria());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "fieldcheck failed");
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_check() {
        let cli = Cli::try_parse_from(["fieldcheck", "check", "form.yaml", "-o", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Check { output: OutputFormat::Json, format: None, .. }
        ));
    }

    #[test]
    fn test_cli_parses_kind_names() {
        let cli = Cli::try_parse_from(["fieldcheck", "probe", "credit-card", "4111111111111111"]).unwrap();
        assert!(matches!(cli.command, Command::Probe { kind: RuleKind::CreditCard, .. }));
    }

    #[test]
    fn test_length_bounds_must_be_whole() {
        assert!(probe(RuleKind::MinLength, "abc", Some(2.7), None).is_err());
        assert!(probe(RuleKind::MaxLength, "abc", None, Some(-1.0)).is_err());
        assert!(probe(RuleKind::MinLength, "abc", None, None).is_err());
        assert_eq!(length_bound("minlength", "--min", Some(4.0)).unwrap(), 4);
    }

    #[test]
    fn test_probe() {
        assert!(probe(RuleKind::Zip, "90210", None, None).unwrap());
        assert!(!probe(RuleKind::CreditCard, "4111111111111112", None, None).unwrap());
        assert!(probe(RuleKind::NumericRange, "50", Some(1.0), Some(100.0)).unwrap());
        assert!(probe(RuleKind::NumericRange, "50", Some(1.0), None).is_err());
        assert!(probe(RuleKind::MinLength, "abc", Some(3.0), None).unwrap());
        assert!(!probe(RuleKind::MaxLength, "abc", None, Some(2.0)).unwrap());
        assert!(probe(RuleKind::Regex, "abc", None, None).is_err());
    }
}
