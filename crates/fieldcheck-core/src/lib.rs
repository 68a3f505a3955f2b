//! # fieldcheck-core
//!
//! Declarative form-field validation.
//!
//! Callers register rules against field names, load a batch of raw
//! submitted values, and read back a map of field to error message.
//!
//! ## Key Guarantees
//!
//! 1. **First error wins**: at most one message per field, from the first
//!    failing rule in registration order
//! 2. **Sanitized storage**: values are stripped of markup and trimmed on load
//! 3. **Total validators**: malformed input fails a check, it never panics
//! 4. **Fail fast on misconfiguration**: criteria that do not fit a rule's
//!    kind abort the pass with a [`RuleError`]
//!
//! ## Example
//!
//! ```rust
//! use fieldcheck_core::{Criteria, FormValidator, RuleKind};
//!
//! let mut validator = FormValidator::new();
//! validator
//!     .add_rule("name", "Name is a required field", RuleKind::Required, Criteria::None)
//!     .add_rule("zip", "Invalid Zip Code", RuleKind::Zip, Criteria::None);
//!
//! validator.load_fields([("name", "  <b>Al</b> "), ("zip", "9021")]);
//! validator.validate()?;
//!
//! assert_eq!(validator.entry("name"), Some("Al"));
//! assert_eq!(validator.errors()["zip"], "Invalid Zip Code");
//! # Ok::<(), fieldcheck_core::RuleError>(())
//! ```

pub mod report;
pub mod rule;
pub mod sanitize;
pub mod validator;
pub mod validators;

// Re-export main types at crate root
pub use report::ValidationReport;
pub use rule::{Criteria, Predicate, Rule, RuleError, RuleKind};
pub use sanitize::sanitize;
pub use validator::FormValidator;
pub use validators::CardIssuer;
