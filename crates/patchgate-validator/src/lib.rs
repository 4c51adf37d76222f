//! Static safety validation for generated shell scripts.
//!
//! The validator inspects script text without executing it:
//!
//! - **Dangerous commands** such as recursive root deletion, raw block-device
//!   writes, filesystem formatting, partition tools, and fork bombs are
//!   errors that invalidate the script.
//! - **Suspicious patterns** such as piping a download into a shell are
//!   advisory warnings.
//! - **Safety features** such as a shebang and `set -eu` contribute to an
//!   advisory [`ValidationResult::safety_score`]; each missing feature is a
//!   warning.
//! - **Syntax balance** of quotes, parentheses, and braces is checked by a
//!   single-pass scanner that skips comments and heredoc bodies.
//!
//! Rule tables are plain data ([`SafetyRule`]) compiled into a [`RuleSet`],
//! so custom tables can be supplied through [`PatchValidator::with_rules`].
//!
//! # Example
//!
//! ```ignore
//! let result = patchgate_validator::validate("#!/bin/bash\nrm -rf /\n");
//! assert!(!result.is_valid);
//! ```

mod error;
mod issue;
mod result;
mod rule_set;
mod rules;
mod syntax;
mod validator;

pub use error::RuleError;
pub use issue::{Category, Issue, Severity};
pub use result::ValidationResult;
pub use rule_set::RuleSet;
pub use rules::{DANGEROUS_COMMANDS, SAFETY_FEATURES, SUSPICIOUS_PATTERNS, SafetyRule};
pub use syntax::check_syntax;
pub use validator::{PatchValidator, validate};

#[cfg(test)]
mod tests;
