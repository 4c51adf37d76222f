//! Error types for rule compilation.

use thiserror::Error;

/// Errors raised while compiling rule tables.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum RuleError {
    /// A rule pattern is not a valid regular expression.
    #[error("rule '{name}' has an invalid pattern: {source}")]
    InvalidPattern {
        /// Name of the offending rule.
        name: String,
        /// Underlying regex compilation error.
        #[source]
        source: regex::Error,
    },
}

impl RuleError {
    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(name: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            name: name.into(),
            source,
        }
    }
}
