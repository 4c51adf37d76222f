//! The validation verdict.

use serde::Serialize;

use crate::issue::{Issue, Severity};

/// The outcome of validating one script.
///
/// `is_valid` is true exactly when no finding has [`Severity::Error`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// Whether the script may be executed.
    pub is_valid: bool,
    /// Messages of error findings, in detection order.
    pub errors: Vec<String>,
    /// Messages of warning findings, in detection order.
    pub warnings: Vec<String>,
    /// Fraction of recommended safety features present, in `[0.0, 1.0]`.
    pub safety_score: f64,
    /// Every finding, in detection order.
    pub issues: Vec<Issue>,
}

impl ValidationResult {
    /// Builds a verdict from findings and a precomputed score.
    ///
    /// The score is clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn from_issues(issues: Vec<Issue>, safety_score: f64) -> Self {
        let messages = |severity: Severity| {
            issues
                .iter()
                .filter(|issue| issue.severity() == severity)
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        };
        let errors = messages(Severity::Error);
        let warnings = messages(Severity::Warning);
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            safety_score: safety_score.clamp(0.0, 1.0),
            issues,
        }
    }

    /// Returns true when any warning was raised.
    #[must_use]
    pub const fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Category;

    #[test]
    fn errors_decide_validity() {
        let result = ValidationResult::from_issues(
            vec![
                Issue::new(Severity::Warning, Category::SuspiciousPattern, "advisory"),
                Issue::new(Severity::Error, Category::Syntax, "unterminated double quote"),
            ],
            0.4,
        );
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["syntax: unterminated double quote"]);
        assert_eq!(result.warnings, vec!["suspicious_pattern: advisory"]);
        assert_eq!(result.issues.len(), 2);
    }

    #[test]
    fn warnings_alone_keep_the_script_valid() {
        let result = ValidationResult::from_issues(
            vec![Issue::new(Severity::Warning, Category::SafetyFeature, "missing backup")],
            0.8,
        );
        assert!(result.is_valid);
        assert!(result.has_warnings());
    }

    #[test]
    fn score_is_clamped() {
        let result = ValidationResult::from_issues(Vec::new(), 1.5);
        assert_eq!(result.safety_score, 1.0);
    }
}
