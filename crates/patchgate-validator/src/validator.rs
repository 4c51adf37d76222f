//! The validation pipeline.

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::RuleError;
use crate::issue::{Category, Issue, Severity};
use crate::result::ValidationResult;
use crate::rule_set::RuleSet;
use crate::rules::{DANGEROUS_COMMANDS, SAFETY_FEATURES, SUSPICIOUS_PATTERNS, SafetyRule};
use crate::syntax::check_syntax;

const LOG_TARGET: &str = "patchgate::validator";

static SHARED: Lazy<Result<PatchValidator, RuleError>> = Lazy::new(PatchValidator::new);

/// Screens script text against compiled rule tables.
///
/// Validation is pure: it performs no I/O, holds no mutable state, and may be
/// called concurrently from any number of threads.
#[derive(Debug, Clone)]
pub struct PatchValidator {
    dangerous: RuleSet,
    suspicious: RuleSet,
    features: RuleSet,
}

impl PatchValidator {
    /// Compiles the built-in rule tables.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] if a built-in pattern fails to
    /// compile.
    pub fn new() -> Result<Self, RuleError> {
        Self::with_rules(DANGEROUS_COMMANDS, SUSPICIOUS_PATTERNS, SAFETY_FEATURES)
    }

    /// Compiles custom rule tables.
    ///
    /// Findings take their severity and category from each rule, so a table
    /// passed as `dangerous` may still hold advisory rules.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] for the first pattern that fails
    /// to compile.
    pub fn with_rules(
        dangerous: &[SafetyRule],
        suspicious: &[SafetyRule],
        features: &[SafetyRule],
    ) -> Result<Self, RuleError> {
        Ok(Self {
            dangerous: RuleSet::compile(dangerous)?,
            suspicious: RuleSet::compile(suspicious)?,
            features: RuleSet::compile(features)?,
        })
    }

    /// Returns the lazily compiled validator for the built-in tables.
    ///
    /// # Errors
    ///
    /// Returns the compilation error if the built-in tables are invalid.
    pub fn shared() -> Result<&'static Self, RuleError> {
        Lazy::force(&SHARED).as_ref().map_err(Clone::clone)
    }

    /// Validates `text`.
    ///
    /// Dangerous commands, suspicious patterns, missing safety features, and
    /// syntax imbalances are reported in that order. Only dangerous commands
    /// and syntax imbalances affect validity.
    #[must_use]
    pub fn validate(&self, text: &str) -> ValidationResult {
        let mut issues = self.dangerous.scan(text);
        issues.extend(self.suspicious.scan(text));
        let (present, missing) = self.features.partition(text);
        issues.extend(missing.into_iter().map(|rule| {
            Issue::new(
                Severity::Warning,
                Category::SafetyFeature,
                format!("missing {}", rule.description()),
            )
            .with_pattern(rule.pattern())
        }));
        issues.extend(check_syntax(text));
        let result = ValidationResult::from_issues(
            issues,
            safety_score(present.len(), self.features.len()),
        );
        debug!(
            target: LOG_TARGET,
            is_valid = result.is_valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            safety_score = result.safety_score,
            "validated script"
        );
        result
    }
}

/// Validates `text` with the built-in rule tables.
///
/// If the built-in tables cannot be compiled the script is rejected with a
/// `rule_table` error rather than approved unchecked.
#[must_use]
pub fn validate(text: &str) -> ValidationResult {
    Lazy::force(&SHARED)
        .as_ref()
        .map_or_else(rule_table_failure, |validator| validator.validate(text))
}

fn rule_table_failure(error: &RuleError) -> ValidationResult {
    ValidationResult::from_issues(
        vec![Issue::new(Severity::Error, Category::RuleTable, error.to_string())],
        0.0,
    )
}

/// Returns the fraction of `total` features that are `present`.
#[expect(
    clippy::float_arithmetic,
    reason = "the safety score is a ratio of feature counts"
)]
fn safety_score(present: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let as_f64 = |count: usize| u32::try_from(count).map_or(f64::from(u32::MAX), f64::from);
    (as_f64(present) / as_f64(total)).min(1.0)
}
