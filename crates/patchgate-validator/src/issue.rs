//! Findings reported by the validator.

use std::fmt;

use serde::Serialize;

/// How much weight a finding carries in the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Invalidates the script.
    Error,
    /// Advisory only.
    Warning,
    /// Marks a recommended defensive idiom.
    Feature,
}

impl Severity {
    /// Returns the lower-case tag for this severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Feature => "feature",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of check that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// A destructive command such as recursive root deletion.
    DangerousCommand,
    /// A risky idiom such as piping a download into a shell.
    SuspiciousPattern,
    /// A recommended defensive idiom.
    SafetyFeature,
    /// Unbalanced quoting, parentheses, or braces.
    Syntax,
    /// The rule tables themselves could not be compiled.
    RuleTable,
}

impl Category {
    /// Returns the snake-case tag for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DangerousCommand => "dangerous_command",
            Self::SuspiciousPattern => "suspicious_pattern",
            Self::SafetyFeature => "safety_feature",
            Self::Syntax => "syntax",
            Self::RuleTable => "rule_table",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    severity: Severity,
    category: Category,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched: Option<String>,
}

impl Issue {
    /// Creates a finding carrying only a message.
    #[must_use]
    pub fn new(severity: Severity, category: Category, message: impl Into<String>) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            pattern: None,
            line: None,
            matched: None,
        }
    }

    /// Records the pattern that triggered the finding.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Records the 1-based line the finding refers to.
    #[must_use]
    pub const fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Records the text that matched.
    #[must_use]
    pub fn with_matched(mut self, matched: impl Into<String>) -> Self {
        self.matched = Some(matched.into());
        self
    }

    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the triggering pattern, if any.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Returns the 1-based line, if known.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        self.line
    }

    /// Returns the matched text, if any.
    #[must_use]
    pub fn matched(&self) -> Option<&str> {
        self.matched.as_deref()
    }

    /// Returns true for validity-determining findings.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}
