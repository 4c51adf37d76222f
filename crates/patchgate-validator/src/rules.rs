//! Built-in rule tables.
//!
//! Tables are ordered data consumed by one generic scanning loop in
//! [`crate::RuleSet`]. Findings are reported in table order.

use std::borrow::Cow;

use serde::Serialize;

use crate::issue::{Category, Severity};

/// A single pattern-driven check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyRule {
    name: Cow<'static, str>,
    description: Cow<'static, str>,
    pattern: Cow<'static, str>,
    category: Category,
    severity: Severity,
}

impl SafetyRule {
    /// Creates a rule from static text, usable in constant tables.
    #[must_use]
    pub const fn new(
        name: &'static str,
        description: &'static str,
        pattern: &'static str,
        category: Category,
        severity: Severity,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
            pattern: Cow::Borrowed(pattern),
            category,
            severity,
        }
    }

    /// Creates a rule from owned text, for tables built at runtime.
    #[must_use]
    pub fn owned(
        name: impl Into<String>,
        description: impl Into<String>,
        pattern: impl Into<String>,
        category: Category,
        severity: Severity,
    ) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            description: Cow::Owned(description.into()),
            pattern: Cow::Owned(pattern.into()),
            category,
            severity,
        }
    }

    /// Returns the short identifier of the rule.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the human-readable description used in findings.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the regular expression source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the category assigned to findings.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Returns the severity assigned to findings.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }
}

/// Destructive commands. Any match invalidates the script.
pub const DANGEROUS_COMMANDS: &[SafetyRule] = &[
    SafetyRule::new(
        "root_deletion",
        "recursive deletion of the root filesystem",
        r#"(?m)\brm\s+(?:-[-\w]+\s+)*(?:-[a-zA-Z]*[rR][a-zA-Z]*|--recursive)\s+(?:-[-\w]+\s+)*["']?/\*?["']?(?:[\s;&|)]|$)"#,
        Category::DangerousCommand,
        Severity::Error,
    ),
    SafetyRule::new(
        "raw_device_copy",
        "raw write to a block device with dd",
        r"\bdd\b[^\n]*\bof=/dev/(?:sd[a-z]|hd[a-z]|vd[a-z]|xvd[a-z]|nvme\d+n\d+|mmcblk\d+)",
        Category::DangerousCommand,
        Severity::Error,
    ),
    SafetyRule::new(
        "raw_device_redirect",
        "output redirected onto a block device",
        r">\s*/dev/(?:sd[a-z]|hd[a-z]|vd[a-z]|xvd[a-z]|nvme\d+n\d+|mmcblk\d+)",
        Category::DangerousCommand,
        Severity::Error,
    ),
    SafetyRule::new(
        "filesystem_format",
        "filesystem format command",
        r"\b(?:mkfs(?:\.\w+)?|mke2fs|mkswap)\b",
        Category::DangerousCommand,
        Severity::Error,
    ),
    SafetyRule::new(
        "partition_table",
        "partition table tool",
        r"\b(?:fdisk|sfdisk|cfdisk|parted|gdisk|sgdisk|wipefs)\b",
        Category::DangerousCommand,
        Severity::Error,
    ),
    SafetyRule::new(
        "fork_bomb",
        "fork bomb",
        r":\(\)\s*\{\s*:\s*\|\s*:?\s*&\s*\}\s*;\s*:",
        Category::DangerousCommand,
        Severity::Error,
    ),
];

/// Risky idioms. Matches are advisory.
pub const SUSPICIOUS_PATTERNS: &[SafetyRule] = &[
    SafetyRule::new(
        "remote_pipe_to_shell",
        "remote download piped into a shell",
        r"\b(?:curl|wget)\b[^\n|]*\|\s*(?:sudo\s+)?(?:ba|z|da|k)?sh\b",
        Category::SuspiciousPattern,
        Severity::Warning,
    ),
    SafetyRule::new(
        "eval_substitution",
        "eval of command substitution output",
        r"\beval\b[^\n]*(?:\$\(|`)",
        Category::SuspiciousPattern,
        Severity::Warning,
    ),
    SafetyRule::new(
        "world_writable",
        "world-writable permission grant",
        r"\bchmod\s+(?:-[a-zA-Z]+\s+)*(?:0?[0-7]?[0-7][0-7][2367]\b|[ugoa]*[oa][ugoa]*[+=][rwxXst]*w)",
        Category::SuspiciousPattern,
        Severity::Warning,
    ),
];

/// Recommended defensive idioms. Each present feature raises the score.
pub const SAFETY_FEATURES: &[SafetyRule] = &[
    SafetyRule::new(
        "shebang",
        "interpreter shebang line",
        r"\A#!",
        Category::SafetyFeature,
        Severity::Feature,
    ),
    SafetyRule::new(
        "exit_on_error",
        "exit-on-error directive (set -e)",
        r"(?m)^[ \t]*set[ \t]+[^\n#]*?(?:-[a-zA-Z]*e[a-zA-Z]*\b|-o[ \t]+errexit\b)",
        Category::SafetyFeature,
        Severity::Feature,
    ),
    SafetyRule::new(
        "unset_variable_guard",
        "unset-variable guard (set -u)",
        r"(?m)^[ \t]*set[ \t]+[^\n#]*?(?:-[a-zA-Z]*u[a-zA-Z]*\b|-o[ \t]+nounset\b)",
        Category::SafetyFeature,
        Severity::Feature,
    ),
    SafetyRule::new(
        "logging",
        "logging or echo statement",
        r"\b(?:echo|printf|logger)\b",
        Category::SafetyFeature,
        Severity::Feature,
    ),
    SafetyRule::new(
        "backup",
        "backup before modification",
        r#"(?im)(?:^|[;&|(])\s*(?:sudo\s+)?(?:cp|rsync|tar)\b[^\n#]*(?:backup|\.bak\b|\.orig\b)|>>?[ \t]*["']?[^\s"'#;]*(?:backup|\.bak\b|\.orig\b)"#,
        Category::SafetyFeature,
        Severity::Feature,
    ),
];
