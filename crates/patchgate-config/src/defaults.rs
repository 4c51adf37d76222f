use crate::logging::LogFormat;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Generated scripts include the root preflight block unless disabled.
pub const DEFAULT_PRE_CHECKS: bool = true;

/// Unknown operating system families fall back to apt unless enabled.
pub const DEFAULT_STRICT_OS_RESOLUTION: bool = false;

/// Warnings are advisory unless enabled.
pub const DEFAULT_FAIL_ON_WARNINGS: bool = false;
