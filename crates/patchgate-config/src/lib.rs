//! Layered configuration for the patchgate toolchain.
//!
//! Values are merged by `ortho_config` with the precedence defaults, then the
//! configuration file named by `--config-path` or `PATCHGATE_CONFIG_PATH`,
//! then `PATCHGATE_*` environment variables, then command-line flags.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_FAIL_ON_WARNINGS, DEFAULT_LOG_FILTER, DEFAULT_PRE_CHECKS,
    DEFAULT_STRICT_OS_RESOLUTION, default_log_filter, default_log_filter_string,
    default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration shared by the library and the binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "PATCHGATE")]
pub struct Config {
    /// `tracing` filter directive applied to log output.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Whether generated scripts include the root preflight block.
    #[ortho_config(default = DEFAULT_PRE_CHECKS)]
    pub pre_checks: bool,
    /// Whether unknown operating system families are rejected rather than
    /// resolved to apt.
    #[ortho_config(default = DEFAULT_STRICT_OS_RESOLUTION)]
    pub strict_os_resolution: bool,
    /// Whether any validation warning makes the binary exit unsuccessfully.
    #[ortho_config(default = DEFAULT_FAIL_ON_WARNINGS)]
    pub fail_on_warnings: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            pre_checks: DEFAULT_PRE_CHECKS,
            strict_os_resolution: DEFAULT_STRICT_OS_RESOLUTION,
            fail_on_warnings: DEFAULT_FAIL_ON_WARNINGS,
        }
    }
}

impl Config {
    /// Returns the log filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns whether generated scripts include the root preflight block.
    #[must_use]
    pub const fn pre_checks(&self) -> bool {
        self.pre_checks
    }

    /// Returns whether unknown families are rejected.
    #[must_use]
    pub const fn strict_os_resolution(&self) -> bool {
        self.strict_os_resolution
    }

    /// Returns whether warnings fail the run.
    #[must_use]
    pub const fn fail_on_warnings(&self) -> bool {
        self.fail_on_warnings
    }

    /// Checks values that deserialisation alone cannot reject.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyLogFilter`] when the log filter is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::EmptyLogFilter);
        }
        Ok(())
    }
}

/// Errors raised by [`Config::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The log filter was empty or whitespace.
    #[error("log_filter must not be empty")]
    EmptyLogFilter,
}
