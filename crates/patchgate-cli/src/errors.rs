//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

use patchgate::{AdapterError, RemediationError, RuleError};
use patchgate_config::ConfigError;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error("failed to plan remediation: {0}")]
    Remediation(#[from] RemediationError),
    #[error("failed to compile validator rules: {0}")]
    Rules(#[from] RuleError),
    #[error("failed to read script from {path}: {source}")]
    ReadScript { path: Utf8PathBuf, source: io::Error },
    #[error("failed to read script from stdin: {0}")]
    ReadStdin(io::Error),
    #[error("failed to serialise report: {0}")]
    SerialiseReport(serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}
