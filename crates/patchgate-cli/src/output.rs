//! Report rendering for human readers and machine consumers.
//!
//! JSON output serialises the library types unchanged. Human output for
//! generated plans writes the script itself to stdout and the verdict to
//! stderr, so the script can be redirected straight into a file.

use std::fmt::Write as _;
use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use patchgate::{PackageManager, RemediationPlan, ValidationResult};

use crate::AppError;

/// Output format selection for reports.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    Auto,
    /// Always render human-readable output.
    Human,
    /// Always emit JSON.
    Json,
}

/// Output format after resolving `auto` based on TTY detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Human-readable output.
    Human,
    /// JSON documents.
    Json,
}

impl OutputFormat {
    /// Resolves the output format based on whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto if stdout_is_terminal => ResolvedOutputFormat::Human,
            Self::Auto | Self::Json => ResolvedOutputFormat::Json,
            Self::Human => ResolvedOutputFormat::Human,
        }
    }
}

/// The manager chosen for an operating system identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Resolution {
    pub(crate) os_family: String,
    pub(crate) os_version: Option<String>,
    pub(crate) manager: PackageManager,
    pub(crate) binary: &'static str,
}

impl Resolution {
    pub(crate) fn new(os_family: &str, os_version: Option<&str>, manager: PackageManager) -> Self {
        Self {
            os_family: os_family.to_owned(),
            os_version: os_version.map(str::to_owned),
            manager,
            binary: manager.binary(),
        }
    }
}

/// Renders the verdict block shared by plan and validation reports.
pub(crate) fn render_verdict(result: &ValidationResult) -> String {
    let mut rendered = String::new();
    let verdict = if result.is_valid { "valid" } else { "rejected" };
    // Writing into a String cannot fail.
    let _ = writeln!(rendered, "verdict: {verdict}");
    let _ = writeln!(rendered, "safety score: {:.2}", result.safety_score);
    for issue in &result.issues {
        let _ = writeln!(rendered, "{}: {issue}", issue.severity());
    }
    rendered
}

pub(crate) fn write_plan<W, E>(
    plan: &RemediationPlan,
    format: ResolvedOutputFormat,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<(), AppError>
where
    W: Write,
    E: Write,
{
    match format {
        ResolvedOutputFormat::Json => write_json(plan, stdout),
        ResolvedOutputFormat::Human => {
            if plan.is_executable() {
                stdout
                    .write_all(plan.artifact.text().as_bytes())
                    .map_err(AppError::WriteOutput)?;
            }
            let header = format!(
                "{} script for {} via {}\n",
                plan.artifact.kind(),
                plan.artifact.package().name(),
                plan.artifact.manager()
            );
            stderr
                .write_all(header.as_bytes())
                .and_then(|()| stderr.write_all(render_verdict(&plan.validation).as_bytes()))
                .map_err(AppError::WriteOutput)
        }
    }
}

pub(crate) fn write_validation<W>(
    result: &ValidationResult,
    format: ResolvedOutputFormat,
    stdout: &mut W,
) -> Result<(), AppError>
where
    W: Write,
{
    match format {
        ResolvedOutputFormat::Json => write_json(result, stdout),
        ResolvedOutputFormat::Human => stdout
            .write_all(render_verdict(result).as_bytes())
            .map_err(AppError::WriteOutput),
    }
}

pub(crate) fn write_resolution<W>(
    resolution: &Resolution,
    format: ResolvedOutputFormat,
    stdout: &mut W,
) -> Result<(), AppError>
where
    W: Write,
{
    match format {
        ResolvedOutputFormat::Json => write_json(resolution, stdout),
        ResolvedOutputFormat::Human => {
            let version = resolution.os_version.as_deref().unwrap_or("any release");
            writeln!(
                stdout,
                "{} ({version}): {}",
                resolution.os_family, resolution.binary
            )
            .map_err(AppError::WriteOutput)
        }
    }
}

fn write_json<T, W>(value: &T, stdout: &mut W) -> Result<(), AppError>
where
    T: Serialize,
    W: Write,
{
    serde_json::to_writer_pretty(&mut *stdout, value).map_err(AppError::SerialiseReport)?;
    stdout.write_all(b"\n").map_err(AppError::WriteOutput)?;
    stdout.flush().map_err(AppError::WriteOutput)
}
