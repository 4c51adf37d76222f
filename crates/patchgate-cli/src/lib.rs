//! Command-line interface runtime for patchgate.
//!
//! The module owns argument parsing, configuration bootstrapping, telemetry
//! installation, and report rendering. Remediation itself lives in the
//! [`patchgate`] facade. The runtime can be driven from the binary
//! entrypoint or from tests that substitute the configuration loader and IO
//! streams.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::process::ExitCode;

use camino::Utf8Path;
use clap::Parser;
use tracing::debug;

use patchgate::{
    OsDescriptor, PackageSpec, RemediationPlan, RemediationRequest, Remediator, ValidationResult,
    resolve, resolve_strict,
};
use patchgate_config::Config;

mod cli;
mod config;
mod errors;
pub mod output;
pub mod telemetry;

use cli::{Cli, CliCommand, HostArgs, PackageArgs, PatchArgs, RollbackArgs};
use config::split_config_arguments;
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;
pub use output::{OutputFormat, ResolvedOutputFormat};
use output::{Resolution, write_plan, write_resolution, write_validation};

const LOG_TARGET: &str = "patchgate::cli";

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, R: Read, W: Write, E: Write> {
    pub(crate) stdin: &'a mut R,
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
    stdout_is_terminal: bool,
}

impl<'a, R: Read, W: Write, E: Write> IoStreams<'a, R, W, E> {
    pub(crate) const fn new(
        stdin: &'a mut R,
        stdout: &'a mut W,
        stderr: &'a mut E,
        stdout_is_terminal: bool,
    ) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
            stdout_is_terminal,
        }
    }

    pub(crate) const fn stdout_is_terminal(&self) -> bool {
        self.stdout_is_terminal
    }
}

/// Whether a command's report should make the process fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Accepted,
    Rejected,
}

impl Outcome {
    const fn of(result: &ValidationResult, fail_on_warnings: bool) -> Self {
        if result.is_valid && !(fail_on_warnings && result.has_warnings()) {
            Self::Accepted
        } else {
            Self::Rejected
        }
    }

    fn exit_code(self) -> ExitCode {
        match self {
            Self::Accepted => ExitCode::SUCCESS,
            Self::Rejected => ExitCode::FAILURE,
        }
    }
}

struct CliRunner<'a, R: Read, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, R, W, E>,
    loader: &'a L,
}

impl<'a, R, W, E, L> CliRunner<'a, R, W, E, L>
where
    R: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    const fn new(io: &'a mut IoStreams<'a, R, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);

        let result = Cli::try_parse_from(&split.command_arguments)
            .map_err(AppError::CliUsage)
            .and_then(|cli| {
                self.loader
                    .load(&split.config_arguments)
                    .map(|config| (cli, config))
            })
            .and_then(|(cli, config)| {
                telemetry::initialise(&config)?;
                self.execute(cli, &config)
            });

        match result {
            Ok(outcome) => outcome.exit_code(),
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                let _ = write!(self.io.stdout, "{error}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }

    fn execute(&mut self, cli: Cli, config: &Config) -> Result<Outcome, AppError> {
        let format = cli.output.resolve(self.io.stdout_is_terminal());
        debug!(target: LOG_TARGET, command = ?cli.command, ?format, "dispatching command");
        match cli.command {
            CliCommand::Patch(args) => {
                let plan = plan_patch(&args, config)?;
                write_plan(&plan, format, self.io.stdout, self.io.stderr)?;
                Ok(Outcome::of(&plan.validation, config.fail_on_warnings()))
            }
            CliCommand::Rollback(args) => {
                let plan = plan_rollback(&args, config)?;
                write_plan(&plan, format, self.io.stdout, self.io.stderr)?;
                Ok(Outcome::of(&plan.validation, config.fail_on_warnings()))
            }
            CliCommand::Validate { file } => {
                let text = match file {
                    Some(path) => read_script(&path)?,
                    None => read_stdin(self.io.stdin)?,
                };
                let result = patchgate::validate(&text);
                write_validation(&result, format, self.io.stdout)?;
                Ok(Outcome::of(&result, config.fail_on_warnings()))
            }
            CliCommand::Resolve(host) => {
                let resolution = resolve_host(&host, config)?;
                write_resolution(&resolution, format, self.io.stdout)?;
                Ok(Outcome::Accepted)
            }
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(
    args: I,
    stdin: &mut R,
    stdout: &mut W,
    stderr: &mut E,
    stdout_is_terminal: bool,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdin, stdout, stderr, stdout_is_terminal);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<'a, I, R, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, R, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

fn request_for(
    args: &PackageArgs,
    version: Option<&str>,
    config: &Config,
) -> Result<RemediationRequest, AppError> {
    let mut package = PackageSpec::new(args.package.as_str())?;
    if let Some(target) = version {
        package = package.with_version(target)?;
    }
    if let Some(installed) = args.installed_version.as_deref() {
        package = package.with_installed_version(installed)?;
    }
    let os = OsDescriptor::new(args.host.os.as_str(), args.host.os_version.clone());
    Ok(RemediationRequest::new(os, package)
        .with_pre_checks(config.pre_checks() && !args.no_pre_checks)
        .with_strict_resolution(config.strict_os_resolution())
        .with_manager(args.manager))
}

fn plan_patch(args: &PatchArgs, config: &Config) -> Result<RemediationPlan, AppError> {
    let request = request_for(&args.package, args.target_version.as_deref(), config)?;
    Ok(Remediator::new()?.plan_patch(&request)?)
}

fn plan_rollback(args: &RollbackArgs, config: &Config) -> Result<RemediationPlan, AppError> {
    let request = request_for(&args.package, None, config)?;
    Ok(Remediator::new()?.plan_rollback(&request, &args.target_version)?)
}

fn resolve_host(host: &HostArgs, config: &Config) -> Result<Resolution, AppError> {
    let version = host.os_version.as_deref();
    let manager = if config.strict_os_resolution() {
        resolve_strict(&host.os, version)?
    } else {
        resolve(&host.os, version)
    };
    Ok(Resolution::new(&host.os, version, manager))
}

fn read_script(path: &Utf8Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::ReadScript {
        path: path.to_path_buf(),
        source,
    })
}

fn read_stdin<R: Read>(stdin: &mut R) -> Result<String, AppError> {
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .map_err(AppError::ReadStdin)?;
    Ok(text)
}

#[cfg(test)]
mod tests;
