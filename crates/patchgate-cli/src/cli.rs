//! Command-line grammar.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use patchgate::PackageManager;

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "patchgate",
    about = "Generates package remediation scripts and checks them before they run",
    disable_help_subcommand = true
)]
pub(crate) struct Cli {
    /// Controls how reports are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto, global = true)]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Generates and validates a script that upgrades a package.
    Patch(PatchArgs),
    /// Generates and validates a script that downgrades a package.
    Rollback(RollbackArgs),
    /// Validates an existing script file, or stdin when no file is given.
    Validate {
        /// Script to validate.
        #[arg(value_name = "FILE")]
        file: Option<Utf8PathBuf>,
    },
    /// Prints the package manager selected for an operating system.
    Resolve(HostArgs),
}

#[derive(Args, Debug, Clone)]
pub(crate) struct HostArgs {
    /// Operating system family (for example `ubuntu` or `rhel`).
    #[arg(long = "os", value_name = "FAMILY")]
    pub(crate) os: String,
    /// Operating system release (for example `7.9`).
    #[arg(long = "os-version", value_name = "VERSION")]
    pub(crate) os_version: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct PackageArgs {
    #[command(flatten)]
    pub(crate) host: HostArgs,
    /// Package to remediate.
    #[arg(long, value_name = "NAME")]
    pub(crate) package: String,
    /// Version currently installed on the host.
    #[arg(long = "installed-version", value_name = "VERSION")]
    pub(crate) installed_version: Option<String>,
    /// Forces a package manager binary instead of resolving one.
    #[arg(long, value_name = "BINARY")]
    pub(crate) manager: Option<PackageManager>,
    /// Omits the root preflight block from the script.
    #[arg(long = "no-pre-checks")]
    pub(crate) no_pre_checks: bool,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct PatchArgs {
    #[command(flatten)]
    pub(crate) package: PackageArgs,
    /// Version to upgrade to; the latest available when omitted.
    #[arg(long = "version", id = "target_version", value_name = "VERSION")]
    pub(crate) target_version: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct RollbackArgs {
    #[command(flatten)]
    pub(crate) package: PackageArgs,
    /// Version to roll back to.
    #[arg(long = "version", id = "target_version", value_name = "VERSION")]
    pub(crate) target_version: String,
}
