//! CLI entrypoint for the patchgate remediation tool.
//!
//! The binary delegates to [`patchgate_cli::run`], which loads configuration,
//! installs telemetry, parses the subcommand, and writes the generated script
//! or validation verdict.

use std::io::{self, IsTerminal, StderrLock, StdinLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdout_is_terminal = io::stdout().is_terminal();
    let mut stdin: StdinLock<'_> = io::stdin().lock();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    patchgate_cli::run(
        std::env::args_os(),
        &mut stdin,
        &mut stdout,
        &mut stderr,
        stdout_is_terminal,
    )
}
