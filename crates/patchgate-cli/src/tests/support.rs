//! Shared helpers for driving the runtime in-process.

use std::ffi::OsString;
use std::io::Cursor;
use std::process::ExitCode;

use patchgate_config::Config;

use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Captured result of one in-process invocation.
pub(super) struct Invocation {
    pub(super) exit_code: ExitCode,
    pub(super) stdout: String,
    pub(super) stderr: String,
}

pub(super) fn invoke(args: &[&str], config: Config, input: &str) -> Invocation {
    let mut stdin = Cursor::new(input.as_bytes().to_vec());
    let mut stdout: Vec<u8> = Vec::new();
    let mut stderr: Vec<u8> = Vec::new();
    let loader = StaticConfigLoader::new(config);
    let argv = std::iter::once("patchgate")
        .chain(args.iter().copied())
        .map(OsString::from);
    let exit_code = {
        let mut io = IoStreams::new(&mut stdin, &mut stdout, &mut stderr, false);
        run_with_loader(argv, &mut io, &loader)
    };
    Invocation {
        exit_code,
        stdout: String::from_utf8(stdout).expect("stdout utf8"),
        stderr: String::from_utf8(stderr).expect("stderr utf8"),
    }
}
