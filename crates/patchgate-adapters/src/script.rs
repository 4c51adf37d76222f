//! Script assembly for patch and rollback operations.
//!
//! Both script kinds share one skeleton: shebang, fail-fast directive,
//! optional root preflight, metadata refresh, a recorded backup of the
//! current version, the mutating command, and a verification step.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::manager::PackageManager;
use crate::package::PackageSpec;

/// The interpreter line every generated script starts with.
pub const SHEBANG: &str = "#!/bin/bash";

/// Exit on error, on unset variables, and on any failed pipeline stage.
pub const FAIL_FAST: &str = "set -euo pipefail";

/// Aborts the script unless it runs with superuser privilege.
pub const PREFLIGHT_ROOT_CHECK: &str = "if [ \"$(id -u)\" -ne 0 ]; then echo \"patchgate: this script must be run as root\" >&2; exit 1; fi";

/// Directory where generated scripts record versions ahead of mutation.
pub const BACKUP_DIR: &str = "/var/backups/patchgate";

const LOG_TARGET: &str = "patchgate::adapters::script";

/// Whether a script moves a package forward or back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    /// Installs or upgrades a package.
    Patch,
    /// Downgrades a package to an explicit earlier version.
    Rollback,
}

impl ScriptKind {
    /// Returns the lower-case tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Rollback => "rollback",
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated script together with the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptArtifact {
    text: String,
    kind: ScriptKind,
    package: PackageSpec,
    pre_checks: bool,
    manager: PackageManager,
}

impl ScriptArtifact {
    /// Returns the script text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the script kind.
    #[must_use]
    pub const fn kind(&self) -> ScriptKind {
        self.kind
    }

    /// Returns the package the script targets.
    #[must_use]
    pub const fn package(&self) -> &PackageSpec {
        &self.package
    }

    /// Returns true when the root preflight block was requested.
    #[must_use]
    pub const fn pre_checks(&self) -> bool {
        self.pre_checks
    }

    /// Returns the manager the script was generated for.
    #[must_use]
    pub const fn manager(&self) -> PackageManager {
        self.manager
    }

    /// Consumes the artifact and returns the script text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Accumulates script lines.
#[derive(Default)]
struct ScriptWriter {
    lines: Vec<String>,
}

impl ScriptWriter {
    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn header(&mut self, manager: PackageManager, title: &str, pre_checks: bool) {
        self.line(SHEBANG);
        self.line(FAIL_FAST);
        self.blank();
        self.line(format!("# {title}"));
        self.line(format!("# Generated by patchgate for {}", manager.binary()));
        if pre_checks {
            self.blank();
            self.line(PREFLIGHT_ROOT_CHECK);
            let binary = manager.binary();
            self.line(format!(
                "if ! command -v {binary} >/dev/null 2>&1; then echo \"patchgate: {binary} is not available\" >&2; exit 1; fi"
            ));
        }
        self.blank();
        self.line("echo \"patchgate: refreshing package metadata\"");
        self.line(manager.refresh_command());
    }

    /// Records the currently installed version, or an empty line when the
    /// package is absent.
    fn backup(&mut self, manager: PackageManager, name: &str, suffix: &str) {
        self.blank();
        self.line(format!("BACKUP_DIR=\"{BACKUP_DIR}\""));
        self.line("mkdir -p \"${BACKUP_DIR}\"");
        self.line("PREVIOUS_VERSION=\"\"");
        self.line(format!(
            "if {}; then PREVIOUS_VERSION=\"$({})\"; fi",
            manager.presence_check_command(name),
            manager.version_check_command(name)
        ));
        self.line(format!(
            "printf '%s\\n' \"${{PREVIOUS_VERSION}}\" > \"${{BACKUP_DIR}}/{name}.{suffix}\""
        ));
        self.line(format!(
            "echo \"patchgate: recorded previous version of {name} in ${{BACKUP_DIR}}/{name}.{suffix}\""
        ));
    }

    /// Re-queries the installed version and asserts it against `expected`.
    fn verify(&mut self, manager: PackageManager, name: &str, expected: Option<&str>) {
        self.blank();
        self.line(format!(
            "INSTALLED_VERSION=\"$({})\"",
            manager.version_check_command(name)
        ));
        match expected {
            Some(version) => self.line(format!(
                "if ! printf '%s\\n' \"${{INSTALLED_VERSION}}\" | grep -qF -- \"{version}\"; then echo \"patchgate: {name} is not at version {version}\" >&2; exit 1; fi"
            )),
            None => self.line(format!(
                "if [ -z \"${{INSTALLED_VERSION}}\" ]; then echo \"patchgate: {name} is not installed\" >&2; exit 1; fi"
            )),
        }
        self.line(format!(
            "echo \"patchgate: {name} is at version ${{INSTALLED_VERSION}}\""
        ));
    }

    fn finish(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

impl PackageManager {
    /// Assembles a complete patch script.
    ///
    /// Without a version the package moves to whatever the configured
    /// repositories resolve to, and verification only checks presence.
    /// With `pre_checks` false the root preflight block is omitted entirely.
    #[must_use]
    pub fn build_patch_script(self, name: &str, version: Option<&str>, pre_checks: bool) -> String {
        self.patch_script_text(name, version, None, pre_checks)
    }

    /// Assembles a complete rollback script targeting `target_version`.
    #[must_use]
    pub fn build_rollback_script(self, name: &str, target_version: &str, pre_checks: bool) -> String {
        let mut writer = ScriptWriter::default();
        writer.header(
            self,
            &format!("Roll back {name} to {target_version}"),
            pre_checks,
        );
        writer.backup(self, name, "pre-rollback-version");
        writer.blank();
        writer.line(format!(
            "echo \"patchgate: rolling back {name} to {target_version}\""
        ));
        writer.line(self.rollback_command(name, target_version));
        writer.verify(self, name, Some(target_version));
        debug!(
            target: LOG_TARGET,
            manager = self.binary(),
            package = name,
            target_version,
            pre_checks,
            "built rollback script"
        );
        writer.finish()
    }

    /// Builds a patch artifact for a validated package description.
    ///
    /// The package's target version pins the install; its installed
    /// version, when known, is echoed as the expected rollback target.
    #[must_use]
    pub fn patch_artifact(self, package: &PackageSpec, pre_checks: bool) -> ScriptArtifact {
        let text = self.patch_script_text(
            package.name(),
            package.version(),
            package.installed_version(),
            pre_checks,
        );
        ScriptArtifact {
            text,
            kind: ScriptKind::Patch,
            package: package.clone(),
            pre_checks,
            manager: self,
        }
    }

    /// Builds a rollback artifact moving `package` to `target_version`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AdapterError::InvalidVersion`] when the target
    /// version contains characters unsafe for shell interpolation.
    pub fn rollback_artifact(
        self,
        package: &PackageSpec,
        target_version: &str,
        pre_checks: bool,
    ) -> Result<ScriptArtifact, crate::AdapterError> {
        let target = crate::package::checked_version(target_version.to_owned())?;
        let text = self.build_rollback_script(package.name(), &target, pre_checks);
        Ok(ScriptArtifact {
            text,
            kind: ScriptKind::Rollback,
            package: package.clone(),
            pre_checks,
            manager: self,
        })
    }

    fn patch_script_text(
        self,
        name: &str,
        version: Option<&str>,
        installed: Option<&str>,
        pre_checks: bool,
    ) -> String {
        let title = version.map_or_else(
            || format!("Patch {name} to the latest available version"),
            |target| format!("Patch {name} to {target}"),
        );
        let mut writer = ScriptWriter::default();
        writer.header(self, &title, pre_checks);
        writer.backup(self, name, "previous-version");
        if let Some(current) = installed {
            writer.line(format!(
                "echo \"patchgate: expected rollback target for {name} is {current}\""
            ));
        }
        writer.blank();
        writer.line(format!("echo \"patchgate: patching {name}\""));
        writer.line(format!("if {}; then", self.presence_check_command(name)));
        writer.line(format!("    {}", self.update_command(name, version)));
        writer.line("else");
        writer.line(format!("    {}", self.install_command(name, version)));
        writer.line("fi");
        writer.verify(self, name, version);
        debug!(
            target: LOG_TARGET,
            manager = self.binary(),
            package = name,
            version,
            pre_checks,
            "built patch script"
        );
        writer.finish()
    }
}
