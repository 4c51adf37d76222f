//! Package manager variants and their command fragments.
//!
//! Each variant knows how to spell the handful of operations a remediation
//! script needs: upgrade in place, fresh install, version query, downgrade,
//! and hold/unhold. Version pins use `name=version` for Apt and Zypper and
//! `name-version` for the Yum/Dnf family.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AdapterError;

/// The closed set of package manager families.
///
/// Variants carry no state beyond the binary choice for the Yum/Dnf family,
/// so values are `Copy` and may be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum PackageManager {
    /// `apt-get`/`dpkg` based distributions.
    Apt,
    /// `yum` or `dnf` based distributions.
    YumDnf {
        /// Selects `dnf` when true and `yum` otherwise.
        uses_dnf: bool,
    },
    /// `zypper` based distributions.
    Zypper,
}

impl PackageManager {
    /// Selects a manager from an explicit binary name.
    ///
    /// Accepts `apt`, `apt-get`, `yum`, `dnf`, and `zypper`,
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::UnsupportedManager`] for any other name.
    pub fn from_binary(name: &str) -> Result<Self, AdapterError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "apt" | "apt-get" => Ok(Self::Apt),
            "yum" => Ok(Self::YumDnf { uses_dnf: false }),
            "dnf" => Ok(Self::YumDnf { uses_dnf: true }),
            "zypper" => Ok(Self::Zypper),
            _ => Err(AdapterError::unsupported_manager(name.trim())),
        }
    }

    /// Returns the binary invoked for install and update operations.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::YumDnf { uses_dnf: true } => "dnf",
            Self::YumDnf { uses_dnf: false } => "yum",
            Self::Zypper => "zypper",
        }
    }

    /// Returns the family identifier used in reports.
    #[must_use]
    pub const fn family_name(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::YumDnf { .. } => "yum_dnf",
            Self::Zypper => "zypper",
        }
    }

    /// Upgrades an installed package in place, optionally pinned.
    #[must_use]
    pub fn update_command(self, name: &str, version: Option<&str>) -> String {
        let target = self.pinned(name, version);
        match self {
            Self::Apt => format!("apt-get install --only-upgrade -y {target}"),
            Self::YumDnf { .. } => format!("{} update -y {target}", self.binary()),
            Self::Zypper => format!("zypper update -y {target}"),
        }
    }

    /// Installs a package, optionally pinned.
    #[must_use]
    pub fn install_command(self, name: &str, version: Option<&str>) -> String {
        format!("{} install -y {}", self.binary(), self.pinned(name, version))
    }

    /// Prints the installed version of a package.
    ///
    /// The query exits non-zero when the package is absent, which a script
    /// running under `set -e` treats as a failed verification. Zypper hosts
    /// are rpm based and share the rpm query.
    #[must_use]
    pub fn version_check_command(self, name: &str) -> String {
        match self {
            Self::Apt => format!("dpkg-query -W -f='${{Version}}' {name}"),
            Self::YumDnf { .. } | Self::Zypper => {
                format!("rpm -q --queryformat '%{{VERSION}}-%{{RELEASE}}' {name}")
            }
        }
    }

    /// Tests whether a package is installed, answering through exit status.
    ///
    /// The version query prints even for absent packages, so scripts branch
    /// on this command rather than on captured output.
    #[must_use]
    pub fn presence_check_command(self, name: &str) -> String {
        match self {
            Self::Apt => format!(
                "[ \"$(dpkg-query -W -f='${{Status}}' {name} 2>/dev/null || true)\" = \"install ok installed\" ]"
            ),
            Self::YumDnf { .. } | Self::Zypper => format!("rpm -q {name} >/dev/null 2>&1"),
        }
    }

    /// Downgrades a package to an explicit earlier version.
    #[must_use]
    pub fn rollback_command(self, name: &str, target_version: &str) -> String {
        let target = self.pinned(name, Some(target_version));
        match self {
            Self::Apt => format!("apt-get install -y --allow-downgrades {target}"),
            Self::YumDnf { .. } => format!("{} downgrade -y {target}", self.binary()),
            Self::Zypper => format!("zypper install -y --oldpackage {target}"),
        }
    }

    /// Excludes a package from automatic updates.
    #[must_use]
    pub fn hold_command(self, name: &str) -> String {
        match self {
            Self::Apt => format!("apt-mark hold {name}"),
            Self::YumDnf { .. } => format!("{} versionlock add {name}", self.binary()),
            Self::Zypper => format!("zypper addlock {name}"),
        }
    }

    /// Returns a held package to automatic updates.
    #[must_use]
    pub fn unhold_command(self, name: &str) -> String {
        match self {
            Self::Apt => format!("apt-mark unhold {name}"),
            Self::YumDnf { .. } => format!("{} versionlock delete {name}", self.binary()),
            Self::Zypper => format!("zypper removelock {name}"),
        }
    }

    /// Refreshes repository metadata before packages are installed.
    #[must_use]
    pub fn refresh_command(self) -> String {
        match self {
            Self::Apt => String::from("apt-get update"),
            Self::YumDnf { .. } => format!("{} makecache", self.binary()),
            Self::Zypper => String::from("zypper --non-interactive refresh"),
        }
    }

    fn pinned(self, name: &str, version: Option<&str>) -> String {
        match (self, version) {
            (_, None) => name.to_owned(),
            (Self::YumDnf { .. }, Some(pin)) => format!("{name}-{pin}"),
            (Self::Apt | Self::Zypper, Some(pin)) => format!("{name}={pin}"),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

impl FromStr for PackageManager {
    type Err = AdapterError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::from_binary(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use rstest::rstest;

    const APT: PackageManager = PackageManager::Apt;
    const DNF: PackageManager = PackageManager::YumDnf { uses_dnf: true };
    const YUM: PackageManager = PackageManager::YumDnf { uses_dnf: false };
    const ZYPPER: PackageManager = PackageManager::Zypper;

    #[test]
    fn apt_update_uses_only_upgrade() {
        assert_snapshot!(
            APT.update_command("nginx", Some("1.18.0-0")),
            @"apt-get install --only-upgrade -y nginx=1.18.0-0"
        );
    }

    #[test]
    fn yum_update_uses_dash_pin() {
        assert_snapshot!(
            YUM.update_command("openssl", Some("1.0.2k")),
            @"yum update -y openssl-1.0.2k"
        );
    }

    #[test]
    fn zypper_rollback_uses_oldpackage() {
        assert_snapshot!(
            ZYPPER.rollback_command("curl", "7.66.0"),
            @"zypper install -y --oldpackage curl=7.66.0"
        );
    }

    #[rstest]
    #[case(APT, "nginx=1.2")]
    #[case(ZYPPER, "nginx=1.2")]
    #[case(DNF, "nginx-1.2")]
    #[case(YUM, "nginx-1.2")]
    fn install_pins_versions(#[case] manager: PackageManager, #[case] pin: &str) {
        let command = manager.install_command("nginx", Some("1.2"));
        assert!(command.ends_with(pin), "{command} should end with {pin}");
        assert!(!command.contains("--only-upgrade"));
    }

    #[rstest]
    #[case(APT)]
    #[case(DNF)]
    #[case(YUM)]
    #[case(ZYPPER)]
    fn unpinned_commands_name_only_the_package(#[case] manager: PackageManager) {
        assert!(manager.install_command("nginx", None).ends_with(" nginx"));
        assert!(manager.update_command("nginx", None).ends_with(" nginx"));
    }

    #[rstest]
    #[case(APT, "dpkg-query -W -f='${Version}' nginx")]
    #[case(DNF, "rpm -q --queryformat '%{VERSION}-%{RELEASE}' nginx")]
    #[case(ZYPPER, "rpm -q --queryformat '%{VERSION}-%{RELEASE}' nginx")]
    fn version_checks_use_native_queries(#[case] manager: PackageManager, #[case] expected: &str) {
        assert_eq!(manager.version_check_command("nginx"), expected);
    }

    #[rstest]
    #[case(
        APT,
        "[ \"$(dpkg-query -W -f='${Status}' nginx 2>/dev/null || true)\" = \"install ok installed\" ]"
    )]
    #[case(DNF, "rpm -q nginx >/dev/null 2>&1")]
    #[case(YUM, "rpm -q nginx >/dev/null 2>&1")]
    #[case(ZYPPER, "rpm -q nginx >/dev/null 2>&1")]
    fn presence_checks_answer_by_exit_status(
        #[case] manager: PackageManager,
        #[case] expected: &str,
    ) {
        let check = manager.presence_check_command("nginx");
        assert_eq!(check, expected);
        assert!(!check.contains('|'), "{check} must not pipe under pipefail");
    }

    #[rstest]
    #[case(APT, "apt-get install -y --allow-downgrades nginx=1.18.0-0")]
    #[case(DNF, "dnf downgrade -y nginx-1.18.0-0")]
    #[case(YUM, "yum downgrade -y nginx-1.18.0-0")]
    #[case(ZYPPER, "zypper install -y --oldpackage nginx=1.18.0-0")]
    fn rollback_commands_pin_the_target(#[case] manager: PackageManager, #[case] expected: &str) {
        assert_eq!(manager.rollback_command("nginx", "1.18.0-0"), expected);
    }

    #[rstest]
    #[case(APT, "apt-mark hold nginx", "apt-mark unhold nginx")]
    #[case(DNF, "dnf versionlock add nginx", "dnf versionlock delete nginx")]
    #[case(ZYPPER, "zypper addlock nginx", "zypper removelock nginx")]
    fn hold_and_unhold_are_symmetric(
        #[case] manager: PackageManager,
        #[case] hold: &str,
        #[case] unhold: &str,
    ) {
        assert_eq!(manager.hold_command("nginx"), hold);
        assert_eq!(manager.unhold_command("nginx"), unhold);
    }

    #[rstest]
    #[case("apt", APT)]
    #[case("APT-GET", APT)]
    #[case("yum", YUM)]
    #[case("dnf", DNF)]
    #[case(" zypper ", ZYPPER)]
    fn explicit_selection_accepts_known_binaries(
        #[case] input: &str,
        #[case] expected: PackageManager,
    ) {
        assert_eq!(input.parse::<PackageManager>(), Ok(expected));
    }

    #[rstest]
    #[case("pacman")]
    #[case("brew")]
    #[case("")]
    fn explicit_selection_rejects_unknown_binaries(#[case] input: &str) {
        assert_eq!(
            PackageManager::from_binary(input),
            Err(AdapterError::unsupported_manager(input))
        );
    }

    #[test]
    fn serialises_with_family_tag() {
        let json = serde_json::to_string(&DNF).expect("serialise manager");
        assert_eq!(json, r#"{"family":"yum_dnf","uses_dnf":true}"#);
    }
}
