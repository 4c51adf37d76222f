//! Operating system identities and family detection.
//!
//! The family token comes from an inventory service and is matched
//! case-insensitively. The version string only matters for choosing between
//! `yum` and `dnf` on Red Hat derivatives.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Distribution families with a known package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    /// Debian GNU/Linux.
    Debian,
    /// Ubuntu.
    Ubuntu,
    /// Red Hat Enterprise Linux.
    Rhel,
    /// CentOS.
    CentOs,
    /// Fedora.
    Fedora,
    /// openSUSE.
    OpenSuse,
    /// SUSE Linux Enterprise Server.
    Sles,
}

impl OsFamily {
    /// Returns the lower-case token used to identify this family.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debian => "debian",
            Self::Ubuntu => "ubuntu",
            Self::Rhel => "rhel",
            Self::CentOs => "centos",
            Self::Fedora => "fedora",
            Self::OpenSuse => "opensuse",
            Self::Sles => "sles",
        }
    }

    /// Returns true for Red Hat derivatives whose older releases ship `yum`
    /// rather than `dnf`.
    #[must_use]
    pub const fn is_rhel_like(self) -> bool {
        matches!(self, Self::Rhel | Self::CentOs)
    }

    /// Returns all known families.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Debian,
            Self::Ubuntu,
            Self::Rhel,
            Self::CentOs,
            Self::Fedora,
            Self::OpenSuse,
            Self::Sles,
        ]
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a family token is not recognised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognised operating system family: '{0}'")]
pub struct FamilyParseError(String);

impl FamilyParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for OsFamily {
    type Err = FamilyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|family| family.as_str() == normalised)
            .ok_or_else(|| FamilyParseError(input.trim().to_owned()))
    }
}

/// The operating system identity of a remediation target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OsDescriptor {
    family: String,
    version: Option<String>,
}

impl OsDescriptor {
    /// Creates a descriptor from a family token and optional version string.
    #[must_use]
    pub fn new(family: impl Into<String>, version: Option<String>) -> Self {
        Self {
            family: family.into(),
            version,
        }
    }

    /// Returns the raw family token.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Returns the raw version string, if supplied.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the recognised family, or `None` for unknown tokens.
    #[must_use]
    pub fn known_family(&self) -> Option<OsFamily> {
        self.family.parse().ok()
    }

    /// Returns the leading integer of the version string.
    #[must_use]
    pub fn major_version(&self) -> Option<u32> {
        self.version.as_deref().and_then(major_version)
    }
}

/// Parses the leading decimal component of a version string.
///
/// `"7.9"` yields 7, `"8"` yields 8, and strings without a leading digit
/// yield `None`.
#[must_use]
pub fn major_version(version: &str) -> Option<u32> {
    let trimmed = version.trim();
    let end = trimmed
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed.get(..end).and_then(|digits| digits.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("debian", OsFamily::Debian)]
    #[case("Ubuntu", OsFamily::Ubuntu)]
    #[case("RHEL", OsFamily::Rhel)]
    #[case(" centos ", OsFamily::CentOs)]
    #[case("fedora", OsFamily::Fedora)]
    #[case("openSUSE", OsFamily::OpenSuse)]
    #[case("sles", OsFamily::Sles)]
    fn parses_family_tokens(#[case] input: &str, #[case] expected: OsFamily) {
        assert_eq!(input.parse::<OsFamily>(), Ok(expected));
    }

    #[rstest]
    #[case("arch")]
    #[case("windows")]
    #[case("")]
    fn rejects_unknown_families(#[case] input: &str) {
        let error = input.parse::<OsFamily>().expect_err("unknown family");
        assert_eq!(error.input(), input.trim());
    }

    #[rstest]
    #[case("7.9", Some(7))]
    #[case("8", Some(8))]
    #[case("22.04", Some(22))]
    #[case(" 9.2 ", Some(9))]
    #[case("stream", None)]
    #[case("", None)]
    fn extracts_major_versions(#[case] input: &str, #[case] expected: Option<u32>) {
        assert_eq!(major_version(input), expected);
    }

    #[test]
    fn descriptor_exposes_known_family() {
        let descriptor = OsDescriptor::new("CentOS", Some(String::from("7.9.2009")));
        assert_eq!(descriptor.known_family(), Some(OsFamily::CentOs));
        assert_eq!(descriptor.major_version(), Some(7));
    }

    #[test]
    fn family_display_matches_token() {
        for family in OsFamily::all() {
            assert_eq!(family.to_string(), family.as_str());
        }
    }
}
