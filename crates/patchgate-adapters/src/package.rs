//! Package descriptions supplied by remediation callers.

use serde::Serialize;

use crate::error::AdapterError;

/// A package targeted by a patch or rollback.
///
/// Names and versions are restricted to the characters package managers
/// actually use, so they can be interpolated into shell text without quoting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PackageSpec {
    name: String,
    version: Option<String>,
    installed_version: Option<String>,
}

impl PackageSpec {
    /// Creates a package description without version information.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::EmptyPackageName`] for empty names and
    /// [`AdapterError::InvalidPackageName`] when the name contains
    /// characters outside `[A-Za-z0-9._+:-]` or does not start with a letter
    /// or digit.
    pub fn new(name: impl Into<String>) -> Result<Self, AdapterError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AdapterError::EmptyPackageName);
        }
        if !is_valid_name(trimmed) {
            return Err(AdapterError::invalid_package_name(trimmed));
        }
        Ok(Self {
            name: trimmed.to_owned(),
            version: None,
            installed_version: None,
        })
    }

    /// Sets the version the package should be moved to.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidVersion`] for empty versions or
    /// versions containing characters outside `[A-Za-z0-9._+:~-]`.
    pub fn with_version(mut self, version: impl Into<String>) -> Result<Self, AdapterError> {
        self.version = Some(checked_version(version.into())?);
        Ok(self)
    }

    /// Records the version currently installed on the host.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidVersion`] under the same rules as
    /// [`PackageSpec::with_version`].
    pub fn with_installed_version(
        mut self,
        version: impl Into<String>,
    ) -> Result<Self, AdapterError> {
        self.installed_version = Some(checked_version(version.into())?);
        Ok(self)
    }

    /// Returns the package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the requested target version, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the version reported as installed, if known.
    #[must_use]
    pub fn installed_version(&self) -> Option<&str> {
        self.installed_version.as_deref()
    }
}

/// Validates a version string for interpolation into generated scripts.
///
/// # Errors
///
/// Returns [`AdapterError::InvalidVersion`] when the version is empty or
/// contains characters outside `[A-Za-z0-9._+:~-]`.
pub(crate) fn checked_version(version: String) -> Result<String, AdapterError> {
    let trimmed = version.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '+' | ':' | '~' | '-'));
    if valid {
        Ok(trimmed.to_owned())
    } else {
        Err(AdapterError::invalid_version(version))
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphanumeric())
        && chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '+' | ':' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("nginx")]
    #[case("libc6:amd64")]
    #[case("python3.11")]
    #[case("g++")]
    fn accepts_package_manager_names(#[case] name: &str) {
        let spec = PackageSpec::new(name).expect("valid name");
        assert_eq!(spec.name(), name);
        assert!(spec.version().is_none());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let spec = PackageSpec::new("  openssl ").expect("valid name");
        assert_eq!(spec.name(), "openssl");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_empty_names(#[case] name: &str) {
        assert_eq!(PackageSpec::new(name), Err(AdapterError::EmptyPackageName));
    }

    #[rstest]
    #[case("nginx; rm -rf /")]
    #[case("$(reboot)")]
    #[case("-y")]
    #[case("pkg'name")]
    fn rejects_names_with_shell_metacharacters(#[case] name: &str) {
        assert!(matches!(
            PackageSpec::new(name),
            Err(AdapterError::InvalidPackageName { .. })
        ));
    }

    #[rstest]
    #[case("1.18.0-0ubuntu1")]
    #[case("1:2.3.4~rc1")]
    #[case("3.0.2-0.el8_6")]
    fn accepts_distribution_versions(#[case] version: &str) {
        let spec = PackageSpec::new("nginx")
            .and_then(|spec| spec.with_version(version))
            .expect("valid version");
        assert_eq!(spec.version(), Some(version));
    }

    #[rstest]
    #[case("")]
    #[case("1.0 && reboot")]
    #[case("`id`")]
    fn rejects_unsafe_versions(#[case] version: &str) {
        let result = PackageSpec::new("nginx").and_then(|spec| spec.with_version(version));
        assert!(matches!(result, Err(AdapterError::InvalidVersion { .. })));
    }

    #[test]
    fn records_installed_version() {
        let spec = PackageSpec::new("nginx")
            .and_then(|spec| spec.with_installed_version("1.17.0"))
            .expect("valid spec");
        assert_eq!(spec.installed_version(), Some("1.17.0"));
    }
}
