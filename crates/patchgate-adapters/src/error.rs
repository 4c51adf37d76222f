//! Error types for adapter construction and script generation.
//!
//! Resolution of an unrecognised operating system family is deliberately not
//! an error for [`crate::resolve`]; only strict resolution and explicit
//! manager selection surface failures through [`AdapterError`].

use thiserror::Error;

/// Errors raised while describing packages or selecting a package manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AdapterError {
    /// The package name was empty or whitespace.
    #[error("package name must not be empty")]
    EmptyPackageName,

    /// The package name contained characters that are unsafe in shell text.
    #[error("invalid package name '{name}': expected letters, digits, or one of . _ + : -")]
    InvalidPackageName {
        /// The rejected name.
        name: String,
    },

    /// The package version contained characters that are unsafe in shell text.
    #[error("invalid package version '{version}': expected letters, digits, or one of . _ + : ~ -")]
    InvalidVersion {
        /// The rejected version string.
        version: String,
    },

    /// The caller forced a package manager binary that no adapter implements.
    #[error("unsupported package manager '{name}': expected one of apt, apt-get, yum, dnf, zypper")]
    UnsupportedManager {
        /// The requested binary or manager name.
        name: String,
    },

    /// Strict resolution was asked for an operating system family it does
    /// not recognise.
    #[error("unsupported operating system family '{family}'")]
    UnsupportedFamily {
        /// The family identifier as supplied by the caller.
        family: String,
    },
}

impl AdapterError {
    /// Creates an invalid package name error.
    #[must_use]
    pub fn invalid_package_name(name: impl Into<String>) -> Self {
        Self::InvalidPackageName { name: name.into() }
    }

    /// Creates an invalid version error.
    #[must_use]
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    /// Creates an unsupported manager error.
    #[must_use]
    pub fn unsupported_manager(name: impl Into<String>) -> Self {
        Self::UnsupportedManager { name: name.into() }
    }

    /// Creates an unsupported family error.
    #[must_use]
    pub fn unsupported_family(family: impl Into<String>) -> Self {
        Self::UnsupportedFamily {
            family: family.into(),
        }
    }
}
