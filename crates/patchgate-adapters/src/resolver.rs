//! Maps operating system identities onto package managers.

use tracing::{debug, warn};

use crate::error::AdapterError;
use crate::manager::PackageManager;
use crate::os::{OsDescriptor, OsFamily, major_version};

const LOG_TARGET: &str = "patchgate::adapters::resolver";

/// Red Hat derivatives before this major release ship `yum` only.
const FIRST_DNF_RELEASE: u32 = 8;

/// Resolves the manager for an operating system family and version.
///
/// Family tokens are matched case-insensitively. Unrecognised families fall
/// back to [`PackageManager::Apt`]; use [`resolve_strict`] when that
/// fallback is unwanted.
#[must_use]
pub fn resolve(os_family: &str, os_version: Option<&str>) -> PackageManager {
    resolve_strict(os_family, os_version).unwrap_or_else(|error| {
        warn!(
            target: LOG_TARGET,
            family = os_family,
            %error,
            "falling back to apt"
        );
        PackageManager::Apt
    })
}

/// Resolves the manager for a family, failing on unrecognised input.
///
/// # Errors
///
/// Returns [`AdapterError::UnsupportedFamily`] when `os_family` is not one
/// of the known distribution families.
pub fn resolve_strict(
    os_family: &str,
    os_version: Option<&str>,
) -> Result<PackageManager, AdapterError> {
    let family: OsFamily = os_family
        .parse()
        .map_err(|_| AdapterError::unsupported_family(os_family.trim()))?;
    let manager = manager_for(family, os_version.and_then(major_version));
    debug!(
        target: LOG_TARGET,
        %family,
        version = os_version,
        manager = manager.binary(),
        "resolved package manager"
    );
    Ok(manager)
}

/// Resolves the manager for a descriptor using the fallback policy.
#[must_use]
pub fn resolve_descriptor(os: &OsDescriptor) -> PackageManager {
    resolve(os.family(), os.version())
}

/// Selects the manager for a known family.
///
/// A missing or unparseable version on a Red Hat derivative is treated as a
/// current release and selects `dnf`.
#[must_use]
pub const fn manager_for(family: OsFamily, major: Option<u32>) -> PackageManager {
    match family {
        OsFamily::Debian | OsFamily::Ubuntu => PackageManager::Apt,
        OsFamily::Rhel | OsFamily::CentOs => {
            let legacy = matches!(major, Some(release) if release < FIRST_DNF_RELEASE);
            PackageManager::YumDnf { uses_dnf: !legacy }
        }
        OsFamily::Fedora => PackageManager::YumDnf { uses_dnf: true },
        OsFamily::OpenSuse | OsFamily::Sles => PackageManager::Zypper,
    }
}
