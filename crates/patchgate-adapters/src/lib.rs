//! Package manager adapters for generated remediation scripts.
//!
//! This crate turns an operating system identity and a package description
//! into shell text:
//!
//! - **Resolution** via [`resolve`] maps a distribution family and version
//!   onto a [`PackageManager`] variant, falling back to Apt for unknown
//!   families. [`resolve_strict`] reports those as errors instead.
//! - **Command fragments** such as [`PackageManager::update_command`] and
//!   [`PackageManager::rollback_command`] spell each operation in the
//!   manager's own syntax.
//! - **Script assembly** via [`PackageManager::build_patch_script`] and
//!   [`PackageManager::build_rollback_script`] wraps those fragments in a
//!   fail-fast skeleton with an optional root preflight block.
//!
//! Everything here is pure and synchronous. Scripts are never executed.
//!
//! # Example
//!
//! ```ignore
//! use patchgate_adapters::{PackageSpec, resolve};
//!
//! let manager = resolve("rhel", Some("7.9"));
//! let package = PackageSpec::new("openssl")?.with_version("1.0.2k")?;
//! let artifact = manager.patch_artifact(&package, true);
//! assert!(artifact.text().contains("yum update -y openssl-1.0.2k"));
//! ```

mod error;
mod manager;
mod os;
mod package;
mod resolver;
mod script;

pub use error::AdapterError;
pub use manager::PackageManager;
pub use os::{FamilyParseError, OsDescriptor, OsFamily, major_version};
pub use package::PackageSpec;
pub use resolver::{manager_for, resolve, resolve_descriptor, resolve_strict};
pub use script::{
    BACKUP_DIR, FAIL_FAST, PREFLIGHT_ROOT_CHECK, SHEBANG, ScriptArtifact, ScriptKind,
};

#[cfg(test)]
mod tests;
