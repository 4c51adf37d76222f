//! Patchgate: synthesised package remediation scripts behind a safety gate.
//!
//! This facade crate re-exports the stable types from
//! [`patchgate_adapters`] and [`patchgate_validator`] and provides the
//! [`Remediator`] entrypoint, which resolves a package manager, generates a
//! patch or rollback script, and validates it in one step.
//!
//! # Core types
//!
//! - [`RemediationRequest`]: operating system, package, and policy flags
//! - [`Remediator`]: resolution, generation, and validation
//! - [`RemediationPlan`]: the generated [`ScriptArtifact`] and its
//!   [`ValidationResult`]
//!
//! Callers must not execute a plan unless [`RemediationPlan::is_executable`]
//! returns true.

mod remediation;

pub use patchgate_adapters::{
    AdapterError, OsDescriptor, OsFamily, PackageManager, PackageSpec, ScriptArtifact, ScriptKind,
    resolve, resolve_strict,
};
pub use patchgate_validator::{
    Category, Issue, PatchValidator, RuleError, SafetyRule, Severity, ValidationResult, validate,
};

pub use remediation::{RemediationError, RemediationPlan, RemediationRequest, Remediator};

#[cfg(test)]
mod tests;
