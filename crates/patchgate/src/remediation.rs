//! The resolve, generate, and validate pipeline.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use patchgate_adapters::{
    AdapterError, OsDescriptor, PackageManager, PackageSpec, ScriptArtifact, resolve_descriptor,
    resolve_strict,
};
use patchgate_validator::{PatchValidator, RuleError, ValidationResult};

const LOG_TARGET: &str = "patchgate::remediation";

/// Errors raised while planning a remediation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemediationError {
    /// Manager resolution or script generation failed.
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    /// The validator rule tables could not be compiled.
    #[error("failed to compile validator rules: {0}")]
    Rules(#[from] RuleError),
}

/// What to remediate and under which policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationRequest {
    /// Operating system of the target host.
    pub os: OsDescriptor,
    /// Package to patch or roll back.
    pub package: PackageSpec,
    /// Whether the script includes the root preflight block.
    pub pre_checks: bool,
    /// Whether unknown operating system families are rejected.
    pub strict: bool,
    /// Explicit manager choice, bypassing resolution.
    pub manager: Option<PackageManager>,
}

impl RemediationRequest {
    /// Creates a request with pre-checks on, fallback resolution, and no
    /// explicit manager.
    #[must_use]
    pub const fn new(os: OsDescriptor, package: PackageSpec) -> Self {
        Self {
            os,
            package,
            pre_checks: true,
            strict: false,
            manager: None,
        }
    }

    /// Sets whether the root preflight block is emitted.
    #[must_use]
    pub const fn with_pre_checks(mut self, pre_checks: bool) -> Self {
        self.pre_checks = pre_checks;
        self
    }

    /// Sets whether unknown families are rejected.
    #[must_use]
    pub const fn with_strict_resolution(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Forces a specific manager.
    #[must_use]
    pub const fn with_manager(mut self, manager: Option<PackageManager>) -> Self {
        self.manager = manager;
        self
    }
}

/// A generated script and its verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemediationPlan {
    /// The generated script.
    pub artifact: ScriptArtifact,
    /// The validator's verdict on the script text.
    pub validation: ValidationResult,
}

impl RemediationPlan {
    /// Returns true when the script may be handed to an executor.
    #[must_use]
    pub const fn is_executable(&self) -> bool {
        self.validation.is_valid
    }
}

/// Resolves managers, generates scripts, and validates them.
#[derive(Debug, Clone)]
pub struct Remediator {
    validator: PatchValidator,
}

impl Remediator {
    /// Creates a remediator with the built-in rule tables.
    ///
    /// # Errors
    ///
    /// Returns [`RemediationError::Rules`] if the built-in tables fail to
    /// compile.
    pub fn new() -> Result<Self, RemediationError> {
        Ok(Self::with_validator(PatchValidator::shared()?.clone()))
    }

    /// Creates a remediator with a custom validator.
    #[must_use]
    pub const fn with_validator(validator: PatchValidator) -> Self {
        Self { validator }
    }

    /// Selects the manager for `request`.
    ///
    /// An explicit manager wins. Otherwise strict requests fail on unknown
    /// families and other requests fall back to apt.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::UnsupportedFamily`] for strict requests naming
    /// an unknown family.
    pub fn select_manager(request: &RemediationRequest) -> Result<PackageManager, AdapterError> {
        match request.manager {
            Some(manager) => Ok(manager),
            None if request.strict => resolve_strict(request.os.family(), request.os.version()),
            None => Ok(resolve_descriptor(&request.os)),
        }
    }

    /// Generates and validates a patch script.
    ///
    /// # Errors
    ///
    /// Returns [`RemediationError::Adapter`] when the manager cannot be
    /// resolved.
    pub fn plan_patch(
        &self,
        request: &RemediationRequest,
    ) -> Result<RemediationPlan, RemediationError> {
        let manager = Self::select_manager(request)?;
        let artifact = manager.patch_artifact(&request.package, request.pre_checks);
        Ok(self.finish(artifact))
    }

    /// Generates and validates a rollback script to `target_version`.
    ///
    /// # Errors
    ///
    /// Returns [`RemediationError::Adapter`] when the manager cannot be
    /// resolved or the target version is unsafe for shell text.
    pub fn plan_rollback(
        &self,
        request: &RemediationRequest,
        target_version: &str,
    ) -> Result<RemediationPlan, RemediationError> {
        let manager = Self::select_manager(request)?;
        let artifact =
            manager.rollback_artifact(&request.package, target_version, request.pre_checks)?;
        Ok(self.finish(artifact))
    }

    fn finish(&self, artifact: ScriptArtifact) -> RemediationPlan {
        let validation = self.validator.validate(artifact.text());
        if validation.is_valid {
            info!(
                target: LOG_TARGET,
                kind = %artifact.kind(),
                manager = %artifact.manager(),
                package = artifact.package().name(),
                safety_score = validation.safety_score,
                warnings = validation.warnings.len(),
                "remediation plan ready"
            );
        } else {
            warn!(
                target: LOG_TARGET,
                kind = %artifact.kind(),
                manager = %artifact.manager(),
                package = artifact.package().name(),
                errors = ?validation.errors,
                "remediation plan rejected by validator"
            );
        }
        RemediationPlan {
            artifact,
            validation,
        }
    }
}
