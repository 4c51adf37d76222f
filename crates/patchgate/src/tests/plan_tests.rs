//! Generated plans must clear the gate they are screened by.

use rstest::{fixture, rstest};

use crate::{
    AdapterError, OsDescriptor, PackageManager, PackageSpec, RemediationError, RemediationRequest,
    Remediator, ScriptKind,
};

#[fixture]
fn remediator() -> Remediator {
    Remediator::new().expect("built-in rules compile")
}

fn request(family: &str, version: Option<&str>, package: PackageSpec) -> RemediationRequest {
    RemediationRequest::new(OsDescriptor::new(family, version.map(str::to_owned)), package)
}

fn nginx(version: Option<&str>) -> PackageSpec {
    let spec = PackageSpec::new("nginx").expect("valid name");
    match version {
        Some(target) => spec.with_version(target).expect("valid version"),
        None => spec,
    }
}

#[rstest]
#[case("ubuntu", Some("22.04"))]
#[case("debian", None)]
#[case("rhel", Some("7.9"))]
#[case("centos", Some("9"))]
#[case("fedora", Some("40"))]
#[case("opensuse", Some("15.5"))]
#[case("sles", None)]
fn generated_patch_scripts_pass_with_full_score(
    remediator: Remediator,
    #[case] family: &str,
    #[case] os_version: Option<&str>,
) {
    for pre_checks in [true, false] {
        for target in [None, Some("1.18.0-0ubuntu1")] {
            let plan = remediator
                .plan_patch(&request(family, os_version, nginx(target)).with_pre_checks(pre_checks))
                .expect("plan");
            assert!(plan.is_executable(), "{:?}", plan.validation.errors);
            assert!(plan.validation.warnings.is_empty(), "{:?}", plan.validation.warnings);
            assert_eq!(plan.validation.safety_score, 1.0);
        }
    }
}

#[rstest]
#[case("ubuntu", None)]
#[case("rhel", Some("7"))]
#[case("fedora", None)]
#[case("sles", Some("15"))]
fn generated_rollback_scripts_pass_with_full_score(
    remediator: Remediator,
    #[case] family: &str,
    #[case] os_version: Option<&str>,
) {
    let plan = remediator
        .plan_rollback(&request(family, os_version, nginx(None)), "1.18.0-0")
        .expect("plan");
    assert!(plan.is_executable(), "{:?}", plan.validation.errors);
    assert_eq!(plan.validation.safety_score, 1.0);
    assert_eq!(plan.artifact.kind(), ScriptKind::Rollback);
    assert!(plan.artifact.text().contains("nginx"));
    assert!(plan.artifact.text().contains("1.18.0-0"));
}

#[rstest]
fn strict_requests_reject_unknown_families(remediator: Remediator) {
    let strict = request("haiku", None, nginx(None)).with_strict_resolution(true);
    let error = remediator.plan_patch(&strict).expect_err("unknown family");
    assert!(matches!(
        error,
        RemediationError::Adapter(AdapterError::UnsupportedFamily { .. })
    ));

    let lenient = request("haiku", None, nginx(None));
    let plan = remediator.plan_patch(&lenient).expect("fallback plan");
    assert_eq!(plan.artifact.manager(), PackageManager::Apt);
}

#[rstest]
fn explicit_manager_overrides_resolution(remediator: Remediator) {
    let forced = request("ubuntu", None, nginx(Some("1.2")))
        .with_manager(Some(PackageManager::Zypper))
        .with_strict_resolution(true);
    let plan = remediator.plan_patch(&forced).expect("plan");
    assert_eq!(plan.artifact.manager(), PackageManager::Zypper);
    assert!(plan.artifact.text().contains("zypper update -y nginx=1.2"));
}

#[rstest]
fn unsafe_rollback_targets_are_rejected(remediator: Remediator) {
    let error = remediator
        .plan_rollback(&request("ubuntu", None, nginx(None)), "1.0 || rm -rf /")
        .expect_err("unsafe target");
    assert!(matches!(
        error,
        RemediationError::Adapter(AdapterError::InvalidVersion { .. })
    ));
}

#[rstest]
fn plans_serialise_for_audit(remediator: Remediator) {
    let plan = remediator
        .plan_patch(&request("rhel", Some("8"), nginx(Some("1.20.1"))))
        .expect("plan");
    let json = serde_json::to_value(&plan).expect("serialise plan");
    assert_eq!(json["artifact"]["kind"], "patch");
    assert_eq!(json["artifact"]["manager"]["family"], "yum_dnf");
    assert_eq!(json["validation"]["is_valid"], true);
}
