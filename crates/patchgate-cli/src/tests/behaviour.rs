//! Behaviour-driven development (BDD) step definitions for CLI scenarios.

use std::cell::RefCell;
use std::process::ExitCode;

use patchgate_config::Config;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::support::{Invocation, invoke};

#[derive(Default)]
struct TestWorld {
    config: Config,
    stdin: String,
    invocation: Option<Invocation>,
}

impl TestWorld {
    fn invocation(&self) -> &Invocation {
        self.invocation.as_ref().expect("command should have run")
    }
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

/// Strips surrounding double quotes from a string if present.
fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

#[given("the default configuration")]
fn given_default_configuration(world: &RefCell<TestWorld>) {
    world.borrow_mut().config = Config::default();
}

#[given("strict operating system resolution")]
fn given_strict_resolution(world: &RefCell<TestWorld>) {
    world.borrow_mut().config.strict_os_resolution = true;
}

#[given("stdin holds a script that formats a disk")]
fn given_destructive_stdin(world: &RefCell<TestWorld>) {
    world.borrow_mut().stdin =
        String::from("#!/bin/bash\nset -euo pipefail\necho wiping\nmkfs.ext4 /dev/sdb1\n");
}

#[when("the operator runs {command}")]
fn when_operator_runs(world: &RefCell<TestWorld>, command: String) {
    let args: Vec<&str> = strip_quotes(&command).split_whitespace().collect();
    let invocation = {
        let w = world.borrow();
        invoke(&args, w.config.clone(), &w.stdin)
    };
    world.borrow_mut().invocation = Some(invocation);
}

#[then("the command succeeds")]
fn then_succeeds(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert_eq!(w.invocation().exit_code, ExitCode::SUCCESS, "{}", w.invocation().stderr);
}

#[then("the command fails")]
fn then_fails(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().invocation().exit_code, ExitCode::FAILURE);
}

#[then("stdout contains {fragment}")]
fn then_stdout_contains(world: &RefCell<TestWorld>, fragment: String) {
    let w = world.borrow();
    assert!(
        w.invocation().stdout.contains(strip_quotes(&fragment)),
        "stdout was: {}",
        w.invocation().stdout
    );
}

#[then("stderr contains {fragment}")]
fn then_stderr_contains(world: &RefCell<TestWorld>, fragment: String) {
    let w = world.borrow();
    assert!(
        w.invocation().stderr.contains(strip_quotes(&fragment)),
        "stderr was: {}",
        w.invocation().stderr
    );
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Generating a patch for a modern Red Hat host"
)]
fn modern_rhel_patch(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Rejecting a destructive script from stdin"
)]
fn destructive_stdin_rejected(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Strict configuration refuses unknown hosts"
)]
fn strict_configuration_refuses_unknown_hosts(world: RefCell<TestWorld>) {
    let _ = world;
}
