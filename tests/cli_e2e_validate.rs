//! End-to-end tests for the `validate` command.
//!
//! `validate` never fetches the base, so the profiles here point at files
//! that do not exist.

#[allow(dead_code)]
mod common;
use common::prelude::*;

#[test]
fn test_validate_valid_profile() {
    let fixture = TestFixture::new().with_profile(profiles::FULL);

    fixture
        .command()
        .args(["validate", "-c", "config.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Profile is valid"))
        .stdout(predicate::str::contains("Base: base.conf"))
        .stdout(predicate::str::contains("Local rules: 1 top, 1 bottom"))
        .stdout(predicate::str::contains("Remote rules: 1"));
}

#[test]
fn test_validate_invalid_yaml() {
    let fixture = TestFixture::new().with_profile(profiles::INVALID_YAML);

    fixture
        .command()
        .args(["validate", "-c", "config.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load profile"));
}

#[test]
fn test_validate_empty_base_url() {
    let fixture = TestFixture::new().with_profile(profiles::NO_BASE_URL);

    fixture
        .command()
        .args(["validate", "-c", "config.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid profile"))
        .stderr(predicate::str::contains("Base url is empty"));
}

#[test]
fn test_validate_invalid_regex_pattern() {
    let fixture = TestFixture::new().with_profile(
        r#"
base:
  url: base.conf
replacements:
  - pattern: "[invalid(regex"
    with: "valid"
"#,
    );

    fixture
        .command()
        .args(["validate", "-c", "config.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid profile"));
}

#[test]
fn test_validate_remote_filter_without_source() {
    let fixture = TestFixture::new().with_profile(
        r#"
base:
  url: base.conf
remote_filters:
  - tag: Orphan
    policy: direct
"#,
    );

    fixture
        .command()
        .args(["validate", "-c", "config.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("neither source nor url"));
}

#[test]
fn test_validate_missing_profile() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["validate", "-c", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile not found: nope.yaml"));
}

#[test]
fn test_validate_help() {
    let mut cmd = cargo_bin_cmd!("qx-builder");
    cmd.arg("validate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Check a profile for errors"))
        .stdout(predicate::str::contains("--config"));
}
