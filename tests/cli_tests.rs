//! End-to-end CLI tests. These run the real binary but keep every package
//! format disabled, so no Docker daemon, network or CI environment is
//! needed.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

/// With every format disabled the harness runs zero cases, reports an
/// overall success, and still publishes a report.
#[test]
fn disabled_formats_pass_without_docker() {
    let temp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("install-check").unwrap();
    cmd.arg("Install packages (release)")
        .args(["--no-download", "--no-deb", "--no-rpm", "--no-tgz"])
        .env("TEMP_PATH", temp.path())
        .env_remove("CI");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Packages installed successfully"))
        .stdout(predicate::str::contains("::notice ::Report url: file://"));
}

/// The positive form wins when it comes last, re-enabling a disabled stage
/// would need Docker, so check the reverse: the negative form wins when last.
#[test]
fn last_toggle_on_the_command_line_wins() {
    let temp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("install-check").unwrap();
    cmd.arg("Install packages (release)")
        .args(["--no-download", "--deb", "--no-deb", "--no-rpm", "--no-tgz"])
        .env("TEMP_PATH", temp.path())
        .env_remove("CI");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Packages installed successfully"));
}

#[test]
fn check_name_is_required() {
    let mut cmd = Command::cargo_bin("install-check").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("CHECK_NAME"));
}

#[test]
fn help_lists_the_stage_toggles() {
    let mut cmd = Command::cargo_bin("install-check").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--no-download"))
        .stdout(predicate::str::contains("--no-deb"))
        .stdout(predicate::str::contains("--no-rpm"))
        .stdout(predicate::str::contains("--no-tgz"));
}
