use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn lettersync_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lettersync"));
    cmd.current_dir(dir);
    cmd
}

#[test]
fn help_lists_the_command_surface() {
    let dir = TempDir::new().expect("tempdir");
    lettersync_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("pull"))
        .stdout(contains("defaults"))
        .stdout(contains("push"))
        .stdout(contains("test"));
}

#[test]
fn missing_config_is_a_fatal_startup_error() {
    let dir = TempDir::new().expect("tempdir");
    lettersync_cmd(dir.path())
        .arg("pull")
        .assert()
        .failure()
        .stderr(contains("lettersync.yaml"));
}

#[test]
fn unreachable_remote_fails_with_session_error() {
    let dir = TempDir::new().expect("tempdir");
    // Nothing listens on the discard port; connect() must fail fast.
    std::fs::write(
        dir.path().join("lettersync.yaml"),
        "remote:\n  base_url: http://127.0.0.1:9/api\n  timeout_secs: 1\n",
    )
    .expect("write config");

    lettersync_cmd(dir.path())
        .arg("pull")
        .assert()
        .failure()
        .stderr(contains("remote session"));
}
