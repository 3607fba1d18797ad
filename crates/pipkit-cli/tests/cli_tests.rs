//! Binary-level tests for the `pipkit` command against a scripted pip.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

const FAKE_PIP: &str = r#"#!/bin/sh
case "$1" in
  --version)
    echo "pip 24.0 from /opt/site-packages/pip (python 3.12)"
    ;;
  list)
    echo '[{"name": "requests", "version": "2.31.0"}]'
    ;;
  freeze)
    echo "requests==2.31.0"
    ;;
  check)
    echo "No broken requirements found."
    ;;
  uninstall)
    echo "ERROR: Could not install packages due to an OSError: [Errno 13] Permission denied: '/usr/lib'" >&2
    exit 1
    ;;
esac
"#;

struct TestContext {
    temp_dir: TempDir,
    pip: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let pip = temp_dir.path().join("pip");
        std::fs::write(&pip, FAKE_PIP).expect("failed to write fake pip");
        let mut perms = std::fs::metadata(&pip).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&pip, perms).unwrap();
        Self { temp_dir, pip }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_pipkit"))
            .current_dir(self.temp_dir.path())
            .env_remove("RUST_LOG")
            .env_remove("PIPKIT_CONFIG")
            .arg("--pip")
            .arg(&self.pip)
            .args(args)
            .output()
            .expect("failed to run pipkit")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage:"));
}

#[test]
fn test_version_command() {
    let ctx = TestContext::new();
    let output = ctx.run(&["version"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("pip 24.0 (python 3.12)"));
}

#[test]
fn test_list_json() {
    let ctx = TestContext::new();
    let output = ctx.run(&["list", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let records: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(records[0]["name"], "requests");
    assert_eq!(records[0]["version"], "2.31.0");
}

#[test]
fn test_freeze_and_check() {
    let ctx = TestContext::new();
    let output = ctx.run(&["freeze"]);
    assert_eq!(stdout(&output).trim(), "requests==2.31.0");

    let output = ctx.run(&["check"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No broken requirements found."));
}

#[test]
fn test_failure_prints_hints_and_exit_code() {
    let ctx = TestContext::new();
    let output = ctx.run(&["uninstall", "requests"]);

    assert_eq!(output.status.code(), Some(77));
    let err = stderr(&output);
    assert!(err.starts_with("error: "));
    assert!(err.contains("hint: "));
}

#[test]
fn test_install_without_arguments_is_a_usage_error() {
    let ctx = TestContext::new();
    let output = ctx.run(&["install"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("nothing to install"));
}

#[test]
fn test_missing_venv() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--venv", "missing-env", "list"]);
    assert_eq!(output.status.code(), Some(66));
    assert!(stderr(&output).contains("No virtual environment found"));
}
