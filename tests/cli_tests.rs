//! Integration tests for the bwauth binary
//!
//! These never reach the dialog: they exercise argument parsing and the
//! configuration checks that run before any prompt is shown.

use std::process::{Command, Output};

const BWAUTH_BINARY: &str = env!("CARGO_BIN_EXE_bwauth");

fn run_with_missing_bw(args: &[&str]) -> Output {
    let config_dir = tempfile::tempdir().expect("Failed to create temp dir");

    Command::new(BWAUTH_BINARY)
        .args(args)
        .env("BWAUTH_CONFIG_DIR", config_dir.path())
        .env("BW_EXEC", "/nonexistent/bwauth-test/bw")
        .env_remove("JOURNAL_STREAM")
        .output()
        .expect("Failed to run bwauth")
}

#[test]
fn test_help_lists_positional_arguments() {
    let output = Command::new(BWAUTH_BINARY)
        .arg("--help")
        .output()
        .expect("Failed to run bwauth --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<MODE>"));
    assert!(stdout.contains("<EMAIL>"));
    assert!(stdout.contains("[TOTP_MODE]"));
    assert!(stdout.contains("--json"));
}

#[test]
fn test_missing_email_is_rejected() {
    let output = Command::new(BWAUTH_BINARY)
        .arg("unlock")
        .output()
        .expect("Failed to run bwauth");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("<EMAIL>"));
}

#[test]
fn test_missing_bw_is_reported_before_prompting() {
    let output = run_with_missing_bw(&["unlock", "a@b.com"]);

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bitwarden CLI not found"));
    assert!(stdout.contains("/nonexistent/bwauth-test/bw"));
}

#[test]
fn test_json_output_for_failed_login() {
    let output = run_with_missing_bw(&["--json", "login", "a@b.com", "2", "Authy"]);

    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(
        value["alfredworkflow"]["variables"]["STATUS_MESSAGE"],
        "Login failed"
    );
    assert!(value["alfredworkflow"]["arg"]
        .as_str()
        .unwrap()
        .contains("Bitwarden CLI not found"));
}
