//! Integration tests for the process-backed Bitwarden CLI runner
//!
//! A small shell script stands in for `bw`; it echoes what it received so
//! the tests can check arguments, environment and failure handling.

#![cfg(unix)]

use bwauth_core::bw::{BitwardenCli, BwCommand, ProcessBitwardenCli, PASSWORD_ENV_VAR};
use bwauth_core::config::SecretChannel;
use bwauth_core::error::CliError;
use bwauth_core::types::{MasterPassword, TwoFactorCode};
use std::ffi::OsString;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

const FAKE_BW: &str = r#"#!/bin/sh
case "$*" in
  *--method\ 1\ --passwordenv*|*--method\ 1\ --raw*)
    echo "? Two-step login code: [input is required]" >&2
    exit 1
    ;;
  *splitpw*)
    printf '? Two-step login code: '
    echo "Code is required." >&2
    exit 1
    ;;
  *wrongpw*)
    echo "Invalid master password." >&2
    exit 1
    ;;
  *--passwordenv*)
    printf 'env:%s' "$BWAUTH_MASTER_PASSWORD"
    ;;
  *slow*)
    sleep 5
    ;;
  *)
    printf 'args:%s|env:%s' "$*" "${BWAUTH_MASTER_PASSWORD:-unset}"
    ;;
esac
"#;

fn write_fake_bw(dir: &Path) -> PathBuf {
    let path = dir.join("bw");
    std::fs::write(&path, FAKE_BW).expect("Failed to write fake bw");
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn runner(dir: &TempDir, channel: SecretChannel, timeout: Duration) -> ProcessBitwardenCli {
    ProcessBitwardenCli::new(
        write_fake_bw(dir.path()),
        OsString::from("/usr/bin:/bin"),
        channel,
        timeout,
    )
}

#[test]
fn test_environment_channel_passes_password_to_child() {
    let dir = tempfile::tempdir().unwrap();
    let cli = runner(&dir, SecretChannel::Environment, Duration::from_secs(5));

    let token = cli
        .execute(&BwCommand::Unlock, &MasterPassword::new("secretpw".to_string()))
        .unwrap();

    assert_eq!(token.expose(), "env:secretpw");
    assert!(std::env::var(PASSWORD_ENV_VAR).is_err());
}

#[test]
fn test_argument_channel_passes_password_as_argument() {
    let dir = tempfile::tempdir().unwrap();
    let cli = runner(&dir, SecretChannel::Argument, Duration::from_secs(5));

    let command = BwCommand::login_with("a@b.com", Some("2"), Some(TwoFactorCode::new("000111")));
    let token = cli
        .execute(&command, &MasterPassword::new("pw1".to_string()))
        .unwrap();

    assert_eq!(
        token.expose(),
        "args:login a@b.com pw1 --method 2 --code 000111 --raw|env:unset"
    );
}

#[test]
fn test_failure_text_is_returned() {
    let dir = tempfile::tempdir().unwrap();
    let cli = runner(&dir, SecretChannel::Argument, Duration::from_secs(5));

    let error = cli
        .execute(&BwCommand::Unlock, &MasterPassword::new("wrongpw".to_string()))
        .unwrap_err();

    assert_eq!(
        error,
        CliError::CommandFailed {
            message: "Invalid master password.".to_string()
        }
    );
}

#[test]
fn test_two_step_challenge_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let cli = runner(&dir, SecretChannel::Environment, Duration::from_secs(5));

    let command = BwCommand::login_with("a@b.com", Some("1"), None);
    let error = cli
        .execute(&command, &MasterPassword::new("pw1".to_string()))
        .unwrap_err();

    assert!(matches!(error, CliError::TwoStepChallenge { .. }));
}

#[test]
fn test_two_step_prompt_on_stdout_keeps_stderr_message() {
    let dir = tempfile::tempdir().unwrap();
    let cli = runner(&dir, SecretChannel::Argument, Duration::from_secs(5));

    let error = cli
        .execute(&BwCommand::Unlock, &MasterPassword::new("splitpw".to_string()))
        .unwrap_err();

    assert_eq!(
        error,
        CliError::TwoStepChallenge {
            message: "Code is required.".to_string()
        }
    );
}

#[test]
fn test_slow_cli_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let cli = runner(&dir, SecretChannel::Argument, Duration::from_millis(300));

    let error = cli
        .execute(&BwCommand::Unlock, &MasterPassword::new("slow".to_string()))
        .unwrap_err();

    assert!(matches!(error, CliError::TimedOut { .. }));
}

#[test]
fn test_missing_executable() {
    let cli = ProcessBitwardenCli::new(
        PathBuf::from("/nonexistent/bw"),
        OsString::from("/usr/bin"),
        SecretChannel::Environment,
        Duration::from_secs(1),
    );

    let error = cli
        .execute(&BwCommand::Unlock, &MasterPassword::new("pw".to_string()))
        .unwrap_err();

    assert!(matches!(error, CliError::SpawnFailed { .. }));
}
