//! External command execution with a deadline
//!
//! Both the dialog and the Bitwarden CLI are separate programs. Each call
//! blocks the flow until the child exits or its deadline passes, in which
//! case the child is killed.

use crate::error::ProcessError;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Captured result of a finished child process
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Run `command` to completion, killing it once `timeout` elapses
///
/// Stdin is closed; stdout and stderr are captured and decoded lossily.
pub fn run_with_timeout(
    mut command: Command,
    timeout: Duration,
) -> Result<CommandOutput, ProcessError> {
    let program = command
        .as_std()
        .get_program()
        .to_string_lossy()
        .to_string();

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
        .map_err(|e| ProcessError::Runtime(e.to_string()))?;

    runtime.block_on(async move {
        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return Err(ProcessError::SpawnFailed {
                    program,
                    reason: e.to_string(),
                })
            }
        };

        tracing::debug!("Spawned {} with PID {:?}", program, child.id());

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(CommandOutput {
                status: output.status,
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }),
            Ok(Err(e)) => Err(ProcessError::Runtime(format!(
                "Failed to wait for {}: {}",
                program, e
            ))),
            Err(_) => {
                tracing::warn!("{} exceeded its {}s deadline", program, timeout.as_secs());
                Err(ProcessError::TimedOut {
                    program,
                    seconds: timeout.as_secs(),
                })
            }
        }
    })
}
