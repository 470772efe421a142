//! Process-backed Bitwarden CLI runner

use crate::bw::{is_two_step_challenge, BitwardenCli, BwCommand, PASSWORD_ENV_VAR};
use crate::config::SecretChannel;
use crate::error::{CliError, ProcessError};
use crate::process::{run_with_timeout, CommandOutput};
use crate::types::{MasterPassword, SessionToken};
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs the `bw` executable as a child process
#[derive(Debug, Clone)]
pub struct ProcessBitwardenCli {
    bw_exec: PathBuf,
    search_path: OsString,
    channel: SecretChannel,
    timeout: Duration,
}

impl ProcessBitwardenCli {
    pub fn new(
        bw_exec: PathBuf,
        search_path: OsString,
        channel: SecretChannel,
        timeout: Duration,
    ) -> Self {
        Self {
            bw_exec,
            search_path,
            channel,
            timeout,
        }
    }

    fn command(&self, command: &BwCommand, password: &MasterPassword) -> Command {
        let mut cmd = Command::new(&self.bw_exec);
        cmd.args(command.args(self.channel, password))
            .env("PATH", &self.search_path);

        // The variable only ever exists in this child's environment
        match self.channel {
            SecretChannel::Environment => {
                cmd.env(PASSWORD_ENV_VAR, password.expose());
            }
            SecretChannel::Argument => {
                cmd.env_remove(PASSWORD_ENV_VAR);
            }
        }

        cmd
    }
}

impl BitwardenCli for ProcessBitwardenCli {
    fn execute(
        &self,
        command: &BwCommand,
        password: &MasterPassword,
    ) -> Result<SessionToken, CliError> {
        debug!("Running bw {} ({:?} channel)", command.name(), self.channel);

        let output = run_with_timeout(self.command(command, password), self.timeout).map_err(
            |e| match e {
                ProcessError::TimedOut { seconds, .. } => CliError::TimedOut { seconds },
                other => CliError::SpawnFailed {
                    reason: other.to_string(),
                },
            },
        )?;

        interpret_output(&output)
    }
}

/// Turn a finished `bw` process into a token or a classified failure
fn interpret_output(output: &CommandOutput) -> Result<SessionToken, CliError> {
    if output.success() {
        let token = output.stdout.trim();
        if token.is_empty() {
            warn!("bw succeeded but printed no session token");
            return Err(CliError::EmptyToken);
        }
        return Ok(SessionToken::new(token.to_string()));
    }

    // bw prints the code prompt on stdout and the reason on stderr
    let message = failure_text(output);
    if is_two_step_challenge(&output.stderr) || is_two_step_challenge(&output.stdout) {
        debug!("bw requested a two-step login code");
        Err(CliError::TwoStepChallenge { message })
    } else {
        warn!("bw failed: {}", message);
        Err(CliError::CommandFailed { message })
    }
}

fn failure_text(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }

    let stdout = output.stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }

    format!("bw exited with {}", output.status)
}
