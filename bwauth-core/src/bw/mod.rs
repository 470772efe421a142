//! Bitwarden CLI collaborator
//!
//! Describes the `bw unlock` / `bw login` calls the flow needs and how the
//! master password reaches them. The process-backed implementation lives in
//! [`runner`].

use crate::config::SecretChannel;
use crate::error::CliError;
use crate::types::{MasterPassword, SessionToken, TwoFactorCode};
use std::ffi::OsString;

pub mod runner;

pub use runner::ProcessBitwardenCli;

/// Text `bw login` prints when it wants a two-step code
pub const TWO_STEP_MARKER: &str = "Two-step login code";

/// Environment variable name used with `--passwordenv`
pub const PASSWORD_ENV_VAR: &str = "BWAUTH_MASTER_PASSWORD";

/// True when a `bw login` failure asks for a two-step login code
///
/// `bw` has no dedicated exit code for this, so the diagnostic text is the
/// only signal. Keep every such check behind this function.
pub fn is_two_step_challenge(message: &str) -> bool {
    message.contains(TWO_STEP_MARKER)
}

/// One `bw` call; `--raw` is always requested so stdout is the token
#[derive(Debug, Clone)]
pub enum BwCommand {
    Unlock,
    Login {
        email: String,
        method: Option<String>,
        code: Option<TwoFactorCode>,
    },
}

impl BwCommand {
    /// Plain login without a second factor
    pub fn login(email: &str) -> Self {
        BwCommand::Login {
            email: email.to_string(),
            method: None,
            code: None,
        }
    }

    /// Login with a two-step method and, optionally, its code
    pub fn login_with(email: &str, method: Option<&str>, code: Option<TwoFactorCode>) -> Self {
        BwCommand::Login {
            email: email.to_string(),
            method: method.map(str::to_string),
            code,
        }
    }

    /// Subcommand name, for logging
    pub fn name(&self) -> &'static str {
        match self {
            BwCommand::Unlock => "unlock",
            BwCommand::Login { .. } => "login",
        }
    }

    /// Build the argument list for `channel`
    ///
    /// With [`SecretChannel::Argument`] the returned list contains the
    /// password; with [`SecretChannel::Environment`] it only names
    /// [`PASSWORD_ENV_VAR`].
    pub fn args(&self, channel: SecretChannel, password: &MasterPassword) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();

        match self {
            BwCommand::Unlock => {
                args.push("unlock".into());
                if channel == SecretChannel::Argument {
                    args.push(password.expose().into());
                }
            }
            BwCommand::Login {
                email,
                method,
                code,
            } => {
                args.push("login".into());
                args.push(email.into());
                if channel == SecretChannel::Argument {
                    args.push(password.expose().into());
                }
                if let Some(method) = method {
                    args.push("--method".into());
                    args.push(method.into());
                }
                if let Some(code) = code {
                    args.push("--code".into());
                    args.push(code.expose().into());
                }
            }
        }

        if channel == SecretChannel::Environment {
            args.push("--passwordenv".into());
            args.push(PASSWORD_ENV_VAR.into());
        }
        args.push("--raw".into());

        args
    }
}

/// Runs Bitwarden CLI commands
pub trait BitwardenCli {
    /// Execute `command` authenticated with `password`, returning the session token
    fn execute(
        &self,
        command: &BwCommand,
        password: &MasterPassword,
    ) -> Result<SessionToken, CliError>;
}
