//! Unlock/login command implementation
//!
//! Resolves configuration, wires the dialog, the `bw` runner and the system
//! keychain into the core flow, and turns the result into a report.

use bwauth_core::auth::flow::Authenticator;
use bwauth_core::auth::prompt::DialogPrompt;
use bwauth_core::auth::store::SystemKeyring;
use bwauth_core::bw::ProcessBitwardenCli;
use bwauth_core::config::{toml_config, WorkflowEnv};
use bwauth_core::error::BwAuthError;
use bwauth_core::types::{AuthOutcome, InvocationRequest, Mode};
use tracing::{error, info};

/// Raw positional arguments from the launcher
pub struct Invocation {
    pub mode: String,
    pub email: String,
    pub totp_mode: Option<String>,
    pub totp_hint: Option<String>,
}

/// Result of one run, ready to be printed
pub struct Report {
    pub mode: Mode,
    pub email: String,
    pub result: Result<AuthOutcome, BwAuthError>,
}

impl Report {
    /// Message shown to the user: the outcome, or the error text verbatim
    pub fn message(&self) -> String {
        match &self.result {
            Ok(outcome) => outcome.to_string(),
            Err(e) => e.to_string(),
        }
    }

    /// 0 whenever the flow produced a message; 2 for configuration problems
    pub fn exit_code(&self) -> i32 {
        match &self.result {
            Err(BwAuthError::Config(_) | BwAuthError::Toml(_) | BwAuthError::Io(_)) => 2,
            _ => 0,
        }
    }
}

/// Run the flow requested by the launcher
pub fn run_auth(invocation: &Invocation, env: &WorkflowEnv) -> Report {
    let request = InvocationRequest::from_args(
        &invocation.mode,
        &invocation.email,
        invocation.totp_mode.as_deref(),
        invocation.totp_hint.as_deref(),
    );

    let result = authenticate(&request, env);
    match &result {
        Ok(outcome) => info!("Flow finished: {}", outcome),
        Err(e) => error!("Flow failed: {}", e),
    }

    Report {
        mode: request.mode,
        email: request.email,
        result,
    }
}

fn authenticate(request: &InvocationRequest, env: &WorkflowEnv) -> Result<AuthOutcome, BwAuthError> {
    let config = toml_config::load_config(env)?;
    let bw_exec = config.resolve_bw_exec()?;

    let prompt = DialogPrompt::new(config.prompt_timeout());
    let cli = ProcessBitwardenCli::new(
        bw_exec,
        config.effective_search_path(),
        config.secret_channel,
        config.cli_timeout(),
    );
    let store = SystemKeyring;

    Authenticator::new(&prompt, &cli, &store, &config.keychain_service).run(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bwauth_core::error::{CliError, ConfigError};

    fn report(result: Result<AuthOutcome, BwAuthError>) -> Report {
        Report {
            mode: Mode::Login,
            email: "a@b.com".to_string(),
            result,
        }
    }

    #[test]
    fn test_success_message() {
        let report = report(Ok(AuthOutcome::LoggedIn));
        assert_eq!(report.message(), "Logged in.");
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_cli_failure_is_verbatim() {
        let report = report(Err(BwAuthError::Cli(CliError::CommandFailed {
            message: "Username or password is incorrect. Try again.".to_string(),
        })));
        assert_eq!(
            report.message(),
            "Username or password is incorrect. Try again."
        );
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_config_failure_exit_code() {
        let report = report(Err(BwAuthError::Config(ConfigError::BwNotFound {
            searched: "/usr/bin".to_string(),
        })));
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn test_unreadable_config_exit_code() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let report = report(Err(BwAuthError::Io(io_error)));
        assert_eq!(report.exit_code(), 2);
    }
}
