//! Unlock and login flows
//!
//! [`Authenticator`] decides which dialogs to show, in what order, and how
//! to call `bw`. Each run is strictly sequential: dialog, CLI call(s), then
//! one keychain write. Nothing is retried; the only failure that is looked
//! at is the two-step challenge of the email-code login.

use crate::auth::prompt::SecretPrompt;
use crate::auth::store::{store_token, CredentialStore};
use crate::bw::{BitwardenCli, BwCommand};
use crate::error::{BwAuthError, CliError, PromptError};
use crate::types::{
    AuthOutcome, InvocationRequest, MasterPassword, Mode, SessionToken, TwoFactor,
    TwoFactorCode, EMAIL_METHOD,
};
use tracing::{debug, info};

/// Runs one unlock or login flow against injected collaborators
pub struct Authenticator<'a, P: ?Sized, C: ?Sized, S: ?Sized> {
    prompt: &'a P,
    cli: &'a C,
    store: &'a S,
    service: String,
}

impl<'a, P, C, S> Authenticator<'a, P, C, S>
where
    P: SecretPrompt + ?Sized,
    C: BitwardenCli + ?Sized,
    S: CredentialStore + ?Sized,
{
    /// `service` is the keychain service the token is written under
    pub fn new(prompt: &'a P, cli: &'a C, store: &'a S, service: &str) -> Self {
        Self {
            prompt,
            cli,
            store,
            service: service.to_string(),
        }
    }

    /// Run the flow selected by `request.mode`
    pub fn run(&self, request: &InvocationRequest) -> Result<AuthOutcome, BwAuthError> {
        match request.mode {
            Mode::Unlock => self.unlock(&request.email),
            Mode::Login => self.login(&request.email, &request.two_factor),
        }
    }

    fn unlock(&self, email: &str) -> Result<AuthOutcome, BwAuthError> {
        info!("Unlocking vault for {}", email);

        let password = self.ask_password(&format!(
            "Unlock Bitwarden for user {}.\nPlease enter your password:",
            email
        ))?;

        let token = self.cli.execute(&BwCommand::Unlock, &password)?;
        self.finish(&token, AuthOutcome::Unlocked)
    }

    fn login(&self, email: &str, two_factor: &TwoFactor) -> Result<AuthOutcome, BwAuthError> {
        info!("Logging in {}", email);

        let password = self.ask_password(&format!(
            "Login to Bitwarden for user {}.\nPlease enter your password:",
            email
        ))?;

        let token = match two_factor {
            TwoFactor::None => self.cli.execute(&BwCommand::login(email), &password)?,
            TwoFactor::Authenticator { method, provider } => {
                let code = self.ask_code(&format!(
                    "2FA authentication for Bitwarden user {}.\nPlease enter your 2FA code for {}:",
                    email, provider
                ))?;
                let command = BwCommand::login_with(email, method.as_deref(), Some(code));
                self.cli.execute(&command, &password)?
            }
            TwoFactor::EmailCode => self.email_code_login(email, &password)?,
        };

        self.finish(&token, AuthOutcome::LoggedIn)
    }

    /// First call triggers the email; the second one carries the code
    fn email_code_login(
        &self,
        email: &str,
        password: &MasterPassword,
    ) -> Result<SessionToken, BwAuthError> {
        let first = BwCommand::login_with(email, Some(EMAIL_METHOD), None);
        match self.cli.execute(&first, password) {
            Ok(token) => {
                debug!("Login succeeded without an email code");
                return Ok(token);
            }
            Err(CliError::TwoStepChallenge { .. }) => {
                debug!("Bitwarden sent a two-step code by email");
            }
            Err(e) => return Err(e.into()),
        }

        let code = self.ask_code(&format!(
            "Email authentication for Bitwarden user {}.\nPlease enter your 2FA code sent via email:",
            email
        ))?;

        let second = BwCommand::login_with(email, Some(EMAIL_METHOD), Some(code));
        Ok(self.cli.execute(&second, password)?)
    }

    fn ask_password(&self, message: &str) -> Result<MasterPassword, BwAuthError> {
        let password = MasterPassword::new(self.prompt.prompt(message, true)?);
        if password.is_blank() {
            return Err(PromptError::EmptyInput.into());
        }
        Ok(password)
    }

    fn ask_code(&self, message: &str) -> Result<TwoFactorCode, BwAuthError> {
        let code = TwoFactorCode::new(&self.prompt.prompt(message, false)?);
        if code.expose().is_empty() {
            return Err(PromptError::EmptyInput.into());
        }
        Ok(code)
    }

    fn finish(&self, token: &SessionToken, outcome: AuthOutcome) -> Result<AuthOutcome, BwAuthError> {
        store_token(self.store, &self.service, token)?;
        info!("{}", outcome);
        Ok(outcome)
    }
}
