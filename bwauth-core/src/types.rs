//! Type definitions and wrappers for secure data handling
//!
//! Secrets are wrapped with the secrecy crate so they are zeroized on drop
//! and never show up in logs or debug output.

use secrecy::{ExposeSecret, Secret};
use std::fmt;

/// Keychain service used when Alfred does not provide a bundle id
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "com.lisowski-development.alfred.bitwarden";

/// Keychain account under which the session token is stored
pub const TOKEN_ACCOUNT: &str = "token";

/// `totpMode` value selecting the emailed one-time code method
pub const EMAIL_METHOD: &str = "1";

/// Bitwarden master password entered by the user
///
/// Lives only for the duration of one flow and is handed to exactly one
/// child process per CLI call.
#[derive(Clone, Debug)]
pub struct MasterPassword(Secret<String>);

impl MasterPassword {
    pub fn new(password: String) -> Self {
        Self(Secret::new(password))
    }

    /// Expose the password value (use with caution!)
    ///
    /// Only the CLI runner should call this, when building the child command.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// True when nothing but whitespace was entered
    pub fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

/// Two-factor code typed by the user (authenticator app or email)
#[derive(Clone, Debug)]
pub struct TwoFactorCode(Secret<String>);

impl TwoFactorCode {
    /// Create a code, trimming surrounding whitespace
    pub fn new(code: &str) -> Self {
        Self(Secret::new(code.trim().to_string()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Bitwarden session token as printed by `bw ... --raw`
#[derive(Clone, Debug)]
pub struct SessionToken(Secret<String>);

impl SessionToken {
    pub fn new(token: String) -> Self {
        Self(Secret::new(token))
    }

    /// Expose the token value (use with caution!)
    ///
    /// Only needed when handing the token to the keychain.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// What the launcher asked us to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Unlock an already logged-in vault
    Unlock,
    /// Full login with email and password
    Login,
}

impl Mode {
    /// `"unlock"` selects [`Mode::Unlock`]; every other value means login.
    pub fn parse(value: &str) -> Self {
        if value == "unlock" {
            Mode::Unlock
        } else {
            Mode::Login
        }
    }
}

/// Second-factor requirement derived from the `totpMode`/`totpHint` arguments
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TwoFactor {
    /// No second factor configured
    None,
    /// Bitwarden emails a code after a first login attempt (method `1`)
    EmailCode,
    /// Code from an authenticator, asked for before calling the CLI
    Authenticator {
        /// Bitwarden two-step method id; `None` lets `bw` pick its default
        method: Option<String>,
        /// Display name of the provider shown in the dialog
        provider: String,
    },
}

impl TwoFactor {
    /// Build from the raw launcher arguments
    ///
    /// A blank hint disables the second factor regardless of the mode.
    pub fn from_args(totp_mode: Option<&str>, totp_hint: Option<&str>) -> Self {
        let hint = match totp_hint.map(str::trim) {
            Some(hint) if !hint.is_empty() => hint,
            _ => return TwoFactor::None,
        };

        match totp_mode.map(str::trim) {
            Some(EMAIL_METHOD) => TwoFactor::EmailCode,
            Some(method) if !method.is_empty() => TwoFactor::Authenticator {
                method: Some(method.to_string()),
                provider: hint.to_string(),
            },
            _ => TwoFactor::Authenticator {
                method: None,
                provider: hint.to_string(),
            },
        }
    }
}

/// One launcher invocation, immutable once built
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationRequest {
    pub mode: Mode,
    pub email: String,
    pub two_factor: TwoFactor,
}

impl InvocationRequest {
    /// Build from positional arguments `[mode, email, totpMode, totpHint]`
    pub fn from_args(
        mode: &str,
        email: &str,
        totp_mode: Option<&str>,
        totp_hint: Option<&str>,
    ) -> Self {
        Self {
            mode: Mode::parse(mode),
            email: email.to_string(),
            two_factor: TwoFactor::from_args(totp_mode, totp_hint),
        }
    }
}

/// Successful end of a flow
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Unlocked,
    LoggedIn,
}

impl fmt::Display for AuthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthOutcome::Unlocked => write!(f, "Unlocked"),
            AuthOutcome::LoggedIn => write!(f, "Logged in."),
        }
    }
}
