//! Error types for the bwauth workflow step
//!
//! This module defines all error types used throughout the application.
//! Messages coming from the Bitwarden CLI are carried verbatim so the
//! launcher can show the user exactly what `bw` reported.

use thiserror::Error;

/// Main error type for bwauth
#[derive(Error, Debug)]
pub enum BwAuthError {
    /// Errors related to configuration loading/resolution
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The password/code dialog did not produce an answer
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// The Bitwarden CLI failed; displays the CLI text as-is
    #[error(transparent)]
    Cli(#[from] CliError),

    /// Errors related to keychain operations
    #[error("Keychain error: {0}")]
    Keyring(#[from] KeyringError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Bitwarden CLI not found. Please install the Bitwarden CLI first ({searched})")]
    BwNotFound { searched: String },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Failed to load configuration file: {path}")]
    LoadFailed { path: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// Dialog errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("User cancelled the dialog")]
    Cancelled,

    #[error("Dialog timed out after {seconds} seconds")]
    TimedOut { seconds: u64 },

    #[error("No value was entered")]
    EmptyInput,

    #[error("Failed to show dialog: {reason}")]
    DialogFailed { reason: String },
}

impl PromptError {
    /// True when the user dismissed the dialog or let it time out
    pub fn is_cancellation(&self) -> bool {
        matches!(self, PromptError::Cancelled | PromptError::TimedOut { .. })
    }
}

/// Bitwarden CLI invocation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// `bw` exited unsuccessfully; `message` is its diagnostic text
    #[error("{message}")]
    CommandFailed { message: String },

    /// `bw` refused the login because a two-step code is required
    #[error("{message}")]
    TwoStepChallenge { message: String },

    #[error("Bitwarden CLI returned an empty session token")]
    EmptyToken,

    #[error("Failed to run Bitwarden CLI: {reason}")]
    SpawnFailed { reason: String },

    #[error("Bitwarden CLI did not finish within {seconds} seconds")]
    TimedOut { seconds: u64 },
}

/// Keychain operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyringError {
    #[error("Keychain service unavailable")]
    ServiceUnavailable,

    #[error("Failed to store credential in keychain: {reason}")]
    StoreFailed { reason: String },

    #[error("Failed to retrieve credential from keychain")]
    RetrieveFailed,

    #[error("Credential not found in keychain")]
    NotFound,
}

/// Errors from running an external command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Failed to spawn {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("{program} did not finish within {seconds} seconds")]
    TimedOut { program: String, seconds: u64 },

    #[error("Process runtime error: {0}")]
    Runtime(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BwAuthError>;
