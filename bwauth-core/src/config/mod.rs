//! Configuration module
//!
//! Settings come from three layers: built-in defaults, an optional TOML file
//! and the environment Alfred passes to the script (workflow variables).

use crate::error::ConfigError;
use crate::types::DEFAULT_KEYCHAIN_SERVICE;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub mod toml_config;

/// Directories where the Bitwarden CLI is commonly installed on macOS
pub const WELL_KNOWN_BIN_DIRS: &[&str] = &[
    "/opt/homebrew/bin",
    "/usr/local/bin",
    "/opt/local/bin",
    "/usr/bin",
];

/// How the master password reaches the `bw` child process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretChannel {
    /// Variable set on the child command only, read by `--passwordenv`
    #[default]
    Environment,
    /// Positional command-line argument
    Argument,
}

impl SecretChannel {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "environment" | "env" => Ok(SecretChannel::Environment),
            "argument" | "arg" => Ok(SecretChannel::Argument),
            _ => Err(ConfigError::InvalidValue {
                name: "secret_channel".to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// Workflow configuration
///
/// Contains only non-sensitive settings; the session token lives in the keychain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Explicit path to the `bw` executable
    pub bw_exec: Option<PathBuf>,

    /// Search path handed to `bw` (it needs `node` on PATH); only set from `PATH`
    #[serde(skip)]
    pub search_path: Option<String>,

    /// Keychain service the token is stored under
    pub keychain_service: String,

    /// How long a dialog stays open before giving up
    pub prompt_timeout_secs: u64,

    /// Deadline for a single `bw` invocation
    pub cli_timeout_secs: u64,

    /// How the master password is passed to `bw`
    pub secret_channel: SecretChannel,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            bw_exec: None,
            search_path: None,
            keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
            prompt_timeout_secs: 120,
            cli_timeout_secs: 60,
            secret_channel: SecretChannel::default(),
        }
    }
}

impl WorkflowConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.keychain_service.trim().is_empty() {
            return Err("Keychain service cannot be empty".to_string());
        }

        if self.prompt_timeout_secs == 0 {
            return Err("Prompt timeout cannot be zero".to_string());
        }

        if self.cli_timeout_secs == 0 {
            return Err("CLI timeout cannot be zero".to_string());
        }

        Ok(())
    }

    /// Overlay values captured from the environment
    pub fn apply_env(&mut self, env: &WorkflowEnv) -> Result<(), ConfigError> {
        if let Some(bw_exec) = non_blank(&env.bw_exec) {
            self.bw_exec = Some(PathBuf::from(bw_exec));
        }

        if let Some(path) = non_blank(&env.path) {
            self.search_path = Some(path.to_string());
        }

        if let Some(bundle_id) = non_blank(&env.bundle_id) {
            self.keychain_service = bundle_id.to_string();
        }

        if let Some(channel) = non_blank(&env.secret_channel) {
            self.secret_channel = SecretChannel::parse(channel)?;
        }

        if let Some(value) = non_blank(&env.prompt_timeout) {
            self.prompt_timeout_secs = parse_secs("prompt_timeout_secs", value)?;
        }

        if let Some(value) = non_blank(&env.cli_timeout) {
            self.cli_timeout_secs = parse_secs("cli_timeout_secs", value)?;
        }

        Ok(())
    }

    pub fn prompt_timeout(&self) -> Duration {
        Duration::from_secs(self.prompt_timeout_secs)
    }

    pub fn cli_timeout(&self) -> Duration {
        Duration::from_secs(self.cli_timeout_secs)
    }

    /// Search path passed to `bw`, with the well-known install dirs appended
    pub fn effective_search_path(&self) -> OsString {
        let mut dirs: Vec<PathBuf> = self
            .search_path
            .as_deref()
            .map(|path| std::env::split_paths(path).collect())
            .unwrap_or_default();

        for dir in WELL_KNOWN_BIN_DIRS {
            let dir = PathBuf::from(dir);
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }

        // Only fails on entries containing the separator, which split_paths never yields
        std::env::join_paths(&dirs).unwrap_or_default()
    }

    /// Locate the `bw` executable
    ///
    /// An explicit `bw_exec` must exist (bare names are looked up on the
    /// search path); otherwise `bw` is searched on the effective search path.
    pub fn resolve_bw_exec(&self) -> Result<PathBuf, ConfigError> {
        let search_path = self.effective_search_path();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));

        let candidate = match &self.bw_exec {
            Some(path) if path.components().count() > 1 => {
                if is_executable_file(path) {
                    Some(path.clone())
                } else {
                    None
                }
            }
            Some(name) => which::which_in(name, Some(&search_path), &cwd).ok(),
            None => which::which_in("bw", Some(&search_path), &cwd).ok(),
        };

        match candidate {
            Some(path) => {
                debug!("Using Bitwarden CLI at {}", path.display());
                Ok(path)
            }
            None => Err(ConfigError::BwNotFound {
                searched: match &self.bw_exec {
                    Some(path) => path.display().to_string(),
                    None => search_path.to_string_lossy().to_string(),
                },
            }),
        }
    }
}

/// Snapshot of the environment variables bwauth reads, taken once at start
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowEnv {
    pub bw_exec: Option<String>,
    pub path: Option<String>,
    pub bundle_id: Option<String>,
    pub debug: bool,
    pub secret_channel: Option<String>,
    pub prompt_timeout: Option<String>,
    pub cli_timeout: Option<String>,
    pub config_dir: Option<String>,
    pub home: Option<String>,
}

impl WorkflowEnv {
    /// Read the process environment
    pub fn capture() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            bw_exec: lookup("BW_EXEC"),
            path: lookup("PATH"),
            bundle_id: lookup("alfred_workflow_bundleid"),
            debug: lookup("alfred_debug").is_some_and(|v| v.trim() == "1"),
            secret_channel: lookup("BWAUTH_SECRET_CHANNEL"),
            prompt_timeout: lookup("BWAUTH_PROMPT_TIMEOUT"),
            cli_timeout: lookup("BWAUTH_CLI_TIMEOUT"),
            config_dir: lookup("BWAUTH_CONFIG_DIR"),
            home: lookup("HOME"),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_secs(name: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
