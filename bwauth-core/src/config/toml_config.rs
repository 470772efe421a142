//! TOML configuration file I/O
//!
//! The config file is optional; when it is missing the defaults are used.
//! Environment values captured in [`WorkflowEnv`] always win over the file.

use crate::config::{WorkflowConfig, WorkflowEnv};
use crate::error::{BwAuthError, ConfigError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the configuration directory
///
/// Returns `BWAUTH_CONFIG_DIR` if set, otherwise ~/.config/bwauth
pub fn get_config_dir(env: &WorkflowEnv) -> Result<PathBuf, BwAuthError> {
    if let Some(config_dir) = env.config_dir.as_deref().filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(config_dir));
    }

    let home = env
        .home
        .as_deref()
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| {
            BwAuthError::Config(ConfigError::IoError {
                message: "HOME environment variable not set".to_string(),
            })
        })?;

    Ok(PathBuf::from(home).join(".config").join("bwauth"))
}

/// Get the configuration file path
pub fn get_config_path(env: &WorkflowEnv) -> Result<PathBuf, BwAuthError> {
    Ok(get_config_dir(env)?.join(CONFIG_FILE_NAME))
}

/// Resolve the full configuration: defaults, then the file, then the environment
pub fn load_config(env: &WorkflowEnv) -> Result<WorkflowConfig, BwAuthError> {
    let config_path = get_config_path(env)?;

    let mut config = if config_path.exists() {
        load_config_from_path(&config_path)?
    } else {
        debug!("No config file at {:?}, using defaults", config_path);
        WorkflowConfig::default()
    };

    config.apply_env(env)?;
    config
        .validate()
        .map_err(|e| BwAuthError::Config(ConfigError::ValidationError { message: e }))?;

    Ok(config)
}

/// Load configuration from a specific TOML file
pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> Result<WorkflowConfig, BwAuthError> {
    let contents = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BwAuthError::Config(ConfigError::LoadFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        }),
        _ => BwAuthError::Io(e),
    })?;

    let config: WorkflowConfig = toml::from_str(&contents)?;

    config
        .validate()
        .map_err(|e| BwAuthError::Config(ConfigError::ValidationError { message: e }))?;

    info!("Loaded configuration from {:?}", path.as_ref());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretChannel;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "cli_timeout_secs = 15\n").unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.cli_timeout_secs, 15);
        assert_eq!(config.prompt_timeout_secs, 120);
        assert_eq!(config.secret_channel, SecretChannel::Environment);
    }

    #[test]
    fn test_missing_file_is_load_failed() {
        let temp_dir = tempdir().unwrap();
        let result = load_config_from_path(temp_dir.path().join("absent.toml"));
        assert!(matches!(
            result,
            Err(BwAuthError::Config(ConfigError::LoadFailed { .. }))
        ));
    }

    #[test]
    fn test_search_path_is_not_read_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "search_path = \"/x\"\ncli_timeout_secs = 15\n").unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.search_path, None);
        assert_eq!(config.cli_timeout_secs, 15);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_io_error() {
        let temp_dir = tempdir().unwrap();
        let result = load_config_from_path(temp_dir.path());
        assert!(matches!(result, Err(BwAuthError::Io(_))));
    }

    #[test]
    fn test_config_dir_defaults_under_captured_home() {
        let env = WorkflowEnv {
            home: Some("/Users/alice".to_string()),
            ..WorkflowEnv::default()
        };
        assert_eq!(
            get_config_dir(&env).unwrap(),
            PathBuf::from("/Users/alice/.config/bwauth")
        );
    }

    #[test]
    fn test_config_dir_override_beats_home() {
        let env = WorkflowEnv {
            home: Some("/Users/alice".to_string()),
            config_dir: Some("/tmp/bwauth-conf".to_string()),
            ..WorkflowEnv::default()
        };
        assert_eq!(get_config_dir(&env).unwrap(), PathBuf::from("/tmp/bwauth-conf"));
    }

    #[test]
    fn test_missing_home_is_config_error() {
        let result = get_config_dir(&WorkflowEnv::default());
        assert!(matches!(
            result,
            Err(BwAuthError::Config(ConfigError::IoError { .. }))
        ));
    }

    #[test]
    fn test_env_wins_over_file() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join("config.toml"),
            "keychain_service = \"from.file\"\nsecret_channel = \"argument\"\n",
        )
        .unwrap();

        let env = WorkflowEnv {
            config_dir: Some(temp_dir.path().to_string_lossy().to_string()),
            bundle_id: Some("from.env".to_string()),
            ..WorkflowEnv::default()
        };

        let config = load_config(&env).unwrap();
        assert_eq!(config.keychain_service, "from.env");
        assert_eq!(config.secret_channel, SecretChannel::Argument);
    }
}
