use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "burnbox";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Retention window for secrets that are never opened (7 days)
pub const DEFAULT_SECRET_TTL_SECS: u64 = 7 * 24 * 60 * 60;
/// 1 MiB of ciphertext is far more than any password or token needs
pub const DEFAULT_MAX_SECRET_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed to call the API from a browser. `*` allows any.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Seconds an unopened secret is kept before the sweeper drops it.
    ///  0 disables expiry.
    #[serde(default = "default_secret_ttl_secs")]
    pub secret_ttl_secs: u64,
    /// Seconds between expiry sweeps
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Largest accepted ciphertext, in bytes
    #[serde(default = "default_max_secret_bytes")]
    pub max_secret_bytes: usize,
    /// Cap on live secrets held in memory (unbounded if not set)
    #[serde(default)]
    pub max_secrets: Option<usize>,
    /// Directory for log files (stdout only if not set)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_secret_ttl_secs() -> u64 {
    DEFAULT_SECRET_TTL_SECS
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_max_secret_bytes() -> usize {
    DEFAULT_MAX_SECRET_BYTES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            cors_origins: default_cors_origins(),
            secret_ttl_secs: default_secret_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            max_secret_bytes: default_max_secret_bytes(),
            max_secrets: None,
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the burnbox directory (~/.burnbox)
    pub burnbox_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the burnbox directory path (custom or default ~/.burnbox)
    pub fn burnbox_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new burnbox directory with a config file
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let burnbox_dir = Self::burnbox_dir(custom_path)?;
        let config_path = burnbox_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&burnbox_dir)?;

        let config = config.unwrap_or_default();
        fs::write(&config_path, toml::to_string_pretty(&config)?)?;

        Ok(Self {
            burnbox_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the burnbox directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let burnbox_dir = Self::burnbox_dir(custom_path)?;
        let config_path = burnbox_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config: AppConfig = toml::from_str(&fs::read_to_string(&config_path)?)?;

        Ok(Self {
            burnbox_dir,
            config_path,
            config,
        })
    }

    /// Like [`AppState::load`], but an uninitialized directory yields the defaults
    pub fn load_or_default(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        match Self::load(custom_path.clone()) {
            Err(StateError::NotInitialized) => {
                let burnbox_dir = Self::burnbox_dir(custom_path)?;
                Ok(Self {
                    config_path: burnbox_dir.join(CONFIG_FILE_NAME),
                    burnbox_dir,
                    config: AppConfig::default(),
                })
            }
            other => other,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("burnbox directory not initialized. Run 'burnbox init' first")]
    NotInitialized,

    #[error("burnbox directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("burnbox");

        let config = AppConfig {
            port: 7000,
            max_secrets: Some(10),
            ..AppConfig::default()
        };
        let state = AppState::init(Some(path.clone()), Some(config.clone())).unwrap();
        assert!(state.config_path.exists());

        let loaded = AppState::load(Some(path)).unwrap();
        assert_eq!(loaded.config, config);
    }

    #[test]
    fn test_init_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();

        AppState::init(Some(path.clone()), None).unwrap();
        let result = AppState::init(Some(path), None);
        assert!(matches!(result, Err(StateError::AlreadyInitialized)));
    }

    #[test]
    fn test_load_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");

        assert!(matches!(
            AppState::load(Some(path.clone())),
            Err(StateError::NotInitialized)
        ));

        let state = AppState::load_or_default(Some(path)).unwrap();
        assert_eq!(state.config, AppConfig::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "port = 8123\n").unwrap();

        let state = AppState::load(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(state.config.port, 8123);
        assert_eq!(state.config.secret_ttl_secs, DEFAULT_SECRET_TTL_SECS);
        assert_eq!(state.config.cors_origins, vec!["*".to_string()]);
    }
}
