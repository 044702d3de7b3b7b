use std::path::PathBuf;
use std::time::Duration;

use crate::state::AppConfig;

/// Fully resolved runtime configuration for the daemon
#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,
    /// Origins allowed by the CORS layer, `*` for any
    pub cors_origins: Vec<String>,
    /// Largest accepted ciphertext, in bytes
    pub max_secret_bytes: usize,

    // store configuration
    /// Cap on live secrets, unbounded if not set
    pub max_secrets: Option<usize>,
    /// How long an unopened secret survives.
    ///  if not set then secrets are kept until read
    pub secret_ttl: Option<Duration>,
    /// How often the expiry sweep runs
    pub sweep_interval: Duration,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl From<&AppConfig> for Config {
    fn from(app: &AppConfig) -> Self {
        Self {
            api_port: app.port,
            cors_origins: app.cors_origins.clone(),
            max_secret_bytes: app.max_secret_bytes,
            max_secrets: app.max_secrets,
            secret_ttl: (app.secret_ttl_secs > 0).then(|| Duration::from_secs(app.secret_ttl_secs)),
            sweep_interval: Duration::from_secs(app.sweep_interval_secs.max(1)),
            log_level: tracing::Level::INFO,
            log_dir: app.log_dir.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ttl_disables_expiry() {
        let app = AppConfig {
            secret_ttl_secs: 0,
            ..AppConfig::default()
        };
        assert!(Config::from(&app).secret_ttl.is_none());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_port, 5000);
        assert_eq!(
            config.secret_ttl,
            Some(Duration::from_secs(crate::state::DEFAULT_SECRET_TTL_SECS))
        );
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
    }
}
