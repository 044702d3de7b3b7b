use std::path::PathBuf;

use clap::Args;

use burnbox_daemon::state::{AppState, StateError};
use burnbox_daemon::{spawn_service, ProcessError, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Origins allowed by CORS, comma separated (`*` for any)
    #[arg(long, env = "CORS_ORIGIN", value_delimiter = ',')]
    pub cors_origin: Option<Vec<String>>,

    /// Seconds an unopened secret is kept (0 keeps it until read)
    #[arg(long)]
    pub secret_ttl_secs: Option<u64>,

    /// Largest accepted ciphertext, in bytes
    #[arg(long)]
    pub max_secret_bytes: Option<usize>,

    /// Refuse new secrets once this many are waiting to be read
    #[arg(long)]
    pub max_secrets: Option<usize>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),

    #[error("daemon failed: {0}")]
    Failed(#[from] ProcessError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // Config file is optional for the daemon, defaults apply without one
        let mut app = AppState::load_or_default(ctx.config_path.clone())?.config;

        if let Some(port) = self.port {
            app.port = port;
        }
        if let Some(origins) = self.cors_origins() {
            app.cors_origins = origins;
        }
        if let Some(ttl) = self.secret_ttl_secs {
            app.secret_ttl_secs = ttl;
        }
        if let Some(max) = self.max_secret_bytes {
            app.max_secret_bytes = max;
        }
        if self.max_secrets.is_some() {
            app.max_secrets = self.max_secrets;
        }
        if self.log_dir.is_some() {
            app.log_dir = self.log_dir.clone();
        }

        let config = ServiceConfig {
            log_level: self.log_level,
            ..ServiceConfig::from(&app)
        };

        spawn_service(&config).await?;
        Ok("daemon ended".to_string())
    }
}

impl Daemon {
    fn cors_origins(&self) -> Option<Vec<String>> {
        self.cors_origin
            .as_ref()
            .map(|origins| {
                origins
                    .iter()
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
    }
}
