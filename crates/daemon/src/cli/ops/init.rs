use clap::Args;

use burnbox_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port the daemon listens on
    #[arg(long)]
    pub port: Option<u16>,

    /// Seconds an unopened secret is kept (0 keeps it until read)
    #[arg(long)]
    pub secret_ttl_secs: Option<u64>,

    /// Largest accepted ciphertext, in bytes
    #[arg(long)]
    pub max_secret_bytes: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            port: self.port.unwrap_or(defaults.port),
            secret_ttl_secs: self.secret_ttl_secs.unwrap_or(defaults.secret_ttl_secs),
            max_secret_bytes: self.max_secret_bytes.unwrap_or(defaults.max_secret_bytes),
            ..defaults
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        Ok(format!(
            "Initialized burnbox directory at {}\n  config: {}\n  port:   {}",
            state.burnbox_dir.display(),
            state.config_path.display(),
            state.config.port
        ))
    }
}
