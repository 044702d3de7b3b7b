use clap::Args;

use burnbox_daemon::http_server::STATUS_PREFIX;
use burnbox_daemon::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Health check failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = HealthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = Vec::new();

        // 1. Check config directory
        lines.push("Config:".to_string());
        match AppState::load(ctx.config_path.clone()) {
            Ok(state) => {
                lines.push(format!("  directory:    {}", state.burnbox_dir.display()));
                lines.push("  config.toml:  OK".to_string());
                lines.push(format!("  port:         {}", state.config.port));
                lines.push(format!("  secret ttl:   {}s", state.config.secret_ttl_secs));
            }
            Err(e) => {
                lines.push(format!("  error: {}", e));
            }
        }

        // 2. Check daemon liveness and readiness
        let base = ctx.client.base_url();
        let client = ctx.client.http_client();

        lines.push(String::new());
        lines.push(format!("Daemon ({}):", base));

        for probe in ["livez", "readyz"] {
            let url = format!(
                "{}{}/{}",
                base.as_str().trim_end_matches('/'),
                STATUS_PREFIX,
                probe
            );
            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    lines.push(format!("  {:<7} OK", format!("{}:", probe)));
                }
                Ok(resp) => {
                    lines.push(format!(
                        "  {:<7} UNHEALTHY ({})",
                        format!("{}:", probe),
                        resp.status()
                    ));
                }
                Err(_) => {
                    lines.push(format!("  {:<7} NOT REACHABLE", format!("{}:", probe)));
                }
            }
        }

        Ok(lines.join("\n"))
    }
}
