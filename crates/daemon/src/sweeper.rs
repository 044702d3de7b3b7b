use std::time::Duration;

use tokio::sync::watch;
use tokio::time::interval;

use common::secret_store::DynSecretStore;

/// Periodically drop secrets that have gone unread for `ttl`.
/// Runs until `shutdown_rx` fires.
pub async fn run(
    store: DynSecretStore,
    ttl: Duration,
    every: Duration,
    mut shutdown_rx: watch::Receiver<()>,
) {
    let mut interval_timer = interval(every);
    interval_timer.tick().await; // Skip first immediate tick

    tracing::info!(
        ttl_secs = ttl.as_secs(),
        every_secs = every.as_secs(),
        "expiry sweeper started"
    );

    loop {
        tokio::select! {
            _ = interval_timer.tick() => {
                match store.sweep_expired(ttl).await {
                    Ok(removed) if removed.is_empty() => {
                        tracing::trace!("expiry sweep: nothing to remove");
                    }
                    Ok(removed) => {
                        tracing::info!(removed = removed.len(), "expiry sweep dropped unread secrets");
                    }
                    Err(e) => {
                        tracing::warn!("expiry sweep failed: {}", e);
                    }
                }
            }
            _ = shutdown_rx.changed() => {
                tracing::info!("expiry sweeper shutting down");
                break;
            }
        }
    }
}
