use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::ciphertext::Ciphertext;
use crate::secret_id::{SecretId, SecretIdError};

#[derive(Debug, thiserror::Error)]
pub enum SecretStoreError {
    /// No record under this id: never stored, already taken, or expired.
    ///  Callers must not be able to tell which.
    #[error("secret not found")]
    NotFound,
    /// The id generator could not draw entropy
    #[error("failed to allocate a secret id: {0}")]
    Exhausted(#[from] SecretIdError),
    /// Every freshly generated id was already taken
    #[error("no free secret id after {0} attempts")]
    CollisionLimit(usize),
    /// The store refuses new records until some are taken or swept
    #[error("secret store is full ({0} live secrets)")]
    Capacity(usize),
}

/// A stored ciphertext. Write-once: nothing about a record changes
///  between `put` and its removal.
#[derive(Debug, Clone)]
pub struct SecretRecord {
    pub id: SecretId,
    pub ciphertext: Ciphertext,
    /// Only consulted by the expiry sweep
    pub created_at: Instant,
}

impl SecretRecord {
    pub fn new(id: SecretId, ciphertext: Ciphertext) -> Self {
        Self {
            id,
            ciphertext,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= max_age
    }
}

#[async_trait]
pub trait SecretStore: Send + Sync + Debug + 'static {
    /// Store a ciphertext under a freshly allocated id
    ///
    /// # Returns
    /// * `Ok(SecretId)` - the id the record now lives under
    /// * `Err(SecretStoreError::Exhausted)` - the entropy source failed
    /// * `Err(SecretStoreError::CollisionLimit)` - no unused id could be found
    /// * `Err(SecretStoreError::Capacity)` - the store is full
    async fn put(&self, ciphertext: Ciphertext) -> Result<SecretId, SecretStoreError>;

    /// Remove and return the ciphertext stored under `id`
    ///
    /// Must be a single indivisible step: for any id, at most one call
    ///  ever returns `Ok`, no matter how many race for it. Every other
    ///  call gets `Err(SecretStoreError::NotFound)`.
    async fn take_once(&self, id: &SecretId) -> Result<Ciphertext, SecretStoreError>;

    /// Drop every record that has been stored for at least `max_age`
    ///  without being taken. Returns the ids removed.
    async fn sweep_expired(&self, max_age: Duration) -> Result<Vec<SecretId>, SecretStoreError>;

    /// Number of live records
    async fn count(&self) -> Result<usize, SecretStoreError>;
}

pub type DynSecretStore = Arc<dyn SecretStore>;
