use std::sync::Arc;

use axum::extract::FromRef;

use common::secret_store::{DynSecretStore, MemorySecretStore};

use crate::ServiceConfig;

/// Main service state, shared by every request handler and background task.
///
/// Owns the process-wide secret store. It is created once at startup and dropped
/// at shutdown, taking every unread secret with it.
#[derive(Clone, Debug)]
pub struct State {
    store: DynSecretStore,
}

impl State {
    pub fn from_config(config: &ServiceConfig) -> Self {
        let store = match config.max_secrets {
            Some(limit) => {
                tracing::info!(limit, "secret store capped");
                MemorySecretStore::with_capacity_limit(limit)
            }
            None => MemorySecretStore::new(),
        };
        Self::new(Arc::new(store))
    }

    /// Build state around an existing store (a test double, or another backend)
    pub fn new(store: DynSecretStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DynSecretStore {
        &self.store
    }
}

impl FromRef<State> for DynSecretStore {
    fn from_ref(state: &State) -> Self {
        state.store.clone()
    }
}
