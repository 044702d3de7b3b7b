use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use http::request::Parts;

use common::secret_store::DynSecretStore;

#[async_trait]
pub trait DataSource {
    /// Perform various checks on the system to ensure its healthy and ready to accept requests.
    async fn is_ready(&self) -> Result<(), DataSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("the secret store is unavailable")]
    StoreUnavailable,
}

pub type DynDataSource = Arc<dyn DataSource + Send + Sync>;

pub struct StateDataSource(DynDataSource);

impl Debug for StateDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateDataSource").finish()
    }
}

impl StateDataSource {
    #[cfg(test)]
    pub fn new(dds: DynDataSource) -> Self {
        Self(dds)
    }
}

impl Deref for StateDataSource {
    type Target = DynDataSource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Ready once the secret store answers a count
struct StoreSource {
    store: DynSecretStore,
}

#[async_trait]
impl DataSource for StoreSource {
    async fn is_ready(&self) -> Result<(), DataSourceError> {
        let live = self
            .store
            .count()
            .await
            .map_err(|_| DataSourceError::StoreUnavailable)?;
        tracing::trace!(live, "secret store responded");
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for StateDataSource
where
    DynSecretStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ();

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(StateDataSource(Arc::new(StoreSource {
            store: DynSecretStore::from_ref(state),
        })))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use common::secret_store::MemorySecretStore;

    #[derive(Clone)]
    pub(crate) enum MockReadiness {
        StoreUnavailable,
        Ready,
        /// Never answers
        Stalled,
    }

    #[async_trait]
    impl DataSource for MockReadiness {
        async fn is_ready(&self) -> Result<(), DataSourceError> {
            use MockReadiness::*;

            match self {
                StoreUnavailable => Err(DataSourceError::StoreUnavailable),
                Ready => Ok(()),
                Stalled => std::future::pending().await,
            }
        }
    }

    #[tokio::test]
    async fn test_store_source_ready() {
        let source = StoreSource {
            store: Arc::new(MemorySecretStore::new()),
        };
        assert!(source.is_ready().await.is_ok());
    }
}
