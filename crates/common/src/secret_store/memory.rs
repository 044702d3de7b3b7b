use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::provider::{SecretRecord, SecretStore, SecretStoreError};
use crate::ciphertext::Ciphertext;
use crate::secret_id::SecretId;

/// How many fresh ids `put` will try before giving up on collisions
const MAX_ID_ATTEMPTS: usize = 8;

/// In-memory secret store guarded by a single lock.
///
/// Every operation runs start to finish inside one critical section over the
/// whole map, so `take_once` is a plain `HashMap::remove` and there is no window
/// between seeing a record and removing it. Contents do not survive a restart.
#[derive(Clone, Default)]
pub struct MemorySecretStore {
    records: Arc<Mutex<HashMap<SecretId, SecretRecord>>>,
    capacity: Option<usize>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse new secrets once `capacity` records are live
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            records: Arc::default(),
            capacity: Some(capacity),
        }
    }
}

impl fmt::Debug for MemorySecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySecretStore")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn put(&self, ciphertext: Ciphertext) -> Result<SecretId, SecretStoreError> {
        let mut records = self.records.lock();

        if let Some(limit) = self.capacity {
            if records.len() >= limit {
                return Err(SecretStoreError::Capacity(limit));
            }
        }

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = SecretId::generate()?;
            if let Entry::Vacant(slot) = records.entry(id) {
                slot.insert(SecretRecord::new(id, ciphertext));
                return Ok(id);
            }
            tracing::warn!("secret id collision, regenerating");
        }

        Err(SecretStoreError::CollisionLimit(MAX_ID_ATTEMPTS))
    }

    async fn take_once(&self, id: &SecretId) -> Result<Ciphertext, SecretStoreError> {
        self.records
            .lock()
            .remove(id)
            .map(|record| record.ciphertext)
            .ok_or(SecretStoreError::NotFound)
    }

    async fn sweep_expired(&self, max_age: Duration) -> Result<Vec<SecretId>, SecretStoreError> {
        let now = Instant::now();
        let mut expired = Vec::new();

        self.records.lock().retain(|id, record| {
            if record.is_expired(now, max_age) {
                expired.push(*id);
                false
            } else {
                true
            }
        });

        Ok(expired)
    }

    async fn count(&self) -> Result<usize, SecretStoreError> {
        Ok(self.records.lock().len())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use tokio::sync::Barrier;

    use super::*;

    fn ciphertext(s: &str) -> Ciphertext {
        Ciphertext::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_put_then_take_once() {
        let store = MemorySecretStore::new();
        let id = store.put(ciphertext("hello")).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);

        let taken = store.take_once(&id).await.unwrap();
        assert_eq!(taken.as_str(), "hello");
        assert_eq!(store.count().await.unwrap(), 0);

        // Second take must miss
        let result = store.take_once(&id).await;
        assert!(matches!(result, Err(SecretStoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_take_unknown_id() {
        let store = MemorySecretStore::new();
        store.put(ciphertext("unrelated")).await.unwrap();

        let unknown = SecretId::generate().unwrap();
        let result = store.take_once(&unknown).await;
        assert!(matches!(result, Err(SecretStoreError::NotFound)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_records_are_independent() {
        let store = MemorySecretStore::new();
        let a = store.put(ciphertext("a")).await.unwrap();
        let b = store.put(ciphertext("b")).await.unwrap();
        assert_ne!(a, b);

        assert_eq!(store.take_once(&b).await.unwrap().as_str(), "b");
        assert_eq!(store.take_once(&a).await.unwrap().as_str(), "a");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_takes_yield_exactly_one_winner() {
        const CONTENDERS: usize = 1000;

        let store = MemorySecretStore::new();
        let id = store.put(ciphertext("only once")).await.unwrap();
        let barrier = Arc::new(Barrier::new(CONTENDERS));

        let mut handles = Vec::with_capacity(CONTENDERS);
        for _ in 0..CONTENDERS {
            let store = store.clone();
            let barrier = barrier.clone();
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                store.take_once(&id).await
            }));
        }

        let mut winners = 0;
        let mut misses = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(taken) => {
                    assert_eq!(taken.as_str(), "only once");
                    winners += 1;
                }
                Err(SecretStoreError::NotFound) => misses += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(misses, CONTENDERS - 1);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_puts_get_distinct_ids() {
        let store = MemorySecretStore::new();

        let mut handles = Vec::new();
        for task in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut ids = Vec::new();
                for n in 0..100 {
                    let id = store
                        .put(Ciphertext::new(format!("{}-{}", task, n)).unwrap())
                        .await
                        .unwrap();
                    ids.push(id);
                }
                ids
            }));
        }

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.await.unwrap() {
                assert!(all.insert(id));
            }
        }

        assert_eq!(all.len(), 3200);
        assert_eq!(store.count().await.unwrap(), 3200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_only_expired() {
        let store = MemorySecretStore::new();
        let max_age = Duration::from_secs(60);

        let old = store.put(ciphertext("old")).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        let fresh = store.put(ciphertext("fresh")).await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;

        let swept = store.sweep_expired(max_age).await.unwrap();
        assert_eq!(swept, vec![old]);

        assert!(matches!(
            store.take_once(&old).await,
            Err(SecretStoreError::NotFound)
        ));
        assert_eq!(store.take_once(&fresh).await.unwrap().as_str(), "fresh");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_on_empty_and_consumed() {
        let store = MemorySecretStore::new();
        assert!(store
            .sweep_expired(Duration::from_secs(1))
            .await
            .unwrap()
            .is_empty());

        let id = store.put(ciphertext("taken")).await.unwrap();
        store.take_once(&id).await.unwrap();
        tokio::time::advance(Duration::from_secs(10)).await;

        assert!(store
            .sweep_expired(Duration::from_secs(1))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_capacity_limit() {
        let store = MemorySecretStore::with_capacity_limit(2);
        let first = store.put(ciphertext("1")).await.unwrap();
        store.put(ciphertext("2")).await.unwrap();

        let result = store.put(ciphertext("3")).await;
        assert!(matches!(result, Err(SecretStoreError::Capacity(2))));

        // Taking a secret frees a slot
        store.take_once(&first).await.unwrap();
        store.put(ciphertext("3")).await.unwrap();
    }

    #[test]
    fn test_debug_does_not_leak_contents() {
        let store = MemorySecretStore::new();
        let debug = format!("{:?}", store);
        assert!(debug.starts_with("MemorySecretStore"));
    }
}
