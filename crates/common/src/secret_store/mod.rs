//! One-time-read storage for ciphertexts
//!
//! The store owns the `id -> ciphertext` mapping outright. Callers only ever hold a
//! [`SecretId`](crate::secret_id::SecretId), and the only way to get a ciphertext back
//! out is [`SecretStore::take_once`], which removes the record in the same step that
//! reads it. There is no `get` or `exists`.

mod memory;
mod provider;

pub use memory::MemorySecretStore;
pub use provider::{DynSecretStore, SecretRecord, SecretStore, SecretStoreError};
