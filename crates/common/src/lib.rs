/**
 * Opaque ciphertext payloads as the server
 *  sees them. Validated for presence, never
 *  parsed.
 */
pub mod ciphertext;
/**
 * Client-side envelope encryption.
 *  - Per-secret 256-bit share keys
 *  - AES-256-GCM seal / open
 */
pub mod crypto;
/**
 * Shareable links that pair a secret id with
 *  its key. The key lives in the fragment and
 *  is never sent to the server.
 */
pub mod link;
/**
 * Unguessable identifiers for stored secrets.
 */
pub mod secret_id;
/**
 * One-time-read storage for ciphertexts.
 *  Exposes an atomic put and an atomic take,
 *  plus an expiry sweep for abandoned secrets.
 */
pub mod secret_store;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::ciphertext::{Ciphertext, CiphertextError};
    pub use crate::crypto::{EnvelopeError, ShareKey};
    pub use crate::link::{LinkError, ShareLink};
    pub use crate::secret_id::{SecretId, SecretIdError};
    pub use crate::secret_store::{
        DynSecretStore, MemorySecretStore, SecretRecord, SecretStore, SecretStoreError,
    };
    pub use crate::version::{build_info, BuildInfo};
}
