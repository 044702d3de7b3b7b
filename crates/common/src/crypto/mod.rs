//! Client-side envelope encryption
//!
//! Secrets are sealed on the sender's machine and opened on the recipient's. The
//! server only ever handles the sealed output:
//!
//! - **Keys**: every secret gets its own 256-bit [`ShareKey`] from the OS CSPRNG.
//!   Keys travel to the recipient inside the fragment of the share link and are
//!   never part of a request.
//! - **Cipher**: AES-256-GCM with a random 96-bit nonce per seal. The tag makes
//!   a wrong key or a tampered payload fail loudly instead of yielding garbage.
//! - **Wire form**: `base64(nonce || ciphertext || tag)`, carried as the opaque
//!   `encryptedData` string.

mod share_key;

pub use share_key::{EnvelopeError, ShareKey, NONCE_SIZE, SHARE_KEY_SIZE};
