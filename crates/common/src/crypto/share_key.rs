use std::fmt;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ciphertext::Ciphertext;

/// Size of an AES-256-GCM key in bytes (256 bits)
pub const SHARE_KEY_SIZE: usize = 32;
/// Size of an AES-GCM nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of the GCM authentication tag in bytes
const TAG_SIZE: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("entropy source unavailable: {0}")]
    Entropy(getrandom::Error),
    #[error("invalid key: expected {} hex characters", SHARE_KEY_SIZE * 2)]
    InvalidKey,
    #[error("encryption failed")]
    Encryption,
    /// Wrong key, tampered or truncated payload, or a payload that was never
    ///  sealed by us. Carries no detail.
    #[error("decryption failed: wrong key or corrupted secret")]
    Decryption,
}

/// A per-secret symmetric key.
///
/// Wiped from memory on drop. `Debug` never prints the key bytes; the only
/// way to render it is [`ShareKey::to_hex`], which is reserved for building
/// the fragment of a share link.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ShareKey([u8; SHARE_KEY_SIZE]);

impl ShareKey {
    /// Generate a new random key using the OS random source
    pub fn generate() -> Result<Self, EnvelopeError> {
        let mut bytes = [0u8; SHARE_KEY_SIZE];
        getrandom::getrandom(&mut bytes).map_err(EnvelopeError::Entropy)?;
        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, EnvelopeError> {
        if s.len() != SHARE_KEY_SIZE * 2 {
            return Err(EnvelopeError::InvalidKey);
        }
        let mut bytes = [0u8; SHARE_KEY_SIZE];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| EnvelopeError::InvalidKey)?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Encrypt `plaintext` into an opaque, transport-safe ciphertext
    pub fn seal(&self, plaintext: &str) -> Result<Ciphertext, EnvelopeError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0));

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce_bytes).map_err(EnvelopeError::Entropy)?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let sealed = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| EnvelopeError::Encryption)?;

        let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&sealed);

        Ciphertext::new(STANDARD.encode(out)).map_err(|_| EnvelopeError::Encryption)
    }

    /// Decrypt a ciphertext produced by [`ShareKey::seal`] with the same key
    ///
    /// # Errors
    ///
    /// Returns `EnvelopeError::Decryption` if:
    /// - The payload is not valid base64 or is too short to hold a nonce and tag
    /// - Authentication fails (wrong key or tampered data)
    /// - The recovered bytes are not UTF-8
    pub fn open(&self, ciphertext: &Ciphertext) -> Result<String, EnvelopeError> {
        let data = STANDARD
            .decode(ciphertext.as_str())
            .map_err(|_| EnvelopeError::Decryption)?;
        if data.len() < NONCE_SIZE + TAG_SIZE {
            return Err(EnvelopeError::Decryption);
        }

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0));
        let (nonce, sealed) = data.split_at(NONCE_SIZE);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| EnvelopeError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| EnvelopeError::Decryption)
    }
}

impl fmt::Debug for ShareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShareKey(..)")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_seal_open() {
        let key = ShareKey::generate().unwrap();
        let plaintext = "the launch code is 0000, please do not tell anyone";

        let sealed = key.seal(plaintext).unwrap();
        assert!(!sealed.as_str().contains("launch"));

        let opened = key.open(&sealed).unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_seal_is_randomized() {
        let key = ShareKey::generate().unwrap();
        let a = key.seal("same input").unwrap();
        let b = key.seal("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_is_a_decryption_failure() {
        let key = ShareKey::generate().unwrap();
        let other = ShareKey::generate().unwrap();
        let sealed = key.seal("for your eyes only").unwrap();

        let result = other.open(&sealed);
        assert!(matches!(result, Err(EnvelopeError::Decryption)));
    }

    #[test]
    fn test_tampered_ciphertext_is_rejected() {
        let key = ShareKey::generate().unwrap();
        let sealed = key.seal("integrity matters").unwrap();

        let mut raw = STANDARD.decode(sealed.as_str()).unwrap();
        let last = raw.len() - 1;
        raw[NONCE_SIZE + 2] ^= 0x01;
        raw[last] ^= 0x80;
        let tampered = Ciphertext::new(STANDARD.encode(raw)).unwrap();

        assert!(matches!(
            key.open(&tampered),
            Err(EnvelopeError::Decryption)
        ));
    }

    #[test]
    fn test_garbage_ciphertext_is_rejected() {
        let key = ShareKey::generate().unwrap();
        for garbage in ["hello", "!!!not base64!!!", "AAAA"] {
            let ciphertext = Ciphertext::new(garbage).unwrap();
            assert!(matches!(
                key.open(&ciphertext),
                Err(EnvelopeError::Decryption)
            ));
        }
    }

    #[test]
    fn test_empty_plaintext() {
        let key = ShareKey::generate().unwrap();
        let sealed = key.seal("").unwrap();
        assert_eq!(key.open(&sealed).unwrap(), "");
    }

    #[test]
    fn test_hex_roundtrip() {
        let key = ShareKey::generate().unwrap();
        let hex = key.to_hex();
        assert_eq!(hex.len(), SHARE_KEY_SIZE * 2);
        assert_eq!(ShareKey::from_hex(&hex).unwrap(), key);
    }

    #[test]
    fn test_hex_validation() {
        assert!(ShareKey::from_hex("").is_err());
        assert!(ShareKey::from_hex("abcd").is_err());
        assert!(ShareKey::from_hex(&"zz".repeat(SHARE_KEY_SIZE)).is_err());
        assert!(ShareKey::from_hex(&"ab".repeat(SHARE_KEY_SIZE + 1)).is_err());
        assert!(ShareKey::from_hex(&"ab".repeat(SHARE_KEY_SIZE)).is_ok());
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = ShareKey::from_hex(&"ab".repeat(SHARE_KEY_SIZE)).unwrap();
        assert_eq!(format!("{:?}", key), "ShareKey(..)");
    }
}
