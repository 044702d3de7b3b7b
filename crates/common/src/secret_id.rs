//! Identifiers for stored secrets
//!
//! A [`SecretId`] is the only handle a caller ever holds on a stored ciphertext, so it
//! doubles as a bearer capability: anyone who knows an unconsumed id can take the secret.
//! Ids are random (version 4) UUIDs carrying 122 bits drawn straight from the operating
//! system's CSPRNG. There is no fallback source; if the OS cannot provide entropy,
//! generation fails and the caller must abort the request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid, Version};

/// Number of random bytes consumed per id
pub const SECRET_ID_RANDOM_BYTES: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum SecretIdError {
    #[error("entropy source unavailable: {0}")]
    Entropy(getrandom::Error),
    #[error("malformed secret id")]
    Malformed,
}

/// Random, unguessable identifier naming one stored secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretId(Uuid);

impl SecretId {
    /// Draw a fresh id from the OS random source
    pub fn generate() -> Result<Self, SecretIdError> {
        let mut bytes = [0u8; SECRET_ID_RANDOM_BYTES];
        getrandom::getrandom(&mut bytes).map_err(SecretIdError::Entropy)?;
        Ok(Self(Builder::from_random_bytes(bytes).into_uuid()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

impl FromStr for SecretId {
    type Err = SecretIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::parse_str(s).map_err(|_| SecretIdError::Malformed)?;
        // anything other than a random uuid cannot have come from `generate`
        if uuid.get_version() != Some(Version::Random) {
            return Err(SecretIdError::Malformed);
        }
        Ok(Self(uuid))
    }
}

impl TryFrom<String> for SecretId {
    type Error = SecretIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SecretId> for String {
    fn from(id: SecretId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_is_random_v4() {
        let id = SecretId::generate().unwrap();
        assert_eq!(id.as_uuid().get_version(), Some(Version::Random));
    }

    #[test]
    fn test_large_batch_is_unique() {
        let mut seen = HashSet::new();
        for _ in 0..100_000 {
            let id = SecretId::generate().unwrap();
            assert!(seen.insert(id), "duplicate id generated: {}", id);
        }
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let id = SecretId::generate().unwrap();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text, text.to_lowercase());
        assert_eq!(text.parse::<SecretId>().unwrap(), id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<SecretId>().is_err());
        assert!("abc123".parse::<SecretId>().is_err());
        assert!("../../etc/passwd".parse::<SecretId>().is_err());
    }

    #[test]
    fn test_parse_rejects_non_random_uuid() {
        // nil uuid and a v1 (time based) uuid are both well formed but never issued
        assert!("00000000-0000-0000-0000-000000000000"
            .parse::<SecretId>()
            .is_err());
        assert!("c232ab00-9414-11ec-b3c8-9f6bdeced846"
            .parse::<SecretId>()
            .is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let id = SecretId::generate().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let back: SecretId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<SecretId>("\"not-an-id\"").is_err());
    }
}
