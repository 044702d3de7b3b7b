use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CiphertextError {
    #[error("ciphertext is empty")]
    Empty,
}

/// An opaque encrypted payload.
///
/// The server stores and returns it verbatim; the only thing it checks is that
/// there is something to store. `Debug` prints the length only, so a ciphertext
/// can be carried through `tracing` fields without landing in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ciphertext(String);

impl Ciphertext {
    pub fn new(data: impl Into<String>) -> Result<Self, CiphertextError> {
        let data = data.into();
        if data.is_empty() {
            return Err(CiphertextError::Empty);
        }
        Ok(Self(data))
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    // never true for a constructed value, present for clippy's sake
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ciphertext")
            .field("len", &self.0.len())
            .finish()
    }
}

impl TryFrom<String> for Ciphertext {
    type Error = CiphertextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ciphertext> for String {
    fn from(ciphertext: Ciphertext) -> Self {
        ciphertext.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Ciphertext::new(""), Err(CiphertextError::Empty));
        assert!(serde_json::from_str::<Ciphertext>("\"\"").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let ciphertext = Ciphertext::new("U2FsdGVkX1+very+secret").unwrap();
        let debug = format!("{:?}", ciphertext);
        assert!(!debug.contains("U2FsdGVk"));
        assert!(debug.contains("len"));
    }

    #[test]
    fn test_content_is_untouched() {
        let raw = "  padded\nwith whitespace and ünïcode  ";
        let ciphertext = Ciphertext::new(raw).unwrap();
        assert_eq!(ciphertext.as_str(), raw);
        assert_eq!(ciphertext.len(), raw.len());
        assert_eq!(ciphertext.into_inner(), raw);
    }
}
