//! NFT record identifier newtype.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// A unique identifier for an issued NFT record.
///
/// Generated server-side as a UUIDv4 at creation time and never reused.
/// The id doubles as the file name stem in the local record store, so
/// parsing rejects anything that could escape the store directory; ids
/// produced by [`NftId::generate`] always pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NftId(String);

impl NftId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an identifier received from a client.
    ///
    /// Accepts any opaque non-empty token that is safe to use as a file
    /// name stem: no path separators, no `.`/`..`, no NUL, at most 128
    /// bytes.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty()
            || raw.len() > 128
            || raw == "."
            || raw == ".."
            || raw.contains(['/', '\\', '\0'])
        {
            return Err(DomainError::InvalidId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for NftId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Deserializes as a plain string, then routes through [`NftId::parse`]
/// so invalid ids are rejected at deserialization time.
impl<'de> Deserialize<'de> for NftId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_parseable() {
        let a = NftId::generate();
        let b = NftId::generate();
        assert_ne!(a, b);
        assert_eq!(NftId::parse(a.as_str()).unwrap(), a);
    }

    #[test]
    fn rejects_empty_and_path_escapes() {
        for raw in ["", ".", "..", "a/b", "a\\b", "nul\0byte"] {
            assert!(NftId::parse(raw).is_err(), "should reject {raw:?}");
        }
    }

    #[test]
    fn rejects_oversized_ids() {
        let raw = "x".repeat(129);
        assert!(NftId::parse(&raw).is_err());
    }

    #[test]
    fn accepts_opaque_tokens() {
        assert!(NftId::parse("not-a-uuid-but-fine").is_ok());
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<NftId, _> = serde_json::from_str("\"abc-123\"");
        assert!(ok.is_ok());
        let bad: Result<NftId, _> = serde_json::from_str("\"../../etc\"");
        assert!(bad.is_err());
    }
}
