//! Content hashing: the deterministic fingerprint of document bytes.
//!
//! The digest is used both as ledger key material and as the payload of the
//! embedded scannable proof.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::CoreError;

/// A 32-byte SHA-256 digest of document content.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest(pub [u8; 32]);

impl ContentDigest {
    /// Compute the digest of the given bytes.
    ///
    /// Pure and deterministic: the same bytes always produce the same digest.
    pub fn of(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(hash.into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a lowercase hex string (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string. Accepts uppercase, stores canonically.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !looks_like_digest(s) {
            return Err(CoreError::DigestFormat(format!(
                "expected 64 hex characters, got {} characters",
                s.len()
            )));
        }
        let bytes = hex::decode(s).map_err(|e| CoreError::DigestFormat(e.to_string()))?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

/// Check whether a string has the 64-hex-character digest shape.
///
/// Used by the scan path to reject captured payloads before any ledger lookup.
pub fn looks_like_digest(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for ContentDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Digests persist and travel as hex strings (ledger JSON, scan payloads),
// so serde goes through the hex form rather than a byte array.
impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ContentDigest::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_deterministic() {
        let data = b"sample document bytes";
        let d1 = ContentDigest::of(data);
        let d2 = ContentDigest::of(data);
        assert_eq!(d1, d2);

        let d3 = ContentDigest::of(b"different document bytes");
        assert_ne!(d1, d3);
    }

    #[test]
    fn test_digest_hex_shape() {
        let d = ContentDigest::of(b"x");
        let hex = d.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(looks_like_digest(&hex));
        assert_eq!(hex, hex.to_lowercase());
    }

    #[test]
    fn test_digest_hex_roundtrip() {
        let d = ContentDigest::of(b"roundtrip");
        let recovered = ContentDigest::parse(&d.to_hex()).unwrap();
        assert_eq!(d, recovered);
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(ContentDigest::parse("abc").is_err());
        assert!(ContentDigest::parse(&"z".repeat(64)).is_err());
        assert!(!looks_like_digest("zz-not-hex"));
        assert!(!looks_like_digest(&"a".repeat(63)));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let d = ContentDigest::of(b"serde");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"{}\"", d.to_hex()));
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
    }
}
