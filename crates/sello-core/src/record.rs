//! Signature records: the immutable entries of the audit ledger.
//!
//! A record is created exactly once at sign time and never mutated. Its
//! digest is the content hash of the artifact as signed; its PEM is a
//! snapshot of the signer's public key at that moment. The signature value
//! uniquely identifies the record.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_message;
use crate::crypto::SigningKeypair;
use crate::digest::ContentDigest;
use crate::error::CoreError;
use crate::identity::Identity;

/// Status recorded after the sign-time self-consistency check passes.
pub const STATUS_SIGNED_VERIFIED: &str = "signed and verified";

/// Default record validity window: six months in milliseconds.
pub const DEFAULT_VALIDITY_MS: i64 = 365 * 24 * 60 * 60 * 1000 / 2;

/// One signed-document entry in the audit ledger.
///
/// Field names follow the persisted ledger format; the expiration is
/// advisory metadata and is not enforced by any verification path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRecord {
    /// Name of the signed file.
    pub file_name: String,

    /// Sign time, Unix milliseconds.
    #[serde(rename = "timestamp")]
    pub created_at: i64,

    /// Advisory expiration, Unix milliseconds.
    #[serde(rename = "expiration")]
    pub expires_at: Option<i64>,

    /// Human-readable status set at creation.
    pub status: String,

    /// Signature value, lowercase hex. Uniquely identifies the record.
    #[serde(rename = "signature")]
    pub signature_hex: String,

    /// Display size, e.g. `"2934.20 KB"`. Frozen at creation.
    pub size: String,

    /// Exact artifact size in bytes.
    pub size_bytes: u64,

    /// The identity that signed.
    pub signed_by: Identity,

    /// PEM SPKI snapshot of the signer's public key at sign time.
    #[serde(rename = "publicKey")]
    pub public_key_pem: String,

    /// Content digest of the artifact at sign time. Never recomputed.
    #[serde(rename = "fileHash")]
    pub digest: ContentDigest,

    /// Opaque reference to the stored signed artifact, if any.
    #[serde(rename = "documentArtifactRef")]
    pub artifact_ref: Option<String>,
}

impl SignatureRecord {
    /// Format a byte count as the display string used in the ledger.
    pub fn size_display(size_bytes: u64) -> String {
        format!("{:.2} KB", size_bytes as f64 / 1024.0)
    }
}

/// Builder for a [`SignatureRecord`]; `sign` produces the final immutable
/// record.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    identity: Identity,
    file_name: String,
    digest: ContentDigest,
    size_bytes: u64,
    created_at: i64,
    expires_at: Option<i64>,
    artifact_ref: Option<String>,
}

impl RecordBuilder {
    /// Start a record for an identity, file, and sign-time digest.
    pub fn new(identity: Identity, file_name: impl Into<String>, digest: ContentDigest) -> Self {
        Self {
            identity,
            file_name: file_name.into(),
            digest,
            size_bytes: 0,
            created_at: 0,
            expires_at: None,
            artifact_ref: None,
        }
    }

    /// Set the artifact size in bytes.
    pub fn size_bytes(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    /// Set the sign time (Unix milliseconds).
    pub fn created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set an advisory expiration offset from the sign time.
    pub fn valid_for_ms(mut self, validity_ms: i64) -> Self {
        self.expires_at = Some(self.created_at + validity_ms);
        self
    }

    /// Set a reference to the stored signed artifact.
    pub fn artifact_ref(mut self, artifact_ref: impl Into<String>) -> Self {
        self.artifact_ref = Some(artifact_ref.into());
        self
    }

    /// Sign the canonical message and produce the record.
    ///
    /// The embedded public key is snapshotted from `keypair`, so the record
    /// is self-consistent by construction.
    pub fn sign(self, keypair: &SigningKeypair) -> Result<SignatureRecord, CoreError> {
        let message = canonical_message(&self.file_name, &self.digest);
        let signature = keypair.sign(&message)?;
        let public_key_pem = keypair.export_public_pem()?;

        Ok(SignatureRecord {
            file_name: self.file_name,
            created_at: self.created_at,
            expires_at: self.expires_at,
            status: STATUS_SIGNED_VERIFIED.to_string(),
            signature_hex: signature.to_hex(),
            size: SignatureRecord::size_display(self.size_bytes),
            size_bytes: self.size_bytes,
            signed_by: self.identity,
            public_key_pem,
            digest: self.digest,
            artifact_ref: self.artifact_ref,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::testkey;
    use crate::identity::Role;

    fn test_identity() -> Identity {
        Identity::new("ana@example.org", "Ana Torres", Role::Signer)
    }

    #[test]
    fn test_builder_produces_consistent_record() {
        let keypair = testkey::shared();
        let digest = ContentDigest::of(b"the artifact");
        let record = RecordBuilder::new(test_identity(), "acta.pdf", digest)
            .size_bytes(3 * 1024)
            .created_at(1_700_000_000_000)
            .valid_for_ms(DEFAULT_VALIDITY_MS)
            .sign(keypair)
            .unwrap();

        assert_eq!(record.file_name, "acta.pdf");
        assert_eq!(record.status, STATUS_SIGNED_VERIFIED);
        assert_eq!(record.size, "3.00 KB");
        assert_eq!(record.digest, digest);
        assert_eq!(
            record.expires_at,
            Some(1_700_000_000_000 + DEFAULT_VALIDITY_MS)
        );
        assert!(record.public_key_pem.starts_with("-----BEGIN PUBLIC KEY-----"));
    }

    #[test]
    fn test_size_display_two_decimals() {
        assert_eq!(SignatureRecord::size_display(3_004_620), "2934.20 KB");
        assert_eq!(SignatureRecord::size_display(1024), "1.00 KB");
        assert_eq!(SignatureRecord::size_display(0), "0.00 KB");
    }

    #[test]
    fn test_record_json_field_names() {
        let keypair = testkey::shared();
        let record = RecordBuilder::new(test_identity(), "doc.pdf", ContentDigest::of(b"x"))
            .created_at(42)
            .sign(keypair)
            .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        for field in [
            "fileName",
            "timestamp",
            "expiration",
            "status",
            "signature",
            "size",
            "sizeBytes",
            "signedBy",
            "publicKey",
            "fileHash",
            "documentArtifactRef",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }

    #[test]
    fn test_record_json_roundtrip() {
        let keypair = testkey::shared();
        let record = RecordBuilder::new(test_identity(), "doc.pdf", ContentDigest::of(b"y"))
            .size_bytes(9)
            .created_at(7)
            .artifact_ref("artifact://doc.pdf")
            .sign(keypair)
            .unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: SignatureRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
