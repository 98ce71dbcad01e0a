//! Ledger and KeyVault traits: the abstract persistence interfaces.
//!
//! These traits keep the engine storage-agnostic. Implementations include
//! SQLite (durable) and in-memory (for tests). Both stores are process-local
//! and single-writer; concurrent writers must be externally serialized.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sello_core::{ContentDigest, SignatureRecord};

use crate::error::Result;

/// Result of appending a record to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The record was appended.
    Appended,
    /// A record with the same signature value already exists (idempotent).
    Duplicate,
}

/// Summary statistics over the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Total records.
    pub total: u64,
    /// Records created within the trailing 30-day window.
    pub last_30_days: u64,
}

/// Milliseconds in the trailing window used by [`Ledger::stats`].
pub const STATS_WINDOW_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// The audit ledger: an insertion-ordered, append-only sequence of
/// signature records, newest first.
///
/// # Design Notes
///
/// - **Append-only**: records are never updated in place. Deletions are
///   explicit ([`Ledger::remove`], [`Ledger::purge_all`]) with no cascading
///   cleanup.
/// - **Idempotent appends**: a duplicate signature value returns
///   [`AppendOutcome::Duplicate`], not an error.
/// - **Lenient reads**: an unparseable persisted record is skipped (and an
///   unparseable snapshot imports as empty), never a fatal error.
/// - **Unbounded**: no eviction.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Insert a record at the front of the sequence.
    async fn append(&self, record: &SignatureRecord) -> Result<AppendOutcome>;

    /// Linear scan, first match wins. Scans newest-first.
    async fn find(
        &self,
        predicate: &(dyn for<'a> Fn(&'a SignatureRecord) -> bool + Sync),
    ) -> Result<Option<SignatureRecord>>;

    /// Most-recent-first slice; `None` returns everything.
    async fn list(&self, limit: Option<usize>) -> Result<Vec<SignatureRecord>>;

    /// Number of records.
    async fn count(&self) -> Result<u64>;

    /// Remove the record with the given signature value.
    ///
    /// Returns `true` if a record was removed.
    async fn remove(&self, signature_hex: &str) -> Result<bool>;

    /// Irreversibly clear the ledger.
    async fn purge_all(&self) -> Result<()>;

    /// Serialize the full sequence (newest first) as a JSON snapshot.
    async fn export_all(&self) -> Result<String>;

    /// Replace the ledger contents with a snapshot.
    ///
    /// An unparseable snapshot is treated as an empty ledger and logged,
    /// matching the recovery behavior for a corrupt persisted blob.
    async fn import_snapshot(&self, json: &str) -> Result<usize>;

    /// Summary statistics as of `now` (Unix milliseconds).
    async fn stats(&self, now: i64) -> Result<LedgerStats>;

    /// First record whose digest matches.
    async fn find_by_digest(&self, digest: &ContentDigest) -> Result<Option<SignatureRecord>> {
        let want = *digest;
        self.find(&move |r: &SignatureRecord| r.digest == want).await
    }

    /// The record identified by a signature value.
    async fn find_by_signature(&self, signature_hex: &str) -> Result<Option<SignatureRecord>> {
        self.find(&move |r: &SignatureRecord| r.signature_hex == signature_hex)
            .await
    }
}

/// A persisted keypair blob for one identity.
///
/// The private half is stored here and nowhere else; it leaves the vault
/// only to reconstruct the owning identity's [`sello_core::SigningKeypair`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredKeypair {
    /// PEM SPKI public key.
    pub public_key_pem: String,
    /// PKCS#8 PEM private key.
    pub private_key_pem: String,
    /// Generation time, Unix milliseconds.
    pub created_at: i64,
    /// Optional advisory expiry, Unix milliseconds.
    pub expires_at: Option<i64>,
}

/// Structured identity-to-keypair mapping.
///
/// Keyed by the identity's email. One blob per identity, replaced wholesale;
/// `reset` is the only deletion path.
#[async_trait]
pub trait KeyVault: Send + Sync {
    /// Load the keypair blob for an identity, if present.
    async fn load(&self, email: &str) -> Result<Option<StoredKeypair>>;

    /// Save (or replace) the keypair blob for an identity.
    async fn save(&self, email: &str, keypair: &StoredKeypair) -> Result<()>;

    /// Delete the keypair blob. Returns `true` if one existed.
    async fn reset(&self, email: &str) -> Result<bool>;
}
