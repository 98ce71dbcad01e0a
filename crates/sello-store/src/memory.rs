//! In-memory implementation of the Ledger and KeyVault traits.
//!
//! Primarily for testing. Same semantics as SQLite but nothing persists
//! past drop. Thread-safe via RwLock.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use sello_core::SignatureRecord;

use crate::error::{Result, StoreError};
use crate::traits::{AppendOutcome, KeyVault, Ledger, LedgerStats, StoredKeypair, STATS_WINDOW_MS};

/// In-memory store implementing both [`Ledger`] and [`KeyVault`].
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Records, newest first (front insert).
    records: Vec<SignatureRecord>,

    /// Keypair blobs keyed by identity email.
    keys: HashMap<String, StoredKeypair>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                records: Vec::new(),
                keys: HashMap::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(e: impl std::fmt::Display) -> StoreError {
    StoreError::InvalidData(format!("lock poisoned: {e}"))
}

#[async_trait]
impl Ledger for MemoryStore {
    async fn append(&self, record: &SignatureRecord) -> Result<AppendOutcome> {
        let mut inner = self.inner.write().map_err(poisoned)?;

        if inner
            .records
            .iter()
            .any(|r| r.signature_hex == record.signature_hex)
        {
            return Ok(AppendOutcome::Duplicate);
        }

        inner.records.insert(0, record.clone());
        Ok(AppendOutcome::Appended)
    }

    async fn find(
        &self,
        predicate: &(dyn for<'a> Fn(&'a SignatureRecord) -> bool + Sync),
    ) -> Result<Option<SignatureRecord>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.records.iter().find(|r| predicate(r)).cloned())
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<SignatureRecord>> {
        let inner = self.inner.read().map_err(poisoned)?;
        let take = limit.unwrap_or(inner.records.len());
        Ok(inner.records.iter().take(take).cloned().collect())
    }

    async fn count(&self) -> Result<u64> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.records.len() as u64)
    }

    async fn remove(&self, signature_hex: &str) -> Result<bool> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let before = inner.records.len();
        inner.records.retain(|r| r.signature_hex != signature_hex);
        Ok(inner.records.len() < before)
    }

    async fn purge_all(&self) -> Result<()> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.records.clear();
        Ok(())
    }

    async fn export_all(&self) -> Result<String> {
        let inner = self.inner.read().map_err(poisoned)?;
        serde_json::to_string(&inner.records).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn import_snapshot(&self, json: &str) -> Result<usize> {
        let records: Vec<SignatureRecord> = match serde_json::from_str(json) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable ledger snapshot, importing as empty");
                Vec::new()
            }
        };
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.records = records;
        Ok(inner.records.len())
    }

    async fn stats(&self, now: i64) -> Result<LedgerStats> {
        let inner = self.inner.read().map_err(poisoned)?;
        let cutoff = now - STATS_WINDOW_MS;
        let last_30_days = inner
            .records
            .iter()
            .filter(|r| r.created_at >= cutoff)
            .count() as u64;
        Ok(LedgerStats {
            total: inner.records.len() as u64,
            last_30_days,
        })
    }
}

#[async_trait]
impl KeyVault for MemoryStore {
    async fn load(&self, email: &str) -> Result<Option<StoredKeypair>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.keys.get(email).cloned())
    }

    async fn save(&self, email: &str, keypair: &StoredKeypair) -> Result<()> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.keys.insert(email.to_string(), keypair.clone());
        Ok(())
    }

    async fn reset(&self, email: &str) -> Result<bool> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        Ok(inner.keys.remove(email).is_some())
    }
}
