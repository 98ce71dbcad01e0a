//! SQLite implementation of the Ledger and KeyVault traits.
//!
//! The durable backend: rusqlite with bundled SQLite behind an internal
//! mutex. Every operation runs its blocking database work on the tokio
//! blocking pool; the async trait methods only own their parameters and
//! await the result. Record rows carry the canonical JSON form of the
//! record next to a few indexed lookup columns; a row whose JSON no longer
//! parses is skipped on read rather than failing the whole ledger.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use sello_core::SignatureRecord;

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{AppendOutcome, KeyVault, Ledger, LedgerStats, StoredKeypair, STATS_WINDOW_MS};

/// SQLite-based store implementing both [`Ledger`] and [`KeyVault`].
///
/// Thread-safe via internal Mutex; single logical writer by design.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database. Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run blocking database work on the blocking pool.
    ///
    /// The closure must own everything it touches; the connection mutex is
    /// taken inside the spawned task.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::InvalidData(format!("mutex poisoned: {e}")))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::InvalidData(format!("blocking task failed: {e}")))?
    }

    /// All record JSON rows, newest first.
    async fn record_rows(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT record FROM signature_records ORDER BY id DESC")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
        .await
    }
}

/// Parse a stored record row, skipping corrupt JSON with a warning.
fn parse_record(json: &str) -> Option<SignatureRecord> {
    match serde_json::from_str(json) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(error = %e, "skipping unparseable ledger row");
            None
        }
    }
}

#[async_trait]
impl Ledger for SqliteStore {
    async fn append(&self, record: &SignatureRecord) -> Result<AppendOutcome> {
        let json = serde_json::to_string(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let signature_hex = record.signature_hex.clone();
        let digest_hex = record.digest.to_hex();
        let created_at = record.created_at;

        self.with_conn(move |conn| {
            let existing: Option<i64> = conn
                .query_row(
                    "SELECT id FROM signature_records WHERE signature = ?1",
                    params![signature_hex],
                    |row| row.get(0),
                )
                .optional()?;

            if existing.is_some() {
                return Ok(AppendOutcome::Duplicate);
            }

            conn.execute(
                "INSERT INTO signature_records (signature, digest, created_at, record)
                 VALUES (?1, ?2, ?3, ?4)",
                params![signature_hex, digest_hex, created_at, json],
            )?;
            Ok(AppendOutcome::Appended)
        })
        .await
    }

    async fn find(
        &self,
        predicate: &(dyn for<'a> Fn(&'a SignatureRecord) -> bool + Sync),
    ) -> Result<Option<SignatureRecord>> {
        // The borrowed predicate cannot move onto the blocking pool; fetch
        // the rows there and scan them here.
        for json in self.record_rows().await? {
            if let Some(record) = parse_record(&json) {
                if predicate(&record) {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<SignatureRecord>> {
        let take = limit.unwrap_or(usize::MAX);
        let mut records = Vec::new();
        for json in self.record_rows().await? {
            if records.len() >= take {
                break;
            }
            if let Some(record) = parse_record(&json) {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn count(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM signature_records", [], |row| {
                    row.get(0)
                })?;
            Ok(count as u64)
        })
        .await
    }

    async fn remove(&self, signature_hex: &str) -> Result<bool> {
        let signature_hex = signature_hex.to_string();
        self.with_conn(move |conn| {
            let removed = conn.execute(
                "DELETE FROM signature_records WHERE signature = ?1",
                params![signature_hex],
            )?;
            Ok(removed > 0)
        })
        .await
    }

    async fn purge_all(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM signature_records", [])?;
            Ok(())
        })
        .await
    }

    async fn export_all(&self) -> Result<String> {
        let records = self.list(None).await?;
        serde_json::to_string(&records).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn import_snapshot(&self, json: &str) -> Result<usize> {
        let records: Vec<SignatureRecord> = match serde_json::from_str(json) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable ledger snapshot, importing as empty");
                Vec::new()
            }
        };

        self.with_conn(move |conn| {
            conn.execute("DELETE FROM signature_records", [])?;
            // Snapshots are newest-first; insert oldest-first so row order
            // reproduces the original sequence.
            for record in records.iter().rev() {
                let json = serde_json::to_string(record)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                conn.execute(
                    "INSERT INTO signature_records (signature, digest, created_at, record)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        record.signature_hex,
                        record.digest.to_hex(),
                        record.created_at,
                        json
                    ],
                )?;
            }
            Ok(records.len())
        })
        .await
    }

    async fn stats(&self, now: i64) -> Result<LedgerStats> {
        self.with_conn(move |conn| {
            let total: i64 =
                conn.query_row("SELECT COUNT(*) FROM signature_records", [], |row| {
                    row.get(0)
                })?;
            let cutoff = now - STATS_WINDOW_MS;
            let recent: i64 = conn.query_row(
                "SELECT COUNT(*) FROM signature_records WHERE created_at >= ?1",
                params![cutoff],
                |row| row.get(0),
            )?;
            Ok(LedgerStats {
                total: total as u64,
                last_30_days: recent as u64,
            })
        })
        .await
    }

    async fn find_by_digest(
        &self,
        digest: &sello_core::ContentDigest,
    ) -> Result<Option<SignatureRecord>> {
        let digest_hex = digest.to_hex();
        self.with_conn(move |conn| {
            let row: Option<String> = conn
                .query_row(
                    "SELECT record FROM signature_records WHERE digest = ?1
                     ORDER BY id DESC LIMIT 1",
                    params![digest_hex],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(row.as_deref().and_then(parse_record))
        })
        .await
    }

    async fn find_by_signature(&self, signature_hex: &str) -> Result<Option<SignatureRecord>> {
        let signature_hex = signature_hex.to_string();
        self.with_conn(move |conn| {
            let row: Option<String> = conn
                .query_row(
                    "SELECT record FROM signature_records WHERE signature = ?1",
                    params![signature_hex],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(row.as_deref().and_then(parse_record))
        })
        .await
    }
}

#[async_trait]
impl KeyVault for SqliteStore {
    async fn load(&self, email: &str) -> Result<Option<StoredKeypair>> {
        let email = email.to_string();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT public_key_pem, private_key_pem, created_at, expires_at
                     FROM identity_keys WHERE email = ?1",
                    params![email],
                    |row| {
                        Ok(StoredKeypair {
                            public_key_pem: row.get(0)?,
                            private_key_pem: row.get(1)?,
                            created_at: row.get(2)?,
                            expires_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
        .await
    }

    async fn save(&self, email: &str, keypair: &StoredKeypair) -> Result<()> {
        let email = email.to_string();
        let keypair = keypair.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO identity_keys (email, public_key_pem, private_key_pem, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(email) DO UPDATE SET
                     public_key_pem = excluded.public_key_pem,
                     private_key_pem = excluded.private_key_pem,
                     created_at = excluded.created_at,
                     expires_at = excluded.expires_at",
                params![
                    email,
                    keypair.public_key_pem,
                    keypair.private_key_pem,
                    keypair.created_at,
                    keypair.expires_at
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn reset(&self, email: &str) -> Result<bool> {
        let email = email.to_string();
        self.with_conn(move |conn| {
            let removed = conn.execute(
                "DELETE FROM identity_keys WHERE email = ?1",
                params![email],
            )?;
            Ok(removed > 0)
        })
        .await
    }
}
