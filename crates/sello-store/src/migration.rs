//! Database schema migrations for SQLite.
//!
//! A simple versioned migration system: each migration transforms the schema
//! from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// Idempotent - safe to call multiple times.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Audit ledger: one row per signature record, append-only.
        -- The record column holds the canonical JSON form; the indexed
        -- columns exist only for lookup and ordering.
        CREATE TABLE signature_records (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            signature   TEXT NOT NULL UNIQUE,
            digest      TEXT NOT NULL,
            created_at  INTEGER NOT NULL,
            record      TEXT NOT NULL
        );

        CREATE INDEX idx_records_digest ON signature_records(digest);
        CREATE INDEX idx_records_created_at ON signature_records(created_at);

        -- Key vault: one keypair blob per identity.
        CREATE TABLE identity_keys (
            email           TEXT PRIMARY KEY,
            public_key_pem  TEXT NOT NULL,
            private_key_pem TEXT NOT NULL,
            created_at      INTEGER NOT NULL,
            expires_at      INTEGER
        );
        "#,
    )?;
    Ok(())
}

/// Current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap();

        let version: u32 = conn
            .query_row(
                "SELECT MAX(version) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }
}
