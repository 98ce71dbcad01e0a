//! # Sello Store
//!
//! Persistence for the Sello signing system. Two abstract interfaces with
//! SQLite (durable) and in-memory (test) implementations:
//!
//! - [`Ledger`] - the append-only audit ledger of signature records,
//!   newest first, single writer, unbounded
//! - [`KeyVault`] - the structured identity-to-keypair mapping
//!
//! ## Design Notes
//!
//! - **Idempotent appends**: re-appending a signature value returns
//!   [`AppendOutcome::Duplicate`]
//! - **Lenient recovery**: an unparseable persisted record or snapshot is
//!   treated as absent/empty, never a fatal error
//! - **Explicit deletion only**: `remove` and `purge_all`; nothing cascades

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{
    AppendOutcome, KeyVault, Ledger, LedgerStats, StoredKeypair, STATS_WINDOW_MS,
};
