//! # Sello
//!
//! Offline document signing with RSA-PSS, scannable proof markers, and a
//! local audit ledger. This crate is the unified API; the pieces live in
//! `sello-core` (crypto and records), `sello-store` (ledger and key vault),
//! and `sello-proof` (marker placement and embedding).
//!
//! ## Quick Start
//!
//! ```no_run
//! use sello::{EngineConfig, SignRequest, SigningEngine};
//! use sello::core::{Identity, Role};
//! use sello::proof::{CanvasPosition, CanvasViewport, MarkerPlacement, ProofCarrier};
//! use sello::store::SqliteStore;
//!
//! # async fn run(carrier: ProofCarrier) -> sello::Result<()> {
//! let store = SqliteStore::open("sello.db")?;
//! let engine = SigningEngine::new(store, carrier, EngineConfig::default());
//!
//! let outcome = engine
//!     .sign_document(SignRequest {
//!         identity: Identity::new("ana@example.org", "Ana Torres", Role::Signer),
//!         file_name: "acta.pdf".into(),
//!         document: std::fs::read("acta.pdf")?,
//!         placement: MarkerPlacement::on_first_page(
//!             CanvasPosition { x: 40.0, y: 40.0 },
//!             CanvasViewport { width: 612.0, height: 792.0 },
//!         ),
//!         artifact_ref: None,
//!     })
//!     .await?;
//! println!("signed, digest {}", outcome.record.digest);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod keystore;
pub mod scan;
pub mod sinks;
pub mod verify;

pub use engine::{EngineConfig, SignOutcome, SignRequest, SigningEngine, MAX_DOCUMENT_BYTES};
pub use error::{Result, SelloError};
pub use keystore::IdentityKeyStore;
pub use scan::{ScanFailure, ScanSession, ScanState};
pub use sinks::{ClipboardSink, DirectoryFileSink, FileSink, MemoryClipboard};
pub use verify::{DigestVerification, VerificationEngine};

pub use sello_core as core;
pub use sello_proof as proof;
pub use sello_store as store;
