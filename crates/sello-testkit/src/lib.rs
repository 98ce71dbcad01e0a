//! # Sello Testkit
//!
//! Testing utilities for Sello.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: identities, a process-wide 4096-bit keypair, signed
//!   records, and a pre-wired in-memory engine
//! - **Fakes**: proof collaborators over a toy document format, so the full
//!   embed-then-scan loop runs without a PDF or QR library
//! - **Generators**: proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! ```rust,ignore
//! use sello_testkit::fixtures::{signer_identity, TestFixture};
//!
//! let identity = signer_identity();
//! let fixture = TestFixture::with_seeded_keys(&identity).await;
//! ```

pub mod fakes;
pub mod fixtures;
pub mod generators;

pub use fakes::{
    fake_carrier, last_marker, EmbeddedMarker, FakeDocumentSurface, FakePageRasterizer,
    FakeSymbolCodec, FAKE_SYMBOL_SIDE,
};
pub use fixtures::{
    admin_identity, default_placement, init_tracing, now_millis, sample_document, shared_keypair,
    shared_keypair_blob, signed_record, signer_identity, viewer_identity, TestFixture,
};
