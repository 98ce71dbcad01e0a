//! # Sello Core
//!
//! Core primitives for the Sello signing system: identities and their roles,
//! content digests, RSA-PSS keypairs, the canonical verification message,
//! signature records, and record validation.
//!
//! ## Key Types
//!
//! - [`Identity`] / [`Role`] - who signs, and what they may do
//! - [`ContentDigest`] - SHA-256 fingerprint of document bytes
//! - [`SigningKeypair`] / [`VerifierKey`] - RSA-PSS (4096-bit, SHA-512,
//!   128-byte salt) signing and verification
//! - [`SignatureRecord`] / [`RecordBuilder`] - immutable ledger entries
//! - [`VerifyOutcome`] - fail-soft verification result with reason codes
//!
//! ## Invariants
//!
//! - The canonical message is `"{file_name}:{digest_hex}"`, uniformly.
//! - A record's signature validates against its own embedded key and digest
//!   at creation time ([`validate_record`]).
//! - Verification never errors: malformed input resolves to `valid = false`
//!   with a [`VerifyFailure`] reason.

pub mod canonical;
pub mod crypto;
pub mod digest;
pub mod error;
pub mod identity;
pub mod record;
pub mod signing;
pub mod validation;

pub use canonical::canonical_message;
pub use crypto::{
    ensure_crypto_available, PssSignature, SigningKeypair, VerifierKey, MODULUS_BITS, SALT_LEN,
};
pub use digest::{looks_like_digest, ContentDigest};
pub use error::{CoreError, RecordValidationError};
pub use identity::{Identity, Permission, Role};
pub use record::{RecordBuilder, SignatureRecord, DEFAULT_VALIDITY_MS, STATUS_SIGNED_VERIFIED};
pub use signing::{sign_canonical, verify_canonical_with_pem, verify_message, VerifyFailure, VerifyOutcome};
pub use validation::validate_record;
