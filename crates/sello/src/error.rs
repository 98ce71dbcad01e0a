//! The error surface of the unified API.
//!
//! Callers match on the variant to choose user-facing handling; the wrapped
//! strings carry diagnostic detail for logs. Verification mismatches are not
//! errors (see [`sello_core::signing::VerifyOutcome`]); the variants here
//! cover failures of the operation itself.

use sello_core::error::CoreError;
use sello_core::identity::Role;
use sello_proof::ProofError;
use sello_store::StoreError;
use thiserror::Error;

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, SelloError>;

/// Errors surfaced by the unified API.
#[derive(Debug, Error)]
pub enum SelloError {
    /// The platform cannot provide the cryptographic primitives we need.
    #[error("crypto environment unsupported: {0}")]
    EnvironmentUnsupported(String),

    /// A public or private key could not be parsed or imported.
    #[error("key format: {0}")]
    KeyFormat(String),

    /// A signature value was not well-formed hex of the right shape.
    #[error("signature format: {0}")]
    SignatureFormat(String),

    /// A lookup matched nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// The document exceeds the signing size cap.
    #[error("document is {actual} bytes, over the {limit} byte limit")]
    SizeLimit { actual: u64, limit: u64 },

    /// The identity's role does not grant the attempted operation.
    #[error("role {0:?} is not authorized for this operation")]
    NotAuthorized(Role),

    /// Storage layer failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Proof marker encoding or embedding failure.
    #[error("proof error: {0}")]
    Proof(#[from] ProofError),

    /// Any other failure of the operation itself.
    #[error("operation failed: {0}")]
    OperationFailed(String),
}

impl From<CoreError> for SelloError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EnvironmentUnsupported(msg) => SelloError::EnvironmentUnsupported(msg),
            CoreError::KeyFormat(msg) => SelloError::KeyFormat(msg),
            CoreError::SignatureFormat(msg) => SelloError::SignatureFormat(msg),
            CoreError::DigestFormat(msg) => SelloError::OperationFailed(format!("digest: {msg}")),
            CoreError::OperationFailed(msg) => SelloError::OperationFailed(msg),
        }
    }
}

impl From<std::io::Error> for SelloError {
    fn from(err: std::io::Error) -> Self {
        SelloError::OperationFailed(format!("io: {err}"))
    }
}
