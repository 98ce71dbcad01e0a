//! Error types for the Sello core.

use thiserror::Error;

/// Core errors that can occur during key and signature operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Secure cryptographic primitives are unavailable in this environment.
    #[error("secure crypto environment unavailable: {0}")]
    EnvironmentUnsupported(String),

    /// Key material could not be parsed or serialized.
    #[error("malformed key material: {0}")]
    KeyFormat(String),

    /// A signature value could not be parsed.
    #[error("malformed signature: {0}")]
    SignatureFormat(String),

    /// A digest string does not have the expected 64-hex-character shape.
    #[error("malformed digest: {0}")]
    DigestFormat(String),

    /// A cryptographic operation failed.
    #[error("crypto operation failed: {0}")]
    OperationFailed(String),
}

/// Validation errors for a signature record's self-consistency.
#[derive(Debug, Error)]
pub enum RecordValidationError {
    #[error("record file name is empty")]
    EmptyFileName,

    #[error("embedded public key is malformed: {0}")]
    MalformedKey(String),

    #[error("signature value is malformed: {0}")]
    MalformedSignature(String),

    #[error("signature does not validate against the embedded key and digest")]
    SignatureInvalid,
}

impl From<CoreError> for RecordValidationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::KeyFormat(msg) => RecordValidationError::MalformedKey(msg),
            CoreError::SignatureFormat(msg) => RecordValidationError::MalformedSignature(msg),
            other => RecordValidationError::MalformedSignature(other.to_string()),
        }
    }
}
