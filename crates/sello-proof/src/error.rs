//! Error types for the proof carrier.

use thiserror::Error;

/// Errors that can occur while encoding, embedding, or decoding proofs.
#[derive(Debug, Error)]
pub enum ProofError {
    /// The symbol encoder rejected the payload.
    #[error("symbol encode failed: {0}")]
    Encode(String),

    /// The symbol decoder failed on the raster (distinct from a clean miss).
    #[error("symbol decode failed: {0}")]
    Decode(String),

    /// The document page could not be rasterized.
    #[error("page rasterization failed: {0}")]
    Raster(String),

    /// The document surface rejected the composite operation.
    #[error("document composite failed: {0}")]
    Surface(String),

    /// The requested page does not exist.
    #[error("page {0} out of range")]
    PageOutOfRange(usize),

    /// The placement geometry is unusable (e.g. zero-sized viewport).
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),
}

/// Result type for proof operations.
pub type Result<T> = std::result::Result<T, ProofError>;
