//! The signing engine: canonical-message signatures and fail-soft verification.
//!
//! Verification here never returns an error. Malformed signatures, malformed
//! keys, and genuine mismatches all resolve to `valid = false` with a
//! distinguishing reason code, recorded via `tracing`.

use crate::canonical::canonical_message;
use crate::crypto::{PssSignature, SigningKeypair, VerifierKey};
use crate::digest::ContentDigest;
use crate::error::CoreError;

/// Why a verification resolved to `valid = false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyFailure {
    /// The signature value was not valid hex (odd length, stray characters).
    MalformedSignature,
    /// The verification key could not be parsed.
    MalformedKey,
    /// The signature does not match the message under the key.
    SignatureMismatch,
}

/// Outcome of a verification. Construction guarantees `valid` and `failure`
/// never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOutcome {
    valid: bool,
    failure: Option<VerifyFailure>,
}

impl VerifyOutcome {
    /// A successful verification.
    pub fn ok() -> Self {
        Self {
            valid: true,
            failure: None,
        }
    }

    /// A failed verification with its reason.
    pub fn failed(failure: VerifyFailure) -> Self {
        Self {
            valid: false,
            failure: Some(failure),
        }
    }

    /// Whether the signature verified.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The reason code, present exactly when `valid` is false.
    pub fn failure(&self) -> Option<VerifyFailure> {
        self.failure
    }
}

/// Sign the canonical message for `file_name` and `digest`.
///
/// Returns the signature as lowercase hex.
pub fn sign_canonical(
    keypair: &SigningKeypair,
    file_name: &str,
    digest: &ContentDigest,
) -> Result<String, CoreError> {
    let message = canonical_message(file_name, digest);
    let signature = keypair.sign(&message)?;
    Ok(signature.to_hex())
}

/// Verify a hex signature over an already-built message.
pub fn verify_message(key: &VerifierKey, signature_hex: &str, message: &[u8]) -> VerifyOutcome {
    let signature = match PssSignature::from_hex(signature_hex) {
        Ok(sig) => sig,
        Err(e) => {
            tracing::debug!(error = %e, "rejected malformed signature value");
            return VerifyOutcome::failed(VerifyFailure::MalformedSignature);
        }
    };

    if key.verify(message, &signature) {
        VerifyOutcome::ok()
    } else {
        tracing::debug!("signature mismatch");
        VerifyOutcome::failed(VerifyFailure::SignatureMismatch)
    }
}

/// Verify a hex signature against the canonical message for
/// `file_name`/`digest`, parsing the key from a PEM snapshot.
pub fn verify_canonical_with_pem(
    public_key_pem: &str,
    signature_hex: &str,
    file_name: &str,
    digest: &ContentDigest,
) -> VerifyOutcome {
    let key = match VerifierKey::from_pem(public_key_pem) {
        Ok(key) => key,
        Err(e) => {
            tracing::debug!(error = %e, "rejected malformed verification key");
            return VerifyOutcome::failed(VerifyFailure::MalformedKey);
        }
    };
    let message = canonical_message(file_name, digest);
    verify_message(&key, signature_hex, &message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::testkey;

    #[test]
    fn test_sign_then_verify_canonical() {
        let keypair = testkey::shared();
        let digest = ContentDigest::of(b"contract body");
        let sig_hex = sign_canonical(keypair, "contract.pdf", &digest).unwrap();

        let message = canonical_message("contract.pdf", &digest);
        let outcome = verify_message(&keypair.verifier(), &sig_hex, &message);
        assert!(outcome.is_valid());
        assert_eq!(outcome.failure(), None);
    }

    #[test]
    fn test_verify_never_errors_on_garbage() {
        let keypair = testkey::shared();
        let message = b"anything";

        let odd = verify_message(&keypair.verifier(), "abc", message);
        assert!(!odd.is_valid());
        assert_eq!(odd.failure(), Some(VerifyFailure::MalformedSignature));

        let nonhex = verify_message(&keypair.verifier(), "zz-not-hex", message);
        assert_eq!(nonhex.failure(), Some(VerifyFailure::MalformedSignature));
    }

    #[test]
    fn test_wrong_file_name_changes_message() {
        let keypair = testkey::shared();
        let digest = ContentDigest::of(b"contract body");
        let sig_hex = sign_canonical(keypair, "contract.pdf", &digest).unwrap();

        let other = canonical_message("other.pdf", &digest);
        let outcome = verify_message(&keypair.verifier(), &sig_hex, &other);
        assert_eq!(outcome.failure(), Some(VerifyFailure::SignatureMismatch));
    }

    #[test]
    fn test_verify_with_pem_snapshot() {
        let keypair = testkey::shared();
        let digest = ContentDigest::of(b"snapshot");
        let sig_hex = sign_canonical(keypair, "snap.pdf", &digest).unwrap();
        let pem = keypair.export_public_pem().unwrap();

        assert!(verify_canonical_with_pem(&pem, &sig_hex, "snap.pdf", &digest).is_valid());

        let bad_key = verify_canonical_with_pem("not a pem", &sig_hex, "snap.pdf", &digest);
        assert_eq!(bad_key.failure(), Some(VerifyFailure::MalformedKey));
    }
}
