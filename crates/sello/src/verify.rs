//! Verification against records and the ledger.
//!
//! Two paths:
//!
//! - [`VerificationEngine::verify_record`] checks a record against a
//!   caller-supplied key, for the "paste a colleague's public key" flow.
//! - [`VerificationEngine::verify_by_digest`] looks a digest up in the
//!   ledger and checks the record under its own embedded key snapshot.
//!
//! A signature mismatch is a result, not an error; only a ledger miss or an
//! infrastructure failure surfaces as `Err`.

use std::sync::Arc;

use sello_core::canonical::canonical_message;
use sello_core::crypto::VerifierKey;
use sello_core::digest::ContentDigest;
use sello_core::record::SignatureRecord;
use sello_core::signing::{verify_canonical_with_pem, verify_message, VerifyFailure, VerifyOutcome};
use sello_store::Ledger;

use crate::error::{Result, SelloError};

/// A ledger lookup plus the verification of the found record.
#[derive(Debug, Clone)]
pub struct DigestVerification {
    /// The record found for the digest.
    pub record: SignatureRecord,
    /// Whether the record verifies under its own embedded key.
    pub outcome: VerifyOutcome,
}

/// Verifies signature records, directly or via ledger lookup.
pub struct VerificationEngine<L: Ledger> {
    ledger: Arc<L>,
}

impl<L: Ledger + 'static> VerificationEngine<L> {
    /// Create a verification engine over a ledger.
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Verify a record against a caller-supplied public key.
    ///
    /// Rebuilds the canonical message from the record's stored file name and
    /// digest. Never errors; mismatches resolve to an invalid outcome with a
    /// reason code.
    pub async fn verify_record(
        &self,
        record: &SignatureRecord,
        key: &VerifierKey,
    ) -> VerifyOutcome {
        let message = canonical_message(&record.file_name, &record.digest);
        let key = key.clone();
        let signature_hex = record.signature_hex.clone();

        match tokio::task::spawn_blocking(move || verify_message(&key, &signature_hex, &message))
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "verification task failed");
                VerifyOutcome::failed(VerifyFailure::SignatureMismatch)
            }
        }
    }

    /// Look up a digest in the ledger and verify the record found there.
    ///
    /// A miss is [`SelloError::NotFound`], never a silent invalid outcome. A
    /// hit verifies under the record's own embedded key snapshot, so a
    /// tampered ledger row comes back with `outcome` invalid rather than an
    /// error.
    pub async fn verify_by_digest(&self, digest_hex: &str) -> Result<DigestVerification> {
        let digest = ContentDigest::parse(digest_hex)?;

        let record = self
            .ledger
            .find_by_digest(&digest)
            .await?
            .ok_or_else(|| SelloError::NotFound(format!("no ledger record for digest {digest}")))?;

        let check = record.clone();
        let outcome = match tokio::task::spawn_blocking(move || {
            verify_canonical_with_pem(
                &check.public_key_pem,
                &check.signature_hex,
                &check.file_name,
                &check.digest,
            )
        })
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "verification task failed");
                VerifyOutcome::failed(VerifyFailure::SignatureMismatch)
            }
        };

        Ok(DigestVerification { record, outcome })
    }
}
