//! The scan-to-verify session state machine.
//!
//! A session walks Idle -> Scanning -> PayloadCaptured -> LookedUp ->
//! Verified, detouring to Failed at the first gate a payload cannot pass.
//! Captured payloads are shape-checked before the ledger is consulted, so a
//! scan of an arbitrary QR code never causes a lookup. Verified and Failed
//! are terminal; `restart` returns to Idle, and `cancel` drops back to Idle
//! from anywhere with no side effects.

use std::sync::Arc;

use sello_core::digest::{looks_like_digest, ContentDigest};
use sello_core::record::SignatureRecord;
use sello_core::signing::verify_canonical_with_pem;
use sello_store::Ledger;

use crate::error::{Result, SelloError};

/// Why a scan session ended in [`ScanState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFailure {
    /// The captured payload is not a content digest.
    InvalidPayload,
    /// No ledger record matches the digest.
    NotFound,
    /// The record was found but its signature does not verify.
    SignatureInvalid,
}

/// The observable state of a scan session.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    /// No scan in progress.
    Idle,
    /// The capture device is live, waiting for a payload.
    Scanning,
    /// A well-formed digest payload was captured.
    PayloadCaptured(ContentDigest),
    /// The digest matched a ledger record, not yet verified.
    LookedUp(Box<SignatureRecord>),
    /// Terminal: the record verified under its embedded key.
    Verified(Box<SignatureRecord>),
    /// Terminal: the scan failed at one of the gates.
    Failed(ScanFailure),
}

impl ScanState {
    /// Whether the session has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanState::Verified(_) | ScanState::Failed(_))
    }
}

/// One scan-to-verify interaction over the ledger.
pub struct ScanSession<L: Ledger> {
    ledger: Arc<L>,
    state: ScanState,
}

impl<L: Ledger + 'static> ScanSession<L> {
    /// Create an idle session over a ledger.
    pub fn new(ledger: Arc<L>) -> Self {
        Self {
            ledger,
            state: ScanState::Idle,
        }
    }

    /// The current state.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    fn invalid_transition(&self, op: &str) -> SelloError {
        SelloError::OperationFailed(format!("cannot {op} from state {:?}", self.state))
    }

    /// Begin scanning. Only valid from Idle.
    pub fn start(&mut self) -> Result<()> {
        if self.state != ScanState::Idle {
            return Err(self.invalid_transition("start"));
        }
        self.state = ScanState::Scanning;
        Ok(())
    }

    /// Feed a captured payload into the session.
    ///
    /// The payload is gated on digest shape before anything else happens; a
    /// non-digest payload fails the session without a ledger lookup.
    pub fn capture(&mut self, payload: &str) -> Result<&ScanState> {
        if self.state != ScanState::Scanning {
            return Err(self.invalid_transition("capture"));
        }
        self.state = if looks_like_digest(payload) {
            match ContentDigest::parse(payload) {
                Ok(digest) => ScanState::PayloadCaptured(digest),
                Err(_) => ScanState::Failed(ScanFailure::InvalidPayload),
            }
        } else {
            tracing::debug!(len = payload.len(), "captured payload is not a digest");
            ScanState::Failed(ScanFailure::InvalidPayload)
        };
        Ok(&self.state)
    }

    /// Look the captured digest up in the ledger.
    pub async fn lookup(&mut self) -> Result<&ScanState> {
        let digest = match &self.state {
            ScanState::PayloadCaptured(digest) => *digest,
            _ => return Err(self.invalid_transition("lookup")),
        };
        self.state = match self.ledger.find_by_digest(&digest).await? {
            Some(record) => ScanState::LookedUp(Box::new(record)),
            None => {
                tracing::debug!(%digest, "scanned digest has no ledger record");
                ScanState::Failed(ScanFailure::NotFound)
            }
        };
        Ok(&self.state)
    }

    /// Verify the looked-up record under its own embedded key.
    pub async fn verify(&mut self) -> Result<&ScanState> {
        let record = match &self.state {
            ScanState::LookedUp(record) => record.clone(),
            _ => return Err(self.invalid_transition("verify")),
        };

        let check = record.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            verify_canonical_with_pem(
                &check.public_key_pem,
                &check.signature_hex,
                &check.file_name,
                &check.digest,
            )
        })
        .await
        .map_err(|e| SelloError::OperationFailed(format!("verification task: {e}")))?;

        self.state = if outcome.is_valid() {
            ScanState::Verified(record)
        } else {
            ScanState::Failed(ScanFailure::SignatureInvalid)
        };
        Ok(&self.state)
    }

    /// Run lookup and verification in one step from PayloadCaptured.
    pub async fn resolve(&mut self) -> Result<&ScanState> {
        self.lookup().await?;
        if matches!(self.state, ScanState::LookedUp(_)) {
            self.verify().await?;
        }
        Ok(&self.state)
    }

    /// Abandon the session from any state. No side effects.
    pub fn cancel(&mut self) {
        self.state = ScanState::Idle;
    }

    /// Return to Idle from a terminal state, ready for a new scan.
    pub fn restart(&mut self) -> Result<()> {
        if !self.state.is_terminal() {
            return Err(self.invalid_transition("restart"));
        }
        self.state = ScanState::Idle;
        Ok(())
    }
}
