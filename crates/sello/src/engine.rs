//! The signing engine: the end-to-end sign-document flow.
//!
//! One entry point, [`SigningEngine::sign_document`], runs the whole
//! pipeline: authorization, size cap, digest, canonical-message signature,
//! sign-time self check, proof marker embedding, and finally the ledger
//! append. The append is last so a failure anywhere earlier leaves no entry
//! behind.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sello_core::digest::ContentDigest;
use sello_core::identity::Identity;
use sello_core::record::{RecordBuilder, SignatureRecord, DEFAULT_VALIDITY_MS};
use sello_core::validation::validate_record;
use sello_proof::{MarkerPlacement, ProofCarrier};
use sello_store::{AppendOutcome, KeyVault, Ledger};

use crate::error::{Result, SelloError};
use crate::keystore::IdentityKeyStore;
use crate::scan::ScanSession;
use crate::verify::VerificationEngine;

/// Largest document accepted for signing: 10 MiB.
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Leading hex characters of a signature for log lines. Short values come
/// back whole.
fn signature_prefix(signature_hex: &str) -> &str {
    signature_hex.get(..16).unwrap_or(signature_hex)
}

/// Engine tunables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Size cap for documents accepted for signing, in bytes.
    pub max_document_bytes: u64,
    /// Advisory validity window stamped on new records, if any.
    pub record_validity_ms: Option<i64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: MAX_DOCUMENT_BYTES,
            record_validity_ms: Some(DEFAULT_VALIDITY_MS),
        }
    }
}

/// A request to sign one document.
#[derive(Debug, Clone)]
pub struct SignRequest {
    /// Who is signing. Must hold the sign capability.
    pub identity: Identity,
    /// Display name of the file; part of the signed canonical message.
    pub file_name: String,
    /// The document bytes as presented for signing.
    pub document: Vec<u8>,
    /// Where to place the proof marker.
    pub placement: MarkerPlacement,
    /// Optional reference to where the signed artifact will be stored.
    pub artifact_ref: Option<String>,
}

/// The result of a successful signing: the ledger record plus the document
/// with the proof marker embedded.
#[derive(Debug, Clone)]
pub struct SignOutcome {
    pub record: SignatureRecord,
    pub signed_document: Vec<u8>,
}

/// Orchestrates key management, signing, proof embedding, and the ledger.
///
/// Generic over a single store that provides both the ledger and the key
/// vault, as the bundled SQLite and in-memory stores do.
pub struct SigningEngine<S: Ledger + KeyVault + 'static> {
    store: Arc<S>,
    keystore: IdentityKeyStore<S>,
    carrier: ProofCarrier,
    config: EngineConfig,
}

impl<S: Ledger + KeyVault + 'static> SigningEngine<S> {
    /// Create an engine over a store and a proof carrier.
    pub fn new(store: S, carrier: ProofCarrier, config: EngineConfig) -> Self {
        let store = Arc::new(store);
        let keystore = IdentityKeyStore::new(Arc::clone(&store));
        Self {
            store,
            keystore,
            carrier,
            config,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The per-identity key store.
    pub fn keystore(&self) -> &IdentityKeyStore<S> {
        &self.keystore
    }

    /// The proof carrier.
    pub fn carrier(&self) -> &ProofCarrier {
        &self.carrier
    }

    /// A verification engine over the same ledger.
    pub fn verifier(&self) -> VerificationEngine<S> {
        VerificationEngine::new(Arc::clone(&self.store))
    }

    /// A fresh scan-to-verify session over the same ledger.
    pub fn scan_session(&self) -> ScanSession<S> {
        ScanSession::new(Arc::clone(&self.store))
    }

    /// Sign a document end to end.
    ///
    /// Fails with [`SelloError::NotAuthorized`] before touching anything if
    /// the identity cannot sign, and with [`SelloError::SizeLimit`] if the
    /// document is over the cap. The ledger append happens only after the
    /// signature, self check, and marker embedding have all succeeded.
    pub async fn sign_document(&self, request: SignRequest) -> Result<SignOutcome> {
        let SignRequest {
            identity,
            file_name,
            document,
            placement,
            artifact_ref,
        } = request;

        if !identity.role.can_sign() {
            return Err(SelloError::NotAuthorized(identity.role));
        }

        let size_bytes = document.len() as u64;
        if size_bytes > self.config.max_document_bytes {
            return Err(SelloError::SizeLimit {
                actual: size_bytes,
                limit: self.config.max_document_bytes,
            });
        }

        let keypair = self.keystore.get_or_create(&identity).await?;

        let created_at = now_millis();
        let validity_ms = self.config.record_validity_ms;

        // Digest, signature, self check, and marker compositing all run on
        // the blocking pool; the document rides along so it is hashed and
        // embedded into without a copy.
        let carrier = self.carrier.clone();
        let (record, signed_document) = tokio::task::spawn_blocking(
            move || -> Result<(SignatureRecord, Vec<u8>)> {
                let digest = ContentDigest::of(&document);
                let mut builder = RecordBuilder::new(identity, file_name, digest)
                    .size_bytes(size_bytes)
                    .created_at(created_at);
                if let Some(ms) = validity_ms {
                    builder = builder.valid_for_ms(ms);
                }
                if let Some(artifact_ref) = artifact_ref {
                    builder = builder.artifact_ref(artifact_ref);
                }
                let record = builder.sign(&keypair)?;

                // The record must verify under its own embedded key before
                // anything is persisted.
                validate_record(&record).map_err(|e| {
                    SelloError::OperationFailed(format!("sign-time self check: {e}"))
                })?;

                let marker = carrier.encode(&record.digest.to_hex())?;
                let signed_document =
                    carrier.embed_in_document(&document, &marker, &placement)?;
                Ok((record, signed_document))
            },
        )
        .await
        .map_err(|e| SelloError::OperationFailed(format!("signing task: {e}")))??;

        match self.store.append(&record).await? {
            AppendOutcome::Appended => {}
            AppendOutcome::Duplicate => {
                tracing::debug!(signature = %signature_prefix(&record.signature_hex), "record already present");
            }
        }

        tracing::info!(
            file = %record.file_name,
            signer = %record.signed_by.email,
            size = size_bytes,
            "document signed"
        );

        Ok(SignOutcome {
            record,
            signed_document,
        })
    }
}
