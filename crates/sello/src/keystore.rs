//! Per-identity keypair management on top of the key vault.
//!
//! Each identity owns at most one keypair, keyed by email. The first signing
//! operation generates it lazily; later operations load and reuse the
//! persisted blob. An unusable blob (truncated PEM, mismatched halves) is
//! logged and silently replaced by a fresh keypair rather than bubbling up.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sello_core::crypto::{ensure_crypto_available, SigningKeypair, VerifierKey};
use sello_core::identity::Identity;
use sello_store::{KeyVault, StoredKeypair};

use crate::error::{Result, SelloError};

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Loads, lazily generates, and resets signing keypairs for identities.
pub struct IdentityKeyStore<V: KeyVault> {
    vault: Arc<V>,
    /// Advisory expiry stamped on newly generated blobs, if any.
    key_validity_ms: Option<i64>,
}

impl<V: KeyVault + 'static> IdentityKeyStore<V> {
    /// Create a key store over a vault. Generated blobs carry no expiry.
    pub fn new(vault: Arc<V>) -> Self {
        Self {
            vault,
            key_validity_ms: None,
        }
    }

    /// Stamp newly generated blobs with an advisory expiry offset.
    pub fn with_key_validity_ms(mut self, validity_ms: i64) -> Self {
        self.key_validity_ms = Some(validity_ms);
        self
    }

    /// Load the identity's keypair, generating and persisting one if the
    /// vault has none.
    ///
    /// Generation runs on the blocking pool; a 4096-bit modulus takes
    /// seconds.
    pub async fn get_or_create(&self, identity: &Identity) -> Result<SigningKeypair> {
        ensure_crypto_available()?;

        if let Some(blob) = self.vault.load(&identity.email).await? {
            match SigningKeypair::from_pems(&blob.public_key_pem, &blob.private_key_pem) {
                Ok(keypair) => return Ok(keypair),
                Err(e) => {
                    tracing::warn!(
                        email = %identity.email,
                        error = %e,
                        "stored keypair unusable, generating a replacement"
                    );
                }
            }
        }

        let keypair = tokio::task::spawn_blocking(SigningKeypair::generate)
            .await
            .map_err(|e| SelloError::OperationFailed(format!("keygen task: {e}")))??;

        let created_at = now_millis();
        let blob = StoredKeypair {
            public_key_pem: keypair.export_public_pem()?,
            private_key_pem: keypair.export_private_pem()?,
            created_at,
            expires_at: self.key_validity_ms.map(|ms| created_at + ms),
        };
        self.vault.save(&identity.email, &blob).await?;
        tracing::info!(email = %identity.email, "generated signing keypair");

        Ok(keypair)
    }

    /// The identity's public key as PEM SPKI, generating the keypair first
    /// if needed.
    pub async fn export_public_pem(&self, identity: &Identity) -> Result<String> {
        if let Some(blob) = self.vault.load(&identity.email).await? {
            if VerifierKey::from_pem(&blob.public_key_pem).is_ok() {
                return Ok(blob.public_key_pem);
            }
        }
        Ok(self.get_or_create(identity).await?.export_public_pem()?)
    }

    /// Parse an externally supplied PEM public key for verification.
    ///
    /// Fails with [`SelloError::KeyFormat`] on anything but a well-formed
    /// SPKI block.
    pub fn import_public_key(&self, pem: &str) -> Result<VerifierKey> {
        Ok(VerifierKey::from_pem(pem)?)
    }

    /// Delete the identity's keypair. Returns `true` if one existed; the
    /// next signing operation will generate a fresh pair.
    pub async fn reset(&self, identity: &Identity) -> Result<bool> {
        let removed = self.vault.reset(&identity.email).await?;
        if removed {
            tracing::info!(email = %identity.email, "reset signing keypair");
        }
        Ok(removed)
    }
}
