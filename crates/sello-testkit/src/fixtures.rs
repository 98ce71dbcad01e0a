//! Test fixtures and helpers.
//!
//! Common setup code for integration tests. The shared keypair uses the
//! production 4096-bit modulus and is generated once per process; tests that
//! need a signing engine seed it into the vault instead of paying keygen on
//! every test.

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use sello::{EngineConfig, SigningEngine};
use sello_core::{ContentDigest, Identity, RecordBuilder, Role, SignatureRecord, SigningKeypair};
use sello_proof::{CanvasPosition, CanvasViewport, MarkerPlacement};
use sello_store::{KeyVault, MemoryStore, StoredKeypair};

use crate::fakes::fake_carrier;

static KEYPAIR: OnceLock<SigningKeypair> = OnceLock::new();

/// A process-wide 4096-bit keypair, generated on first use.
pub fn shared_keypair() -> &'static SigningKeypair {
    KEYPAIR.get_or_init(|| SigningKeypair::generate().expect("fixture keygen"))
}

/// The shared keypair as a vault blob, for pre-seeding key stores.
pub fn shared_keypair_blob() -> StoredKeypair {
    let keypair = shared_keypair();
    StoredKeypair {
        public_key_pem: keypair.export_public_pem().expect("public pem"),
        private_key_pem: keypair.export_private_pem().expect("private pem"),
        created_at: now_millis(),
        expires_at: None,
    }
}

/// An identity with the sign capability.
pub fn signer_identity() -> Identity {
    Identity::new("ana@example.org", "Ana Torres", Role::Signer)
}

/// An identity with full capabilities.
pub fn admin_identity() -> Identity {
    Identity::new("root@example.org", "Root Admin", Role::Admin)
}

/// An identity that may only verify.
pub fn viewer_identity() -> Identity {
    Identity::new("guest@example.org", "Guest Viewer", Role::Viewer)
}

/// Deterministic pseudo-content of the given length.
pub fn sample_document(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add((i >> 8) as u8))
        .collect()
}

/// A marker placement near the lower-left of a letter-size canvas.
pub fn default_placement() -> MarkerPlacement {
    MarkerPlacement::on_first_page(
        CanvasPosition { x: 40.0, y: 600.0 },
        CanvasViewport {
            width: 612.0,
            height: 792.0,
        },
    )
}

/// A record signed with the shared keypair over the given content.
pub fn signed_record(file_name: &str, content: &[u8]) -> SignatureRecord {
    RecordBuilder::new(signer_identity(), file_name, ContentDigest::of(content))
        .size_bytes(content.len() as u64)
        .created_at(now_millis())
        .sign(shared_keypair())
        .expect("fixture record")
}

/// An in-memory engine wired to the fake proof collaborators.
pub struct TestFixture {
    pub engine: SigningEngine<MemoryStore>,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            engine: SigningEngine::new(MemoryStore::new(), fake_carrier(), EngineConfig::default()),
        }
    }

    /// Create a fixture with the shared keypair already in the vault for
    /// `identity`, so signing skips key generation.
    pub async fn with_seeded_keys(identity: &Identity) -> Self {
        let fixture = Self::new();
        fixture.seed_keys(identity).await;
        fixture
    }

    /// Put the shared keypair into the vault for `identity`.
    pub async fn seed_keys(&self, identity: &Identity) {
        self.engine
            .store()
            .save(&identity.email, &shared_keypair_blob())
            .await
            .expect("seed vault");
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Route tracing output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    use tracing_subscriber::filter::LevelFilter;
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Current time in milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use sello_core::validate_record;

    #[test]
    fn test_signed_record_is_self_consistent() {
        let record = signed_record("fixture.pdf", b"fixture content");
        validate_record(&record).unwrap();
    }

    #[test]
    fn test_sample_document_is_deterministic() {
        assert_eq!(sample_document(64), sample_document(64));
        assert_eq!(sample_document(10).len(), 10);
    }
}
