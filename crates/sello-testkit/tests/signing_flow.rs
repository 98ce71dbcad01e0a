//! End-to-end signing and verification over the in-memory store.

use sello::{SelloError, SignRequest};
use sello_core::{ContentDigest, SigningKeypair, VerifyFailure, STATUS_SIGNED_VERIFIED};
use sello_store::Ledger;
use sello_testkit::fixtures::{
    init_tracing, now_millis, sample_document, signed_record, signer_identity, viewer_identity,
    TestFixture,
};
use sello_testkit::{default_placement, last_marker};

#[tokio::test]
async fn test_sign_document_end_to_end() {
    init_tracing();
    let identity = signer_identity();
    let fixture = TestFixture::with_seeded_keys(&identity).await;
    let document = sample_document(3 * 1024 * 1024);

    let outcome = fixture
        .engine
        .sign_document(SignRequest {
            identity: identity.clone(),
            file_name: "informe.pdf".into(),
            document: document.clone(),
            placement: default_placement(),
            artifact_ref: Some("artifact://informe.pdf".into()),
        })
        .await
        .unwrap();

    let record = &outcome.record;
    assert_eq!(record.signed_by, identity);
    assert_eq!(record.file_name, "informe.pdf");
    assert_eq!(record.status, STATUS_SIGNED_VERIFIED);
    assert_eq!(record.digest, ContentDigest::of(&document));
    assert_eq!(record.digest.to_hex().len(), 64);
    // 512-byte signature for the 4096-bit modulus.
    assert_eq!(record.signature_hex.len(), 1024);
    assert_eq!(record.size, "3072.00 KB");
    assert_eq!(record.size_bytes, document.len() as u64);
    assert_eq!(record.artifact_ref.as_deref(), Some("artifact://informe.pdf"));

    assert_eq!(fixture.engine.store().count().await.unwrap(), 1);

    // The embedded marker carries the digest and the original bytes survive.
    assert!(outcome.signed_document.starts_with(&document));
    let payload = fixture
        .engine
        .carrier()
        .decode_document(&outcome.signed_document)
        .unwrap();
    assert_eq!(payload, Some(record.digest.to_hex()));
}

#[tokio::test]
async fn test_marker_lands_at_converted_coordinates() {
    let identity = signer_identity();
    let fixture = TestFixture::with_seeded_keys(&identity).await;

    let outcome = fixture
        .engine
        .sign_document(SignRequest {
            identity,
            file_name: "acta.pdf".into(),
            document: sample_document(2048),
            placement: default_placement(),
            artifact_ref: None,
        })
        .await
        .unwrap();

    // Canvas matches the page size, so scale is 1:1. The y=600 drag point
    // flips into bottom-up space: y = 792 - (600 + 120) = 72.
    let marker = last_marker(&outcome.signed_document).unwrap();
    assert_eq!(marker.page_index, 0);
    assert_eq!(marker.x, 40.0);
    assert_eq!(marker.y, 72.0);
}

#[tokio::test]
async fn test_verify_record_with_imported_public_key() {
    let identity = signer_identity();
    let fixture = TestFixture::with_seeded_keys(&identity).await;

    let outcome = fixture
        .engine
        .sign_document(SignRequest {
            identity,
            file_name: "contrato.pdf".into(),
            document: sample_document(4096),
            placement: default_placement(),
            artifact_ref: None,
        })
        .await
        .unwrap();

    let key = fixture
        .engine
        .keystore()
        .import_public_key(&outcome.record.public_key_pem)
        .unwrap();
    let verifier = fixture.engine.verifier();

    let result = verifier.verify_record(&outcome.record, &key).await;
    assert!(result.is_valid());

    // A different key rejects the same record.
    let stranger = SigningKeypair::generate_with_modulus(2048).unwrap();
    let result = verifier.verify_record(&outcome.record, &stranger.verifier()).await;
    assert_eq!(result.failure(), Some(VerifyFailure::SignatureMismatch));
}

#[tokio::test]
async fn test_verify_by_digest_hits_ledger_record() {
    let fixture = TestFixture::new();
    let record = signed_record("nomina.pdf", b"payroll body");
    fixture.engine.store().append(&record).await.unwrap();

    let result = fixture
        .engine
        .verifier()
        .verify_by_digest(&record.digest.to_hex())
        .await
        .unwrap();
    assert!(result.outcome.is_valid());
    assert_eq!(result.record, record);
}

#[tokio::test]
async fn test_verify_by_digest_miss_is_not_found() {
    let fixture = TestFixture::new();
    let err = fixture
        .engine
        .verifier()
        .verify_by_digest(&ContentDigest::of(b"never signed").to_hex())
        .await
        .unwrap_err();
    assert!(matches!(err, SelloError::NotFound(_)));
}

#[tokio::test]
async fn test_tampered_ledger_row_verifies_invalid() {
    let fixture = TestFixture::new();
    let mut record = signed_record("acta.pdf", b"original body");

    // Flip one hex character of the stored digest; the signature was made
    // over the original.
    let mut hex = record.digest.to_hex();
    let flipped = if hex.starts_with('0') { "1" } else { "0" };
    hex.replace_range(0..1, flipped);
    record.digest = ContentDigest::parse(&hex).unwrap();
    fixture.engine.store().append(&record).await.unwrap();

    let result = fixture.engine.verifier().verify_by_digest(&hex).await.unwrap();
    assert!(!result.outcome.is_valid());
    assert_eq!(result.outcome.failure(), Some(VerifyFailure::SignatureMismatch));
}

#[tokio::test]
async fn test_viewer_cannot_sign() {
    let fixture = TestFixture::new();
    let viewer = viewer_identity();

    let err = fixture
        .engine
        .sign_document(SignRequest {
            identity: viewer.clone(),
            file_name: "intruso.pdf".into(),
            document: sample_document(64),
            placement: default_placement(),
            artifact_ref: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, SelloError::NotAuthorized(_)));
    // Rejected before any key material or ledger write exists.
    assert_eq!(fixture.engine.store().count().await.unwrap(), 0);
    use sello_store::KeyVault;
    assert!(fixture.engine.store().load(&viewer.email).await.unwrap().is_none());
}

#[tokio::test]
async fn test_oversized_document_rejected() {
    let fixture = TestFixture::new();
    let err = fixture
        .engine
        .sign_document(SignRequest {
            identity: signer_identity(),
            file_name: "grande.pdf".into(),
            document: vec![0u8; (sello::MAX_DOCUMENT_BYTES + 1) as usize],
            placement: default_placement(),
            artifact_ref: None,
        })
        .await
        .unwrap_err();

    match err {
        SelloError::SizeLimit { actual, limit } => {
            assert_eq!(actual, sello::MAX_DOCUMENT_BYTES + 1);
            assert_eq!(limit, sello::MAX_DOCUMENT_BYTES);
        }
        other => panic!("expected SizeLimit, got {other:?}"),
    }
    assert_eq!(fixture.engine.store().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_purge_clears_ledger_and_stats_track_signing() {
    let identity = signer_identity();
    let fixture = TestFixture::with_seeded_keys(&identity).await;

    for name in ["uno.pdf", "dos.pdf"] {
        fixture
            .engine
            .sign_document(SignRequest {
                identity: identity.clone(),
                file_name: name.into(),
                document: sample_document(512),
                placement: default_placement(),
                artifact_ref: None,
            })
            .await
            .unwrap();
    }

    let stats = fixture.engine.store().stats(now_millis()).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.last_30_days, 2);

    // Newest first.
    let listed = fixture.engine.store().list(None).await.unwrap();
    assert_eq!(listed[0].file_name, "dos.pdf");
    assert_eq!(listed[1].file_name, "uno.pdf");

    fixture.engine.store().purge_all().await.unwrap();
    assert!(fixture.engine.store().list(None).await.unwrap().is_empty());
}
