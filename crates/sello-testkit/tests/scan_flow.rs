//! The scan-to-verify state machine against a live ledger.

use sello::{ScanFailure, ScanState, SelloError};
use sello_core::ContentDigest;
use sello_store::Ledger;
use sello_testkit::fixtures::{sample_document, signed_record, TestFixture};

#[tokio::test]
async fn test_scan_happy_path() {
    let fixture = TestFixture::new();
    let record = signed_record("acta.pdf", &sample_document(1024));
    fixture.engine.store().append(&record).await.unwrap();

    let mut session = fixture.engine.scan_session();
    assert_eq!(*session.state(), ScanState::Idle);

    session.start().unwrap();
    assert_eq!(*session.state(), ScanState::Scanning);

    session.capture(&record.digest.to_hex()).unwrap();
    assert_eq!(*session.state(), ScanState::PayloadCaptured(record.digest));

    session.lookup().await.unwrap();
    assert!(matches!(session.state(), ScanState::LookedUp(found) if **found == record));

    session.verify().await.unwrap();
    assert!(matches!(session.state(), ScanState::Verified(found) if **found == record));
    assert!(session.state().is_terminal());

    session.restart().unwrap();
    assert_eq!(*session.state(), ScanState::Idle);
}

#[tokio::test]
async fn test_non_digest_payload_fails_without_lookup() {
    let fixture = TestFixture::new();
    let mut session = fixture.engine.scan_session();
    session.start().unwrap();

    // An unrelated QR payload never reaches the ledger; capture is
    // synchronous and gates on digest shape alone.
    session.capture("https://example.com/menu").unwrap();
    assert_eq!(*session.state(), ScanState::Failed(ScanFailure::InvalidPayload));

    session.restart().unwrap();
    session.start().unwrap();

    // Right length, wrong alphabet.
    session.capture(&"z".repeat(64)).unwrap();
    assert_eq!(*session.state(), ScanState::Failed(ScanFailure::InvalidPayload));
}

#[tokio::test]
async fn test_unknown_digest_fails_as_not_found() {
    let fixture = TestFixture::new();
    let mut session = fixture.engine.scan_session();
    session.start().unwrap();
    session
        .capture(&ContentDigest::of(b"unsigned content").to_hex())
        .unwrap();

    session.lookup().await.unwrap();
    assert_eq!(*session.state(), ScanState::Failed(ScanFailure::NotFound));
}

#[tokio::test]
async fn test_tampered_signature_fails_verification_stage() {
    let fixture = TestFixture::new();
    let mut record = signed_record("acta.pdf", b"body");
    // Valid hex, wrong value.
    record.signature_hex = {
        let mut hex = record.signature_hex.clone();
        let flipped = if hex.starts_with('0') { "1" } else { "0" };
        hex.replace_range(0..1, flipped);
        hex
    };
    fixture.engine.store().append(&record).await.unwrap();

    let mut session = fixture.engine.scan_session();
    session.start().unwrap();
    session.capture(&record.digest.to_hex()).unwrap();

    session.resolve().await.unwrap();
    assert_eq!(
        *session.state(),
        ScanState::Failed(ScanFailure::SignatureInvalid)
    );
}

#[tokio::test]
async fn test_resolve_runs_lookup_and_verify() {
    let fixture = TestFixture::new();
    let record = signed_record("uno.pdf", b"uno");
    fixture.engine.store().append(&record).await.unwrap();

    let mut session = fixture.engine.scan_session();
    session.start().unwrap();
    session.capture(&record.digest.to_hex()).unwrap();
    session.resolve().await.unwrap();
    assert!(matches!(session.state(), ScanState::Verified(_)));
}

#[tokio::test]
async fn test_cancel_returns_to_idle_from_any_state() {
    let fixture = TestFixture::new();
    let mut session = fixture.engine.scan_session();

    session.start().unwrap();
    session.cancel();
    assert_eq!(*session.state(), ScanState::Idle);

    session.start().unwrap();
    session.capture(&ContentDigest::of(b"x").to_hex()).unwrap();
    session.cancel();
    assert_eq!(*session.state(), ScanState::Idle);

    // Cancel has no side effects; the ledger is untouched.
    assert_eq!(fixture.engine.store().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_out_of_order_transitions_rejected() {
    let fixture = TestFixture::new();
    let mut session = fixture.engine.scan_session();

    // Capture before start.
    let err = session.capture("anything").unwrap_err();
    assert!(matches!(err, SelloError::OperationFailed(_)));

    // Lookup before capture.
    session.start().unwrap();
    assert!(session.lookup().await.is_err());

    // Restart only applies to terminal states.
    assert!(session.restart().is_err());

    // Double start.
    assert!(session.start().is_err());
}
