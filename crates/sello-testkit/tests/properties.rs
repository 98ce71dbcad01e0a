//! Property-based tests over digests, records, and the signing primitives.

use proptest::prelude::*;

use sello_core::{
    canonical_message, looks_like_digest, sign_canonical, verify_canonical_with_pem,
    ContentDigest, SignatureRecord, STATUS_SIGNED_VERIFIED,
};
use sello_testkit::generators;
use sello_testkit::shared_keypair;

proptest! {
    #[test]
    fn digest_is_deterministic_and_well_shaped(data in generators::document(512)) {
        let digest = ContentDigest::of(&data);
        prop_assert_eq!(ContentDigest::of(&data), digest);

        let hex = digest.to_hex();
        prop_assert_eq!(hex.len(), 64);
        prop_assert!(looks_like_digest(&hex));
        prop_assert_eq!(ContentDigest::parse(&hex).unwrap(), digest);
    }

    #[test]
    fn non_digest_payloads_never_pass_the_gate(payload in generators::non_digest_payload()) {
        prop_assert!(!looks_like_digest(&payload));
    }

    #[test]
    fn canonical_message_binds_name_and_digest(
        name in generators::file_name(),
        digest in generators::digest(),
    ) {
        let message = canonical_message(&name, &digest);
        prop_assert_eq!(message, format!("{}:{}", name, digest.to_hex()).into_bytes());
    }

    #[test]
    fn record_json_roundtrips(
        file_name in generators::file_name(),
        digest in generators::digest(),
        signed_by in generators::identity(),
        created_at in generators::timestamp(),
        size_bytes in 0u64..=10 * 1024 * 1024,
    ) {
        let record = SignatureRecord {
            file_name,
            created_at,
            expires_at: Some(created_at + 1000),
            status: STATUS_SIGNED_VERIFIED.to_string(),
            signature_hex: "00ff".repeat(256),
            size: SignatureRecord::size_display(size_bytes),
            size_bytes,
            signed_by,
            public_key_pem: "-----BEGIN PUBLIC KEY-----\n-----END PUBLIC KEY-----\n".into(),
            digest,
            artifact_ref: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: SignatureRecord = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, record);
    }
}

proptest! {
    // RSA-PSS over the 4096-bit fixture key is slow; keep the case count low.
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn sign_verify_roundtrip_for_any_name_and_digest(
        name in generators::file_name(),
        digest in generators::digest(),
    ) {
        let keypair = shared_keypair();
        let pem = keypair.export_public_pem().unwrap();
        let signature_hex = sign_canonical(keypair, &name, &digest).unwrap();

        prop_assert!(verify_canonical_with_pem(&pem, &signature_hex, &name, &digest).is_valid());

        // Any other digest breaks the binding.
        let other = ContentDigest::of(name.as_bytes());
        prop_assume!(other != digest);
        prop_assert!(!verify_canonical_with_pem(&pem, &signature_hex, &name, &other).is_valid());
    }
}
