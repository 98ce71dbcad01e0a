//! Proptest generators for property-based testing.

use proptest::prelude::*;

use sello_core::{ContentDigest, Identity, Role};

/// Generate a random content digest.
pub fn digest() -> impl Strategy<Value = ContentDigest> {
    any::<[u8; 32]>().prop_map(ContentDigest::from_bytes)
}

/// Generate a plausible file name.
pub fn file_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,23}\\.(pdf|png|txt)".prop_map(String::from)
}

/// Generate document bytes of at most `max_len`.
pub fn document(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a role.
pub fn role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Signer), Just(Role::Admin), Just(Role::Viewer)]
}

/// Generate an identity.
pub fn identity() -> impl Strategy<Value = Identity> {
    ("[a-z]{1,10}", "[A-Z][a-z]{1,10}", role())
        .prop_map(|(user, name, role)| Identity::new(format!("{user}@example.org"), name, role))
}

/// Generate a sign timestamp in a plausible range.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=i64::MAX / 4
}

/// Generate a payload that is not a well-formed digest.
pub fn non_digest_payload() -> impl Strategy<Value = String> {
    prop_oneof![
        // Wrong length.
        "[0-9a-f]{1,63}",
        "[0-9a-f]{65,80}",
        // Right length, wrong alphabet.
        "[g-z]{64}",
        // Arbitrary text, e.g. a URL from an unrelated code.
        "https?://[a-z]{3,12}\\.example/[a-z]{0,8}",
    ]
}
