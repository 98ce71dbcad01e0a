//! The canonical verification message.
//!
//! Exactly one byte sequence is ever signed and later re-derived during
//! verification: the UTF-8 encoding of `"{file_name}:{digest_hex}"`. Every
//! sign and verify path uses this construction; there is no second form.

use crate::digest::ContentDigest;

/// Build the canonical message for a file name and content digest.
pub fn canonical_message(file_name: &str, digest: &ContentDigest) -> Vec<u8> {
    let mut buf = Vec::with_capacity(file_name.len() + 1 + 64);
    buf.extend_from_slice(file_name.as_bytes());
    buf.push(b':');
    buf.extend_from_slice(digest.to_hex().as_bytes());
    buf
}
