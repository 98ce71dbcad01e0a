//! Output sinks: where signed artifacts, key exports, and copied values go.
//!
//! The engine produces bytes and strings; sinks decide where they land. The
//! traits keep the flows testable and let a host application route output to
//! its own save dialogs or clipboard.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use sello_core::identity::Identity;
use sello_core::record::SignatureRecord;

use crate::engine::SignOutcome;
use crate::error::{Result, SelloError};

/// Persists named byte blobs, returning an opaque reference to the stored
/// copy.
pub trait FileSink: Send + Sync {
    fn save(&self, name: &str, bytes: &[u8]) -> std::io::Result<String>;
}

/// Receives text the user asked to copy.
pub trait ClipboardSink: Send + Sync {
    fn copy_text(&self, text: &str) -> std::io::Result<()>;
}

/// A [`FileSink`] that writes into a directory, returning the path written.
pub struct DirectoryFileSink {
    root: PathBuf,
}

impl DirectoryFileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileSink for DirectoryFileSink {
    fn save(&self, name: &str, bytes: &[u8]) -> std::io::Result<String> {
        // File names come from user input; strip any path components.
        let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let path = self.root.join(file_name);
        fs::write(&path, bytes)?;
        Ok(path.to_string_lossy().into_owned())
    }
}

/// A [`ClipboardSink`] that keeps the last copied text in memory.
#[derive(Default)]
pub struct MemoryClipboard {
    last: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently copied text.
    pub fn last(&self) -> Option<String> {
        self.last.lock().ok().and_then(|g| g.clone())
    }
}

impl ClipboardSink for MemoryClipboard {
    fn copy_text(&self, text: &str) -> std::io::Result<()> {
        match self.last.lock() {
            Ok(mut guard) => {
                *guard = Some(text.to_string());
                Ok(())
            }
            Err(_) => Err(std::io::Error::other("clipboard poisoned")),
        }
    }
}

/// Save the signed document from a sign outcome under its original name.
pub fn save_signed_document(sink: &dyn FileSink, outcome: &SignOutcome) -> Result<String> {
    sink.save(&outcome.record.file_name, &outcome.signed_document)
        .map_err(SelloError::from)
}

/// Save an identity's public key PEM as `public_key_<email>.pem`.
pub fn save_public_key_pem(sink: &dyn FileSink, identity: &Identity, pem: &str) -> Result<String> {
    let name = format!("public_key_{}.pem", identity.email);
    sink.save(&name, pem.as_bytes()).map_err(SelloError::from)
}

/// Copy a record's signature value to the clipboard.
pub fn copy_signature(sink: &dyn ClipboardSink, record: &SignatureRecord) -> Result<()> {
    sink.copy_text(&record.signature_hex).map_err(SelloError::from)
}

/// Copy a record's content digest to the clipboard.
pub fn copy_digest(sink: &dyn ClipboardSink, record: &SignatureRecord) -> Result<()> {
    sink.copy_text(&record.digest.to_hex()).map_err(SelloError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sello_core::digest::ContentDigest;
    use sello_core::identity::Role;
    use sello_core::record::RecordBuilder;
    use sello_core::SigningKeypair;

    fn sample_record() -> SignatureRecord {
        let keypair = SigningKeypair::generate_with_modulus(2048).unwrap();
        RecordBuilder::new(
            Identity::new("ana@example.org", "Ana Torres", Role::Signer),
            "acta.pdf",
            ContentDigest::of(b"sink test"),
        )
        .created_at(1)
        .sign(&keypair)
        .unwrap()
    }

    #[test]
    fn test_directory_sink_writes_and_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectoryFileSink::new(dir.path());
        let path = sink.save("out.bin", b"payload").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"payload");
    }

    #[test]
    fn test_directory_sink_strips_path_components() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectoryFileSink::new(dir.path());
        let path = sink.save("../escape/../../name.pdf", b"x").unwrap();
        assert!(path.ends_with("name.pdf"));
        assert!(PathBuf::from(&path).starts_with(dir.path()));
    }

    #[test]
    fn test_clipboard_copies_signature_and_digest() {
        let record = sample_record();
        let clip = MemoryClipboard::new();

        copy_signature(&clip, &record).unwrap();
        assert_eq!(clip.last().as_deref(), Some(record.signature_hex.as_str()));

        copy_digest(&clip, &record).unwrap();
        assert_eq!(clip.last(), Some(record.digest.to_hex()));
    }

    #[test]
    fn test_save_public_key_name() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectoryFileSink::new(dir.path());
        let identity = Identity::new("ana@example.org", "Ana Torres", Role::Signer);
        let path = save_public_key_pem(&sink, &identity, "---pem---").unwrap();
        assert!(path.ends_with("public_key_ana@example.org.pem"));
    }
}
