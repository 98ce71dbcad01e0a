//! Record validation: the sign-time self-consistency check.
//!
//! A record may only enter the ledger if its signature validates against its
//! own embedded public key and digest. The same check applies when judging a
//! record presented from outside.

use crate::canonical::canonical_message;
use crate::crypto::{PssSignature, VerifierKey};
use crate::error::RecordValidationError;
use crate::record::SignatureRecord;

/// Validate a record's self-consistency.
///
/// This performs:
/// - structural checks (non-empty file name, parseable signature hex)
/// - public key PEM parse
/// - signature verification against the canonical message rebuilt from the
///   record's own `file_name` and digest
pub fn validate_record(record: &SignatureRecord) -> Result<(), RecordValidationError> {
    if record.file_name.is_empty() {
        return Err(RecordValidationError::EmptyFileName);
    }

    let signature = PssSignature::from_hex(&record.signature_hex)
        .map_err(|e| RecordValidationError::MalformedSignature(e.to_string()))?;

    let key = VerifierKey::from_pem(&record.public_key_pem)
        .map_err(|e| RecordValidationError::MalformedKey(e.to_string()))?;

    let message = canonical_message(&record.file_name, &record.digest);
    if !key.verify(&message, &signature) {
        return Err(RecordValidationError::SignatureInvalid);
    }

    Ok(())
}
