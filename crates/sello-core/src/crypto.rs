//! RSA-PSS keypairs and signature values.
//!
//! The scheme is fixed: 4096-bit modulus, SHA-512 digest, 128-byte salt.
//! Probabilistic padding means two signatures over the same message differ
//! bit-for-bit, while both verify under the same public key.

use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs8::{
    DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding,
};
use rsa::traits::PublicKeyParts;
use rsa::{Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha512};
use std::fmt;

use crate::error::CoreError;

/// Modulus size of generated keypairs, in bits.
pub const MODULUS_BITS: usize = 4096;

/// PSS salt length, in bytes.
pub const SALT_LEN: usize = 128;

/// Probe the environment for a secure random source.
///
/// Surfaced before signing is permitted: if the OS RNG is unavailable, every
/// key and signature operation must fail rather than degrade.
pub fn ensure_crypto_available() -> Result<(), CoreError> {
    let mut probe = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut probe)
        .map_err(|e| CoreError::EnvironmentUnsupported(e.to_string()))
}

/// An RSA-PSS signature value.
///
/// 512 bytes for a 4096-bit modulus; rendered as 1024 lowercase hex chars.
#[derive(Clone, PartialEq, Eq)]
pub struct PssSignature(Vec<u8>);

impl PssSignature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert to a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse from hex. Odd length or non-hex characters fail with
    /// [`CoreError::SignatureFormat`]; no length beyond that is assumed.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|e| CoreError::SignatureFormat(e.to_string()))?;
        if bytes.is_empty() {
            return Err(CoreError::SignatureFormat("empty signature".into()));
        }
        Ok(Self(bytes))
    }
}

impl fmt::Debug for PssSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PssSignature({}...)", &self.to_hex()[..16.min(self.0.len() * 2)])
    }
}

impl AsRef<[u8]> for PssSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The public half of a keypair, usable only for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierKey(RsaPublicKey);

impl VerifierKey {
    /// Parse from a PEM SPKI block (`-----BEGIN PUBLIC KEY-----`).
    pub fn from_pem(pem: &str) -> Result<Self, CoreError> {
        RsaPublicKey::from_public_key_pem(pem.trim())
            .map(Self)
            .map_err(|e| CoreError::KeyFormat(e.to_string()))
    }

    /// Parse from DER SPKI bytes.
    pub fn from_der(der: &[u8]) -> Result<Self, CoreError> {
        RsaPublicKey::from_public_key_der(der)
            .map(Self)
            .map_err(|e| CoreError::KeyFormat(e.to_string()))
    }

    /// Serialize to a PEM SPKI block.
    pub fn to_pem(&self) -> Result<String, CoreError> {
        self.0
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CoreError::KeyFormat(e.to_string()))
    }

    /// Verify a signature over a message.
    ///
    /// The message is prehashed with SHA-512; padding is PSS with the fixed
    /// salt length. Returns `false` on mismatch, never an error.
    pub fn verify(&self, message: &[u8], signature: &PssSignature) -> bool {
        let hashed = Sha512::digest(message);
        self.0
            .verify(Pss::new_with_salt::<Sha512>(SALT_LEN), &hashed, signature.as_bytes())
            .is_ok()
    }
}

/// An RSA keypair for signing.
///
/// The private half never leaves this type except through
/// [`SigningKeypair::export_private_pem`], which exists solely so the key
/// vault can persist it for its owning identity.
#[derive(Clone)]
pub struct SigningKeypair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl SigningKeypair {
    /// Generate a new keypair with the fixed 4096-bit modulus.
    ///
    /// This takes multiple seconds; callers issue it off the interactive
    /// path (`spawn_blocking`) and await the result.
    pub fn generate() -> Result<Self, CoreError> {
        Self::generate_with_modulus(MODULUS_BITS)
    }

    /// Generate with an explicit modulus size.
    ///
    /// Production callers use [`SigningKeypair::generate`]; smaller moduli
    /// exist for fast test fixtures.
    pub fn generate_with_modulus(bits: usize) -> Result<Self, CoreError> {
        ensure_crypto_available()?;
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CoreError::OperationFailed(format!("key generation: {e}")))?;
        let public = private.to_public_key();
        Ok(Self { private, public })
    }

    /// Rebuild a keypair from persisted PEM blocks.
    pub fn from_pems(public_pem: &str, private_pem: &str) -> Result<Self, CoreError> {
        let private = RsaPrivateKey::from_pkcs8_pem(private_pem.trim())
            .map_err(|e| CoreError::KeyFormat(e.to_string()))?;
        let public = RsaPublicKey::from_public_key_pem(public_pem.trim())
            .map_err(|e| CoreError::KeyFormat(e.to_string()))?;
        if private.to_public_key() != public {
            return Err(CoreError::KeyFormat(
                "public key does not match private key".into(),
            ));
        }
        Ok(Self { private, public })
    }

    /// The verification half of this keypair.
    pub fn verifier(&self) -> VerifierKey {
        VerifierKey(self.public.clone())
    }

    /// Export the public half as PEM SPKI.
    pub fn export_public_pem(&self) -> Result<String, CoreError> {
        self.verifier().to_pem()
    }

    /// Export the private half as PKCS#8 PEM, for vault persistence only.
    pub fn export_private_pem(&self) -> Result<String, CoreError> {
        self.private
            .to_pkcs8_pem(LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|e| CoreError::KeyFormat(e.to_string()))
    }

    /// Sign a message with PSS probabilistic padding.
    pub fn sign(&self, message: &[u8]) -> Result<PssSignature, CoreError> {
        ensure_crypto_available()?;
        let hashed = Sha512::digest(message);
        let mut rng = rand::thread_rng();
        let bytes = self
            .private
            .sign_with_rng(&mut rng, Pss::new_with_salt::<Sha512>(SALT_LEN), &hashed)
            .map_err(|e| CoreError::OperationFailed(format!("sign: {e}")))?;
        Ok(PssSignature(bytes))
    }
}

impl fmt::Debug for SigningKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKeypair({} bits)", self.private.size() * 8)
    }
}

#[cfg(test)]
pub(crate) mod testkey {
    use super::SigningKeypair;
    use std::sync::OnceLock;

    static KEY: OnceLock<SigningKeypair> = OnceLock::new();

    /// A shared 2048-bit keypair so the test suite pays keygen cost once.
    pub fn shared() -> &'static SigningKeypair {
        KEY.get_or_init(|| {
            SigningKeypair::generate_with_modulus(2048).expect("test keygen")
        })
    }
}
