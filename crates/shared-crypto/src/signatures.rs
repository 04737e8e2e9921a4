//! # Ed25519 Signatures
//!
//! Twisted Edwards curve signatures with deterministic nonces. This is the
//! only signature scheme the envelope layer speaks (COSE algorithm `-8`).
//!
//! ## Security Properties
//!
//! - No RNG dependency (deterministic nonce from message)
//! - Signing keys are zeroized on drop by `ed25519-dalek`
//! - Exported seeds are wrapped in `Zeroizing`

use crate::CryptoError;
use ed25519_dalek::pkcs8::DecodePrivateKey;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;
use zeroize::Zeroizing;

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; PUBLIC_KEY_LEN]);

impl Ed25519PublicKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Result<Self, CryptoError> {
        // Validate it's a valid point
        VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Create from a slice of unknown length, as found on the wire.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; PUBLIC_KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: PUBLIC_KEY_LEN,
                    actual: bytes.len(),
                })?;
        Self::from_bytes(array)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Verify a signature.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;

        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// Ed25519 signature (64 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519Signature([u8; SIGNATURE_LEN]);

impl Ed25519Signature {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, rejecting anything that is not exactly 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; SIGNATURE_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureFormat(bytes.len()))?;
        Ok(Self(array))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }
}

/// Ed25519 keypair.
#[derive(Clone)]
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        Self { signing_key }
    }

    /// Create from secret seed (32 bytes).
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        Self { signing_key }
    }

    /// Load a PKCS#8 `PRIVATE KEY` PEM document.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_pkcs8_pem(pem.trim())
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self { signing_key })
    }

    /// Get public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        let verifying_key = self.signing_key.verifying_key();
        Ed25519PublicKey(verifying_key.to_bytes())
    }

    /// Sign a message (deterministic - no RNG needed).
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        let sig = self.signing_key.sign(message);
        Ed25519Signature(sig.to_bytes())
    }

    /// Get secret seed (for serialization).
    pub fn to_seed(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }
}

impl fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
