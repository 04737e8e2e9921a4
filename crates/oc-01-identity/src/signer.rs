//! # Identity Kinds
//!
//! Three kinds of principal can appear as the sender of a message:
//!
//! | Kind | Address | Signs | Key descriptor |
//! |------|---------|-------|----------------|
//! | [`AnonymousIdentity`] | `maa` | no | anonymous |
//! | [`KeyPairIdentity`] | derived from the key | yes | yes |
//! | [`Identifier`] | any | no | no |
//!
//! Operations a kind cannot perform return
//! [`IdentityError::Unsupported`]; [`Signer::can_sign`] lets callers check
//! first.

use crate::cose_key::{derive_identity, CoseKey};
use crate::errors::IdentityError;
use shared_crypto::{Ed25519KeyPair, Ed25519Signature};
use shared_types::Identity;
use tracing::debug;

/// A principal that may be able to sign messages.
pub trait Signer: Send + Sync {
    /// Short kind name used in errors and logs.
    fn kind(&self) -> &'static str;

    /// Network identity of this principal.
    fn address(&self) -> Identity;

    /// Key pair backing this principal, if any.
    fn key_pair(&self) -> Option<&Ed25519KeyPair> {
        None
    }

    /// Whether [`sign`](Self::sign) can succeed.
    fn can_sign(&self) -> bool {
        self.key_pair().is_some()
    }

    /// Sign `message` with the backing key pair.
    fn sign(&self, message: &[u8]) -> Result<Ed25519Signature, IdentityError> {
        self.key_pair()
            .map(|key_pair| key_pair.sign(message))
            .ok_or(IdentityError::Unsupported {
                kind: self.kind(),
                capability: "sign",
            })
    }

    /// Key descriptor announced in envelope headers.
    fn cose_key(&self) -> Result<CoseKey, IdentityError> {
        Err(IdentityError::Unsupported {
            kind: self.kind(),
            capability: "produce a key descriptor",
        })
    }
}

/// The anonymous principal. Sends unsigned messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnonymousIdentity;

impl Signer for AnonymousIdentity {
    fn kind(&self) -> &'static str {
        "anonymous"
    }

    fn address(&self) -> Identity {
        Identity::anonymous()
    }

    fn cose_key(&self) -> Result<CoseKey, IdentityError> {
        Ok(CoseKey::anonymous())
    }
}

/// A principal backed by an Ed25519 key pair.
#[derive(Debug, Clone)]
pub struct KeyPairIdentity {
    key_pair: Ed25519KeyPair,
    cose_key: CoseKey,
}

impl KeyPairIdentity {
    /// Wrap an existing key pair.
    pub fn new(key_pair: Ed25519KeyPair) -> Result<Self, IdentityError> {
        let cose_key = CoseKey::new(key_pair.public_key().as_bytes())?;
        debug!(address = %cose_key.key_id(), "Loaded Ed25519 identity");
        Ok(Self { key_pair, cose_key })
    }

    /// Build from a 32-byte secret seed.
    pub fn from_seed(seed: [u8; 32]) -> Result<Self, IdentityError> {
        Self::new(Ed25519KeyPair::from_seed(seed))
    }

    /// Load a PKCS#8 `PRIVATE KEY` PEM document.
    pub fn from_pem(pem: &str) -> Result<Self, IdentityError> {
        Self::new(Ed25519KeyPair::from_pkcs8_pem(pem)?)
    }

    /// Fresh random identity.
    pub fn generate() -> Result<Self, IdentityError> {
        Self::new(Ed25519KeyPair::generate())
    }

    /// Raw public key bytes.
    pub fn public_key(&self) -> &[u8] {
        self.cose_key.public_key()
    }
}

impl Signer for KeyPairIdentity {
    fn kind(&self) -> &'static str {
        "ed25519"
    }

    fn address(&self) -> Identity {
        self.cose_key.key_id().clone()
    }

    fn key_pair(&self) -> Option<&Ed25519KeyPair> {
        Some(&self.key_pair)
    }

    fn cose_key(&self) -> Result<CoseKey, IdentityError> {
        Ok(self.cose_key.clone())
    }
}

/// A bare identity with no key material, e.g. a parsed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    identity: Identity,
}

impl Identifier {
    /// Wrap an identity.
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// Identity of a public key, without the ability to sign for it.
    pub fn from_public_key(public_key: &[u8]) -> Result<Self, IdentityError> {
        Ok(Self::new(derive_identity(public_key)?))
    }
}

impl From<Identity> for Identifier {
    fn from(identity: Identity) -> Self {
        Self::new(identity)
    }
}

impl Signer for Identifier {
    fn kind(&self) -> &'static str {
        "generic"
    }

    fn address(&self) -> Identity {
        self.identity.clone()
    }
}
