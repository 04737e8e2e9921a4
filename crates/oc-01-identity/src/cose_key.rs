//! # Key Descriptor
//!
//! The canonical COSE-style description of an Ed25519 public key:
//!
//! ```text
//! [{1: 1 (OKP), 3: -8 (EdDSA), -1: 6 (Ed25519), 4: [2] (verify), 2: kid, -2: x}]
//! ```
//!
//! The key id is `0x01 || SHA3-224(canonical parameters without kid)`. Both
//! the derivation and the descriptor start from [`key_parameters`], so the
//! hashed bytes are always the published ones minus the `kid` entry.

use crate::errors::IdentityError;
use shared_crypto::sha3_224;
use shared_types::{from_slice, to_canonical_vec, CborMap, CborValue, Identity, ANONYMOUS};

/// COSE key type label.
pub const LABEL_KTY: i64 = 1;
/// COSE key id label.
pub const LABEL_KID: i64 = 2;
/// COSE algorithm label.
pub const LABEL_ALG: i64 = 3;
/// COSE key operations label.
pub const LABEL_KEY_OPS: i64 = 4;
/// OKP curve label.
pub const LABEL_CRV: i64 = -1;
/// OKP public key label.
pub const LABEL_X: i64 = -2;

/// Key type: octet key pair.
pub const KTY_OKP: i64 = 1;
/// Algorithm: EdDSA.
pub const ALG_EDDSA: i64 = -8;
/// Curve: Ed25519.
pub const CRV_ED25519: i64 = 6;
/// Key operation: verify.
pub const KEY_OP_VERIFY: i64 = 2;

/// Version byte prefixed to public-key identities.
pub const PUBLIC_KEY_IDENTITY_VERSION: u8 = 0x01;

/// Key parameters without the `kid` entry.
pub fn key_parameters(public_key: &[u8]) -> CborMap {
    CborMap::new()
        .with(LABEL_KTY, KTY_OKP)
        .with(LABEL_ALG, ALG_EDDSA)
        .with(LABEL_CRV, CRV_ED25519)
        .with(LABEL_KEY_OPS, vec![CborValue::from(KEY_OP_VERIFY)])
        .with(LABEL_X, public_key)
}

/// Derive the network identity of a public key.
///
/// The anonymous sentinel maps to the anonymous identity. Everything else
/// becomes `0x01 || SHA3-224(canonical key parameters)`.
pub fn derive_identity(public_key: &[u8]) -> Result<Identity, IdentityError> {
    if public_key == ANONYMOUS {
        return Ok(Identity::anonymous());
    }
    let encoded = to_canonical_vec(&key_parameters(public_key).into())?;
    let hash = sha3_224(&encoded);

    let mut bytes = Vec::with_capacity(1 + hash.len());
    bytes.push(PUBLIC_KEY_IDENTITY_VERSION);
    bytes.extend_from_slice(&hash);
    Ok(Identity::from_bytes(bytes))
}

/// Encode the key descriptor of `public_key`.
pub fn encode_key_descriptor(public_key: &[u8]) -> Result<Vec<u8>, IdentityError> {
    CoseKey::new(public_key)?.to_bytes()
}

/// A public key together with its derived key id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoseKey {
    public_key: Vec<u8>,
    key_id: Identity,
}

impl CoseKey {
    /// Describe `public_key`, deriving its key id.
    pub fn new(public_key: &[u8]) -> Result<Self, IdentityError> {
        Ok(Self {
            key_id: derive_identity(public_key)?,
            public_key: public_key.to_vec(),
        })
    }

    /// The descriptor of the anonymous sentinel.
    pub fn anonymous() -> Self {
        Self {
            public_key: ANONYMOUS.to_vec(),
            key_id: Identity::anonymous(),
        }
    }

    /// Raw public key bytes (`x`).
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Key id (`kid`), which is also the owner's network identity.
    pub fn key_id(&self) -> &Identity {
        &self.key_id
    }

    /// Whether this describes the anonymous sentinel.
    pub fn is_anonymous(&self) -> bool {
        self.key_id.is_anonymous()
    }

    /// The parameter map including `kid`.
    pub fn to_map(&self) -> CborMap {
        key_parameters(&self.public_key).with(LABEL_KID, self.key_id.as_bytes())
    }

    /// The descriptor as a CBOR item (a one-element key set).
    pub fn to_value(&self) -> CborValue {
        CborValue::Array(vec![self.to_map().into()])
    }

    /// Canonical descriptor bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IdentityError> {
        Ok(to_canonical_vec(&self.to_value())?)
    }

    /// Parse a descriptor, checking its parameters and that `kid` derives
    /// from `x`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdentityError> {
        Self::from_value(&from_slice(bytes)?)
    }

    /// Parse an already decoded descriptor.
    pub fn from_value(value: &CborValue) -> Result<Self, IdentityError> {
        let map = match value.as_array() {
            Some([entry]) => entry.as_map().ok_or_else(|| {
                IdentityError::InvalidKeyDescriptor(format!("key entry is {}", entry.kind()))
            })?,
            Some(keys) => {
                return Err(IdentityError::InvalidKeyDescriptor(format!(
                    "expected exactly one key, found {}",
                    keys.len()
                )))
            }
            None => {
                return Err(IdentityError::InvalidKeyDescriptor(format!(
                    "expected a key set, found {}",
                    value.kind()
                )))
            }
        };

        expect_integer(map, LABEL_KTY, KTY_OKP, "kty")?;
        expect_integer(map, LABEL_ALG, ALG_EDDSA, "alg")?;
        expect_integer(map, LABEL_CRV, CRV_ED25519, "crv")?;

        let public_key = required_bytes(map, LABEL_X, "x")?;
        let declared = Identity::from_bytes(required_bytes(map, LABEL_KID, "kid")?);
        let derived = derive_identity(public_key)?;
        if declared != derived {
            return Err(IdentityError::KeyIdMismatch { declared, derived });
        }

        Ok(Self {
            public_key: public_key.to_vec(),
            key_id: derived,
        })
    }
}

fn expect_integer(
    map: &CborMap,
    label: i64,
    expected: i64,
    name: &str,
) -> Result<(), IdentityError> {
    match map.get(label).and_then(CborValue::as_integer) {
        Some(found) if found == i128::from(expected) => Ok(()),
        Some(found) => Err(IdentityError::InvalidKeyDescriptor(format!(
            "{name} is {found}, expected {expected}"
        ))),
        None => Err(IdentityError::InvalidKeyDescriptor(format!(
            "{name} missing"
        ))),
    }
}

fn required_bytes<'a>(
    map: &'a CborMap,
    label: i64,
    name: &str,
) -> Result<&'a [u8], IdentityError> {
    map.get(label)
        .and_then(CborValue::as_bytes)
        .ok_or_else(|| IdentityError::InvalidKeyDescriptor(format!("{name} missing")))
}
