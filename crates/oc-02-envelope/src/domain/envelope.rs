//! # Envelope Codec
//!
//! COSE_Sign1 framing of a [`Payload`].
//!
//! Encoding is deterministic: the same payload and key always produce the
//! same bytes, because every layer goes through the canonical encoder and
//! Ed25519 nonces are derived from the message.
//!
//! Opening an envelope ([`decode_envelope`]) does not check the signature.
//! Callers that care who sent a message use [`verify_envelope`] or
//! [`decode_verified_envelope`].

use crate::domain::errors::{EnvelopeError, VerificationError};
use crate::domain::payload::{field, MessageKind, Payload};
use crate::domain::remote_error::RemoteError;
use oc_01_identity::cose_key::ALG_EDDSA;
use oc_01_identity::{CoseKey, Signer};
use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use shared_types::{from_slice, to_canonical_vec, CborMap, CborValue, Identity};
use tracing::debug;

/// CBOR tag of a COSE_Sign1 structure.
pub const COSE_SIGN1_TAG: u64 = 18;
/// Context string of the signing structure.
pub const SIGNATURE_CONTEXT: &str = "Signature1";
/// Protected header label: algorithm.
pub const HEADER_ALG: i64 = 1;
/// Protected header label: key id.
pub const HEADER_KID: i64 = 4;
/// Protected header label: embedded key descriptor.
pub const HEADER_KEYSET: &str = "keyset";

/// The four parts of a COSE_Sign1 envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Canonical encoding of the protected header map.
    pub protected: Vec<u8>,
    /// Unprotected header; always empty on messages we build.
    pub unprotected: CborMap,
    /// Encoded, tagged payload.
    pub payload: Vec<u8>,
    /// Ed25519 signature, or empty.
    pub signature: Vec<u8>,
}

impl Envelope {
    /// Parse the outer structure without looking inside the payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let parts = match from_slice(bytes)? {
            CborValue::Tagged(COSE_SIGN1_TAG, inner) => match *inner {
                CborValue::Array(parts) => parts,
                other => {
                    return Err(EnvelopeError::Malformed(format!(
                        "COSE_Sign1 body is {}",
                        other.kind()
                    )))
                }
            },
            other => {
                return Err(EnvelopeError::Malformed(format!(
                    "expected tag {COSE_SIGN1_TAG}, found {}",
                    other.kind()
                )))
            }
        };

        let [protected, unprotected, payload, signature]: [CborValue; 4] =
            parts.try_into().map_err(|parts: Vec<CborValue>| {
                EnvelopeError::Malformed(format!("COSE_Sign1 has {} elements", parts.len()))
            })?;

        Ok(Self {
            protected: into_bytes(protected, "protected header")?,
            unprotected: match unprotected {
                CborValue::Map(map) => map,
                other => {
                    return Err(EnvelopeError::Malformed(format!(
                        "unprotected header is {}",
                        other.kind()
                    )))
                }
            },
            payload: into_bytes(payload, "payload")?,
            signature: into_bytes(signature, "signature")?,
        })
    }

    /// Canonical envelope bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        let parts = vec![
            CborValue::Bytes(self.protected.clone()),
            CborValue::Map(self.unprotected.clone()),
            CborValue::Bytes(self.payload.clone()),
            CborValue::Bytes(self.signature.clone()),
        ];
        Ok(to_canonical_vec(&CborValue::tagged(COSE_SIGN1_TAG, parts))?)
    }

    /// Whether a signature is present.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    /// Decoded protected header map.
    pub fn protected_header(&self) -> Result<CborMap, EnvelopeError> {
        match from_slice(&self.protected)? {
            CborValue::Map(map) => Ok(map),
            other => Err(EnvelopeError::Malformed(format!(
                "protected header is {}",
                other.kind()
            ))),
        }
    }

    /// Payload kind from its tag; `None` for an untagged payload.
    pub fn kind(&self) -> Result<Option<MessageKind>, EnvelopeError> {
        Ok(split_payload_tag(from_slice(&self.payload)?)?.0)
    }

    /// Payload exactly as transmitted, body still encoded.
    pub fn raw_payload(&self) -> Result<Payload, EnvelopeError> {
        let (_, value) = split_payload_tag(from_slice(&self.payload)?)?;
        Ok(Payload::from_value(value)?)
    }

    /// Payload with the body resolved; a remote error body fails.
    pub fn open(&self) -> Result<Payload, EnvelopeError> {
        let mut payload = self.raw_payload()?;
        resolve_body(&mut payload)?;
        Ok(payload)
    }

    /// Check header consistency and the signature; returns the sender.
    pub fn verify(&self) -> Result<Identity, EnvelopeError> {
        let header = self.protected_header()?;

        let alg = header
            .get(HEADER_ALG)
            .and_then(CborValue::as_integer)
            .ok_or(VerificationError::MissingHeader("alg"))?;
        if alg != i128::from(ALG_EDDSA) {
            return Err(VerificationError::UnsupportedAlgorithm(alg).into());
        }

        let kid = header
            .get(HEADER_KID)
            .and_then(CborValue::as_bytes)
            .map(Identity::from_bytes)
            .ok_or(VerificationError::MissingHeader("kid"))?;

        let keyset = header
            .get(HEADER_KEYSET)
            .and_then(CborValue::as_bytes)
            .ok_or(VerificationError::MissingHeader("keyset"))?;
        let key = CoseKey::from_bytes(keyset)
            .map_err(|e| VerificationError::InvalidKey(e.to_string()))?;

        if key.key_id() != &kid {
            return Err(VerificationError::KeyIdMismatch {
                header: kid,
                keyset: key.key_id().clone(),
            }
            .into());
        }

        if kid.is_anonymous() {
            if self.is_signed() {
                return Err(VerificationError::UnexpectedSignature.into());
            }
            return Ok(kid);
        }
        if !self.is_signed() {
            return Err(VerificationError::MissingSignature(kid).into());
        }

        let public_key = Ed25519PublicKey::from_slice(key.public_key())
            .map_err(|e| VerificationError::InvalidKey(e.to_string()))?;
        let signature = Ed25519Signature::from_slice(&self.signature)
            .map_err(|_| VerificationError::BadSignature(kid.clone()))?;
        public_key
            .verify(&signing_input(&self.protected, &self.payload)?, &signature)
            .map_err(|_| VerificationError::BadSignature(kid.clone()))?;

        debug!(sender = %kid, "Verified envelope signature");
        Ok(kid)
    }
}

/// Canonical `["Signature1", protected, h'', payload]`.
pub fn signing_input(protected: &[u8], payload: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    let structure = CborValue::Array(vec![
        CborValue::from(SIGNATURE_CONTEXT),
        CborValue::from(protected),
        CborValue::Bytes(Vec::new()),
        CborValue::from(payload),
    ]);
    Ok(to_canonical_vec(&structure)?)
}

/// Encode a request, signed when a key pair is given.
pub fn encode_envelope(
    payload: &Payload,
    key_pair: Option<&Ed25519KeyPair>,
) -> Result<Vec<u8>, EnvelopeError> {
    let key = match key_pair {
        Some(key_pair) => CoseKey::new(key_pair.public_key().as_bytes())?,
        None => CoseKey::anonymous(),
    };
    seal(payload, MessageKind::Request, &key, |input| {
        Ok(key_pair.map(|key_pair| key_pair.sign(input)))
    })
}

/// Encode a request on behalf of `signer`.
///
/// Anonymous signers produce unsigned envelopes; signers without a key
/// descriptor fail with an unsupported capability.
pub fn encode_envelope_for(
    payload: &Payload,
    signer: &dyn Signer,
) -> Result<Vec<u8>, EnvelopeError> {
    encode_with_signer(payload, MessageKind::Request, signer)
}

/// Encode a response (payload tag 10002) on behalf of `signer`.
pub fn encode_response_for(
    payload: &Payload,
    signer: &dyn Signer,
) -> Result<Vec<u8>, EnvelopeError> {
    encode_with_signer(payload, MessageKind::Response, signer)
}

fn encode_with_signer(
    payload: &Payload,
    kind: MessageKind,
    signer: &dyn Signer,
) -> Result<Vec<u8>, EnvelopeError> {
    let key = signer.cose_key()?;
    seal(payload, kind, &key, |input| {
        if signer.can_sign() {
            Ok(Some(signer.sign(input)?))
        } else {
            Ok(None)
        }
    })
}

fn seal(
    payload: &Payload,
    kind: MessageKind,
    key: &CoseKey,
    sign: impl FnOnce(&[u8]) -> Result<Option<Ed25519Signature>, EnvelopeError>,
) -> Result<Vec<u8>, EnvelopeError> {
    let protected = to_canonical_vec(
        &CborMap::new()
            .with(HEADER_ALG, ALG_EDDSA)
            .with(HEADER_KID, key.key_id().as_bytes())
            .with(HEADER_KEYSET, key.to_bytes()?)
            .into(),
    )?;
    let encoded_payload = to_canonical_vec(&CborValue::tagged(kind.tag(), payload.to_value()))?;

    let signature = sign(&signing_input(&protected, &encoded_payload)?)?
        .map(|signature| signature.as_bytes().to_vec())
        .unwrap_or_default();

    debug!(
        sender = %key.key_id(),
        ?kind,
        signed = !signature.is_empty(),
        "Encoding envelope"
    );

    Envelope {
        protected,
        unprotected: CborMap::new(),
        payload: encoded_payload,
        signature,
    }
    .to_bytes()
}

/// Open an envelope without checking its signature.
pub fn decode_envelope(bytes: &[u8]) -> Result<Payload, EnvelopeError> {
    Envelope::from_bytes(bytes)?.open()
}

/// Check an envelope's signature and return the sender.
pub fn verify_envelope(bytes: &[u8]) -> Result<Identity, EnvelopeError> {
    Envelope::from_bytes(bytes)?.verify()
}

/// Verify, then open.
pub fn decode_verified_envelope(bytes: &[u8]) -> Result<(Identity, Payload), EnvelopeError> {
    let envelope = Envelope::from_bytes(bytes)?;
    let sender = envelope.verify()?;
    Ok((sender, envelope.open()?))
}

fn into_bytes(value: CborValue, part: &str) -> Result<Vec<u8>, EnvelopeError> {
    match value {
        CborValue::Bytes(bytes) => Ok(bytes),
        other => Err(EnvelopeError::Malformed(format!(
            "{part} is {}, expected bytes",
            other.kind()
        ))),
    }
}

fn split_payload_tag(value: CborValue) -> Result<(Option<MessageKind>, CborValue), EnvelopeError> {
    match value {
        CborValue::Tagged(tag, inner) => match MessageKind::from_tag(tag) {
            Some(kind) => Ok((Some(kind), *inner)),
            None => Err(EnvelopeError::Malformed(format!("unknown payload tag {tag}"))),
        },
        untagged => Ok((None, untagged)),
    }
}

/// Replace an encoded body with its decoded value, or fail with the remote
/// error it carries. Bodies that are not CBOR stay as raw bytes.
fn resolve_body(payload: &mut Payload) -> Result<(), EnvelopeError> {
    let decoded = match payload.data() {
        Some(CborValue::Map(error)) => return Err(RemoteError::from_map(error)?.into()),
        Some(CborValue::Bytes(body)) => match from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, len = body.len(), "Keeping non-CBOR body as raw bytes");
                return Ok(());
            }
        },
        _ => return Ok(()),
    };
    payload.insert(field::DATA, decoded);
    Ok(())
}
