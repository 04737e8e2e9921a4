//! # Envelope Errors

use crate::domain::remote_error::RemoteError;
use crate::ports::outbound::TransportError;
use oc_01_identity::IdentityError;
use shared_types::{CodecError, Identity};
use thiserror::Error;

/// Errors from building, opening or sending a message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EnvelopeError {
    /// The bytes are not valid canonical CBOR.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Valid CBOR, but not shaped like an envelope or payload.
    #[error("Malformed envelope: {0}")]
    Malformed(String),

    /// The server answered with an error.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Signature or header check failed.
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// The sender cannot be used for this envelope.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The byte channel failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Reasons an envelope fails verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    /// Protected header names an algorithm other than EdDSA.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(i128),

    /// A required protected header entry is absent or mistyped.
    #[error("Missing protected header: {0}")]
    MissingHeader(&'static str),

    /// The embedded key descriptor is invalid.
    #[error("Invalid key descriptor: {0}")]
    InvalidKey(String),

    /// Header `kid` and key descriptor disagree.
    #[error("Key id mismatch: header names {header}, keyset names {keyset}")]
    KeyIdMismatch {
        /// `kid` from the protected header
        header: Identity,
        /// Key id derived from the keyset
        keyset: Identity,
    },

    /// A keyed envelope without a signature.
    #[error("Missing signature for {0}")]
    MissingSignature(Identity),

    /// An anonymous envelope carrying a signature.
    #[error("Anonymous envelope carries a signature")]
    UnexpectedSignature,

    /// The Ed25519 check failed.
    #[error("Bad signature for {0}")]
    BadSignature(Identity),

    /// A response expected to be signed arrived anonymous.
    #[error("Response is not signed")]
    UnsignedResponse,

    /// A response signed by someone other than the destination.
    #[error("Response signed by {found}, expected {expected}")]
    UnexpectedSender {
        /// Configured destination
        expected: Identity,
        /// Verified signer
        found: Identity,
    },
}
