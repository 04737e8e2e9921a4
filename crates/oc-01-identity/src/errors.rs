//! # Identity Errors

use shared_crypto::CryptoError;
use shared_types::{CodecError, Identity};
use thiserror::Error;

/// Errors from identity derivation, key descriptors and signing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The identity kind cannot perform the requested operation.
    #[error("Unsupported capability: {kind} identity cannot {capability}")]
    Unsupported {
        /// Identity kind, e.g. `"generic"`
        kind: &'static str,
        /// Operation that was attempted
        capability: &'static str,
    },

    /// A key descriptor had the wrong shape or parameters.
    #[error("Invalid key descriptor: {0}")]
    InvalidKeyDescriptor(String),

    /// The descriptor's `kid` does not derive from its public key.
    #[error("Key id mismatch: descriptor names {declared}, key derives {derived}")]
    KeyIdMismatch {
        /// Key id carried by the descriptor
        declared: Identity,
        /// Key id derived from the embedded public key
        derived: Identity,
    },

    /// Canonical encoding or decoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Key material was rejected.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
