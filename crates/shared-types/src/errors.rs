//! # Error Types
//!
//! Errors raised while decoding wire bytes or textual addresses.

use thiserror::Error;

/// Errors from the canonical CBOR codec.
///
/// Every decode failure is reported before any partial value escapes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended in the middle of an item.
    #[error("Truncated input: {0}")]
    Truncated(String),

    /// Structurally invalid bytes.
    #[error("Malformed CBOR: {0}")]
    Malformed(String),

    /// Indefinite-length strings, arrays and maps are not canonical.
    #[error("Indefinite-length item in canonical input")]
    IndefiniteLength,

    /// The same key appeared twice in one map.
    #[error("Duplicate map key: {0}")]
    DuplicateKey(String),

    /// Nesting exceeded the decoder limit.
    #[error("Nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    /// Bytes left over after the top-level item.
    #[error("{remaining} trailing bytes after CBOR item")]
    TrailingBytes {
        /// Number of unread bytes
        remaining: usize,
    },

    /// Integer outside `-2^64 ..= 2^64 - 1`.
    #[error("Integer {0} is outside the CBOR integer range")]
    IntegerOutOfRange(i128),

    /// Simple values and other items the value model does not carry.
    #[error("Unsupported CBOR item: {0}")]
    Unsupported(String),

    /// A structure had the wrong shape for its position.
    #[error("Expected {expected}, found {found}")]
    UnexpectedType {
        /// What the caller needed
        expected: &'static str,
        /// What was actually there
        found: &'static str,
    },

    /// A required structure field is absent.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// The encoder failed.
    #[error("Encoding failed: {0}")]
    Encode(String),
}

impl From<minicbor::decode::Error> for CodecError {
    fn from(err: minicbor::decode::Error) -> Self {
        if err.is_end_of_input() {
            CodecError::Truncated(err.to_string())
        } else {
            CodecError::Malformed(err.to_string())
        }
    }
}

impl From<minicbor::encode::Error<std::convert::Infallible>> for CodecError {
    fn from(err: minicbor::encode::Error<std::convert::Infallible>) -> Self {
        CodecError::Encode(err.to_string())
    }
}

/// Errors from parsing a textual address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Address does not start with the `m` leader.
    #[error("Invalid address leader in {0:?}")]
    InvalidLeader(String),

    /// Too short to hold a leader, an address and a checksum.
    #[error("Address too short: {0} characters")]
    TooShort(usize),

    /// The address body is not canonical base32.
    #[error("Invalid base32 in address: {0}")]
    InvalidEncoding(String),

    /// Checksum characters disagree with the decoded bytes.
    #[error("Invalid checksum: found {found}, expected {expected}")]
    ChecksumMismatch {
        /// Checksum characters carried by the address
        found: String,
        /// Checksum characters computed from the decoded bytes
        expected: String,
    },
}
