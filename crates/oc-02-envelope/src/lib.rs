//! # Envelope Subsystem (OC-02)
//!
//! Builds, signs, verifies and opens the COSE_Sign1 envelopes every Omni
//! server speaks.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): payload model, envelope codec, remote errors
//! - **Ports Layer** (`ports/`): `MethodCaller` (inbound) and `RawTransport` (outbound)
//! - **Service Layer** (`service.rs`): `MessageClient`, which drives a request
//!   through a caller-supplied byte transport
//!
//! ## Wire Format
//!
//! ```text
//! 18([ protected: bstr .cbor {1: -8, 4: kid, "keyset": bstr .cbor [CoseKey]},
//!      unprotected: {},
//!      payload: bstr .cbor 10001({...}) / 10002({...}),
//!      signature: bstr ])
//! ```
//!
//! The signature is Ed25519 over `["Signature1", protected, h'', payload]`.
//! Unsigned envelopes carry the anonymous key and an empty signature.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use config::ClientConfig;
pub use domain::envelope::{
    decode_envelope, decode_verified_envelope, encode_envelope, encode_envelope_for,
    encode_response_for, signing_input, verify_envelope, Envelope,
};
pub use domain::errors::{EnvelopeError, VerificationError};
pub use domain::payload::{field, MessageKind, Payload, RequestBuilder};
pub use domain::remote_error::RemoteError;
pub use ports::inbound::MethodCaller;
pub use ports::outbound::{MockTransport, RawTransport, TransportError};
pub use service::MessageClient;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
