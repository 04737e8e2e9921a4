//! # Identity Subsystem (OC-01)
//!
//! Turns public keys into network identities.
//!
//! ## Components
//!
//! - **`cose_key`**: the canonical key descriptor and the key-id derivation
//!   `0x01 || SHA3-224(canonical key parameters)`. Both share one structure
//!   builder so the bytes that are hashed are the bytes that are published.
//! - **`signer`**: identity kinds. Only key-pair identities can sign; the
//!   others report an unsupported capability instead.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cose_key;
pub mod errors;
pub mod signer;

// Re-export public API
pub use cose_key::{derive_identity, encode_key_descriptor, CoseKey};
pub use errors::IdentityError;
pub use signer::{AnonymousIdentity, Identifier, KeyPairIdentity, Signer};
pub use shared_types::{Identity, ANONYMOUS};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
