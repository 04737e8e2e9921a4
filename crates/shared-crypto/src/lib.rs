//! # Shared Crypto - Signing and Hashing Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA3-224 | Key identifier derivation |
//! | `signatures` | Ed25519 | Envelope signatures |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency when signing
//! - **Secret seeds**: handed out wrapped in `Zeroizing`, cleared on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{sha3_224, Sha3_224Hash, SHA3_224_LEN};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
