//! # Shared Types Crate
//!
//! Wire-level building blocks used by every subsystem of the client.
//!
//! ## Design Principles
//!
//! - **Canonical bytes**: every structure that is hashed or signed goes through
//!   [`cbor::to_canonical_vec`], so two conformant encoders agree byte for byte.
//! - **Identity as a value**: [`Identity`] is an immutable byte string with a
//!   single textual form; the anonymous sentinel is a constant, never state.

pub mod cbor;
pub mod errors;
pub mod identity;

pub use cbor::{from_slice, to_canonical_vec, CborMap, CborValue, IDENTITY_TAG};
pub use errors::*;
pub use identity::{Identity, ANONYMOUS, ANONYMOUS_ADDRESS};
