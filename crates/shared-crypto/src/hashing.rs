//! # SHA3-224 Hashing
//!
//! Key identifiers on the network are `0x01 || SHA3-224(cose key)`, so this
//! is the only digest the client needs.

use sha3::{Digest, Sha3_224};

/// Length of a SHA3-224 digest in bytes.
pub const SHA3_224_LEN: usize = 28;

/// SHA3-224 hash output (224-bit).
pub type Sha3_224Hash = [u8; SHA3_224_LEN];

/// Hash data with SHA3-224 (one-shot).
pub fn sha3_224(data: &[u8]) -> Sha3_224Hash {
    let mut hasher = Sha3_224::new();
    hasher.update(data);
    hasher.finalize().into()
}
