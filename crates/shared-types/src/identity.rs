//! # Identity and Address
//!
//! An [`Identity`] is the binary key identifier every server on the network
//! uses to name a principal. Its only textual form is the address:
//!
//! ```text
//! m <base32(identity bytes)> <first 2 chars of base32(crc16(identity))>
//! ```
//!
//! lower-cased, RFC 4648 alphabet, no padding. The anonymous identity
//! (`0x00`) renders as the reserved literal `maa`.
//!
//! Deriving an identity from a public key lives in `oc-01-identity`; this
//! module only deals with the bytes once they exist.

use crate::errors::AddressError;
use crc::{Crc, CRC_16_ARC};
use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The anonymous sentinel.
pub const ANONYMOUS: [u8; 1] = [0x00];

/// Reserved textual form of the anonymous identity.
pub const ANONYMOUS_ADDRESS: &str = "maa";

/// First character of every address.
pub const ADDRESS_LEADER: char = 'm';

/// Number of checksum characters at the end of an address.
pub const CHECKSUM_CHARS: usize = 2;

/// Length of an identity derived from a public key (`0x01 || SHA3-224`).
pub const PUBLIC_KEY_IDENTITY_LEN: usize = 29;

/// High bit of byte 0 marks a subresource identity.
pub const SUBRESOURCE_FLAG: u8 = 0x80;

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_ARC);

/// Binary key identifier.
///
/// Immutable once built. Equality is byte equality.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(Vec<u8>);

impl Identity {
    /// The anonymous identity.
    pub fn anonymous() -> Self {
        Self(ANONYMOUS.to_vec())
    }

    /// Wrap raw identity bytes. An empty buffer is the anonymous identity.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Self::anonymous();
        }
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Whether this is the anonymous sentinel.
    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS
    }

    /// CRC-16/ARC over the identity bytes.
    pub fn checksum(&self) -> u16 {
        CRC16.checksum(&self.0)
    }

    /// Derive the identity of subresource `subresource` under this one.
    ///
    /// Keeps the first 29 bytes, overwrites byte 0 with the subresource flag
    /// and the top 7 bits of the number, and appends its low 3 bytes.
    pub fn with_subresource(&self, subresource: u32) -> Identity {
        let mut bytes: Vec<u8> = self
            .0
            .iter()
            .take(PUBLIC_KEY_IDENTITY_LEN)
            .copied()
            .collect();
        bytes[0] = SUBRESOURCE_FLAG | ((subresource >> 24) as u8 & 0x7f);
        bytes.extend_from_slice(&[
            (subresource >> 16) as u8,
            (subresource >> 8) as u8,
            subresource as u8,
        ]);
        Identity(bytes)
    }

    /// Subresource number encoded in this identity, if it is one.
    pub fn subresource_id(&self) -> Option<u32> {
        let bytes = &self.0;
        if bytes.len() < 4 || bytes[0] & SUBRESOURCE_FLAG == 0 {
            return None;
        }
        let tail = &bytes[bytes.len() - 3..];
        Some(
            (u32::from(bytes[0] & 0x7f) << 24)
                | (u32::from(tail[0]) << 16)
                | (u32::from(tail[1]) << 8)
                | u32::from(tail[2]),
        )
    }

    /// The two checksum characters for these bytes, lower-case.
    fn checksum_chars(&self) -> String {
        let encoded = BASE32_NOPAD.encode(&self.checksum().to_be_bytes());
        encoded[..CHECKSUM_CHARS].to_ascii_lowercase()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            return f.write_str(ANONYMOUS_ADDRESS);
        }
        let address = BASE32_NOPAD.encode(&self.0).to_ascii_lowercase();
        write!(f, "{ADDRESS_LEADER}{address}{}", self.checksum_chars())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({self})")
    }
}

/// Parses an address.
///
/// Base32 decoding is strict: when the identity length is not a multiple of
/// five bytes, the last body character carries unused bits that must be
/// zero. Corrupting only those bits fails with
/// [`AddressError::InvalidEncoding`] before the checksum is consulted; any
/// other corruption that decodes fails with [`AddressError::ChecksumMismatch`].
impl FromStr for Identity {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let address = s.to_ascii_lowercase();
        if address == ANONYMOUS_ADDRESS {
            return Ok(Identity::anonymous());
        }
        if !address.starts_with(ADDRESS_LEADER) {
            return Err(AddressError::InvalidLeader(s.to_string()));
        }
        if !address.is_ascii() {
            return Err(AddressError::InvalidEncoding(format!(
                "non-ASCII characters in {s:?}"
            )));
        }
        // leader + at least one encoded byte (2 chars) + checksum
        if address.len() < 1 + 2 + CHECKSUM_CHARS {
            return Err(AddressError::TooShort(address.len()));
        }

        let split = address.len() - CHECKSUM_CHARS;
        let body = address[1..split].to_ascii_uppercase();
        let found = &address[split..];

        let bytes = BASE32_NOPAD
            .decode(body.as_bytes())
            .map_err(|e| AddressError::InvalidEncoding(e.to_string()))?;
        let identity = Identity::from_bytes(bytes);

        let expected = identity.checksum_chars();
        if found != expected {
            return Err(AddressError::ChecksumMismatch {
                found: found.to_string(),
                expected,
            });
        }
        Ok(identity)
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let address = String::deserialize(deserializer)?;
        address.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Identity of the Ed25519 key with seed `6821fa...6686`.
    const ID1_HEX: &str = "019b69b67b72aa74f9ec05d650c00b11398b2c34b74ce8c73fbbcb5100";
    const ID1_ADDRESS: &str = "magnwtnt3okvhj6pmaxlfbqalce4ywlbuw5gorrz7xpfvcaauu";

    /// Identity of the Ed25519 key with seed `[0xAB; 32]`.
    const ID2_HEX: &str = "0110f603520cdb028139359b92afebed4c7dc23d1ae2622fcf8f1d91b0";
    const ID2_ADDRESS: &str = "maeipma2sbtnqfajzgwnzfl7l5vgh3qr5dlrgel6pr4ozdmaor";

    const BASE32_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz234567";

    fn id1() -> Identity {
        Identity::from_bytes(hex::decode(ID1_HEX).unwrap())
    }

    #[test]
    fn test_render_known_vectors() {
        assert_eq!(id1().to_string(), ID1_ADDRESS);
        assert_eq!(
            Identity::from_bytes(hex::decode(ID2_HEX).unwrap()).to_string(),
            ID2_ADDRESS
        );
        assert_eq!(id1().checksum(), 0xa53a);
    }

    #[test]
    fn test_parse_known_vectors() {
        assert_eq!(ID1_ADDRESS.parse::<Identity>().unwrap(), id1());
        assert_eq!(
            ID1_ADDRESS.to_uppercase().parse::<Identity>().unwrap(),
            id1()
        );
    }

    #[test]
    fn test_anonymous_literal() {
        let anonymous = Identity::anonymous();
        assert!(anonymous.is_anonymous());
        assert_eq!(anonymous.to_string(), ANONYMOUS_ADDRESS);
        assert_eq!(ANONYMOUS_ADDRESS.parse::<Identity>().unwrap(), anonymous);
        // Long form of the same bytes is accepted too.
        assert_eq!("maaaa".parse::<Identity>().unwrap(), anonymous);
        assert_eq!(Identity::from_bytes(Vec::new()), anonymous);
    }

    #[test]
    fn test_corrupted_character_fails() {
        for address in [ID1_ADDRESS, ID2_ADDRESS] {
            for pos in 1..address.len() {
                let mut chars: Vec<char> = address.chars().collect();
                let index = BASE32_ALPHABET.find(chars[pos]).unwrap();
                chars[pos] = BASE32_ALPHABET.as_bytes()[(index + 2) % 32] as char;
                let corrupted: String = chars.into_iter().collect();

                let last_body_char = address.len() - CHECKSUM_CHARS - 1;
                match corrupted.parse::<Identity>() {
                    Err(AddressError::ChecksumMismatch { .. }) => {}
                    Err(AddressError::InvalidEncoding(_)) if pos == last_body_char => {}
                    other => panic!("{corrupted} (corrupted at {pos}) gave {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_corrupted_checksum_reports_values() {
        let mut corrupted = ID1_ADDRESS.to_string();
        corrupted.replace_range(ID1_ADDRESS.len() - 2.., "ab");
        assert_eq!(
            corrupted.parse::<Identity>(),
            Err(AddressError::ChecksumMismatch {
                found: "ab".to_string(),
                expected: "uu".to_string(),
            })
        );
    }

    #[test]
    fn test_nonzero_trailing_bits_rejected() {
        // 29 bytes leave 3 unused bits in the last body character ('a' -> 'b' sets one).
        let split = ID1_ADDRESS.len() - CHECKSUM_CHARS;
        let mut corrupted = ID1_ADDRESS.to_string();
        assert_eq!(&corrupted[split - 1..split], "a");
        corrupted.replace_range(split - 1..split, "b");
        assert!(matches!(
            corrupted.parse::<Identity>(),
            Err(AddressError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(matches!(
            "xagnwtnt".parse::<Identity>(),
            Err(AddressError::InvalidLeader(_))
        ));
        assert!(matches!(
            "mab".parse::<Identity>(),
            Err(AddressError::TooShort(3))
        ));
        assert!(matches!(
            "m!!!!aa".parse::<Identity>(),
            Err(AddressError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_subresource() {
        let parent = id1();
        let sub = parent.with_subresource(1);

        assert_ne!(sub.to_string(), parent.to_string());
        assert_eq!(
            sub.to_string(),
            "mqcnwtnt3okvhj6pmaxlfbqalce4ywlbuw5gorrz7xpfvcaaaaaaq6h"
        );
        assert_eq!(sub.as_bytes().len(), 32);
        assert_eq!(sub.as_bytes()[0], 0x80);
        assert_eq!(sub.subresource_id(), Some(1));
        assert_eq!(parent.subresource_id(), None);
    }

    #[test]
    fn test_subresource_high_bits() {
        let sub = id1().with_subresource(0x7fab_cdef);
        assert_eq!(sub.as_bytes()[0], 0xff);
        assert_eq!(&sub.as_bytes()[29..], &[0xab, 0xcd, 0xef]);
        assert_eq!(sub.subresource_id(), Some(0x7fab_cdef));
    }

    #[test]
    fn test_subresource_of_subresource_truncates() {
        let twice = id1().with_subresource(5).with_subresource(9);
        assert_eq!(twice.as_bytes().len(), 32);
        assert_eq!(twice.subresource_id(), Some(9));
    }

    #[test]
    fn test_serde_uses_address() {
        let json = serde_json::to_string(&id1()).unwrap();
        assert_eq!(json, format!("\"{ID1_ADDRESS}\""));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id1());
    }

    proptest! {
        #[test]
        fn prop_parse_inverts_render(bytes in proptest::collection::vec(any::<u8>(), 1..40)) {
            let identity = Identity::from_bytes(bytes);
            let parsed: Identity = identity.to_string().parse().unwrap();
            prop_assert_eq!(parsed, identity);
        }

        #[test]
        fn prop_subresource_reads_back(n in 0u32..0x8000_0000) {
            prop_assert_eq!(id1().with_subresource(n).subresource_id(), Some(n));
        }
    }
}
