//! # Canonical CBOR
//!
//! A small value model over CBOR plus an encoder that always produces the
//! canonical form of RFC 7049 §3.9:
//!
//! - integers and lengths use their shortest encoding,
//! - map keys are ordered by the length of their encoded form, then bytewise,
//! - only definite lengths are emitted.
//!
//! Signatures and key identifiers are computed over these bytes, so the
//! ordering of a [`CborMap`] never depends on insertion order.
//!
//! The decoder is strict: truncated input, indefinite lengths, duplicate keys,
//! excessive nesting and trailing bytes are all rejected.

use crate::errors::CodecError;
use crate::identity::Identity;
use minicbor::data::{Int, Tag, Type};
use minicbor::{Decoder, Encoder};
use std::collections::HashSet;
use std::fmt;

/// Tag wrapping an [`Identity`] inside payloads.
pub const IDENTITY_TAG: u64 = 10000;

/// Maximum container nesting accepted by the decoder.
pub const MAX_NESTING_DEPTH: usize = 64;

/// A decoded or to-be-encoded CBOR item.
#[derive(Debug, Clone, PartialEq)]
pub enum CborValue {
    /// Major types 0 and 1.
    Integer(i128),
    /// Byte string.
    Bytes(Vec<u8>),
    /// UTF-8 text string.
    Text(String),
    /// Array.
    Array(Vec<CborValue>),
    /// Map.
    Map(CborMap),
    /// Any tag other than [`IDENTITY_TAG`].
    Tagged(u64, Box<CborValue>),
    /// Tag 10000 over the identity bytes.
    Identity(Identity),
    /// `true` / `false`.
    Bool(bool),
    /// `null` (and `undefined` on decode).
    Null,
    /// Floating point number.
    Float(f64),
}

impl CborValue {
    /// Short name of the item kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CborValue::Integer(_) => "integer",
            CborValue::Bytes(_) => "bytes",
            CborValue::Text(_) => "text",
            CborValue::Array(_) => "array",
            CborValue::Map(_) => "map",
            CborValue::Tagged(_, _) => "tagged item",
            CborValue::Identity(_) => "identity",
            CborValue::Bool(_) => "bool",
            CborValue::Null => "null",
            CborValue::Float(_) => "float",
        }
    }

    /// Integer value, if this is an integer.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            CborValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Byte string contents, if this is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            CborValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Text contents, if this is a text string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CborValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Array items, if this is an array.
    pub fn as_array(&self) -> Option<&[CborValue]> {
        match self {
            CborValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Map, if this is a map.
    pub fn as_map(&self) -> Option<&CborMap> {
        match self {
            CborValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Identity, if this is a tag-10000 item.
    pub fn as_identity(&self) -> Option<&Identity> {
        match self {
            CborValue::Identity(identity) => Some(identity),
            _ => None,
        }
    }

    /// Strip one tag, returning `(tag, inner)`.
    pub fn as_tagged(&self) -> Option<(u64, &CborValue)> {
        match self {
            CborValue::Tagged(tag, inner) => Some((*tag, inner)),
            _ => None,
        }
    }

    /// Wrap a value in a tag.
    pub fn tagged(tag: u64, value: impl Into<CborValue>) -> Self {
        CborValue::Tagged(tag, Box::new(value.into()))
    }
}

/// Diagnostic notation (RFC 8949 §8), used in logs and error messages.
impl fmt::Display for CborValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CborValue::Integer(n) => write!(f, "{n}"),
            CborValue::Bytes(bytes) => write!(f, "h'{}'", hex::encode(bytes)),
            CborValue::Text(text) => write!(f, "{text:?}"),
            CborValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            CborValue::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            CborValue::Tagged(tag, inner) => write!(f, "{tag}({inner})"),
            CborValue::Identity(identity) => write!(f, "{IDENTITY_TAG}({identity})"),
            CborValue::Bool(b) => write!(f, "{b}"),
            CborValue::Null => f.write_str("null"),
            CborValue::Float(x) => write!(f, "{x:?}"),
        }
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CborValue {
                fn from(n: $ty) -> Self {
                    CborValue::Integer(i128::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(u8, u16, u32, u64, i8, i16, i32, i64);

impl From<&str> for CborValue {
    fn from(text: &str) -> Self {
        CborValue::Text(text.to_owned())
    }
}

impl From<String> for CborValue {
    fn from(text: String) -> Self {
        CborValue::Text(text)
    }
}

impl From<&[u8]> for CborValue {
    fn from(bytes: &[u8]) -> Self {
        CborValue::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for CborValue {
    fn from(bytes: Vec<u8>) -> Self {
        CborValue::Bytes(bytes)
    }
}

impl From<bool> for CborValue {
    fn from(b: bool) -> Self {
        CborValue::Bool(b)
    }
}

impl From<Vec<CborValue>> for CborValue {
    fn from(items: Vec<CborValue>) -> Self {
        CborValue::Array(items)
    }
}

impl From<CborMap> for CborValue {
    fn from(map: CborMap) -> Self {
        CborValue::Map(map)
    }
}

impl From<Identity> for CborValue {
    fn from(identity: Identity) -> Self {
        CborValue::Identity(identity)
    }
}

/// Key→value container with explicit, insertion-independent encoding order.
///
/// Lookups are linear; the maps on this wire have a handful of entries.
/// Equality ignores insertion order.
#[derive(Debug, Clone, Default)]
pub struct CborMap {
    entries: Vec<(CborValue, CborValue)>,
}

impl CborMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, returning the previous value for `key`.
    pub fn insert(
        &mut self,
        key: impl Into<CborValue>,
        value: impl Into<CborValue>,
    ) -> Option<CborValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<CborValue>, value: impl Into<CborValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a value.
    pub fn get(&self, key: impl Into<CborValue>) -> Option<&CborValue> {
        let key = key.into();
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: impl Into<CborValue>) -> bool {
        self.get(key).is_some()
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: impl Into<CborValue>) -> Option<CborValue> {
        let key = key.into();
        let index = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order (not encoding order).
    pub fn iter(&self) -> impl Iterator<Item = (&CborValue, &CborValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl PartialEq for CborMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k.clone()) == Some(v))
    }
}

impl<K: Into<CborValue>, V: Into<CborValue>> FromIterator<(K, V)> for CborMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = CborMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for CborMap {
    type Item = (CborValue, CborValue);
    type IntoIter = std::vec::IntoIter<(CborValue, CborValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encode a value in canonical form.
pub fn to_canonical_vec(value: &CborValue) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    write_value(&mut buf, value)?;
    Ok(buf)
}

fn write_value(buf: &mut Vec<u8>, value: &CborValue) -> Result<(), CodecError> {
    match value {
        CborValue::Integer(n) => {
            let int = Int::try_from(*n).map_err(|_| CodecError::IntegerOutOfRange(*n))?;
            Encoder::new(&mut *buf).int(int)?;
        }
        CborValue::Bytes(bytes) => {
            Encoder::new(&mut *buf).bytes(bytes)?;
        }
        CborValue::Text(text) => {
            Encoder::new(&mut *buf).str(text)?;
        }
        CborValue::Array(items) => {
            Encoder::new(&mut *buf).array(items.len() as u64)?;
            for item in items {
                write_value(buf, item)?;
            }
        }
        CborValue::Map(map) => write_map(buf, map)?,
        CborValue::Tagged(tag, inner) => {
            Encoder::new(&mut *buf).tag(Tag::new(*tag))?;
            write_value(buf, inner)?;
        }
        CborValue::Identity(identity) => {
            Encoder::new(&mut *buf)
                .tag(Tag::new(IDENTITY_TAG))?
                .bytes(identity.as_bytes())?;
        }
        CborValue::Bool(b) => {
            Encoder::new(&mut *buf).bool(*b)?;
        }
        CborValue::Null => {
            Encoder::new(&mut *buf).null()?;
        }
        CborValue::Float(x) => {
            // Shortest of f16/f32/f64 that round-trips.
            let narrow = *x as f32;
            if x.is_nan() || (f64::from(narrow) == *x && half_round_trips(narrow)?) {
                Encoder::new(&mut *buf).f16(narrow)?;
            } else if f64::from(narrow) == *x {
                Encoder::new(&mut *buf).f32(narrow)?;
            } else {
                Encoder::new(&mut *buf).f64(*x)?;
            }
        }
    }
    Ok(())
}

/// Whether `x` survives a trip through half precision unchanged.
fn half_round_trips(x: f32) -> Result<bool, CodecError> {
    let mut scratch = Vec::with_capacity(3);
    Encoder::new(&mut scratch).f16(x)?;
    let back = Decoder::new(&scratch).f16()?;
    Ok(back == x || (back.is_nan() && x.is_nan()))
}

fn write_map(buf: &mut Vec<u8>, map: &CborMap) -> Result<(), CodecError> {
    let mut encoded = Vec::with_capacity(map.len());
    for (key, value) in map.iter() {
        let mut key_bytes = Vec::new();
        write_value(&mut key_bytes, key)?;
        let mut value_bytes = Vec::new();
        write_value(&mut value_bytes, value)?;
        encoded.push((key_bytes, value_bytes));
    }
    encoded.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    Encoder::new(&mut *buf).map(encoded.len() as u64)?;
    for (key_bytes, value_bytes) in encoded {
        buf.extend_from_slice(&key_bytes);
        buf.extend_from_slice(&value_bytes);
    }
    Ok(())
}

// =============================================================================
// DECODING
// =============================================================================

/// Decode exactly one item spanning the whole input.
pub fn from_slice(bytes: &[u8]) -> Result<CborValue, CodecError> {
    let mut dec = Decoder::new(bytes);
    let value = read_value(&mut dec, 0)?;
    let remaining = bytes.len() - dec.position();
    if remaining > 0 {
        return Err(CodecError::TrailingBytes { remaining });
    }
    Ok(value)
}

fn read_value(dec: &mut Decoder<'_>, depth: usize) -> Result<CborValue, CodecError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CodecError::NestingTooDeep(MAX_NESTING_DEPTH));
    }

    let value = match dec.datatype()? {
        Type::Bool => CborValue::Bool(dec.bool()?),
        Type::Null => {
            dec.null()?;
            CborValue::Null
        }
        Type::Undefined => {
            dec.undefined()?;
            CborValue::Null
        }
        Type::U8
        | Type::U16
        | Type::U32
        | Type::U64
        | Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Int => CborValue::Integer(i128::from(dec.int()?)),
        Type::F16 => CborValue::Float(f64::from(dec.f16()?)),
        Type::F32 => CborValue::Float(f64::from(dec.f32()?)),
        Type::F64 => CborValue::Float(dec.f64()?),
        Type::Bytes => CborValue::Bytes(dec.bytes()?.to_vec()),
        Type::String => CborValue::Text(dec.str()?.to_owned()),
        Type::Array => {
            let declared = dec.array()?;
            let len = definite_len(dec, declared)?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(read_value(dec, depth + 1)?);
            }
            CborValue::Array(items)
        }
        Type::Map => {
            let declared = dec.map()?;
            let len = definite_len(dec, declared)?;
            let input = dec.input();
            let mut seen = HashSet::with_capacity(len);
            let mut map = CborMap::new();
            for _ in 0..len {
                let start = dec.position();
                let key = read_value(dec, depth + 1)?;
                if !seen.insert(&input[start..dec.position()]) {
                    return Err(CodecError::DuplicateKey(key.to_string()));
                }
                let value = read_value(dec, depth + 1)?;
                map.entries.push((key, value));
            }
            CborValue::Map(map)
        }
        Type::Tag => {
            let tag = dec.tag()?.as_u64();
            match (tag, read_value(dec, depth + 1)?) {
                (IDENTITY_TAG, CborValue::Bytes(bytes)) => {
                    CborValue::Identity(Identity::from_bytes(bytes))
                }
                (IDENTITY_TAG, other) => {
                    return Err(CodecError::UnexpectedType {
                        expected: "identity bytes",
                        found: other.kind(),
                    })
                }
                (tag, inner) => CborValue::Tagged(tag, Box::new(inner)),
            }
        }
        Type::BytesIndef | Type::StringIndef | Type::ArrayIndef | Type::MapIndef => {
            return Err(CodecError::IndefiniteLength)
        }
        other => return Err(CodecError::Unsupported(format!("{other:?}"))),
    };
    Ok(value)
}

/// Every element takes at least one byte, so a declared length larger than
/// the remaining input is a lie and is rejected before allocating.
fn definite_len(dec: &Decoder<'_>, len: Option<u64>) -> Result<usize, CodecError> {
    let len = len.ok_or(CodecError::IndefiniteLength)?;
    let remaining = (dec.input().len() - dec.position()) as u64;
    if len > remaining {
        return Err(CodecError::Truncated(format!(
            "container declares {len} items but only {remaining} bytes remain"
        )));
    }
    Ok(len as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode(value: impl Into<CborValue>) -> Vec<u8> {
        to_canonical_vec(&value.into()).unwrap()
    }

    #[test]
    fn test_shortest_integers() {
        assert_eq!(encode(0u8), vec![0x00]);
        assert_eq!(encode(23u8), vec![0x17]);
        assert_eq!(encode(24u8), vec![0x18, 0x18]);
        assert_eq!(encode(256u32), vec![0x19, 0x01, 0x00]);
        assert_eq!(encode(-1i8), vec![0x20]);
        assert_eq!(encode(-8i8), vec![0x27]);
        assert_eq!(encode(-25i8), vec![0x38, 0x18]);
    }

    #[test]
    fn test_full_integer_range() {
        let max = CborValue::Integer(u64::MAX as i128);
        let min = CborValue::Integer(-(u64::MAX as i128) - 1);
        assert_eq!(from_slice(&to_canonical_vec(&max).unwrap()).unwrap(), max);
        assert_eq!(from_slice(&to_canonical_vec(&min).unwrap()).unwrap(), min);

        let too_big = CborValue::Integer(u64::MAX as i128 + 1);
        assert!(matches!(
            to_canonical_vec(&too_big),
            Err(CodecError::IntegerOutOfRange(_))
        ));
    }

    #[test]
    fn test_map_order_is_canonical_not_insertion() {
        // Key descriptor keys: 1, 3, -1, 4, -2 sort as 1, 3, 4, -1, -2.
        let a = CborMap::new()
            .with(-2, 0)
            .with(4, 0)
            .with(-1, 0)
            .with(3, 0)
            .with(1, 0);
        let b = CborMap::new()
            .with(1, 0)
            .with(3, 0)
            .with(-1, 0)
            .with(4, 0)
            .with(-2, 0);

        let bytes = encode(a.clone());
        assert_eq!(bytes, encode(b.clone()));
        assert_eq!(
            bytes,
            vec![0xa5, 0x01, 0x00, 0x03, 0x00, 0x04, 0x00, 0x20, 0x00, 0x21, 0x00]
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_shorter_keys_sort_first() {
        let map = CborMap::new().with("keyset", 0).with(4, 0).with(1, 0);
        let bytes = encode(map);
        assert_eq!(&bytes[..5], &[0xa3, 0x01, 0x00, 0x04, 0x00]);
        assert_eq!(bytes[5], 0x66);
    }

    #[test]
    fn test_insert_replaces() {
        let mut map = CborMap::new();
        assert_eq!(map.insert(1, "a"), None);
        assert_eq!(map.insert(1, "b"), Some(CborValue::from("a")));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(1), Some(&CborValue::from("b")));
        assert_eq!(map.remove(1), Some(CborValue::from("b")));
        assert!(map.is_empty());
    }

    #[test]
    fn test_identity_tag_resolved() {
        let identity = Identity::from_bytes(vec![0x01, 0x02, 0x03]);
        let bytes = encode(identity.clone());
        assert_eq!(&bytes[..3], &[0xd9, 0x27, 0x10]);
        assert_eq!(from_slice(&bytes).unwrap(), CborValue::Identity(identity));
    }

    #[test]
    fn test_identity_tag_over_text_rejected() {
        // 10000("x")
        let bytes = [0xd9, 0x27, 0x10, 0x61, 0x78];
        assert_eq!(
            from_slice(&bytes),
            Err(CodecError::UnexpectedType {
                expected: "identity bytes",
                found: "text"
            })
        );
    }

    #[test]
    fn test_other_tags_preserved() {
        let value = CborValue::tagged(1, 1_700_000_000u64);
        assert_eq!(from_slice(&encode(value.clone())).unwrap(), value);
    }

    #[test]
    fn test_truncated_input_rejected() {
        // bytes(4) with only two bytes of content
        assert!(matches!(
            from_slice(&[0x44, 0x01, 0x02]),
            Err(CodecError::Truncated(_))
        ));
        assert!(matches!(from_slice(&[]), Err(CodecError::Truncated(_))));
    }

    #[test]
    fn test_oversized_length_prefix_rejected() {
        // array declaring 2^32 items
        let bytes = [0x9a, 0xff, 0xff, 0xff, 0xff, 0x00];
        assert!(matches!(from_slice(&bytes), Err(CodecError::Truncated(_))));
    }

    #[test]
    fn test_indefinite_length_rejected() {
        assert_eq!(
            from_slice(&[0x9f, 0x01, 0xff]),
            Err(CodecError::IndefiniteLength)
        );
        assert_eq!(
            from_slice(&[0xbf, 0x01, 0x01, 0xff]),
            Err(CodecError::IndefiniteLength)
        );
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let bytes = [0xa2, 0x01, 0x00, 0x01, 0x01];
        assert!(matches!(
            from_slice(&bytes),
            Err(CodecError::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        assert_eq!(
            from_slice(&[0x01, 0x02]),
            Err(CodecError::TrailingBytes { remaining: 1 })
        );
    }

    #[test]
    fn test_nesting_limit() {
        let mut bytes = vec![0x81; MAX_NESTING_DEPTH + 2];
        bytes.push(0x00);
        assert_eq!(
            from_slice(&bytes),
            Err(CodecError::NestingTooDeep(MAX_NESTING_DEPTH))
        );
    }

    #[test]
    fn test_display_diagnostic() {
        let value = CborValue::from(CborMap::new().with(0, "x").with(1, vec![0xabu8]));
        assert_eq!(value.to_string(), "{0: \"x\", 1: h'ab'}");
    }

    #[test]
    fn test_half_float_decoded() {
        assert_eq!(from_slice(&[0xf9, 0x3c, 0x00]).unwrap(), CborValue::Float(1.0));
    }

    #[test]
    fn test_shortest_floats() {
        assert_eq!(encode(CborValue::Float(1.0)), vec![0xf9, 0x3c, 0x00]);
        assert_eq!(encode(CborValue::Float(-2.5)), vec![0xf9, 0xc1, 0x00]);
        assert_eq!(
            encode(CborValue::Float(100_000.0)),
            vec![0xfa, 0x47, 0xc3, 0x50, 0x00]
        );
        assert_eq!(
            encode(CborValue::Float(0.1)),
            vec![0xfb, 0x3f, 0xb9, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a]
        );

        let nan = encode(CborValue::Float(f64::NAN));
        assert_eq!(nan.len(), 3);
        assert!(matches!(from_slice(&nan), Ok(CborValue::Float(x)) if x.is_nan()));
    }

    #[test]
    fn test_half_float_reencodes_as_half() {
        let bytes = [0xf9, 0x3e, 0x00];
        let value = from_slice(&bytes).unwrap();
        assert_eq!(value, CborValue::Float(1.5));
        assert_eq!(to_canonical_vec(&value).unwrap(), bytes);
    }

    fn arb_value() -> impl Strategy<Value = CborValue> {
        let leaf = prop_oneof![
            any::<i64>().prop_map(CborValue::from),
            any::<u64>().prop_map(CborValue::from),
            proptest::collection::vec(any::<u8>(), 0..40).prop_map(CborValue::Bytes),
            ".{0,20}".prop_map(CborValue::Text),
            any::<bool>().prop_map(CborValue::Bool),
            Just(CborValue::Null),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..8).prop_map(CborValue::Array),
                proptest::collection::vec((any::<u32>(), inner.clone()), 0..8)
                    .prop_map(|entries| CborValue::Map(entries.into_iter().collect())),
                (100u64..1000, inner).prop_map(|(tag, v)| CborValue::tagged(tag, v)),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(value in arb_value()) {
            let bytes = to_canonical_vec(&value).unwrap();
            prop_assert_eq!(from_slice(&bytes).unwrap(), value);
        }

        #[test]
        fn prop_encoding_is_canonical(value in arb_value()) {
            // Re-encoding decoded bytes is a fixed point.
            let bytes = to_canonical_vec(&value).unwrap();
            let again = to_canonical_vec(&from_slice(&bytes).unwrap()).unwrap();
            prop_assert_eq!(bytes, again);
        }

        #[test]
        fn prop_garbage_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = from_slice(&bytes);
        }
    }
}
