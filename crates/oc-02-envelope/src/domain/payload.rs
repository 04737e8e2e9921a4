//! # Payload
//!
//! The logical content of a message: a map with small integer keys.
//!
//! | Key | Field | Value |
//! |-----|-------|-------|
//! | 0 | version | protocol version |
//! | 1 | from | sender identity |
//! | 2 | to | destination identity |
//! | 3 | method | method name (requests) |
//! | 4 | data | encoded argument or result, or a remote error map |
//! | 5 | timestamp | `1(seconds)` |
//! | 6 | id | request id |
//! | 7 | nonce | bytes |
//! | 8 | attributes | `[attribute, ...]` |

use crate::domain::errors::EnvelopeError;
use shared_types::{to_canonical_vec, CborMap, CborValue, CodecError, Identity};
use std::time::{SystemTime, UNIX_EPOCH};

/// Well-known payload keys.
pub mod field {
    /// Protocol version.
    pub const VERSION: i64 = 0;
    /// Sender.
    pub const FROM: i64 = 1;
    /// Destination.
    pub const TO: i64 = 2;
    /// Method name.
    pub const METHOD: i64 = 3;
    /// Argument or result body.
    pub const DATA: i64 = 4;
    /// Creation time.
    pub const TIMESTAMP: i64 = 5;
    /// Request id.
    pub const ID: i64 = 6;
    /// Nonce.
    pub const NONCE: i64 = 7;
    /// Attribute list.
    pub const ATTRIBUTES: i64 = 8;
}

/// Payload tag of a request message.
pub const REQUEST_TAG: u64 = 10001;
/// Payload tag of a response message.
pub const RESPONSE_TAG: u64 = 10002;
/// Standard date/time tag (epoch seconds).
pub const TIMESTAMP_TAG: u64 = 1;
/// Protocol version written by [`RequestBuilder`].
pub const PROTOCOL_VERSION: u64 = 1;
/// Attribute id marking a deferred call: `[1, token]`.
pub const ASYNC_ATTRIBUTE: i128 = 1;

/// Direction of a message, carried as the payload tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Tag 10001.
    Request,
    /// Tag 10002.
    Response,
}

impl MessageKind {
    /// Payload tag for this kind.
    pub fn tag(self) -> u64 {
        match self {
            MessageKind::Request => REQUEST_TAG,
            MessageKind::Response => RESPONSE_TAG,
        }
    }

    /// Kind for a payload tag.
    pub fn from_tag(tag: u64) -> Option<Self> {
        match tag {
            REQUEST_TAG => Some(MessageKind::Request),
            RESPONSE_TAG => Some(MessageKind::Response),
            _ => None,
        }
    }
}

/// Request or response content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: CborMap,
}

impl Payload {
    /// Empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a decoded map.
    pub fn from_map(fields: CborMap) -> Self {
        Self { fields }
    }

    /// Interpret a decoded item as a payload.
    pub fn from_value(value: CborValue) -> Result<Self, CodecError> {
        match value {
            CborValue::Map(fields) => Ok(Self { fields }),
            other => Err(CodecError::UnexpectedType {
                expected: "map",
                found: other.kind(),
            }),
        }
    }

    /// Underlying map.
    pub fn as_map(&self) -> &CborMap {
        &self.fields
    }

    /// Consume into the underlying map.
    pub fn into_map(self) -> CborMap {
        self.fields
    }

    /// The payload as a CBOR item (untagged).
    pub fn to_value(&self) -> CborValue {
        CborValue::Map(self.fields.clone())
    }

    /// Raw field lookup.
    pub fn get(&self, key: i64) -> Option<&CborValue> {
        self.fields.get(key)
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, key: i64, value: impl Into<CborValue>) -> Option<CborValue> {
        self.fields.insert(key, value)
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: i64, value: impl Into<CborValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Remove a field.
    pub fn remove(&mut self, key: i64) -> Option<CborValue> {
        self.fields.remove(key)
    }

    /// Protocol version.
    pub fn version(&self) -> Option<i128> {
        self.get(field::VERSION).and_then(CborValue::as_integer)
    }

    /// Sender, tagged or as raw bytes.
    pub fn sender(&self) -> Option<Identity> {
        self.identity_field(field::FROM)
    }

    /// Destination, tagged or as raw bytes.
    pub fn recipient(&self) -> Option<Identity> {
        self.identity_field(field::TO)
    }

    /// Method name.
    pub fn method(&self) -> Option<&str> {
        self.get(field::METHOD).and_then(CborValue::as_text)
    }

    /// Body, encoded or resolved depending on where the payload came from.
    pub fn data(&self) -> Option<&CborValue> {
        self.get(field::DATA)
    }

    /// Creation time in epoch seconds.
    pub fn timestamp(&self) -> Option<u64> {
        let value = self.get(field::TIMESTAMP)?;
        let seconds = match value.as_tagged() {
            Some((TIMESTAMP_TAG, inner)) => inner.as_integer(),
            Some(_) => None,
            None => value.as_integer(),
        }?;
        u64::try_from(seconds).ok()
    }

    /// Request id.
    pub fn id(&self) -> Option<u64> {
        self.get(field::ID)
            .and_then(CborValue::as_integer)
            .and_then(|n| u64::try_from(n).ok())
    }

    /// Nonce bytes.
    pub fn nonce(&self) -> Option<&[u8]> {
        self.get(field::NONCE).and_then(CborValue::as_bytes)
    }

    /// Attribute list (empty when absent).
    pub fn attributes(&self) -> &[CborValue] {
        self.get(field::ATTRIBUTES)
            .and_then(CborValue::as_array)
            .unwrap_or_default()
    }

    /// Token of a deferred call, when the server answered with one.
    pub fn async_token(&self) -> Option<&[u8]> {
        self.attributes().iter().find_map(|attribute| match attribute.as_array()? {
            [id, token, ..] if id.as_integer() == Some(ASYNC_ATTRIBUTE) => {
                token.as_bytes().filter(|token| !token.is_empty())
            }
            _ => None,
        })
    }

    fn identity_field(&self, key: i64) -> Option<Identity> {
        match self.get(key)? {
            CborValue::Identity(identity) => Some(identity.clone()),
            CborValue::Bytes(bytes) => Some(Identity::from_bytes(bytes.clone())),
            _ => None,
        }
    }
}

impl From<CborMap> for Payload {
    fn from(fields: CborMap) -> Self {
        Self::from_map(fields)
    }
}

/// Assembles a request payload.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: String,
    version: u64,
    from: Option<Identity>,
    to: Option<Identity>,
    data: Option<CborValue>,
    timestamp: Option<u64>,
    id: Option<u64>,
    nonce: Option<Vec<u8>>,
    attributes: Vec<CborValue>,
}

impl RequestBuilder {
    /// Request for `method` at the current protocol version.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            version: PROTOCOL_VERSION,
            from: None,
            to: None,
            data: None,
            timestamp: None,
            id: None,
            nonce: None,
            attributes: Vec::new(),
        }
    }

    /// Override the protocol version.
    pub fn version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Sender. The anonymous identity is left out of the payload.
    pub fn from(mut self, from: Identity) -> Self {
        self.from = Some(from).filter(|identity| !identity.is_anonymous());
        self
    }

    /// Destination.
    pub fn to(mut self, to: Identity) -> Self {
        self.to = Some(to);
        self
    }

    /// Method argument. Encoded canonically into the data field on build.
    pub fn data(mut self, argument: impl Into<CborValue>) -> Self {
        self.data = Some(argument.into());
        self
    }

    /// Creation time in epoch seconds.
    pub fn timestamp(mut self, seconds: u64) -> Self {
        self.timestamp = Some(seconds);
        self
    }

    /// Stamp with the system clock.
    pub fn timestamp_now(self) -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        self.timestamp(seconds)
    }

    /// Request id.
    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Nonce.
    pub fn nonce(mut self, nonce: impl Into<Vec<u8>>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Append an attribute.
    pub fn attribute(mut self, attribute: impl Into<CborValue>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Assemble the payload.
    pub fn build(self) -> Result<Payload, EnvelopeError> {
        let mut payload = Payload::new()
            .with(field::VERSION, self.version)
            .with(field::METHOD, self.method);

        if let Some(from) = self.from {
            payload.insert(field::FROM, from);
        }
        if let Some(to) = self.to {
            payload.insert(field::TO, to);
        }
        if let Some(argument) = &self.data {
            payload.insert(field::DATA, to_canonical_vec(argument)?);
        }
        if let Some(seconds) = self.timestamp {
            payload.insert(field::TIMESTAMP, CborValue::tagged(TIMESTAMP_TAG, seconds));
        }
        if let Some(id) = self.id {
            payload.insert(field::ID, id);
        }
        if let Some(nonce) = self.nonce {
            payload.insert(field::NONCE, nonce);
        }
        if !self.attributes.is_empty() {
            payload.insert(field::ATTRIBUTES, self.attributes);
        }
        Ok(payload)
    }
}
