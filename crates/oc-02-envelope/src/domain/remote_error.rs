//! # Remote Errors
//!
//! A server reports failure by putting a map instead of bytes in the
//! payload body:
//!
//! ```text
//! {0: code, 1: "message with {field} placeholders", 2: {field: value}}
//! ```
//!
//! `{name}` is replaced by the field value (empty when unknown); `{{` and
//! `}}` render as literal braces.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use shared_types::{CborMap, CborValue, CodecError};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Map key of the numeric error code.
pub const CODE_FIELD: i64 = 0;
/// Map key of the message template.
pub const MESSAGE_FIELD: i64 = 1;
/// Map key of the placeholder values.
pub const FIELDS_FIELD: i64 = 2;

const PLACEHOLDER_PATTERN: &str = r"\{\{|\}\}|\{[^}\s]*\}";

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(PLACEHOLDER_PATTERN).expect("hardcoded placeholder pattern is valid")
    })
}

/// A structured error returned by a server.
#[derive(Debug, Clone, Default, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}", self.render())]
pub struct RemoteError {
    code: i64,
    message: Option<String>,
    fields: BTreeMap<String, String>,
}

impl RemoteError {
    /// Error with a message template and no fields.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Add a placeholder value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Numeric error code (0 when the server sent none).
    pub fn code(&self) -> i64 {
        self.code
    }

    /// Unrendered message template.
    pub fn message_template(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Placeholder values.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Human-readable message with placeholders substituted.
    pub fn render(&self) -> String {
        let Some(template) = &self.message else {
            let fields = serde_json::to_string(&self.fields).unwrap_or_default();
            return format!("OmniError({}) message=null fields={fields}", self.code);
        };
        placeholder()
            .replace_all(template, |caps: &Captures| match &caps[0] {
                "{{" => "{".to_string(),
                "}}" => "}".to_string(),
                token => self
                    .fields
                    .get(&token[1..token.len() - 1])
                    .cloned()
                    .unwrap_or_default(),
            })
            .into_owned()
    }

    /// Read the wire form.
    pub fn from_map(map: &CborMap) -> Result<Self, CodecError> {
        let code = match map.get(CODE_FIELD) {
            None => 0,
            Some(value) => {
                let n = value.as_integer().ok_or(CodecError::UnexpectedType {
                    expected: "integer",
                    found: value.kind(),
                })?;
                i64::try_from(n).map_err(|_| CodecError::IntegerOutOfRange(n))?
            }
        };

        let message = match map.get(MESSAGE_FIELD) {
            None | Some(CborValue::Null) => None,
            Some(CborValue::Text(text)) => Some(text.clone()),
            Some(other) => {
                return Err(CodecError::UnexpectedType {
                    expected: "text",
                    found: other.kind(),
                })
            }
        };

        let fields = match map.get(FIELDS_FIELD) {
            None | Some(CborValue::Null) => BTreeMap::new(),
            Some(CborValue::Map(entries)) => entries
                .iter()
                .map(|(k, v)| (text_or_diagnostic(k), text_or_diagnostic(v)))
                .collect(),
            Some(other) => {
                return Err(CodecError::UnexpectedType {
                    expected: "map",
                    found: other.kind(),
                })
            }
        };

        Ok(Self {
            code,
            message,
            fields,
        })
    }

    /// Wire form.
    pub fn to_map(&self) -> CborMap {
        let mut map = CborMap::new().with(CODE_FIELD, self.code);
        if let Some(message) = &self.message {
            map.insert(MESSAGE_FIELD, message.as_str());
        }
        if !self.fields.is_empty() {
            let fields: CborMap = self
                .fields
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            map.insert(FIELDS_FIELD, fields);
        }
        map
    }
}

fn text_or_diagnostic(value: &CborValue) -> String {
    match value {
        CborValue::Text(text) => text.clone(),
        other => other.to_string(),
    }
}
