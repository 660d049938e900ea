//! Union-typed policy fields
//!
//! IAM lets several statement fields hold either a single string, a boolean, or an array of
//! strings. Principals may additionally be a bare string or a map keyed by principal type.
//! These types classify the raw JSON once at decode time so later stages never have to inspect
//! JSON values.

use serde::de::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The JSON type of a value, used to report fields that hold an unexpected shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    /// `null`
    Null,
    /// `true` or `false`
    Boolean,
    /// Any JSON number
    Number,
    /// A JSON string
    String,
    /// A JSON array
    Array,
    /// A JSON object
    Object,
}

impl JsonKind {
    /// Classify a JSON value
    pub fn of(value: &Value) -> JsonKind {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonKind::Null => "null",
            JsonKind::Boolean => "boolean",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// A field that may be absent, a single string, a boolean or an array of strings.
///
/// e.g. all of these are valid for `Resource`:
///
/// ```text
/// "Resource": "arn:aws:s3:::bucket/*"
/// "Resource": ["arn:aws:s3:::bucket", "arn:aws:s3:::bucket/*"]
/// ```
///
/// and `true`/`false` show up as condition values (`"aws:SecureTransport": false`).
#[derive(Debug, Clone, PartialEq)]
pub enum StringOrSeq {
    /// The field was missing or `null`
    Absent,

    /// A single string
    Scalar(String),

    /// A boolean
    Flag(bool),

    /// An array of strings
    List(Vec<String>),

    /// Any other JSON shape. `index` is set when the offending value is an element of an array.
    Unsupported {
        /// Position of the offending element when the value is an array
        index: Option<usize>,

        /// The JSON type that was found
        found: JsonKind,
    },
}

impl Default for StringOrSeq {
    fn default() -> Self {
        StringOrSeq::Absent
    }
}

impl From<Value> for StringOrSeq {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => StringOrSeq::Absent,
            Value::String(s) => StringOrSeq::Scalar(s),
            Value::Bool(b) => StringOrSeq::Flag(b),
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    match item {
                        Value::String(s) => list.push(s),
                        other => {
                            return StringOrSeq::Unsupported {
                                index: Some(i),
                                found: JsonKind::of(&other),
                            }
                        }
                    }
                }
                StringOrSeq::List(list)
            }
            other => StringOrSeq::Unsupported {
                index: None,
                found: JsonKind::of(&other),
            },
        }
    }
}

impl<'de> Deserialize<'de> for StringOrSeq {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // any JSON value is accepted here, classification happens in From<Value>
        Value::deserialize(deserializer).map(StringOrSeq::from)
    }
}

/// The `Principal` and `NotPrincipal` fields of a statement.
///
/// ```text
/// "Principal": "*"
/// "Principal": {"AWS": ["arn:aws:iam::123456789012:root"], "Service": "ec2.amazonaws.com"}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PrincipalValue {
    /// The field was missing or `null`
    Absent,

    /// A bare string, which applies to any principal type
    Any(String),

    /// Identifiers keyed by principal type (e.g. "AWS", "Service", "Federated"), sorted by type
    ByType(BTreeMap<String, StringOrSeq>),

    /// Any other JSON shape
    Unsupported(JsonKind),
}

impl Default for PrincipalValue {
    fn default() -> Self {
        PrincipalValue::Absent
    }
}

impl From<Value> for PrincipalValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PrincipalValue::Absent,
            Value::String(s) => PrincipalValue::Any(s),
            Value::Object(map) => PrincipalValue::ByType(
                map.into_iter()
                    .map(|(k, v)| (k, StringOrSeq::from(v)))
                    .collect(),
            ),
            other => PrincipalValue::Unsupported(JsonKind::of(&other)),
        }
    }
}

impl<'de> Deserialize<'de> for PrincipalValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(PrincipalValue::from)
    }
}
