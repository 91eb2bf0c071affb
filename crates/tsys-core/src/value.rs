//! # Native Values
//!
//! The output side of every type definition. Raw inputs arrive as
//! `serde_json::Value`; successful coercion produces a [`Native`], a plain
//! data value with no trace of the definition that produced it.
//!
//! Dates, date-times and times get their own variants because a `format`
//! constraint on a string type changes the native representation. Everything
//! else maps one-to-one onto JSON.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A coerced value in its canonical native representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    /// Absence of a value (nullable types only).
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A finite or non-finite float.
    Float(f64),
    /// A string.
    String(String),
    /// A calendar date (`format = date`).
    Date(NaiveDate),
    /// A date-time carrying a UTC offset (`format = date-time`).
    DateTime(DateTime<FixedOffset>),
    /// A date-time without an offset (`format = date-time`).
    LocalDateTime(NaiveDateTime),
    /// A wall-clock time (`format = time`).
    Time(NaiveTime),
    /// An ordered sequence.
    Array(Vec<Native>),
    /// A string-keyed mapping.
    Object(BTreeMap<String, Native>),
}

impl Native {
    /// Convert an untyped JSON value without applying any constraints.
    ///
    /// Used for pass-through data: additional object properties, untyped
    /// array items and schema-backed values.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::Array(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render back to JSON. Temporal values become ISO-8601 strings and
    /// non-finite floats become `null`, since JSON cannot carry them.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::String(s) => Value::String(s.clone()),
            Self::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            Self::DateTime(dt) => Value::String(dt.to_rfc3339()),
            Self::LocalDateTime(dt) => {
                Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            Self::Time(t) => Value::String(t.format("%H:%M:%S%.f").to_string()),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// The kind tag of this value, or `None` for `Null`.
    pub fn kind(&self) -> Option<NativeKind> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(NativeKind::Boolean),
            Self::Integer(_) => Some(NativeKind::Integer),
            Self::Float(_) => Some(NativeKind::Number),
            Self::String(_)
            | Self::Date(_)
            | Self::DateTime(_)
            | Self::LocalDateTime(_)
            | Self::Time(_) => Some(NativeKind::String),
            Self::Array(_) => Some(NativeKind::Array),
            Self::Object(_) => Some(NativeKind::Object),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as a float, for either numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Native]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Native>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Property lookup on an object value.
    pub fn get(&self, key: &str) -> Option<&Native> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl Serialize for Native {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl fmt::Display for Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<bool> for Native {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Native {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Native {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Native {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Native {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Native {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Native>> for Native {
    fn from(items: Vec<Native>) -> Self {
        Self::Array(items)
    }
}

impl From<BTreeMap<String, Native>> for Native {
    fn from(map: BTreeMap<String, Native>) -> Self {
        Self::Object(map)
    }
}

/// The declared native kind of a type definition.
///
/// Mirrors the JSON Schema primitive type names, minus `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl NativeKind {
    /// The JSON Schema `type` name for this kind.
    pub fn json_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Map a JSON Schema `type` name to a kind. `null` has no native kind.
    pub fn from_json_type(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_type())
    }
}

/// A numeric constraint value that remembers how it was written.
///
/// Limits are interpolated into messages, so `30` must render as `30` and
/// `3.0` as `3.0`; the integer/float distinction also selects the
/// `multiple_of` algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limit {
    Int(i64),
    Float(f64),
}

impl Limit {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<i64> for Limit {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Limit {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Limit {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Limit {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}
