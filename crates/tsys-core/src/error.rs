//! # Error Types: the Validation Error Model
//!
//! Every type definition reports failures through [`TypeSystemError`]. A
//! failure is either a single rendered message (optionally tagged with an
//! [`ErrorCode`]) or an aggregate mapping field names / array indices to the
//! nested failure of each child.
//!
//! ## Design
//!
//! - Leaf types raise a coded message immediately.
//! - Composite types collect every child failure of one pass into an
//!   [`ErrorDetail::Fields`] map and raise it once.
//! - Hook failures, union mismatches and schema-backed delegation failures
//!   carry no code; their message is free-form.
//! - `Display` renders an aggregate the way API clients have always seen it,
//!   e.g. `{'bar': 'This field is required.'}`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Closed vocabulary of validation failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The value could not be coerced to the kind's native representation.
    Type,
    /// An empty string where at least one character is required.
    Blank,
    /// A required object property is missing.
    Required,
    /// String shorter than `min_length`.
    MinLength,
    /// String longer than `max_length`.
    MaxLength,
    /// String does not match the configured pattern.
    Pattern,
    /// Numeric value is NaN or infinite.
    Finite,
    /// Numeric value below the inclusive minimum.
    Minimum,
    /// Numeric value at or below the exclusive minimum.
    ExclusiveMinimum,
    /// Numeric value above the inclusive maximum.
    Maximum,
    /// Numeric value at or above the exclusive maximum.
    ExclusiveMaximum,
    /// Numeric value is not a multiple of the configured step.
    MultipleOf,
    /// Enum value outside the allowed set.
    Invalid,
    /// Object key that is not a string.
    InvalidKey,
    /// Object property not declared while additional properties are off.
    AdditionalProperties,
    /// Array shorter than `min_items`.
    MinItems,
    /// Array longer than `max_items`.
    MaxItems,
    /// Array element equal to an earlier element.
    UniqueItems,
}

impl ErrorCode {
    /// The wire name of the code, e.g. `"min_length"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Blank => "blank",
            Self::Required => "required",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::Pattern => "pattern",
            Self::Finite => "finite",
            Self::Minimum => "minimum",
            Self::ExclusiveMinimum => "exclusive_minimum",
            Self::Maximum => "maximum",
            Self::ExclusiveMaximum => "exclusive_maximum",
            Self::MultipleOf => "multiple_of",
            Self::Invalid => "invalid",
            Self::InvalidKey => "invalid_key",
            Self::AdditionalProperties => "additional_properties",
            Self::MinItems => "min_items",
            Self::MaxItems => "max_items",
            Self::UniqueItems => "unique_items",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of one entry in an aggregated error: a property name or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKey {
    /// Object property name.
    Field(String),
    /// Array position.
    Index(usize),
}

impl ErrorKey {
    /// Python-literal rendering used inside aggregate messages.
    fn repr(&self) -> String {
        match self {
            Self::Field(name) => repr_str(name),
            Self::Index(i) => i.to_string(),
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for ErrorKey {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for ErrorKey {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl From<usize> for ErrorKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl Serialize for ErrorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The rendered detail of a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    /// A free-form message, e.g. from a custom validation hook.
    Message(String),
    /// A message produced by a built-in check.
    Coded(ErrorCode, String),
    /// Child failures keyed by field name or index, in key order.
    Fields(BTreeMap<ErrorKey, ErrorDetail>),
}

impl ErrorDetail {
    /// The code of a built-in failure; `None` for free-form messages and
    /// aggregates.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Coded(code, _) => Some(*code),
            Self::Message(_) | Self::Fields(_) => None,
        }
    }

    /// The message text, unless this is an aggregate.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(msg) | Self::Coded(_, msg) => Some(msg),
            Self::Fields(_) => None,
        }
    }

    /// Python-literal rendering of a nested value: quoted string or dict.
    fn repr(&self) -> String {
        match self {
            Self::Message(msg) | Self::Coded(_, msg) => repr_str(msg),
            Self::Fields(fields) => {
                let body: Vec<String> = fields
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.repr(), v.repr()))
                    .collect();
                format!("{{{}}}", body.join(", "))
            }
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(msg) | Self::Coded(_, msg) => f.write_str(msg),
            Self::Fields(_) => f.write_str(&self.repr()),
        }
    }
}

impl Serialize for ErrorDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Message(msg) | Self::Coded(_, msg) => serializer.serialize_str(msg),
            Self::Fields(fields) => fields.serialize(serializer),
        }
    }
}

/// Render a string the way a Python `repr()` would, which is the format
/// clients parse out of aggregate messages.
pub fn repr_str(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        format!("\"{s}\"")
    } else {
        format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

/// Render a list of strings as a Python list literal: `['a', 'b']`.
pub fn repr_list<S: AsRef<str>>(items: &[S]) -> String {
    let body: Vec<String> = items.iter().map(|s| repr_str(s.as_ref())).collect();
    format!("[{}]", body.join(", "))
}

/// A value failed to validate against a type definition.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{detail}")]
pub struct TypeSystemError {
    detail: ErrorDetail,
}

impl TypeSystemError {
    /// A coded failure with a rendered message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            detail: ErrorDetail::Coded(code, message.into()),
        }
    }

    /// A free-form failure, as raised by custom validation hooks.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            detail: ErrorDetail::Message(message.into()),
        }
    }

    /// An aggregate of child failures keyed by field or index.
    pub fn aggregate(fields: BTreeMap<ErrorKey, ErrorDetail>) -> Self {
        Self {
            detail: ErrorDetail::Fields(fields),
        }
    }

    /// The failure code, if the failure came from a built-in check.
    pub fn code(&self) -> Option<ErrorCode> {
        self.detail.code()
    }

    /// The rendered detail.
    pub fn detail(&self) -> &ErrorDetail {
        &self.detail
    }

    /// Consume the error, returning its detail for nesting in an aggregate.
    pub fn into_detail(self) -> ErrorDetail {
        self.detail
    }

    /// The child failures when this is an aggregate.
    pub fn fields(&self) -> Option<&BTreeMap<ErrorKey, ErrorDetail>> {
        match &self.detail {
            ErrorDetail::Fields(fields) => Some(fields),
            ErrorDetail::Message(_) | ErrorDetail::Coded(..) => None,
        }
    }

    /// Look up the child failure recorded under `key`.
    pub fn field(&self, key: impl Into<ErrorKey>) -> Option<&ErrorDetail> {
        self.fields().and_then(|fields| fields.get(&key.into()))
    }
}

/// A raw parameter string could not be parsed into any allowed JSON kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coded_error_renders_message() {
        let err = TypeSystemError::new(ErrorCode::Blank, "Must not be blank.");
        assert_eq!(err.code(), Some(ErrorCode::Blank));
        assert_eq!(err.to_string(), "Must not be blank.");
        assert!(err.fields().is_none());
    }

    #[test]
    fn aggregate_renders_like_a_dict() {
        let mut fields = BTreeMap::new();
        fields.insert(
            ErrorKey::from("bar"),
            ErrorDetail::Message("This field is required.".into()),
        );
        let err = TypeSystemError::aggregate(fields);
        assert_eq!(err.to_string(), "{'bar': 'This field is required.'}");
        assert_eq!(err.code(), None);
    }

    #[test]
    fn aggregate_by_index_renders_bare_keys() {
        let mut fields = BTreeMap::new();
        fields.insert(
            ErrorKey::from(1usize),
            ErrorDetail::Message("Must be less than or equal to 1234.".into()),
        );
        let err = TypeSystemError::aggregate(fields);
        assert_eq!(err.to_string(), "{1: 'Must be less than or equal to 1234.'}");
    }

    #[test]
    fn nested_aggregates_render_recursively() {
        let mut inner = BTreeMap::new();
        inner.insert(ErrorKey::from(0usize), ErrorDetail::Message("Too many items.".into()));
        let mut outer = BTreeMap::new();
        outer.insert(ErrorKey::from("tags"), ErrorDetail::Fields(inner));
        let err = TypeSystemError::aggregate(outer);
        assert_eq!(err.to_string(), "{'tags': {0: 'Too many items.'}}");
    }

    #[test]
    fn detail_serializes_to_nested_json() {
        let mut fields = BTreeMap::new();
        fields.insert(ErrorKey::from("a"), ErrorDetail::Message("bad".into()));
        fields.insert(ErrorKey::from(2usize), ErrorDetail::Message("worse".into()));
        let json = serde_json::to_value(ErrorDetail::Fields(fields)).unwrap();
        assert_eq!(json, serde_json::json!({"a": "bad", "2": "worse"}));
    }

    #[test]
    fn repr_switches_quotes_for_apostrophes() {
        assert_eq!(repr_str("plain"), "'plain'");
        assert_eq!(repr_str("it's"), "\"it's\"");
        assert_eq!(repr_list(&["foo", "bar"]), "['foo', 'bar']");
    }

    #[test]
    fn field_lookup() {
        let mut fields = BTreeMap::new();
        fields.insert(ErrorKey::from("x"), ErrorDetail::Message("nope".into()));
        let err = TypeSystemError::aggregate(fields);
        assert_eq!(err.field("x"), Some(&ErrorDetail::Message("nope".into())));
        assert!(err.field("y").is_none());
    }

    #[test]
    fn child_codes_survive_aggregation() {
        let child = TypeSystemError::new(ErrorCode::Required, "This field is required.");
        let mut fields = BTreeMap::new();
        fields.insert(ErrorKey::from("bar"), child.into_detail());
        let err = TypeSystemError::aggregate(fields);
        let detail = err.field("bar").unwrap();
        assert_eq!(detail.code(), Some(ErrorCode::Required));
        assert_eq!(detail.message(), Some("This field is required."));
        assert_eq!(err.to_string(), "{'bar': 'This field is required.'}");
    }

    #[test]
    fn code_wire_names() {
        assert_eq!(ErrorCode::ExclusiveMaximum.as_str(), "exclusive_maximum");
        assert_eq!(
            serde_json::to_value(ErrorCode::UniqueItems).unwrap(),
            serde_json::json!("unique_items")
        );
    }
}
