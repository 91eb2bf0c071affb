//! # Parameter Parsers
//!
//! Query-string and form parameters arrive as untyped strings. These helpers
//! turn such a string into a JSON value of one of the kinds a type definition
//! accepts, before the definition validates it.
//!
//! Kinds are tried from least to most ambiguous: `null` (only for the empty
//! string), `boolean`, `integer`, `number`, `array`, `object`, and finally
//! `string`, which accepts anything.

use std::fmt;

use serde_json::Value;

use crate::error::ParseError;
use crate::value::NativeKind;

/// A JSON kind a parameter string may be parsed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Null,
    Boolean,
    Integer,
    Number,
    Array,
    Object,
    String,
}

impl JsonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Array => "array",
            Self::Object => "object",
            Self::String => "string",
        }
    }

    /// Parse a JSON Schema `type` name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Self::Null),
            other => NativeKind::from_json_type(other).map(Self::from),
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<NativeKind> for JsonType {
    fn from(kind: NativeKind) -> Self {
        match kind {
            NativeKind::String => Self::String,
            NativeKind::Integer => Self::Integer,
            NativeKind::Number => Self::Number,
            NativeKind::Boolean => Self::Boolean,
            NativeKind::Array => Self::Array,
            NativeKind::Object => Self::Object,
        }
    }
}

/// Evaluation order; the position in this list, not in the caller's list,
/// decides which kind wins for ambiguous input such as `"1"`.
const PARSE_ORDER: [JsonType; 6] = [
    JsonType::Boolean,
    JsonType::Integer,
    JsonType::Number,
    JsonType::Array,
    JsonType::Object,
    JsonType::String,
];

fn parse_boolean(value: &str) -> Option<Value> {
    match value.to_lowercase().as_str() {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ => None,
    }
}

fn parse_integer(value: &str) -> Option<Value> {
    value.trim().parse::<i64>().ok().map(Value::from)
}

/// JSON numbers cannot be non-finite, so `inf` and `nan` are passed on as
/// the trimmed string for the numeric type to reject as `finite`.
fn parse_number(value: &str) -> Option<Value> {
    let trimmed = value.trim();
    let parsed = trimmed.parse::<f64>().ok()?;
    match serde_json::Number::from_f64(parsed) {
        Some(n) => Some(Value::Number(n)),
        None => Some(Value::String(trimmed.to_string())),
    }
}

/// JSON container parse, attempted only when the first non-blank character
/// opens the expected container.
fn parse_container(value: &str, open: char) -> Option<Value> {
    let trimmed = value.trim_start();
    if !trimmed.starts_with(open) {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

/// Parse `value` into the first allowed kind, in the fixed evaluation order.
///
/// Returns the kind that matched along with the parsed value.
///
/// # Errors
///
/// Returns [`ParseError`] naming `name` and the allowed kinds when no
/// allowed kind accepts the string.
pub fn parse_value(
    value: &str,
    allowed: &[JsonType],
    name: &str,
) -> Result<(JsonType, Value), ParseError> {
    if allowed.contains(&JsonType::Null) && value.is_empty() {
        return Ok((JsonType::Null, Value::Null));
    }

    for kind in PARSE_ORDER.iter().filter(|k| allowed.contains(k)) {
        let parsed = match kind {
            JsonType::Boolean => parse_boolean(value),
            JsonType::Integer => parse_integer(value),
            JsonType::Number => parse_number(value),
            JsonType::Array => parse_container(value, '['),
            JsonType::Object => parse_container(value, '{'),
            JsonType::String => Some(Value::String(value.to_string())),
            JsonType::Null => None,
        };
        if let Some(parsed) = parsed {
            return Ok((*kind, parsed));
        }
    }

    let names: Vec<&str> = allowed.iter().map(JsonType::as_str).collect();
    Err(ParseError(format!(
        "{name} must be a valid type ({})",
        names.join(", ")
    )))
}

/// Parse a whole JSON document, e.g. a request body.
///
/// # Errors
///
/// Returns [`ParseError`] quoting the input and the decoder's reason.
pub fn parse_json(value: &str) -> Result<Value, ParseError> {
    serde_json::from_str(value)
        .map_err(|e| ParseError(format!("Error parsing JSON: {value:?} error: {e}")))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any string parses as a string unchanged.
        #[test]
        fn string_kind_accepts_everything(s in ".*") {
            let (kind, value) = parse_value(&s, &[JsonType::String], "v").unwrap();
            prop_assert_eq!(kind, JsonType::String);
            prop_assert_eq!(value, Value::String(s));
        }

        /// Rendered integers parse back to the same integer.
        #[test]
        fn integers_round_trip(n in any::<i64>()) {
            let (kind, value) = parse_value(&n.to_string(), &[JsonType::Integer], "v").unwrap();
            prop_assert_eq!(kind, JsonType::Integer);
            prop_assert_eq!(value, Value::from(n));
        }
    }
}
