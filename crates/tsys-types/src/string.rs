//! # String Type
//!
//! Coerces scalars to text, trims, applies length and pattern limits, then
//! an optional format. Date, date-time and time formats change the native
//! representation; email and URI formats only check shape.
//!
//! Length limits are checked before the pattern, so a too-short value
//! reports its length rather than a pattern mismatch.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::Value;
use tsys_core::{ErrorCode, Native, TypeSystemError};

use crate::common::{Common, Configure};
use crate::def::TypeDef;
use crate::error::DefinitionError;

const KIND: &str = "String";

const TYPE: &str = "Must be a valid string.";
const BLANK: &str = "Must not be blank.";

/// Shape check or parse applied after length and pattern limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// `YYYY-MM-DD`, coerced to a date.
    Date,
    /// ISO 8601 date and time, coerced to a date-time.
    DateTime,
    /// Must contain `@`.
    Email,
    /// `HH:MM:SS`, coerced to a time of day.
    Time,
    /// An absolute URI.
    Uri,
}

impl StringFormat {
    /// Parse a JSON Schema `format` name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "date" => Some(Self::Date),
            "date-time" => Some(Self::DateTime),
            "email" => Some(Self::Email),
            "time" => Some(Self::Time),
            "uri" => Some(Self::Uri),
            _ => None,
        }
    }
}

/// A string type definition.
#[derive(Debug, Clone)]
pub struct StringType {
    pub(crate) common: Common,
    trim_whitespace: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<String>,
    regex: Option<Regex>,
    format: Option<StringFormat>,
}

impl StringType {
    pub(crate) fn new(description: impl Into<String>) -> Self {
        Self {
            common: Common::new(description),
            trim_whitespace: true,
            min_length: None,
            max_length: None,
            pattern: None,
            regex: None,
            format: None,
        }
    }

    /// Strip leading and trailing whitespace before any check. On by default.
    pub fn trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Require a match of `pattern` anywhere in the value.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self.regex = None;
        self
    }

    pub fn format(mut self, format: StringFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Validate the configuration and produce a type definition.
    ///
    /// # Errors
    ///
    /// Fails on a blank description, an invalid pattern, or
    /// `min_length > max_length`.
    pub fn build(mut self) -> Result<TypeDef, DefinitionError> {
        self.common.check(KIND)?;
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(DefinitionError::constraint(
                    KIND,
                    format!("min_length {min} exceeds max_length {max}"),
                ));
            }
        }
        if let Some(pattern) = &self.pattern {
            let regex = Regex::new(pattern).map_err(|e| DefinitionError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            self.regex = Some(regex);
        }
        Ok(TypeDef::String(self))
    }

    pub(crate) fn coerce(&self, value: &Value) -> Result<Native, TypeSystemError> {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => {
                return Err(TypeSystemError::new(ErrorCode::Type, TYPE));
            }
        };
        let text = if self.trim_whitespace {
            text.trim().to_string()
        } else {
            text
        };

        let length = text.chars().count();
        if let Some(min) = self.min_length {
            if length < min {
                return Err(if min == 1 {
                    TypeSystemError::new(ErrorCode::Blank, BLANK)
                } else {
                    TypeSystemError::new(
                        ErrorCode::MinLength,
                        format!("Must have at least {min} characters."),
                    )
                });
            }
        }
        if let Some(max) = self.max_length {
            if length > max {
                return Err(TypeSystemError::new(
                    ErrorCode::MaxLength,
                    format!("Must have no more than {max} characters."),
                ));
            }
        }
        if let (Some(regex), Some(pattern)) = (&self.regex, &self.pattern) {
            if !regex.is_match(&text) {
                return Err(TypeSystemError::new(
                    ErrorCode::Pattern,
                    format!("Must match the pattern /{pattern}/."),
                ));
            }
        }

        match self.format {
            None => Ok(Native::String(text)),
            Some(format) => apply_format(format, text),
        }
    }
}

impl Configure for StringType {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}

fn format_error(message: String) -> TypeSystemError {
    TypeSystemError::new(ErrorCode::Type, message)
}

fn apply_format(format: StringFormat, text: String) -> Result<Native, TypeSystemError> {
    match format {
        StringFormat::Date => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map(Native::Date)
            .map_err(|_| {
                format_error(format!("time data '{text}' does not match format '%Y-%m-%d'"))
            }),
        StringFormat::DateTime => parse_datetime(&text),
        StringFormat::Email => {
            if text.contains('@') {
                Ok(Native::String(text))
            } else {
                Err(format_error("Not a valid email address.".to_string()))
            }
        }
        StringFormat::Time => NaiveTime::parse_from_str(&text, "%H:%M:%S")
            .map(Native::Time)
            .map_err(|_| {
                format_error(format!("time data '{text}' does not match format '%H:%M:%S'"))
            }),
        StringFormat::Uri => match url::Url::parse(&text) {
            Ok(_) => Ok(Native::String(text)),
            Err(_) => Err(format_error(format!("'{text}' is not a valid 'URI'."))),
        },
    }
}

/// ISO 8601 date-time: offset-aware when an offset is given, local otherwise.
fn parse_datetime(text: &str) -> Result<Native, TypeSystemError> {
    if !text.contains('T') {
        return Err(format_error(format!(
            "ISO 8601 time designator 'T' missing. Unable to parse datetime string '{text}'"
        )));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Native::DateTime(dt));
    }
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, layout) {
            return Ok(Native::LocalDateTime(dt));
        }
    }
    Err(format_error(format!(
        "Unable to parse datetime string '{text}'"
    )))
}
