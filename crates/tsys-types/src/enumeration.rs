//! # Enum Type
//!
//! A string restricted to a fixed list of values. Case handling is decided
//! per call; the configured candidate list is never rewritten.
//!
//! - `case_insensitive` folds both the candidates and the input to one case
//!   (upper when `uppercase_value` is set, lower otherwise).
//! - `lowercase_value` / `uppercase_value` force the case of the output.

use serde_json::Value;
use tsys_core::{repr_list, ErrorCode, Native, TypeSystemError};

use crate::common::{Common, Configure};
use crate::def::TypeDef;
use crate::error::DefinitionError;

const KIND: &str = "Enum";

/// An enum type definition.
#[derive(Debug, Clone)]
pub struct EnumType {
    pub(crate) common: Common,
    values: Vec<String>,
    case_insensitive: bool,
    lowercase_value: bool,
    uppercase_value: bool,
}

impl EnumType {
    pub(crate) fn new(description: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            common: Common::new(description),
            values,
            case_insensitive: false,
            lowercase_value: false,
            uppercase_value: false,
        }
    }

    pub fn case_insensitive(mut self, insensitive: bool) -> Self {
        self.case_insensitive = insensitive;
        self
    }

    pub fn lowercase_value(mut self, lowercase: bool) -> Self {
        self.lowercase_value = lowercase;
        self
    }

    pub fn uppercase_value(mut self, uppercase: bool) -> Self {
        self.uppercase_value = uppercase;
        self
    }

    /// The allowed values, as configured.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// # Errors
    ///
    /// Fails on a blank description or an empty value list.
    pub fn build(self) -> Result<TypeDef, DefinitionError> {
        self.common.check(KIND)?;
        if self.values.is_empty() {
            return Err(DefinitionError::constraint(KIND, "enum must list at least one value"));
        }
        Ok(TypeDef::Enum(self))
    }

    /// The candidates as compared against input.
    fn candidates(&self) -> Vec<String> {
        if !self.case_insensitive {
            return self.values.clone();
        }
        self.values
            .iter()
            .map(|v| {
                if self.uppercase_value {
                    v.to_uppercase()
                } else {
                    v.to_lowercase()
                }
            })
            .collect()
    }

    pub(crate) fn coerce(&self, value: &Value) -> Result<Native, TypeSystemError> {
        let candidates = self.candidates();
        let invalid = || {
            TypeSystemError::new(
                ErrorCode::Invalid,
                format!("Must be one of: {}", repr_list(&candidates)),
            )
        };

        let mut text = value.as_str().ok_or_else(invalid)?.to_string();
        if self.case_insensitive && !self.uppercase_value {
            text = text.to_lowercase();
        }
        if self.lowercase_value {
            text = text.to_lowercase();
        }
        if self.uppercase_value {
            text = text.to_uppercase();
        }

        if candidates.contains(&text) {
            Ok(Native::String(text))
        } else {
            Err(invalid())
        }
    }
}

impl Configure for EnumType {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::enumeration;
    use serde_json::json;

    #[test]
    fn exact_match() {
        let def = enumeration("choices", ["foo", "bar"]).build().unwrap();
        assert_eq!(def.validate(&json!("foo")).unwrap(), Native::from("foo"));
        assert!(def.validate(&json!("bar")).is_ok());
        let err = def.validate(&json!("dog")).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Invalid));
        assert_eq!(err.to_string(), "Must be one of: ['foo', 'bar']");
    }

    #[test]
    fn case_insensitive_folds_input_and_candidates() {
        let def = enumeration("choices", ["Foo"]).case_insensitive(true).build().unwrap();
        for input in ["foo", "FOO", "fOO", "foO"] {
            assert_eq!(def.validate(&json!(input)).unwrap(), Native::from("foo"));
        }
        assert_eq!(
            def.validate(&json!("dog")).unwrap_err().to_string(),
            "Must be one of: ['foo']"
        );
    }

    #[test]
    fn repeated_calls_do_not_rewrite_candidates() {
        let def = enumeration("choices", ["Foo"]).case_insensitive(true).build().unwrap();
        def.validate(&json!("FOO")).unwrap();
        def.validate(&json!("foo")).unwrap();
        assert_eq!(def.as_enum().unwrap().values(), ["Foo".to_string()]);
    }

    #[test]
    fn forced_output_case() {
        let def = enumeration("choices", ["foo"]).lowercase_value(true).build().unwrap();
        assert_eq!(def.validate(&json!("FOO")).unwrap(), Native::from("foo"));

        let def = enumeration("choices", ["FOO"]).uppercase_value(true).build().unwrap();
        assert_eq!(def.validate(&json!("foo")).unwrap(), Native::from("FOO"));

        let def = enumeration("choices", ["foo"])
            .case_insensitive(true)
            .uppercase_value(true)
            .build()
            .unwrap();
        assert_eq!(def.validate(&json!("Foo")).unwrap(), Native::from("FOO"));
    }

    #[test]
    fn non_strings_are_invalid() {
        let def = enumeration("choices", ["1"]).build().unwrap();
        assert_eq!(def.validate(&json!(1)).unwrap_err().code(), Some(ErrorCode::Invalid));
    }

    #[test]
    fn nullable() {
        let def = enumeration("choices", ["foo"]).nullable(true).build().unwrap();
        assert_eq!(def.validate(&Value::Null).unwrap(), Native::Null);
    }

    #[test]
    fn empty_value_list_fails_to_build() {
        let values: [&str; 0] = [];
        assert!(enumeration("choices", values).build().is_err());
    }

    #[test]
    fn hook() {
        let def = enumeration("description", ["one", "two"])
            .validator(|value| match value.as_str() {
                Some("one") => Ok(()),
                _ => Err(TypeSystemError::message("Value must be one")),
            })
            .build()
            .unwrap();
        assert!(def.validate(&json!("one")).is_ok());
        assert_eq!(def.validate(&json!("two")).unwrap_err().to_string(), "Value must be one");
    }
}
