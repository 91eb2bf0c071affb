//! # Type Definitions
//!
//! [`TypeDef`] is a built, immutable type definition of any kind. It is the
//! single entry point for validation: `validate` handles nullability,
//! dispatches to the kind, then runs the custom hook on the coerced value.
//!
//! Definitions hold no mutable state. Cloning one is cheap enough to share
//! a definition between object properties, and a `TypeDef` is `Send + Sync`.

use serde_json::Value;
use tsys_core::{parse_value, ErrorCode, JsonType, Native, NativeKind, TypeSystemError};

use crate::array::ArrayType;
use crate::boolean::BooleanType;
use crate::common::Common;
use crate::enumeration::EnumType;
use crate::numeric::NumericType;
use crate::object::ObjectType;
use crate::schema::SchemaType;
use crate::string::StringType;
use crate::union::UnionType;

/// A validated type definition.
#[derive(Debug, Clone)]
pub enum TypeDef {
    String(StringType),
    Numeric(NumericType),
    Boolean(BooleanType),
    Enum(EnumType),
    Object(ObjectType),
    Array(ArrayType),
    Union(UnionType),
    Schema(SchemaType),
}

impl TypeDef {
    pub(crate) fn common(&self) -> &Common {
        match self {
            Self::String(t) => &t.common,
            Self::Numeric(t) => &t.common,
            Self::Boolean(t) => &t.common,
            Self::Enum(t) => &t.common,
            Self::Object(t) => &t.common,
            Self::Array(t) => &t.common,
            Self::Union(t) => &t.common,
            Self::Schema(t) => &t.common,
        }
    }

    /// Validate `value` and coerce it to its native representation.
    ///
    /// # Errors
    ///
    /// Returns the kind's failure: a coded message for scalars, an
    /// aggregate keyed by field or index for objects and arrays.
    pub fn validate(&self, value: &Value) -> Result<Native, TypeSystemError> {
        self.validate_matched(value).map(|(native, _)| native)
    }

    /// Validate `value` and report the native kind it was coerced as. This
    /// differs from [`native_kind`](Self::native_kind) only for unions,
    /// where it is the kind of the candidate that matched.
    pub(crate) fn validate_matched(
        &self,
        value: &Value,
    ) -> Result<(Native, NativeKind), TypeSystemError> {
        let common = self.common();
        if common.nullable && value.is_null() {
            return Ok((Native::Null, self.native_kind()));
        }

        let coerced = match self {
            Self::String(t) => t.coerce(value),
            Self::Numeric(t) => t.coerce(value),
            Self::Boolean(t) => t.coerce(value),
            Self::Enum(t) => t.coerce(value),
            Self::Object(t) => t.coerce(value),
            Self::Array(t) => t.coerce(value),
            Self::Union(t) => {
                return t
                    .resolve(value)
                    .and_then(|matched| {
                        common.run_hook(&matched.value)?;
                        Ok((matched.value, matched.kind))
                    })
                    .map_err(|e| self.log_failure(e));
            }
            Self::Schema(t) => t.coerce(value),
        };

        coerced
            .and_then(|native| {
                common.run_hook(&native)?;
                Ok((native, self.native_kind()))
            })
            .map_err(|e| self.log_failure(e))
    }

    fn log_failure(&self, error: TypeSystemError) -> TypeSystemError {
        tracing::trace!(kind = self.kind_name(), error = %error, "validation failed");
        error
    }

    /// Parse a raw parameter string and validate the result.
    ///
    /// A custom parser takes precedence; otherwise the string is parsed as
    /// the first of [`json_types`](Self::json_types) it fits.
    ///
    /// # Errors
    ///
    /// A parse failure is reported with code `type`; validation failures
    /// are returned as they are.
    pub fn coerce_param(&self, raw: &str) -> Result<Native, TypeSystemError> {
        let parsed = self.parse_param(raw, self.param_name().unwrap_or("value"))?;
        if parsed.is_null() && self.is_nullable() {
            return Ok(Native::Null);
        }
        self.validate(&parsed)
    }

    pub(crate) fn parse_param(&self, raw: &str, name: &str) -> Result<Value, TypeSystemError> {
        if let Some(parser) = &self.common().parser {
            return parser(raw);
        }
        parse_value(raw, &self.json_types(), name)
            .map(|(_, value)| value)
            .map_err(|e| TypeSystemError::new(ErrorCode::Type, e.to_string()))
    }

    pub fn description(&self) -> &str {
        &self.common().description
    }

    /// The configured example, or one synthesized from the kind and its
    /// children.
    pub fn example(&self) -> Value {
        if let Some(example) = &self.common().example {
            return example.clone();
        }
        match self {
            Self::String(_) => Value::from("string"),
            Self::Numeric(t) if t.is_integer() => Value::from(1),
            Self::Numeric(_) => Value::from(3.14),
            Self::Boolean(_) => Value::Bool(true),
            Self::Enum(t) => t
                .values()
                .first()
                .map(|v| Value::String(v.clone()))
                .unwrap_or(Value::Null),
            Self::Object(t) => t.synthesized_example(),
            Self::Array(t) => t.synthesized_example(),
            Self::Union(t) => t.first_example(),
            Self::Schema(t) => t.resolved().example().clone(),
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.common().nullable
    }

    /// Request key to read this value from, when it differs from the
    /// parameter name.
    pub fn param_name(&self) -> Option<&str> {
        self.common().param_name.as_deref()
    }

    /// Value an enclosing object uses when this property is absent.
    pub fn default_value(&self) -> Option<&Value> {
        self.common().default.as_ref()
    }

    /// The native kind values of this type coerce to. For a union this is
    /// the first candidate's kind; the kind of a particular value is
    /// reported by [`UnionType::resolve`].
    pub fn native_kind(&self) -> NativeKind {
        match self {
            Self::String(_) | Self::Enum(_) => NativeKind::String,
            Self::Numeric(t) => t.native_kind(),
            Self::Boolean(_) => NativeKind::Boolean,
            Self::Object(_) => NativeKind::Object,
            Self::Array(_) => NativeKind::Array,
            Self::Union(t) => t.first_kind(),
            Self::Schema(t) => t.native_kind(),
        }
    }

    /// JSON kinds a raw parameter string may be parsed into: every
    /// candidate's kind for a union, plus `null` when nullable.
    pub fn json_types(&self) -> Vec<JsonType> {
        let mut types: Vec<JsonType> = match self {
            Self::Union(t) => {
                let mut kinds = Vec::new();
                for kind in t.types().iter().map(|c| JsonType::from(c.native_kind())) {
                    if !kinds.contains(&kind) {
                        kinds.push(kind);
                    }
                }
                kinds
            }
            other => vec![JsonType::from(other.native_kind())],
        };
        if self.is_nullable() {
            types.push(JsonType::Null);
        }
        types
    }

    /// Name of the definition's kind, as used in union failure messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Numeric(t) => t.kind_name(),
            Self::Boolean(_) => "Boolean",
            Self::Enum(_) => "Enum",
            Self::Object(_) => "Object",
            Self::Array(_) => "Array",
            Self::Union(_) => "Union",
            Self::Schema(_) => "JsonSchema",
        }
    }

    pub fn as_string(&self) -> Option<&StringType> {
        match self {
            Self::String(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericType> {
        match self {
            Self::Numeric(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Self::Object(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayType> {
        match self {
            Self::Array(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            Self::Union(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_schema(&self) -> Option<&SchemaType> {
        match self {
            Self::Schema(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Configure;
    use crate::factory::{boolean, enumeration, integer, number, string, union};
    use serde_json::json;

    #[test]
    fn default_examples_per_kind() {
        assert_eq!(string("s").build().unwrap().example(), json!("string"));
        assert_eq!(string("s").example("Foo").build().unwrap().example(), json!("Foo"));
        assert_eq!(number("Pi").build().unwrap().example(), json!(3.14));
        assert_eq!(number("f").example(1.12).build().unwrap().example(), json!(1.12));
        assert_eq!(integer("An ID").build().unwrap().example(), json!(1));
        assert_eq!(integer("i").example(1022).build().unwrap().example(), json!(1022));
        assert_eq!(boolean("b").build().unwrap().example(), json!(true));
        assert_eq!(boolean("b").example(false).build().unwrap().example(), json!(false));
        assert_eq!(enumeration("e", ["foo", "bar"]).build().unwrap().example(), json!("foo"));
        assert_eq!(
            enumeration("e", ["foo", "bar"]).example("bar").build().unwrap().example(),
            json!("bar")
        );
    }

    #[test]
    fn blank_description_fails_to_build() {
        let err = string("  ").build().unwrap_err();
        assert_eq!(err.to_string(), "String type did not define a description.");
        assert!(integer("").build().is_err());
    }

    #[test]
    fn json_types_for_parameters() {
        let def = integer("id").nullable(true).build().unwrap();
        assert_eq!(def.json_types(), vec![JsonType::Integer, JsonType::Null]);

        let def = union(
            "b or s",
            vec![
                boolean("b").build().unwrap(),
                string("s").build().unwrap(),
                enumeration("e", ["x"]).build().unwrap(),
            ],
        )
        .build()
        .unwrap();
        assert_eq!(def.json_types(), vec![JsonType::Boolean, JsonType::String]);
    }

    #[test]
    fn coerce_param_parses_before_validating() {
        let def = integer("id").maximum(10).build().unwrap();
        assert_eq!(def.coerce_param("7").unwrap(), Native::Integer(7));
        assert_eq!(def.coerce_param("11").unwrap_err().code(), Some(ErrorCode::Maximum));

        let err = def.coerce_param("dog").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Type));
        assert_eq!(err.to_string(), "value must be a valid type (integer)");
    }

    #[test]
    fn coerce_param_uses_param_name_in_messages() {
        let def = integer("id").param_name("campaign_id").nullable(true).build().unwrap();
        assert_eq!(def.coerce_param("").unwrap(), Native::Null);
        assert_eq!(
            def.coerce_param("dog").unwrap_err().to_string(),
            "campaign_id must be a valid type (integer, null)"
        );
    }

    #[test]
    fn custom_parser_replaces_parse_value() {
        let def = string("csv")
            .parser(|raw| Ok(Value::String(raw.replace(',', " "))))
            .build()
            .unwrap();
        assert_eq!(def.coerce_param("a,b").unwrap(), Native::from("a b"));
    }

    #[test]
    fn type_defs_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeDef>();
    }
}
