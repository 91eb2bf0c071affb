//! # Object Type
//!
//! Validates a string-keyed mapping property by property and aggregates
//! every failure of the pass into one field-keyed error.
//!
//! ## Validation order
//!
//! 1. Each declared property (alphabetical): coerce it through its type,
//!    fall back to the property's default when absent, or record
//!    `required` when absent, required and without a default.
//! 2. Undeclared keys are copied through verbatim, or each recorded as
//!    `additional_properties` when additional properties are off.
//! 3. Property dependencies are checked. A missing dependency fails the
//!    call at once, without the aggregate of steps 1 and 2.
//! 4. The aggregate is raised if anything was recorded.
//! 5. The custom hook sees the assembled value.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::{Map, Value};
use tsys_core::{repr_list, ErrorCode, ErrorDetail, ErrorKey, Native, TypeSystemError};

use crate::common::{Common, Configure};
use crate::def::TypeDef;
use crate::error::DefinitionError;

const TYPE: &str = "Must be an object.";
const INVALID_KEY: &str = "Object keys must be strings.";
const REQUIRED: &str = "This field is required.";
const ADDITIONAL_PROPERTIES: &str = "Additional properties are not allowed.";

/// An object type definition.
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub(crate) common: Common,
    properties: BTreeMap<String, TypeDef>,
    required: BTreeSet<String>,
    additional_properties: bool,
    property_dependencies: BTreeMap<String, Vec<String>>,
    title: Option<String>,
}

impl ObjectType {
    pub(crate) fn new(description: impl Into<String>) -> Self {
        Self {
            common: Common::new(description),
            properties: BTreeMap::new(),
            required: BTreeSet::new(),
            additional_properties: true,
            property_dependencies: BTreeMap::new(),
            title: None,
        }
    }

    /// Declare (or replace) one property.
    pub fn property(mut self, name: impl Into<String>, def: TypeDef) -> Self {
        self.properties.insert(name.into(), def);
        self
    }

    /// Declare several properties at once.
    pub fn properties<I, K>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, TypeDef)>,
        K: Into<String>,
    {
        self.properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Replace the set of required property names.
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = names.into_iter().map(Into::into).collect();
        self
    }

    /// Allow keys not declared as properties. On by default.
    pub fn additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = allowed;
        self
    }

    /// When `property` is present, every one of `requires` must be too.
    pub fn property_dependency<I, S>(mut self, property: impl Into<String>, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.property_dependencies
            .insert(property.into(), requires.into_iter().map(Into::into).collect());
        self
    }

    /// Human-readable title, for documentation cross-references only.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn property_defs(&self) -> &BTreeMap<String, TypeDef> {
        &self.properties
    }

    pub fn required_names(&self) -> &BTreeSet<String> {
        &self.required
    }

    pub fn allows_additional_properties(&self) -> bool {
        self.additional_properties
    }

    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// # Errors
    ///
    /// Fails on a blank description.
    pub fn build(self) -> Result<TypeDef, DefinitionError> {
        self.common.check("Object")?;
        Ok(TypeDef::Object(self))
    }

    /// Example built from each property's example.
    pub(crate) fn synthesized_example(&self) -> Value {
        Value::Object(
            self.properties
                .iter()
                .map(|(name, def)| (name.clone(), def.example()))
                .collect(),
        )
    }

    pub(crate) fn coerce(&self, value: &Value) -> Result<Native, TypeSystemError> {
        match value {
            Value::Object(raw) => self.coerce_map(raw),
            _ => Err(TypeSystemError::new(ErrorCode::Type, TYPE)),
        }
    }

    fn coerce_map(&self, raw: &Map<String, Value>) -> Result<Native, TypeSystemError> {
        let mut result: BTreeMap<String, Native> = BTreeMap::new();
        let mut errors: BTreeMap<ErrorKey, ErrorDetail> = BTreeMap::new();

        for (name, def) in &self.properties {
            match raw.get(name) {
                Some(item) => match def.validate(item) {
                    Ok(native) => {
                        result.insert(name.clone(), native);
                    }
                    Err(e) => {
                        errors.insert(ErrorKey::from(name.as_str()), e.into_detail());
                    }
                },
                None => {
                    if let Some(default) = def.default_value() {
                        result.insert(name.clone(), Native::from_json(default));
                    } else if self.required.contains(name) {
                        errors.insert(
                            ErrorKey::from(name.as_str()),
                            TypeSystemError::new(ErrorCode::Required, REQUIRED).into_detail(),
                        );
                    }
                }
            }
        }

        for (key, item) in raw {
            if self.properties.contains_key(key) {
                continue;
            }
            if self.additional_properties {
                result.insert(key.clone(), Native::from_json(item));
            } else {
                errors.insert(
                    ErrorKey::from(key.as_str()),
                    TypeSystemError::new(ErrorCode::AdditionalProperties, ADDITIONAL_PROPERTIES)
                        .into_detail(),
                );
            }
        }

        let present = |name: &str| raw.contains_key(name) || result.contains_key(name);
        for (property, requires) in &self.property_dependencies {
            if present(property) && requires.iter().any(|dep| !present(dep)) {
                return Err(TypeSystemError::message(format!(
                    "Required properties {} for property `{property}` are missing.",
                    repr_list(requires)
                )));
            }
        }

        if !errors.is_empty() {
            return Err(TypeSystemError::aggregate(errors));
        }
        Ok(Native::Object(result))
    }

    /// Validate any serializable value as an object: a map, or a struct
    /// whose fields become properties.
    ///
    /// # Errors
    ///
    /// Returns `invalid_key` when a map key cannot be rendered as a string,
    /// `type` when the value is not map-like, and otherwise whatever the
    /// definition reports.
    pub fn validate_serialize<T: Serialize + ?Sized>(
        def: &TypeDef,
        value: &T,
    ) -> Result<Native, TypeSystemError> {
        let value = serde_json::to_value(value).map_err(|e| {
            if e.to_string().contains("key must be") {
                TypeSystemError::new(ErrorCode::InvalidKey, INVALID_KEY)
            } else {
                TypeSystemError::new(ErrorCode::Type, TYPE)
            }
        })?;
        def.validate(&value)
    }
}

impl Configure for ObjectType {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{integer, object, string};
    use serde_json::json;

    fn foo_object() -> ObjectType {
        object("A Foo").property("foo", string("foo property").min_length(2).build().unwrap())
    }

    fn required_props() -> TypeDef {
        object("required")
            .property("foo", string("foo property").min_length(2).build().unwrap())
            .property("bar", integer("an int").build().unwrap())
            .required(["bar"])
            .build()
            .unwrap()
    }

    fn dependencies() -> TypeDef {
        object("An item.")
            .property("type", string("Type of item").build().unwrap())
            .property("name", string("Name of item").build().unwrap())
            .property("category", string("Category of item").build().unwrap())
            .property_dependency("type", ["name"])
            .property_dependency("name", ["category"])
            .build()
            .unwrap()
    }

    #[test]
    fn valid_object_round_trips() {
        let def = foo_object().build().unwrap();
        let native = def.validate(&json!({"foo": "bar"})).unwrap();
        assert_eq!(native.to_json(), json!({"foo": "bar"}));
    }

    #[test]
    fn non_object_is_a_type_error() {
        let def = foo_object().build().unwrap();
        let err = def.validate(&json!("12")).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Type));
        assert_eq!(err.to_string(), "Must be an object.");
    }

    #[test]
    fn nullable() {
        let def = foo_object().nullable(true).build().unwrap();
        assert_eq!(def.validate(&Value::Null).unwrap(), Native::Null);
    }

    #[test]
    fn property_errors_are_keyed_by_name() {
        let def = foo_object().build().unwrap();
        let err = def.validate(&json!({"foo": "f"})).unwrap_err();
        assert_eq!(err.to_string(), "{'foo': 'Must have at least 2 characters.'}");
        assert_eq!(err.field("foo").and_then(ErrorDetail::code), Some(ErrorCode::MinLength));
    }

    #[test]
    fn additional_properties() {
        let raw = json!({"foo": "bar", "cat": 12});
        let def = foo_object().build().unwrap();
        assert_eq!(def.validate(&raw).unwrap().to_json(), raw);

        let def = foo_object().additional_properties(false).build().unwrap();
        let err = def.validate(&raw).unwrap_err();
        assert_eq!(err.to_string(), "{'cat': 'Additional properties are not allowed.'}");
        assert_eq!(
            err.field("cat").and_then(ErrorDetail::code),
            Some(ErrorCode::AdditionalProperties)
        );
    }

    #[test]
    fn required_properties() {
        let def = required_props();
        assert_eq!(def.validate(&json!({"bar": 1})).unwrap().to_json(), json!({"bar": 1}));

        let err = def.validate(&json!({"foo": "bar"})).unwrap_err();
        assert_eq!(err.to_string(), "{'bar': 'This field is required.'}");
        assert_eq!(err.field("bar").and_then(ErrorDetail::code), Some(ErrorCode::Required));
    }

    #[test]
    fn every_failure_is_reported_at_once() {
        let def = required_props();
        let err = def.validate(&json!({"foo": "f"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "{'bar': 'This field is required.', 'foo': 'Must have at least 2 characters.'}"
        );
    }

    #[test]
    fn defaults_fill_absent_properties() {
        let def = object("with default")
            .property("limit", integer("page size").default_value(20).build().unwrap())
            .required(["limit"])
            .build()
            .unwrap();
        let native = def.validate(&json!({})).unwrap();
        assert_eq!(native.get("limit"), Some(&Native::Integer(20)));
    }

    #[test]
    fn property_dependencies() {
        let def = dependencies();
        assert!(def.validate(&json!({})).is_ok());
        assert!(def.validate(&json!({"category": "category"})).is_ok());
        assert!(def
            .validate(&json!({"category": "category", "name": "name", "type": "type"}))
            .is_ok());

        let err = def.validate(&json!({"name": "name"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required properties ['category'] for property `name` are missing."
        );
        assert_eq!(err.code(), None);

        let err = def.validate(&json!({"type": "type"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required properties ['name'] for property `type` are missing."
        );
    }

    #[test]
    fn dependency_failure_short_circuits_property_errors() {
        let def = object("item")
            .property("name", string("name").build().unwrap())
            .property("count", integer("count").build().unwrap())
            .property_dependency("name", ["category"])
            .build()
            .unwrap();
        let err = def.validate(&json!({"name": "x", "count": "many"})).unwrap_err();
        assert!(err.fields().is_none());
        assert!(err.to_string().starts_with("Required properties"));
    }

    #[test]
    fn hook_sees_assembled_value() {
        let def = object("validate")
            .validator(|value| {
                let keys = value.as_object().map(|m| m.keys().all(|k| k.starts_with("key")));
                match keys {
                    Some(true) => Ok(()),
                    _ => Err(TypeSystemError::message("Keys must start with key")),
                }
            })
            .build()
            .unwrap();
        assert!(def.validate(&json!({"key1": 1, "key2": 2})).is_ok());
        assert_eq!(
            def.validate(&json!({"key3": 3, "foo": "bar"})).unwrap_err().to_string(),
            "Keys must start with key"
        );
    }

    #[test]
    fn example_synthesized_from_properties() {
        assert_eq!(required_props().example(), json!({"foo": "string", "bar": 1}));
        let explicit = object("ex").example(json!({"foo": "foo", "bar": 33})).build().unwrap();
        assert_eq!(explicit.example(), json!({"foo": "foo", "bar": 33}));
    }

    #[test]
    fn serializable_structs_validate_by_field() {
        #[derive(Serialize)]
        struct Foo {
            foo: &'static str,
        }
        let def = foo_object().build().unwrap();
        let native = ObjectType::validate_serialize(&def, &Foo { foo: "bar" }).unwrap();
        assert_eq!(native.get("foo"), Some(&Native::from("bar")));
    }

    #[test]
    fn non_string_keys_are_invalid() {
        let mut raw = BTreeMap::new();
        raw.insert((1, 2), "x");
        let def = foo_object().build().unwrap();
        let err = ObjectType::validate_serialize(&def, &raw).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidKey));
        assert_eq!(err.to_string(), "Object keys must be strings.");
    }
}
