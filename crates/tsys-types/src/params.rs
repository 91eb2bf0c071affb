//! # Request Parameters
//!
//! Coerces a request's parameters against a list of typed parameter
//! specifications. Query strings and form fields arrive as untyped strings
//! and are parsed first; decoded JSON bodies are validated as they are.
//!
//! Failures across all parameters are collected into one aggregate keyed by
//! parameter name, so a caller reports every bad parameter at once.
//!
//! Nothing here knows about HTTP. A web adapter extracts the raw mapping
//! and hands it over.

use std::collections::BTreeMap;

use serde_json::Value;
use tsys_core::{ErrorCode, ErrorDetail, ErrorKey, Native, TypeSystemError};

use crate::def::TypeDef;

const REQUIRED: &str = "This field is required.";
const NOT_AN_OBJECT: &str = "Must be an object.";

/// One named, typed parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub def: TypeDef,
    pub required: bool,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, def: TypeDef) -> Self {
        Self {
            name: name.into(),
            def,
            required: false,
        }
    }

    /// Fail with `required` when the parameter is absent and has no default.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The request key this parameter is read from.
    pub fn key(&self) -> &str {
        self.def.param_name().unwrap_or(&self.name)
    }
}

/// Re-key `raw` from request keys to parameter names. Keys no parameter claims
/// are dropped.
pub fn map_param_names<V: Clone>(
    raw: &BTreeMap<String, V>,
    specs: &[ParamSpec],
) -> BTreeMap<String, V> {
    specs
        .iter()
        .filter_map(|spec| raw.get(spec.key()).map(|v| (spec.name.clone(), v.clone())))
        .collect()
}

/// Parse and validate string parameters.
///
/// Each present parameter goes through the type's custom parser when one is
/// set, otherwise through [`tsys_core::parse_value`] with the type's JSON
/// kinds, and is then validated.
///
/// # Errors
///
/// Returns one aggregate keyed by parameter name holding every parse,
/// validation and missing-parameter failure.
pub fn coerce_query_params(
    raw: &BTreeMap<String, String>,
    specs: &[ParamSpec],
) -> Result<BTreeMap<String, Native>, TypeSystemError> {
    coerce_with(specs, |spec| {
        raw.get(spec.key()).map(|value| {
            let parsed = spec.def.parse_param(value, spec.key())?;
            if parsed.is_null() && spec.def.is_nullable() {
                return Ok(Native::Null);
            }
            spec.def.validate(&parsed)
        })
    })
}

/// Validate parameters from a decoded JSON object body.
///
/// # Errors
///
/// Returns `type` when `body` is not an object, otherwise one aggregate
/// keyed by parameter name.
pub fn coerce_json_params(
    body: &Value,
    specs: &[ParamSpec],
) -> Result<BTreeMap<String, Native>, TypeSystemError> {
    let map = body
        .as_object()
        .ok_or_else(|| TypeSystemError::new(ErrorCode::Type, NOT_AN_OBJECT))?;
    coerce_with(specs, |spec| {
        map.get(spec.key()).map(|value| spec.def.validate(value))
    })
}

fn coerce_with<F>(
    specs: &[ParamSpec],
    mut lookup: F,
) -> Result<BTreeMap<String, Native>, TypeSystemError>
where
    F: FnMut(&ParamSpec) -> Option<Result<Native, TypeSystemError>>,
{
    let mut values = BTreeMap::new();
    let mut errors: BTreeMap<ErrorKey, ErrorDetail> = BTreeMap::new();

    for spec in specs {
        match lookup(spec) {
            Some(Ok(native)) => {
                values.insert(spec.name.clone(), native);
            }
            Some(Err(e)) => {
                errors.insert(ErrorKey::from(spec.name.as_str()), e.into_detail());
            }
            None => {
                if let Some(default) = spec.def.default_value() {
                    values.insert(spec.name.clone(), Native::from_json(default));
                } else if spec.required {
                    errors.insert(
                        ErrorKey::from(spec.name.as_str()),
                        TypeSystemError::new(ErrorCode::Required, REQUIRED).into_detail(),
                    );
                }
            }
        }
    }

    if !errors.is_empty() {
        tracing::debug!(failed = errors.len(), "parameter coercion failed");
        return Err(TypeSystemError::aggregate(errors));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Configure;
    use crate::factory::{array, boolean, integer, string, union};
    use serde_json::json;

    fn specs() -> Vec<ParamSpec> {
        vec![
            ParamSpec::new("id", integer("ID.").build().unwrap()).required(),
            ParamSpec::new("active", boolean("Active.").default_value(false).build().unwrap()),
            ParamSpec::new(
                "tags",
                array("Tags.")
                    .items(string("Tag.").build().unwrap())
                    .param_name("tag_list")
                    .build()
                    .unwrap(),
            ),
        ]
    }

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn query_params_are_parsed_then_validated() {
        let values = coerce_query_params(
            &raw(&[("id", "12"), ("tag_list", "[\"a\", \"b\"]"), ("ignored", "x")]),
            &specs(),
        )
        .unwrap();
        assert_eq!(values["id"], Native::Integer(12));
        assert_eq!(values["active"], Native::Bool(false));
        assert_eq!(
            values["tags"],
            Native::Array(vec![Native::from("a"), Native::from("b")])
        );
        assert!(!values.contains_key("ignored"));
    }

    #[test]
    fn failures_are_aggregated_per_parameter() {
        let err = coerce_query_params(&raw(&[("active", "maybe"), ("tag_list", "x")]), &specs())
            .unwrap_err();
        assert_eq!(err.field("id").and_then(ErrorDetail::code), Some(ErrorCode::Required));
        assert_eq!(
            err.field("active").and_then(ErrorDetail::message),
            Some("active must be a valid type (boolean)")
        );
        assert_eq!(
            err.field("tags").and_then(ErrorDetail::message),
            Some("tag_list must be a valid type (array)")
        );
    }

    #[test]
    fn union_params_try_every_candidate_kind() {
        let specs = vec![ParamSpec::new(
            "limit",
            union(
                "Limit.",
                vec![integer("N.").build().unwrap(), string("all").build().unwrap()],
            )
            .nullable(true)
            .build()
            .unwrap(),
        )];
        let values = coerce_query_params(&raw(&[("limit", "5")]), &specs).unwrap();
        assert_eq!(values["limit"], Native::Integer(5));
        let values = coerce_query_params(&raw(&[("limit", "all")]), &specs).unwrap();
        assert_eq!(values["limit"], Native::from("all"));
        let values = coerce_query_params(&raw(&[("limit", "")]), &specs).unwrap();
        assert_eq!(values["limit"], Native::Null);
    }

    #[test]
    fn json_params_skip_string_parsing() {
        let values = coerce_json_params(&json!({"id": 3, "tag_list": ["x"]}), &specs()).unwrap();
        assert_eq!(values["id"], Native::Integer(3));

        let err = coerce_json_params(&json!({"id": true}), &specs()).unwrap_err();
        assert_eq!(err.field("id").and_then(ErrorDetail::code), Some(ErrorCode::Type));

        let err = coerce_json_params(&json!([1]), &specs()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Type));
    }

    #[test]
    fn param_names_are_remapped() {
        let mapped = map_param_names(&raw(&[("tag_list", "a"), ("id", "1"), ("x", "y")]), &specs());
        assert_eq!(mapped.keys().collect::<Vec<_>>(), vec!["id", "tags"]);
    }
}
