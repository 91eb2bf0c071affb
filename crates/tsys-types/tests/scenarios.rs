//! End-to-end scenarios across kinds, including schema-backed types loaded
//! from the YAML fixtures shared with `tsys-schema`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::{json, Value};
use tsys_core::{ErrorCode, ErrorDetail, Native, NativeKind};
use tsys_types::factory::{
    array, boolean, enumeration, integer, json_schema_file, number, object, string, union,
};
use tsys_types::{coerce_query_params, new_type, Configure, DefinitionError, ParamSpec};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tsys-schema/tests/fixtures")
        .join(name)
}

#[test]
fn blank_string_is_rejected() {
    let def = string("name").min_length(1).build().unwrap();
    let err = def.validate(&json!("")).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Blank));
    assert_eq!(err.to_string(), "Must not be blank.");
}

#[test]
fn missing_required_property() {
    let def = object("bar holder")
        .property("bar", integer("an int").build().unwrap())
        .required(["bar"])
        .build()
        .unwrap();
    let err = def.validate(&json!({})).unwrap_err();
    assert_eq!(err.to_string(), "{'bar': 'This field is required.'}");
    assert_eq!(err.field("bar").and_then(ErrorDetail::code), Some(ErrorCode::Required));
}

#[test]
fn positional_array_without_additional_items() {
    let def = array("pair")
        .positional_items(vec![
            string("letter").max_length(1).build().unwrap(),
            integer("count").maximum(1234).build().unwrap(),
        ])
        .additional_items(false)
        .build()
        .unwrap();
    let err = def.validate(&json!(["a", 2, 3])).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::MaxItems));
    assert_eq!(err.to_string(), "Too many items.");
}

#[test]
fn boolean_vocabulary() {
    let def = boolean("flag").build().unwrap();
    assert_eq!(def.validate(&json!("on")).unwrap(), Native::Bool(true));
    let err = def.validate(&json!("dog")).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Type));
    assert_eq!(err.to_string(), "Must be a valid boolean.");
}

#[test]
fn case_insensitive_enum() {
    let def = enumeration("choice", ["foo", "bar"])
        .case_insensitive(true)
        .build()
        .unwrap();
    assert_eq!(def.validate(&json!("FOO")).unwrap(), Native::from("foo"));
}

#[test]
fn union_reports_kind_per_call() {
    let def = union(
        "bool or string",
        vec![boolean("b").build().unwrap(), string("s").build().unwrap()],
    )
    .build()
    .unwrap();
    let union = def.as_union().unwrap();

    let first = union.resolve(&json!(true)).unwrap();
    let second = union.resolve(&json!("s")).unwrap();
    assert_eq!(first.kind, NativeKind::Boolean);
    assert_eq!(second.kind, NativeKind::String);
    // Neither call changed the definition.
    assert_eq!(def.native_kind(), NativeKind::Boolean);
}

#[test]
fn shared_union_is_consistent_across_threads() {
    let def = union(
        "int or string",
        vec![integer("i").build().unwrap(), string("s").build().unwrap()],
    )
    .build()
    .unwrap();

    std::thread::scope(|scope| {
        for n in 0..8 {
            let def = &def;
            scope.spawn(move || {
                let union = def.as_union().unwrap();
                for _ in 0..100 {
                    let input = if n % 2 == 0 { json!(n) } else { json!("word") };
                    let matched = union.resolve(&input).unwrap();
                    let expected = if n % 2 == 0 {
                        NativeKind::Integer
                    } else {
                        NativeKind::String
                    };
                    assert_eq!(matched.kind, expected);
                }
            });
        }
    });
}

#[test]
fn nested_object_errors_keep_their_shape() {
    let address = object("Address.")
        .property("zip", string("Zip.").pattern(r"^\d{5}$").build().unwrap())
        .required(["zip"])
        .build()
        .unwrap();
    let person = object("Person.")
        .property("name", string("Name.").min_length(1).build().unwrap())
        .property("age", integer("Age.").minimum(0).build().unwrap())
        .property("address", address)
        .property("scores", array("Scores.").items(number("Score.").build().unwrap()).build().unwrap())
        .required(["name"])
        .additional_properties(false)
        .build()
        .unwrap();

    let err = person
        .validate(&json!({
            "name": " ",
            "age": -1,
            "address": {"zip": "abc"},
            "scores": [1.5, "x"],
            "nick": "bob"
        }))
        .unwrap_err();

    let detail = serde_json::to_value(err.detail()).unwrap();
    assert_eq!(
        detail,
        json!({
            "address": {"zip": "Must match the pattern /^\\d{5}$/."},
            "age": "Must be greater than or equal to 0.",
            "name": "Must not be blank.",
            "nick": "Additional properties are not allowed.",
            "scores": {"1": "Must be a valid number."}
        })
    );
}

#[test]
fn schema_backed_type_from_fixture() {
    let def = json_schema_file(fixture("annotation.yaml"))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(def.description(), "An annotation object.");
    assert_eq!(def.native_kind(), NativeKind::Object);

    let example = def.example();
    assert_eq!(example["auth"], json!("token"));
    assert!(def.validate(&example).is_ok());

    let err = def.validate(&json!({"name": "x"})).unwrap_err();
    assert!(err.to_string().contains("\"annotation_id\" is a required property"), "{err}");
}

#[test]
fn schema_definition_as_query_param() {
    let id = json_schema_file(fixture("annotation.yaml"))
        .unwrap()
        .definition_key("more_id")
        .build()
        .unwrap();
    assert_eq!(id.description(), "Auto-increment ID.");

    let specs = vec![ParamSpec::new("annotation_id", id).required()];
    let raw = BTreeMap::from([("annotation_id".to_string(), "42".to_string())]);
    let values = coerce_query_params(&raw, &specs).unwrap();
    assert_eq!(values["annotation_id"], Native::Integer(42));
}

#[test]
fn schema_definition_without_description_fails_to_build() {
    let err = json_schema_file(fixture("annotation.yaml"))
        .unwrap()
        .definition_key("dog")
        .build()
        .unwrap_err();
    assert!(matches!(err, DefinitionError::Schema(_)));
    assert_eq!(err.to_string(), "Definition `dog` is missing a description.");
}

#[test]
fn schema_document_from_tempdir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("color.json");
    std::fs::write(
        &path,
        r#"{"description": "A color.", "type": "string", "enum": ["red", "green"], "example": "red"}"#,
    )
    .unwrap();

    let def = json_schema_file(&path).unwrap().build().unwrap();
    assert_eq!(def.example(), json!("red"));
    assert_eq!(def.validate(&json!("green")).unwrap(), Native::from("green"));
    assert!(def.validate(&json!("blue")).is_err());
}

#[test]
fn derived_nullable_schema_type() {
    let base = json_schema_file(fixture("annotation.yaml"))
        .unwrap()
        .definition_key("name")
        .build()
        .unwrap();
    let optional = new_type(&base).nullable(true).build().unwrap();
    assert_eq!(optional.validate(&Value::Null).unwrap(), Native::Null);
    assert!(base.validate(&Value::Null).is_err());
}
