//! # Validation Targets
//!
//! A [`ResolvedSchema`] is one sub-schema of a document, selected by an
//! optional definition key, with its references inlined and its validator
//! compiled. It exposes the metadata a type definition needs: description,
//! example, declared JSON type and native kind.
//!
//! An absent `example` is synthesized: an object gets a map of its property
//! examples, an array a one-element list holding its item example. A
//! description or type is never synthesized.

use serde_json::{Map, Value};
use tsys_core::NativeKind;

use crate::document::{SchemaDocument, SchemaError};
use crate::validate::{CompiledSchema, SchemaValidationError};

/// Definition name used in messages about the document root.
const ROOT: &str = "root";

/// A resolved, compiled sub-schema and its metadata.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    definition_key: Option<String>,
    description: String,
    example: Value,
    schema_kind: String,
    native_kind: NativeKind,
    schema: Value,
    compiled: CompiledSchema,
}

impl ResolvedSchema {
    /// Select the root schema (`None`) or `definitions/<key>` of `document`.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] naming the first missing piece: the
    /// definition itself, its description, type or example, or a reference
    /// that cannot be resolved.
    pub fn select(document: &SchemaDocument, definition_key: Option<&str>) -> Result<Self, SchemaError> {
        let (target, label) = match definition_key {
            Some(key) => {
                let definition = document
                    .definition(key)
                    .ok_or_else(|| SchemaError::UndefinedDefinition(key.to_string()))?;
                (definition.clone(), key)
            }
            None => (document.root().clone(), ROOT),
        };
        let resolved = document.resolve_schema(&target)?;

        let description = match resolved.get("description").and_then(Value::as_str) {
            Some(description) => description.to_string(),
            None if definition_key.is_none() => return Err(SchemaError::MissingDescription),
            None => return Err(missing(label, "description")),
        };

        let declared = match resolved.get("type") {
            Some(declared) => declared,
            None if definition_key.is_none() => return Err(SchemaError::MissingType),
            None => return Err(missing(label, "type")),
        };
        let (schema_kind, native_kind) = declared_kind(declared)?;

        let example = match definition_key {
            Some(_) => example_for(document, &resolved, label)?,
            None => root_example(document, &resolved)?,
        };

        let schema = document.resolve_deep(&target)?;
        let name = match definition_key {
            Some(key) => format!("{}#/definitions/{key}", document.name()),
            None => document.name().to_string(),
        };
        let compiled = CompiledSchema::compile(&name, &schema)?;

        tracing::debug!(
            schema = %name,
            kind = %schema_kind,
            "resolved schema target"
        );

        Ok(Self {
            definition_key: definition_key.map(str::to_string),
            description,
            example,
            schema_kind,
            native_kind,
            schema,
            compiled,
        })
    }

    /// The definition key this target was selected by, if any.
    pub fn definition_key(&self) -> Option<&str> {
        self.definition_key.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn example(&self) -> &Value {
        &self.example
    }

    /// The declared JSON Schema type, e.g. `"integer"`.
    pub fn schema_kind(&self) -> &str {
        &self.schema_kind
    }

    pub fn native_kind(&self) -> NativeKind {
        self.native_kind
    }

    /// The self-contained schema the validator was compiled from.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Validate `instance` against the compiled schema.
    ///
    /// # Errors
    ///
    /// Returns every violation the validator reports.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        self.compiled.validate(instance)
    }
}

fn missing(definition: &str, keyword: &str) -> SchemaError {
    SchemaError::DefinitionMissing {
        definition: definition.to_string(),
        keyword: keyword.to_string(),
    }
}

/// Name a `type` keyword stands for: the string itself, or the first
/// non-`null` entry of a list.
fn type_name(declared: &Value) -> Option<&str> {
    match declared {
        Value::String(name) => Some(name.as_str()),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|name| *name != "null"),
        _ => None,
    }
}

/// Map a `type` keyword to its name and native kind.
fn declared_kind(declared: &Value) -> Result<(String, NativeKind), SchemaError> {
    let name = match (type_name(declared), declared) {
        (Some(name), _) => name.to_string(),
        (None, Value::Array(_)) => {
            tracing::warn!(types = %declared, "schema type list has no non-null entry");
            return Err(SchemaError::UnsupportedType("null".to_string()));
        }
        (None, other) => return Err(SchemaError::UnsupportedType(other.to_string())),
    };
    let kind = NativeKind::from_json_type(&name)
        .ok_or_else(|| SchemaError::UnsupportedType(name.clone()))?;
    Ok((name, kind))
}

/// The example of a (resolved) definition, synthesized for objects and
/// arrays when not given.
fn example_for(document: &SchemaDocument, schema: &Value, label: &str) -> Result<Value, SchemaError> {
    if let Some(example) = schema.get("example") {
        return Ok(example.clone());
    }
    match schema.get("type").and_then(type_name) {
        Some("array") => {
            let items = schema.get("items").ok_or_else(|| missing(label, "example"))?;
            let items = document.resolve_schema(items)?;
            Ok(Value::Array(vec![example_for(document, &items, label)?]))
        }
        Some("object") => {
            let properties = schema
                .get("properties")
                .and_then(Value::as_object)
                .ok_or_else(|| missing(label, "example"))?;
            property_examples(document, properties, label)
        }
        _ => Err(missing(label, "example")),
    }
}

/// The root example: explicit, or assembled from the root's properties.
fn root_example(document: &SchemaDocument, root: &Value) -> Result<Value, SchemaError> {
    if let Some(example) = root.get("example") {
        return Ok(example.clone());
    }
    match root.get("properties").and_then(Value::as_object) {
        Some(properties) if !properties.is_empty() => property_examples(document, properties, ROOT),
        _ => Err(SchemaError::MissingExample),
    }
}

fn property_examples(
    document: &SchemaDocument,
    properties: &Map<String, Value>,
    label: &str,
) -> Result<Value, SchemaError> {
    let mut example = Map::new();
    for (name, property) in properties {
        let property = document.resolve_schema(property)?;
        example.insert(name.clone(), example_for(document, &property, label)?);
    }
    Ok(Value::Object(example))
}
