//! # Schema-Backed Type
//!
//! Bridges a JSON Schema document into the type-definition contract. The
//! description, example and native kind come from the document (root or a
//! named definition) and are fixed when the type is built; validation is
//! delegated to the compiled schema.
//!
//! String inputs get a best-effort pre-parse into the schema's declared
//! kind first, so `"5"` from a query string validates against an integer
//! schema. Inputs that do not parse are validated as they are.

use std::sync::Arc;

use serde_json::Value;
use tsys_core::{parse_value, JsonType, Native, NativeKind, TypeSystemError};
use tsys_schema::{ResolvedSchema, SchemaDocument};

use crate::common::{Common, Configure};
use crate::def::TypeDef;
use crate::error::DefinitionError;

/// Builder for a schema-backed type.
#[derive(Debug, Clone)]
pub struct JsonSchemaBuilder {
    common: Common,
    document: Arc<SchemaDocument>,
    definition_key: Option<String>,
}

impl JsonSchemaBuilder {
    pub(crate) fn new(document: Arc<SchemaDocument>) -> Self {
        Self {
            common: Common::default(),
            document,
            definition_key: None,
        }
    }

    /// Select `definitions/<key>` instead of the document root.
    pub fn definition_key(mut self, key: impl Into<String>) -> Self {
        self.definition_key = Some(key.into());
        self
    }

    /// Resolve the target schema and compile it.
    ///
    /// A description or example set on the builder overrides the one found
    /// in the document.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::Schema`] when the target is missing, lacks
    /// a description, type or example, or has unresolvable references.
    pub fn build(self) -> Result<TypeDef, DefinitionError> {
        let resolved = ResolvedSchema::select(&self.document, self.definition_key.as_deref())?;
        let mut common = self.common;
        if common.description.trim().is_empty() {
            common.description = resolved.description().to_string();
        }
        if common.example.is_none() {
            common.example = Some(resolved.example().clone());
        }
        let schema = SchemaType {
            common,
            resolved: Arc::new(resolved),
        };
        schema.common.check("JsonSchema")?;
        Ok(TypeDef::Schema(schema))
    }
}

impl Configure for JsonSchemaBuilder {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}

/// A built schema-backed type definition.
#[derive(Debug, Clone)]
pub struct SchemaType {
    pub(crate) common: Common,
    resolved: Arc<ResolvedSchema>,
}

impl SchemaType {
    /// The declared JSON Schema type, e.g. `"object"`.
    pub fn schema_kind(&self) -> &str {
        self.resolved.schema_kind()
    }

    pub fn native_kind(&self) -> NativeKind {
        self.resolved.native_kind()
    }

    pub fn definition_key(&self) -> Option<&str> {
        self.resolved.definition_key()
    }

    /// The resolved, compiled schema.
    pub fn resolved(&self) -> &ResolvedSchema {
        &self.resolved
    }

    /// # Errors
    ///
    /// Fails on a blank description.
    pub fn build(self) -> Result<TypeDef, DefinitionError> {
        self.common.check("JsonSchema")?;
        Ok(TypeDef::Schema(self))
    }

    pub(crate) fn coerce(&self, value: &Value) -> Result<Native, TypeSystemError> {
        let value = match value {
            Value::String(raw) => {
                let allowed = [JsonType::from(self.native_kind())];
                match parse_value(raw, &allowed, "value") {
                    Ok((_, parsed)) => parsed,
                    Err(_) => value.clone(),
                }
            }
            other => other.clone(),
        };
        self.resolved
            .validate(&value)
            .map_err(|e| TypeSystemError::message(e.summary()))?;
        Ok(Native::from_json(&value))
    }
}

impl Configure for SchemaType {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}
