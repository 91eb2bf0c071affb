//! # Compiled Validators
//!
//! Wraps a `jsonschema` validator built from a fully inlined schema. The
//! schema handed to [`CompiledSchema::compile`] must already be
//! self-contained (see [`SchemaDocument::resolve_deep`]); the retriever
//! refuses every remote reference, so validation never touches the network.
//!
//! [`SchemaDocument::resolve_deep`]: crate::SchemaDocument::resolve_deep

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::document::SchemaError;

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// One failed constraint, with the location of the offending value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the value that failed, empty for the root.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    /// The validator's message.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() {
            "(root)"
        } else {
            &self.instance_path
        };
        write!(f, "{path}: {}", self.message)
    }
}

/// Error returned when a value does not satisfy a compiled schema.
#[derive(Error, Debug, Clone)]
pub enum SchemaValidationError {
    /// At least one constraint failed.
    #[error("{} validation error(s) against {schema_name}", .violations.len())]
    ValidationFailed {
        /// The schema that was violated.
        schema_name: String,
        /// Every violation found, in validator order.
        violations: Vec<Violation>,
    },
}

impl SchemaValidationError {
    /// The individual violations.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::ValidationFailed { violations, .. } => violations,
        }
    }

    /// The validator messages joined into one line, the form surfaced to
    /// callers of schema-backed types.
    pub fn summary(&self) -> String {
        self.violations()
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ---------------------------------------------------------------------------
// Retriever
// ---------------------------------------------------------------------------

/// Refuses every external reference; inlined schemas never need one.
struct LocalOnlyRetriever;

impl jsonschema::Retrieve for LocalOnlyRetriever {
    fn retrieve(
        &self,
        uri: &jsonschema::Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("remote schema not available: {}", uri.as_str()).into())
    }
}

// ---------------------------------------------------------------------------
// CompiledSchema
// ---------------------------------------------------------------------------

/// A schema compiled once and shared by every validation call.
#[derive(Clone)]
pub struct CompiledSchema {
    name: String,
    validator: Arc<jsonschema::Validator>,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl CompiledSchema {
    /// Compile a self-contained schema under JSON Schema draft 4, the
    /// dialect the `definitions`/`$ref` layout belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if the schema is malformed.
    pub fn compile(name: &str, schema: &Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft4)
            .with_retriever(LocalOnlyRetriever)
            .build(schema)
            .map_err(|e| SchemaError::Compile {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            name: name.to_string(),
            validator: Arc::new(validator),
        })
    }

    /// Name used in error reports.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check `instance`, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::ValidationFailed`] if any constraint fails.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|err| Violation {
                instance_path: err.instance_path.to_string(),
                schema_path: err.schema_path.to_string(),
                message: err.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::trace!(
                schema = %self.name,
                count = violations.len(),
                "schema validation failed"
            );
            Err(SchemaValidationError::ValidationFailed {
                schema_name: self.name.clone(),
                violations,
            })
        }
    }

    /// `true` if `instance` satisfies the schema.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}
