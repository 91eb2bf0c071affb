//! # Type Factory
//!
//! Entry points for building type definitions. Each constructor starts from
//! the kind's defaults and returns its builder; the builder's setters apply
//! the overrides and `build()` validates the result.
//!
//! [`new_type`] derives a variant of an existing definition: the copy keeps
//! every attribute of the original, accepts further overrides, and never
//! touches the original.
//!
//! ```ignore
//! let id = integer("Campaign ID.").minimum(1).build()?;
//! let maybe_id = new_type(&id).nullable(true).build()?;
//! ```

use std::path::Path;
use std::sync::Arc;

use tsys_schema::SchemaDocument;

use crate::array::ArrayType;
use crate::boolean::BooleanType;
use crate::common::{Common, Configure};
use crate::def::TypeDef;
use crate::enumeration::EnumType;
use crate::error::DefinitionError;
use crate::numeric::NumericType;
use crate::object::ObjectType;
use crate::schema::{JsonSchemaBuilder, SchemaType};
use crate::string::StringType;
use crate::union::UnionType;

pub fn string(description: impl Into<String>) -> StringType {
    StringType::new(description)
}

pub fn integer(description: impl Into<String>) -> NumericType {
    NumericType::new(description, true)
}

pub fn number(description: impl Into<String>) -> NumericType {
    NumericType::new(description, false)
}

pub fn boolean(description: impl Into<String>) -> BooleanType {
    BooleanType::new(description)
}

/// An enum over `values`, which are matched as strings.
pub fn enumeration<I, S>(description: impl Into<String>, values: I) -> EnumType
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EnumType::new(description, values.into_iter().map(Into::into).collect())
}

pub fn object(description: impl Into<String>) -> ObjectType {
    ObjectType::new(description)
}

pub fn array(description: impl Into<String>) -> ArrayType {
    ArrayType::new(description)
}

/// A union trying `types` in order.
pub fn union(description: impl Into<String>, types: Vec<TypeDef>) -> UnionType {
    UnionType::new(description, types)
}

/// A type backed by an already-loaded schema document. The description
/// and example default to the document's.
pub fn json_schema(document: Arc<SchemaDocument>) -> JsonSchemaBuilder {
    JsonSchemaBuilder::new(document)
}

/// Load a JSON or YAML schema document and start a schema-backed type.
///
/// # Errors
///
/// Returns [`DefinitionError::Schema`] when the file, or a sibling file it
/// references, cannot be read or parsed.
pub fn json_schema_file(path: impl AsRef<Path>) -> Result<JsonSchemaBuilder, DefinitionError> {
    let document = SchemaDocument::from_file(path.as_ref())?;
    Ok(JsonSchemaBuilder::new(Arc::new(document)))
}

// ---------------------------------------------------------------------------
// Derived definitions
// ---------------------------------------------------------------------------

/// A copy of an existing definition, open for overrides.
#[derive(Debug, Clone)]
pub enum TypeBuilder {
    String(StringType),
    Numeric(NumericType),
    Boolean(BooleanType),
    Enum(EnumType),
    Object(ObjectType),
    Array(ArrayType),
    Union(UnionType),
    Schema(SchemaType),
}

/// Start a new definition from every attribute of `base`.
pub fn new_type(base: &TypeDef) -> TypeBuilder {
    match base.clone() {
        TypeDef::String(t) => TypeBuilder::String(t),
        TypeDef::Numeric(t) => TypeBuilder::Numeric(t),
        TypeDef::Boolean(t) => TypeBuilder::Boolean(t),
        TypeDef::Enum(t) => TypeBuilder::Enum(t),
        TypeDef::Object(t) => TypeBuilder::Object(t),
        TypeDef::Array(t) => TypeBuilder::Array(t),
        TypeDef::Union(t) => TypeBuilder::Union(t),
        TypeDef::Schema(t) => TypeBuilder::Schema(t),
    }
}

impl TypeBuilder {
    /// Validate the overrides and produce the derived definition.
    ///
    /// # Errors
    ///
    /// Fails when the overrides leave the definition inconsistent, for
    /// example a blank description.
    pub fn build(self) -> Result<TypeDef, DefinitionError> {
        match self {
            Self::String(t) => t.build(),
            Self::Numeric(t) => t.build(),
            Self::Boolean(t) => t.build(),
            Self::Enum(t) => t.build(),
            Self::Object(t) => t.build(),
            Self::Array(t) => t.build(),
            Self::Union(t) => t.build(),
            Self::Schema(t) => t.build(),
        }
    }

    /// Kind-specific overrides for a string base.
    pub fn into_string(self) -> Option<StringType> {
        match self {
            Self::String(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_numeric(self) -> Option<NumericType> {
        match self {
            Self::Numeric(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_boolean(self) -> Option<BooleanType> {
        match self {
            Self::Boolean(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_enum(self) -> Option<EnumType> {
        match self {
            Self::Enum(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<ObjectType> {
        match self {
            Self::Object(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<ArrayType> {
        match self {
            Self::Array(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_union(self) -> Option<UnionType> {
        match self {
            Self::Union(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_schema(self) -> Option<SchemaType> {
        match self {
            Self::Schema(t) => Some(t),
            _ => None,
        }
    }
}

impl Configure for TypeBuilder {
    fn common_mut(&mut self) -> &mut Common {
        match self {
            Self::String(t) => t.common_mut(),
            Self::Numeric(t) => t.common_mut(),
            Self::Boolean(t) => t.common_mut(),
            Self::Enum(t) => t.common_mut(),
            Self::Object(t) => t.common_mut(),
            Self::Array(t) => t.common_mut(),
            Self::Union(t) => t.common_mut(),
            Self::Schema(t) => t.common_mut(),
        }
    }
}
