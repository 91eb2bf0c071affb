//! Boolean type: a fixed string vocabulary, truthiness for everything else.

use serde_json::Value;
use tsys_core::{ErrorCode, Native, TypeSystemError};

use crate::common::{Common, Configure};
use crate::def::TypeDef;
use crate::error::DefinitionError;

const TYPE: &str = "Must be a valid boolean.";

/// A boolean type definition.
#[derive(Debug, Clone)]
pub struct BooleanType {
    pub(crate) common: Common,
}

impl BooleanType {
    pub(crate) fn new(description: impl Into<String>) -> Self {
        Self {
            common: Common::new(description),
        }
    }

    /// # Errors
    ///
    /// Fails on a blank description.
    pub fn build(self) -> Result<TypeDef, DefinitionError> {
        self.common.check("Boolean")?;
        Ok(TypeDef::Boolean(self))
    }

    pub(crate) fn coerce(&self, value: &Value) -> Result<Native, TypeSystemError> {
        let b = match value {
            Value::String(s) => match s.to_lowercase().as_str() {
                "true" | "on" | "1" => true,
                "false" | "off" | "0" | "" => false,
                _ => return Err(TypeSystemError::new(ErrorCode::Type, TYPE)),
            },
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        };
        Ok(Native::Bool(b))
    }
}

impl Configure for BooleanType {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}
