//! # Options Shared by Every Kind
//!
//! Every type definition carries a [`Common`] block: description, example,
//! nullability, an alternate parameter name, a default used by enclosing
//! objects, a pre-validation parser for raw parameter strings, and a custom
//! validation hook run after the built-in checks.
//!
//! The [`Configure`] trait gives every builder the same consuming setters
//! for these options.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tsys_core::{Native, TypeSystemError};

use crate::error::DefinitionError;

/// Transforms a raw parameter string into a JSON value before validation.
pub type Parser = Arc<dyn Fn(&str) -> Result<Value, TypeSystemError> + Send + Sync>;

/// Custom validation run against the coerced value.
pub type Hook = Arc<dyn Fn(&Native) -> Result<(), TypeSystemError> + Send + Sync>;

/// Options every kind of type definition accepts.
#[derive(Clone, Default)]
pub struct Common {
    pub(crate) description: String,
    pub(crate) example: Option<Value>,
    pub(crate) nullable: bool,
    pub(crate) param_name: Option<String>,
    pub(crate) default: Option<Value>,
    pub(crate) parser: Option<Parser>,
    pub(crate) hook: Option<Hook>,
}

impl Common {
    pub(crate) fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Reject definitions without a usable description.
    pub(crate) fn check(&self, kind: &'static str) -> Result<(), DefinitionError> {
        if self.description.trim().is_empty() {
            return Err(DefinitionError::MissingDescription { kind });
        }
        Ok(())
    }

    pub(crate) fn run_hook(&self, value: &Native) -> Result<(), TypeSystemError> {
        match &self.hook {
            Some(hook) => hook(value),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Common {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Common")
            .field("description", &self.description)
            .field("example", &self.example)
            .field("nullable", &self.nullable)
            .field("param_name", &self.param_name)
            .field("default", &self.default)
            .field("parser", &self.parser.as_ref().map(|_| "<fn>"))
            .field("hook", &self.hook.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Consuming setters for the options in [`Common`].
pub trait Configure: Sized {
    fn common_mut(&mut self) -> &mut Common;

    fn description(mut self, description: impl Into<String>) -> Self {
        self.common_mut().description = description.into();
        self
    }

    /// Override the synthesized example.
    fn example(mut self, example: impl Into<Value>) -> Self {
        self.common_mut().example = Some(example.into());
        self
    }

    /// Accept `null` and pass it through unchanged.
    fn nullable(mut self, nullable: bool) -> Self {
        self.common_mut().nullable = nullable;
        self
    }

    /// Request key to read this value from, when it differs from the
    /// parameter name.
    fn param_name(mut self, name: impl Into<String>) -> Self {
        self.common_mut().param_name = Some(name.into());
        self
    }

    /// Value an enclosing object uses when this property is absent.
    fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.common_mut().default = Some(value.into());
        self
    }

    /// Replace the built-in parameter-string parsing.
    fn parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> Result<Value, TypeSystemError> + Send + Sync + 'static,
    {
        self.common_mut().parser = Some(Arc::new(parser));
        self
    }

    /// Run `hook` on the coerced value after the built-in checks pass.
    fn validator<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Native) -> Result<(), TypeSystemError> + Send + Sync + 'static,
    {
        self.common_mut().hook = Some(Arc::new(hook));
        self
    }
}
