//! # Union Type
//!
//! Tries candidates in declared order and accepts the first that validates.
//!
//! Which candidate matched is reported per call through [`UnionMatch`];
//! the definition itself never changes, so one union can be shared freely
//! between threads.

use serde_json::Value;
use tsys_core::{repr_list, repr_str, Native, NativeKind, TypeSystemError};

use crate::common::{Common, Configure};
use crate::def::TypeDef;
use crate::error::DefinitionError;

/// The outcome of a successful union resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionMatch {
    /// The value as coerced by the winning candidate.
    pub value: Native,
    /// Position of the winning candidate.
    pub index: usize,
    /// Native kind of the winning candidate.
    pub kind: NativeKind,
}

/// A union type definition.
#[derive(Debug, Clone)]
pub struct UnionType {
    pub(crate) common: Common,
    types: Vec<TypeDef>,
}

impl UnionType {
    pub(crate) fn new(description: impl Into<String>, types: Vec<TypeDef>) -> Self {
        Self {
            common: Common::new(description),
            types,
        }
    }

    /// Append a candidate.
    pub fn candidate(mut self, def: TypeDef) -> Self {
        self.types.push(def);
        self
    }

    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }

    /// # Errors
    ///
    /// Fails on a blank description or an empty candidate list.
    pub fn build(self) -> Result<TypeDef, DefinitionError> {
        self.common.check("Union")?;
        if self.types.is_empty() {
            return Err(DefinitionError::EmptyUnion);
        }
        Ok(TypeDef::Union(self))
    }

    /// Native kind before any value is seen: the first candidate's.
    pub(crate) fn first_kind(&self) -> NativeKind {
        self.types
            .first()
            .map(TypeDef::native_kind)
            .unwrap_or(NativeKind::String)
    }

    pub(crate) fn first_example(&self) -> Value {
        self.types
            .first()
            .map(TypeDef::example)
            .unwrap_or(Value::Null)
    }

    /// Find the first candidate that accepts `value`. The custom hook is
    /// not run here.
    ///
    /// # Errors
    ///
    /// When every candidate fails, the error names all candidate kinds and
    /// each one's failure, e.g.
    /// `Value is not one of ['Boolean', 'String']. {'Boolean': '...', 'String': '...'}`.
    pub fn resolve(&self, value: &Value) -> Result<UnionMatch, TypeSystemError> {
        // Candidates of the same kind share one entry; the last failure wins.
        let mut failures: Vec<(&'static str, String)> = Vec::new();
        for (index, candidate) in self.types.iter().enumerate() {
            match candidate.validate_matched(value) {
                Ok((native, kind)) => {
                    tracing::debug!(
                        index,
                        candidate = candidate.kind_name(),
                        %kind,
                        "union resolved"
                    );
                    return Ok(UnionMatch {
                        value: native,
                        index,
                        kind,
                    });
                }
                Err(e) => {
                    let name = candidate.kind_name();
                    let message = e.to_string();
                    match failures.iter_mut().find(|(n, _)| *n == name) {
                        Some(entry) => entry.1 = message,
                        None => failures.push((name, message)),
                    }
                }
            }
        }

        let names: Vec<&str> = self.types.iter().map(TypeDef::kind_name).collect();
        let details: Vec<String> = failures
            .iter()
            .map(|(name, message)| format!("{}: {}", repr_str(name), repr_str(message)))
            .collect();
        Err(TypeSystemError::message(format!(
            "Value is not one of {}. {{{}}}",
            repr_list(&names),
            details.join(", ")
        )))
    }
}

impl Configure for UnionType {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}
