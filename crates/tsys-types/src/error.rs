//! Construction-time failures.
//!
//! A [`DefinitionError`] means a type definition was configured wrongly. It
//! is raised by `build()` and never while validating values; callers should
//! treat it as a programming error.

use thiserror::Error;
use tsys_schema::SchemaError;

/// A type definition could not be built.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The description is empty or blank.
    #[error("{kind} type did not define a description.")]
    MissingDescription {
        /// Kind name of the definition, e.g. `String`.
        kind: &'static str,
    },

    /// A union was built without candidates.
    #[error("Union type must define at least 1 candidate type.")]
    EmptyUnion,

    /// A string pattern is not a valid regular expression.
    #[error("invalid pattern /{pattern}/: {reason}")]
    InvalidPattern {
        /// The pattern as configured.
        pattern: String,
        /// Why the regex engine rejected it.
        reason: String,
    },

    /// Constraints contradict each other or are out of range.
    #[error("invalid {kind} constraint: {reason}")]
    InvalidConstraint {
        /// Kind name of the definition.
        kind: &'static str,
        /// What is wrong.
        reason: String,
    },

    /// The backing schema document could not be loaded or resolved.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl DefinitionError {
    pub(crate) fn constraint(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConstraint {
            kind,
            reason: reason.into(),
        }
    }
}
