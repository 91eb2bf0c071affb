//! # tsys-schema: Schema Documents for the tsys Type Engine
//!
//! Loads JSON Schema documents written in YAML or JSON, resolves their
//! `$ref`s (same-document and sibling-file), and compiles selected
//! sub-schemas into validators backed by the `jsonschema` crate.
//!
//! ## Design
//!
//! - [`SchemaDocument`] reads the document and every referenced sibling
//!   file once, at construction.
//! - [`ResolvedSchema::select`] picks the root or a named definition,
//!   inlines its references, extracts its metadata and compiles it.
//! - Reference cycles and dangling pointers are construction-time
//!   [`SchemaError`]s, never validation-time surprises.
//!
//! ## Crate Policy
//!
//! - Depends only on `tsys-core` internally.
//! - Performs file I/O only inside [`SchemaDocument::from_file`] and
//!   [`SchemaDocument::from_value_in`].
//! - No `unsafe` code.

pub mod document;
pub mod target;
pub mod validate;

pub use document::{SchemaDocument, SchemaError};
pub use target::ResolvedSchema;
pub use validate::{CompiledSchema, SchemaValidationError, Violation};
