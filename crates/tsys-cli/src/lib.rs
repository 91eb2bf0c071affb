//! # tsys-cli: Command-Line Front End
//!
//! Provides the `tsys` binary for working with schema-backed types from a
//! shell or CI job.
//!
//! ## Subcommands
//!
//! - `tsys check` validates a value and prints the coerced result or the
//!   error detail.
//! - `tsys describe` prints a type's description, kinds and example.
//!
//! ```bash
//! tsys check --schema annotation.yaml '{"annotation_id": 1, "name": "x"}'
//! tsys check --schema annotation.yaml --definition annotation_id --raw 42
//! tsys describe --schema annotation.yaml --definition urls
//! ```
//!
//! Exit codes: 0 valid, 1 invalid value, 2 operational error.

pub mod check;
pub mod describe;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tsys_types::factory::json_schema_file;
use tsys_types::TypeDef;

/// Exit code for a value that failed validation.
pub const EXIT_INVALID: u8 = 1;

/// Exit code for anything that kept validation from running.
pub const EXIT_OPERATIONAL: u8 = 2;

/// Selects the schema-backed type a subcommand works on.
#[derive(Args, Debug, Clone)]
pub struct TypeSelector {
    /// JSON or YAML schema document.
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Use `definitions/<KEY>` instead of the document root.
    #[arg(long, value_name = "KEY")]
    pub definition: Option<String>,
}

impl TypeSelector {
    /// Load the document and build the selected type.
    pub fn build(&self) -> Result<TypeDef> {
        load_type(&self.schema, self.definition.as_deref())
    }
}

/// Build a schema-backed type from `path`, optionally narrowed to one
/// definition.
pub fn load_type(path: &Path, definition: Option<&str>) -> Result<TypeDef> {
    let mut builder = json_schema_file(path)
        .with_context(|| format!("failed to load schema {}", path.display()))?;
    if let Some(key) = definition {
        builder = builder.definition_key(key);
    }
    let def = builder
        .build()
        .with_context(|| format!("failed to build type from {}", path.display()))?;
    tracing::info!(
        schema = %path.display(),
        definition = definition.unwrap_or("(root)"),
        kind = %def.native_kind(),
        "built schema-backed type"
    );
    Ok(def)
}
