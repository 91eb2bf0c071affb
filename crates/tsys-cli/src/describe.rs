//! # Describe Subcommand
//!
//! Prints what a schema-backed type accepts, as JSON.

use anyhow::Result;
use clap::Args;
use serde_json::{json, Value};
use tsys_types::TypeDef;

use crate::{TypeSelector, EXIT_OPERATIONAL};

/// Arguments for `tsys describe`.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub target: TypeSelector,
}

/// Execute `tsys describe`.
pub fn run_describe(args: &DescribeArgs) -> Result<u8> {
    let def = args.target.build()?;
    match describe(&def) {
        Some(summary) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(0)
        }
        None => {
            tracing::error!("not a schema-backed type");
            Ok(EXIT_OPERATIONAL)
        }
    }
}

/// Summarize a schema-backed type. `None` for other kinds.
pub fn describe(def: &TypeDef) -> Option<Value> {
    let schema = def.as_schema()?;
    Some(json!({
        "description": def.description(),
        "definition": schema.definition_key(),
        "schema_kind": schema.schema_kind(),
        "native_kind": def.native_kind().json_type(),
        "nullable": def.is_nullable(),
        "example": def.example(),
    }))
}
