//! # Check Subcommand
//!
//! Validates one value against a schema-backed type. By default VALUE is a
//! JSON document; with `--raw` it is treated as an untyped request
//! parameter and parsed into the type's kind first.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tsys_types::TypeDef;

use crate::{TypeSelector, EXIT_INVALID};

/// Arguments for `tsys check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TypeSelector,

    /// Treat VALUE as a raw parameter string instead of JSON.
    #[arg(long)]
    pub raw: bool,

    /// The value to check.
    #[arg(value_name = "VALUE")]
    pub value: String,
}

/// Result of checking one value.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The coerced value, rendered as JSON.
    Valid(Value),
    /// The error detail: a message or a map of nested messages.
    Invalid(Value),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Valid(_) => 0,
            Self::Invalid(_) => EXIT_INVALID,
        }
    }

    pub fn json(&self) -> &Value {
        match self {
            Self::Valid(v) | Self::Invalid(v) => v,
        }
    }
}

/// Execute `tsys check`.
///
/// Returns exit code 0 when the value is valid and 1 when it is not.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let def = args.target.build()?;
    let outcome = evaluate(&def, &args.value, args.raw)?;
    println!("{}", serde_json::to_string_pretty(outcome.json())?);
    Ok(outcome.exit_code())
}

/// Validate `input` against `def`.
///
/// # Errors
///
/// Fails only when `input` is not valid JSON and `raw` is off; validation
/// failures are an [`Outcome::Invalid`].
pub fn evaluate(def: &TypeDef, input: &str, raw: bool) -> Result<Outcome> {
    let result = if raw {
        def.coerce_param(input)
    } else {
        let value: Value = serde_json::from_str(input).context("VALUE is not valid JSON")?;
        def.validate(&value)
    };

    match result {
        Ok(native) => Ok(Outcome::Valid(native.to_json())),
        Err(e) => {
            tracing::debug!(error = %e, "value rejected");
            let detail = serde_json::to_value(e.detail()).context("failed to render error")?;
            Ok(Outcome::Invalid(detail))
        }
    }
}
