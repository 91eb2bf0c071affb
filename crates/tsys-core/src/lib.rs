//! # tsys-core: Foundational Types for the tsys Type Engine
//!
//! The leaf crate of the workspace. It defines the vocabulary every other
//! crate speaks when validating and coercing untyped input:
//!
//! 1. **One error model.** [`TypeSystemError`] carries either a coded message
//!    or an aggregate keyed by field name / array index. Composite types
//!    aggregate, leaf types raise immediately.
//!
//! 2. **Plain native output.** [`Native`] is what a successful coercion
//!    returns: strings, numbers, booleans, temporal values, sequences and
//!    string-keyed maps. No validator identity survives into the value.
//!
//! 3. **Written-form numeric limits.** [`Limit`] keeps `30` and `3.0` apart
//!    so error messages echo the constraint as it was configured.
//!
//! 4. **Parameter parsing.** [`parsers::parse_value`] converts untyped
//!    request strings into JSON values of an allowed kind.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tsys-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod parsers;
pub mod value;

pub use error::{repr_list, repr_str, ErrorCode, ErrorDetail, ErrorKey, ParseError, TypeSystemError};
pub use parsers::{parse_json, parse_value, JsonType};
pub use value::{Limit, Native, NativeKind};
