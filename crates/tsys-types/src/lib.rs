//! # tsys-types: The Type Engine
//!
//! Declarative type definitions that validate untyped input and coerce it
//! to [`Native`](tsys_core::Native) values.
//!
//! ## Kinds
//!
//! | Kind | Builder | Coerces to |
//! |------|---------|------------|
//! | String | [`factory::string`] | string, or a date/time for temporal formats |
//! | Integer, Number | [`factory::integer`], [`factory::number`] | `i64` / `f64` |
//! | Boolean | [`factory::boolean`] | `bool` |
//! | Enum | [`factory::enumeration`] | the matched candidate |
//! | Object | [`factory::object`] | string-keyed map |
//! | Array | [`factory::array`] | list |
//! | Union | [`factory::union`] | the first candidate that accepts the value |
//! | Schema | [`factory::json_schema`] | whatever the backing JSON Schema accepts |
//!
//! ## Design
//!
//! A builder is consumed by `build()`, which checks the definition and
//! returns an immutable [`TypeDef`]. Definitions are built once and then
//! shared; validation never mutates them, so one definition serves any
//! number of threads.
//!
//! Leaf kinds fail on the first violation with a coded message. Objects and
//! arrays collect every child failure into one aggregate keyed by field
//! name or index.
//!
//! ## Crate Policy
//!
//! - Depends on `tsys-core` for the error and value model and on
//!   `tsys-schema` for schema-backed types.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod array;
pub mod boolean;
pub mod common;
pub mod def;
pub mod enumeration;
pub mod error;
pub mod factory;
pub mod numeric;
pub mod object;
pub mod params;
pub mod schema;
pub mod string;
pub mod union;

pub use array::{ArrayType, Items};
pub use boolean::BooleanType;
pub use common::{Configure, Hook, Parser};
pub use def::TypeDef;
pub use enumeration::EnumType;
pub use error::DefinitionError;
pub use factory::{new_type, TypeBuilder};
pub use numeric::NumericType;
pub use object::ObjectType;
pub use params::{coerce_json_params, coerce_query_params, map_param_names, ParamSpec};
pub use schema::{JsonSchemaBuilder, SchemaType};
pub use string::{StringFormat, StringType};
pub use union::{UnionMatch, UnionType};
