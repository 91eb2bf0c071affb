//! # Numeric Types
//!
//! One definition shape serves both integers and floats. Limits are kept as
//! [`Limit`]s so messages echo them as written (`30`, `3.3`, `2.0`).
//!
//! `multiple_of` uses exact remainder arithmetic for an integer step and a
//! rounding tolerance on `value / step` for a fractional one.

use std::cmp::Ordering;

use serde_json::Value;
use tsys_core::{ErrorCode, Limit, Native, NativeKind, TypeSystemError};

use crate::common::{Common, Configure};
use crate::def::TypeDef;
use crate::error::DefinitionError;

// Half-open range of floats that convert to `i64` exactly.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

const TYPE: &str = "Must be a valid number.";
const FINITE: &str = "Must be a finite number.";

/// Relative tolerance for fractional `multiple_of` steps.
const STEP_TOLERANCE: f64 = 1e-9;

/// A coerced number before it becomes a [`Native`].
#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    fn cmp_limit(self, limit: Limit) -> Option<Ordering> {
        match (self, limit) {
            (Self::Int(a), Limit::Int(b)) => Some(a.cmp(&b)),
            _ => self.as_f64().partial_cmp(&limit.as_f64()),
        }
    }

    fn is_multiple_of(self, step: Limit) -> bool {
        match (self, step) {
            (Self::Int(a), Limit::Int(b)) => a % b == 0,
            (Self::Float(a), Limit::Int(b)) => a % (b as f64) == 0.0,
            (value, Limit::Float(b)) => {
                let quotient = value.as_f64() / b;
                (quotient - quotient.round()).abs() <= STEP_TOLERANCE * quotient.abs().max(1.0)
            }
        }
    }
}

/// An integer or number type definition.
#[derive(Debug, Clone)]
pub struct NumericType {
    pub(crate) common: Common,
    integer: bool,
    minimum: Option<Limit>,
    maximum: Option<Limit>,
    exclusive_minimum: bool,
    exclusive_maximum: bool,
    multiple_of: Option<Limit>,
}

impl NumericType {
    pub(crate) fn new(description: impl Into<String>, integer: bool) -> Self {
        Self {
            common: Common::new(description),
            integer,
            minimum: None,
            maximum: None,
            exclusive_minimum: false,
            exclusive_maximum: false,
            multiple_of: None,
        }
    }

    pub fn minimum(mut self, minimum: impl Into<Limit>) -> Self {
        self.minimum = Some(minimum.into());
        self
    }

    pub fn maximum(mut self, maximum: impl Into<Limit>) -> Self {
        self.maximum = Some(maximum.into());
        self
    }

    /// Treat `minimum` as a strict bound.
    pub fn exclusive_minimum(mut self, exclusive: bool) -> Self {
        self.exclusive_minimum = exclusive;
        self
    }

    /// Treat `maximum` as a strict bound.
    pub fn exclusive_maximum(mut self, exclusive: bool) -> Self {
        self.exclusive_maximum = exclusive;
        self
    }

    pub fn multiple_of(mut self, step: impl Into<Limit>) -> Self {
        self.multiple_of = Some(step.into());
        self
    }

    /// `true` for integer definitions.
    pub fn is_integer(&self) -> bool {
        self.integer
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        if self.integer {
            "Integer"
        } else {
            "Number"
        }
    }

    pub(crate) fn native_kind(&self) -> NativeKind {
        if self.integer {
            NativeKind::Integer
        } else {
            NativeKind::Number
        }
    }

    /// Validate the configuration and produce a type definition.
    ///
    /// # Errors
    ///
    /// Fails on a blank description, a non-positive or non-finite
    /// `multiple_of`, or a minimum above the maximum.
    pub fn build(self) -> Result<TypeDef, DefinitionError> {
        let kind = self.kind_name();
        self.common.check(kind)?;
        if let Some(step) = self.multiple_of {
            let step = step.as_f64();
            if !step.is_finite() || step <= 0.0 {
                return Err(DefinitionError::constraint(
                    kind,
                    format!("multiple_of must be positive, got {step}"),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.minimum, self.maximum) {
            if min.as_f64() > max.as_f64() {
                return Err(DefinitionError::constraint(
                    kind,
                    format!("minimum {min} exceeds maximum {max}"),
                ));
            }
        }
        Ok(TypeDef::Numeric(self))
    }

    /// Read a number. For integers, floats at or beyond 2^63 have no `i64`
    /// representation and are rejected rather than saturated.
    fn parse(&self, value: &Value) -> Option<Num> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(if self.integer { Num::Int(i) } else { Num::Float(i as f64) }),
                None => {
                    let f = n.as_f64()?;
                    if !self.integer {
                        Some(Num::Float(f))
                    } else if f.fract() == 0.0 && (I64_LOWER..I64_UPPER).contains(&f) {
                        Some(Num::Int(f as i64))
                    } else {
                        None
                    }
                }
            },
            Value::String(s) => {
                let s = s.trim();
                if self.integer {
                    s.parse::<i64>().ok().map(Num::Int)
                } else {
                    s.parse::<f64>().ok().map(Num::Float)
                }
            }
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub(crate) fn coerce(&self, value: &Value) -> Result<Native, TypeSystemError> {
        let num = self
            .parse(value)
            .ok_or_else(|| TypeSystemError::new(ErrorCode::Type, TYPE))?;

        if !num.as_f64().is_finite() {
            return Err(TypeSystemError::new(ErrorCode::Finite, FINITE));
        }

        if let Some(min) = self.minimum {
            let ord = num.cmp_limit(min);
            if self.exclusive_minimum {
                if matches!(ord, Some(Ordering::Less | Ordering::Equal)) {
                    return Err(TypeSystemError::new(
                        ErrorCode::ExclusiveMinimum,
                        format!("Must be greater than {min}."),
                    ));
                }
            } else if ord == Some(Ordering::Less) {
                return Err(TypeSystemError::new(
                    ErrorCode::Minimum,
                    format!("Must be greater than or equal to {min}."),
                ));
            }
        }

        if let Some(max) = self.maximum {
            let ord = num.cmp_limit(max);
            if self.exclusive_maximum {
                if matches!(ord, Some(Ordering::Greater | Ordering::Equal)) {
                    return Err(TypeSystemError::new(
                        ErrorCode::ExclusiveMaximum,
                        format!("Must be less than {max}."),
                    ));
                }
            } else if ord == Some(Ordering::Greater) {
                return Err(TypeSystemError::new(
                    ErrorCode::Maximum,
                    format!("Must be less than or equal to {max}."),
                ));
            }
        }

        if let Some(step) = self.multiple_of {
            if !num.is_multiple_of(step) {
                return Err(TypeSystemError::new(
                    ErrorCode::MultipleOf,
                    format!("Must be a multiple of {step}."),
                ));
            }
        }

        Ok(match num {
            Num::Int(i) => Native::Integer(i),
            Num::Float(f) => Native::Float(f),
        })
    }
}

impl Configure for NumericType {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}
