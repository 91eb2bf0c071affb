//! # Array Type
//!
//! Homogeneous arrays validate every element against one item type;
//! positional arrays validate element *i* against item type *i* and pass
//! trailing elements through untouched when `additional_items` allows them.
//!
//! Length violations fail the call immediately. Per-element failures,
//! including duplicates under `unique_items`, are aggregated by index.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tsys_core::{ErrorCode, ErrorDetail, ErrorKey, Native, TypeSystemError};

use crate::common::{Common, Configure};
use crate::def::TypeDef;
use crate::error::DefinitionError;

const KIND: &str = "Array";

const TYPE: &str = "Must be a list.";
const MIN_ITEMS: &str = "Not enough items.";
const MAX_ITEMS: &str = "Too many items.";
const UNIQUE_ITEMS: &str = "This item is not unique.";

/// How array elements are typed.
#[derive(Debug, Clone)]
pub enum Items {
    /// Every element has this type.
    Single(Box<TypeDef>),
    /// Element *i* has type *i*.
    Positional(Vec<TypeDef>),
}

/// An array type definition.
#[derive(Debug, Clone)]
pub struct ArrayType {
    pub(crate) common: Common,
    items: Option<Items>,
    additional_items: bool,
    min_items: usize,
    max_items: Option<usize>,
    unique_items: bool,
}

impl ArrayType {
    pub(crate) fn new(description: impl Into<String>) -> Self {
        Self {
            common: Common::new(description),
            items: None,
            additional_items: false,
            min_items: 0,
            max_items: None,
            unique_items: false,
        }
    }

    /// Type every element.
    pub fn items(mut self, def: TypeDef) -> Self {
        self.items = Some(Items::Single(Box::new(def)));
        self
    }

    /// Type elements by position.
    pub fn positional_items(mut self, defs: Vec<TypeDef>) -> Self {
        self.items = Some(Items::Positional(defs));
        self
    }

    /// Allow elements past the positional item types.
    pub fn additional_items(mut self, allowed: bool) -> Self {
        self.additional_items = allowed;
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = min;
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn unique_items(mut self, unique: bool) -> Self {
        self.unique_items = unique;
        self
    }

    pub fn item_defs(&self) -> Option<&Items> {
        self.items.as_ref()
    }

    /// # Errors
    ///
    /// Fails on a blank description or `min_items > max_items`.
    pub fn build(self) -> Result<TypeDef, DefinitionError> {
        self.common.check(KIND)?;
        if let Some(max) = self.max_items {
            if self.min_items > max {
                return Err(DefinitionError::constraint(
                    KIND,
                    format!("min_items {} exceeds max_items {max}", self.min_items),
                ));
            }
        }
        Ok(TypeDef::Array(self))
    }

    /// `[1]` untyped, `[item example]` homogeneous, one example per position
    /// otherwise.
    pub(crate) fn synthesized_example(&self) -> Value {
        match &self.items {
            None => Value::Array(vec![Value::from(1)]),
            Some(Items::Single(def)) => Value::Array(vec![def.example()]),
            Some(Items::Positional(defs)) => {
                Value::Array(defs.iter().map(TypeDef::example).collect())
            }
        }
    }

    pub(crate) fn coerce(&self, value: &Value) -> Result<Native, TypeSystemError> {
        let raw = match value {
            Value::Array(items) => items,
            _ => return Err(TypeSystemError::new(ErrorCode::Type, TYPE)),
        };
        let len = raw.len();

        if let Some(Items::Positional(defs)) = &self.items {
            if defs.len() > 1 {
                if len < defs.len() {
                    return Err(TypeSystemError::new(ErrorCode::MinItems, MIN_ITEMS));
                }
                if len > defs.len() && !self.additional_items {
                    return Err(TypeSystemError::new(ErrorCode::MaxItems, MAX_ITEMS));
                }
            }
        }
        if len < self.min_items {
            return Err(TypeSystemError::new(ErrorCode::MinItems, MIN_ITEMS));
        }
        if self.max_items.is_some_and(|max| len > max) {
            return Err(TypeSystemError::new(ErrorCode::MaxItems, MAX_ITEMS));
        }

        let mut coerced: Vec<Native> = Vec::with_capacity(len);
        let mut errors: BTreeMap<ErrorKey, ErrorDetail> = BTreeMap::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (pos, item) in raw.iter().enumerate() {
            let result = match &self.items {
                Some(Items::Single(def)) => def.validate(item),
                Some(Items::Positional(defs)) => match defs.get(pos) {
                    Some(def) => def.validate(item),
                    None => Ok(Native::from_json(item)),
                },
                None => Ok(Native::from_json(item)),
            };
            let native = match result {
                Ok(native) => native,
                Err(e) => {
                    errors.insert(ErrorKey::from(pos), e.into_detail());
                    continue;
                }
            };
            if self.unique_items && !seen.insert(unique_key(&native)) {
                errors.insert(
                    ErrorKey::from(pos),
                    TypeSystemError::new(ErrorCode::UniqueItems, UNIQUE_ITEMS).into_detail(),
                );
                continue;
            }
            coerced.push(native);
        }

        if !errors.is_empty() {
            return Err(TypeSystemError::aggregate(errors));
        }
        Ok(Native::Array(coerced))
    }
}

/// Identity of an element under `unique_items`. Numbers compare by value,
/// so `1` and `1.0` share a key.
fn unique_key(native: &Native) -> String {
    canonical(native).to_string()
}

fn canonical(native: &Native) -> Value {
    match native {
        Native::Float(f) if f.fract() == 0.0 && *f >= -(2f64.powi(63)) && *f < 2f64.powi(63) => {
            Value::from(*f as i64)
        }
        Native::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        Native::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), canonical(v)))
                .collect(),
        ),
        other => other.to_json(),
    }
}

impl Configure for ArrayType {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}
