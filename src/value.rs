//! Typed configuration values.
//!
//! Every configurable field holds one of four kinds of value. Conversion,
//! emptiness checks and normalization all dispatch on [`Value`] by pattern
//! match.

use crate::error::AssignError;
use serde::Serialize;
use std::fmt;

/// The kind of a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Bool,
    Int,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => write!(f, "string"),
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::Int => write!(f, "int"),
            ValueKind::List => write!(f, "list"),
        }
    }
}

/// A resolved configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    List(Vec<String>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::List(_) => ValueKind::List,
        }
    }

    /// Whether the value is the zero value for its kind.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::List(items) => items.is_empty(),
        }
    }

    /// Convert raw config file text into a value of `kind`.
    ///
    /// Lists split on `,` without trimming or dropping empty items; the
    /// `list` normalization takes care of that when a field asks for it.
    pub fn parse(kind: ValueKind, raw: &str) -> Result<Self, AssignError> {
        match kind {
            ValueKind::String => Ok(Value::String(raw.to_string())),
            ValueKind::List => Ok(Value::List(raw.split(',').map(str::to_string).collect())),
            ValueKind::Bool => parse_bool(raw).map(Value::Bool),
            ValueKind::Int => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| AssignError::InvalidInt(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool, AssignError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(AssignError::InvalidBool(raw.to_string())),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::List(items) => write!(f, "{}", items.join(",")),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::List(value)
    }
}

impl From<Vec<&str>> for Value {
    fn from(value: Vec<&str>) -> Self {
        Value::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Rust types that can back a configuration field.
pub trait FieldValue: Sized {
    const KIND: ValueKind;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, AssignError>;
}

macro_rules! impl_field_value {
    ($ty:ty, $variant:ident, $kind:ident) => {
        impl FieldValue for $ty {
            const KIND: ValueKind = ValueKind::$kind;

            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }

            fn from_value(value: Value) -> Result<Self, AssignError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(AssignError::KindMismatch {
                        expected: Self::KIND,
                        found: other.kind(),
                    }),
                }
            }
        }
    };
}

impl_field_value!(String, String, String);
impl_field_value!(bool, Bool, Bool);
impl_field_value!(i64, Int, Int);
impl_field_value!(Vec<String>, List, List);
