#![forbid(unsafe_code)]

//! The runtime value tree.
//!
//! Every piece of UI description and every piece of stored UI state is a
//! [`Value`]: a plain data tree of scalars, arrays, options, structs (ordered
//! named fields), and tagged unions. Component constructors produce these;
//! the state store persists their encoded form.
//!
//! # Invariants
//!
//! 1. Struct field order is insertion order and is significant for equality.
//! 2. `Value` carries no behavior: no closures, no handles, no interior
//!    mutability. Cloning is always a deep copy.

use serde::{Deserialize, Serialize};

/// A typed data tree describing UI or UI state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// The unit value (empty payload).
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Homogeneous sequence.
    Array(Vec<Value>),
    /// Present-or-absent wrapper.
    Option(Option<Box<Value>>),
    /// Named fields in insertion order.
    Struct(Vec<(String, Value)>),
    /// One variant of a tagged union.
    Union { tag: String, payload: Box<Value> },
}

impl Value {
    /// Build a string value.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Build a present option.
    #[must_use]
    pub fn some(value: Value) -> Self {
        Self::Option(Some(Box::new(value)))
    }

    /// Build an absent option.
    #[must_use]
    pub const fn none() -> Self {
        Self::Option(None)
    }

    /// Build a struct from `(name, value)` pairs, preserving order.
    #[must_use]
    pub fn record<N: Into<String>>(fields: impl IntoIterator<Item = (N, Value)>) -> Self {
        Self::Struct(fields.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }

    /// Build a tagged-union value.
    #[must_use]
    pub fn union(tag: impl Into<String>, payload: Value) -> Self {
        Self::Union {
            tag: tag.into(),
            payload: Box::new(payload),
        }
    }

    /// Short name of this value's shape, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Array(_) => "array",
            Self::Option(_) => "option",
            Self::Struct(_) => "struct",
            Self::Union { .. } => "union",
        }
    }

    /// The boolean payload, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The string payload, if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a struct field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }
}
