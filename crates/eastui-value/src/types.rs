#![forbid(unsafe_code)]

//! Value schemas and structural conformance checking.
//!
//! A [`ValueType`] mirrors the shape of a [`Value`]. Component schemas are
//! `ValueType`s; the decode path uses them to reject state blobs whose shape
//! does not match what the reader expects.
//!
//! # Failure Modes
//!
//! - **Shape mismatch**: `check` reports the first offending position with a
//!   dotted path (`rows[2].label`), the expected type, and the found shape.
//!   The error propagates to the caller; nothing is recovered locally.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Schema for a [`Value`] tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueType {
    /// Matches any value. Used for child-node slots, where the node tree is
    /// recursive and open-ended.
    Any,
    Unit,
    Bool,
    Int,
    Float,
    Str,
    Array(Box<ValueType>),
    Option(Box<ValueType>),
    /// Named field types in declaration order. Order is significant.
    Struct(Vec<(String, ValueType)>),
    /// Named variant payload types.
    Union(Vec<(String, ValueType)>),
}

impl ValueType {
    /// Build an array type.
    #[must_use]
    pub fn array(elem: ValueType) -> Self {
        Self::Array(Box::new(elem))
    }

    /// Build an option type.
    #[must_use]
    pub fn option(inner: ValueType) -> Self {
        Self::Option(Box::new(inner))
    }

    /// Build a struct type from `(name, type)` pairs.
    #[must_use]
    pub fn record<N: Into<String>>(fields: impl IntoIterator<Item = (N, ValueType)>) -> Self {
        Self::Struct(fields.into_iter().map(|(n, t)| (n.into(), t)).collect())
    }

    /// Build a union type from `(tag, payload type)` pairs.
    #[must_use]
    pub fn union<N: Into<String>>(variants: impl IntoIterator<Item = (N, ValueType)>) -> Self {
        Self::Union(variants.into_iter().map(|(n, t)| (n.into(), t)).collect())
    }

    /// Short name of this type, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Unit => "unit",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Array(_) => "array",
            Self::Option(_) => "option",
            Self::Struct(_) => "struct",
            Self::Union(_) => "union",
        }
    }

    /// Check `value` against this schema.
    ///
    /// Returns the first mismatch found in a depth-first walk.
    pub fn check(&self, value: &Value) -> Result<(), TypeError> {
        check_at(self, value, String::new())
    }
}

fn mismatch(path: String, expected: &ValueType, found: &Value) -> TypeError {
    TypeError {
        path,
        expected: expected.name().to_string(),
        found: found.kind().to_string(),
    }
}

fn child(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

fn check_at(ty: &ValueType, value: &Value, path: String) -> Result<(), TypeError> {
    match (ty, value) {
        (ValueType::Any, _)
        | (ValueType::Unit, Value::Unit)
        | (ValueType::Bool, Value::Bool(_))
        | (ValueType::Int, Value::Int(_))
        | (ValueType::Float, Value::Float(_))
        | (ValueType::Str, Value::Str(_)) => Ok(()),
        (ValueType::Array(elem), Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                check_at(elem, item, format!("{path}[{i}]"))?;
            }
            Ok(())
        }
        (ValueType::Option(_), Value::Option(None)) => Ok(()),
        (ValueType::Option(inner), Value::Option(Some(v))) => check_at(inner, v, path),
        (ValueType::Struct(field_tys), Value::Struct(fields)) => {
            if field_tys.len() != fields.len() {
                return Err(TypeError {
                    path,
                    expected: format!("struct with {} fields", field_tys.len()),
                    found: format!("struct with {} fields", fields.len()),
                });
            }
            for ((want_name, want_ty), (got_name, got_val)) in field_tys.iter().zip(fields) {
                if want_name != got_name {
                    return Err(TypeError {
                        path: child(&path, want_name),
                        expected: format!("field `{want_name}`"),
                        found: format!("field `{got_name}`"),
                    });
                }
                check_at(want_ty, got_val, child(&path, got_name))?;
            }
            Ok(())
        }
        (ValueType::Union(variants), Value::Union { tag, payload }) => {
            let Some((_, payload_ty)) = variants.iter().find(|(name, _)| name == tag) else {
                return Err(TypeError {
                    path,
                    expected: format!(
                        "one of [{}]",
                        variants
                            .iter()
                            .map(|(n, _)| n.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                    found: format!("variant `{tag}`"),
                });
            };
            check_at(payload_ty, payload, child(&path, tag))
        }
        _ => Err(mismatch(path, ty, value)),
    }
}

/// A structural mismatch between a value and its expected schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    /// Dotted path to the offending position (empty for the root).
    pub path: String,
    /// Human-readable description of what the schema expected.
    pub expected: String,
    /// Human-readable description of what was found.
    pub found: String,
}

impl std::fmt::Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "type mismatch: expected {}, found {}", self.expected, self.found)
        } else {
            write!(
                f,
                "type mismatch at `{}`: expected {}, found {}",
                self.path, self.expected, self.found
            )
        }
    }
}

impl std::error::Error for TypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_ty() -> ValueType {
        ValueType::record([("x", ValueType::Int), ("y", ValueType::Int)])
    }

    #[test]
    fn scalar_conformance() {
        assert!(ValueType::Int.check(&Value::Int(3)).is_ok());
        assert!(ValueType::Str.check(&Value::str("s")).is_ok());
        assert!(ValueType::Int.check(&Value::Bool(true)).is_err());
    }

    #[test]
    fn struct_conformance() {
        let v = Value::record([("x", Value::Int(1)), ("y", Value::Int(2))]);
        assert!(point_ty().check(&v).is_ok());
    }

    #[test]
    fn struct_field_order_matters() {
        let v = Value::record([("y", Value::Int(2)), ("x", Value::Int(1))]);
        let err = point_ty().check(&v).unwrap_err();
        assert!(err.expected.contains("field `x`"), "{err}");
    }

    #[test]
    fn nested_error_carries_path() {
        let ty = ValueType::record([("rows", ValueType::array(point_ty()))]);
        let v = Value::record([(
            "rows",
            Value::Array(vec![
                Value::record([("x", Value::Int(1)), ("y", Value::Int(2))]),
                Value::record([("x", Value::Int(1)), ("y", Value::str("oops"))]),
            ]),
        )]);
        let err = ty.check(&v).unwrap_err();
        assert_eq!(err.path, "rows[1].y");
        assert_eq!(err.expected, "int");
        assert_eq!(err.found, "str");
    }

    #[test]
    fn union_unknown_tag_rejected() {
        let ty = ValueType::union([("A", ValueType::Unit), ("B", ValueType::Int)]);
        assert!(ty.check(&Value::union("B", Value::Int(1))).is_ok());
        let err = ty.check(&Value::union("C", Value::Unit)).unwrap_err();
        assert!(err.found.contains("`C`"), "{err}");
    }

    #[test]
    fn option_absent_conforms_to_any_inner() {
        let ty = ValueType::option(point_ty());
        assert!(ty.check(&Value::none()).is_ok());
        assert!(ty.check(&Value::some(Value::Int(1))).is_err());
    }

    #[test]
    fn any_matches_everything() {
        for v in [Value::Unit, Value::Int(1), Value::union("X", Value::none())] {
            assert!(ValueType::Any.check(&v).is_ok());
        }
    }

    #[test]
    fn display_includes_path() {
        let err = TypeError {
            path: "a.b".into(),
            expected: "int".into(),
            found: "str".into(),
        };
        assert_eq!(err.to_string(), "type mismatch at `a.b`: expected int, found str");
    }
}
