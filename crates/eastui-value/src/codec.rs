#![forbid(unsafe_code)]

//! Encoding of values to the opaque blobs the state store holds.
//!
//! The byte format is owned by serde_json; nothing in this crate inspects the
//! bytes. Callers treat blobs as opaque and round-trip them through
//! [`encode`]/[`decode`]. Readers that know the expected shape use
//! [`decode_as`] so shape mismatches surface at the read site instead of
//! deeper in rendering.

use crate::types::{TypeError, ValueType};
use crate::value::Value;

/// Encode a value to an opaque blob.
pub fn encode(value: &Value) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a blob back into a value, with no shape expectation.
pub fn decode(blob: &[u8]) -> Result<Value, CodecError> {
    serde_json::from_slice(blob).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Decode a blob and check it against an expected schema.
pub fn decode_as(blob: &[u8], ty: &ValueType) -> Result<Value, CodecError> {
    let value = decode(blob)?;
    ty.check(&value)?;
    Ok(value)
}

/// A failure to encode or decode a state blob.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// The value could not be serialized.
    Encode(String),
    /// The blob is not a valid encoding of any value.
    Decode(String),
    /// The blob decoded, but its shape does not match the expected schema.
    Type(TypeError),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(msg) => write!(f, "encode failed: {msg}"),
            Self::Decode(msg) => write!(f, "decode failed: {msg}"),
            Self::Type(err) => write!(f, "decoded blob has wrong shape: {err}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Type(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TypeError> for CodecError {
    fn from(err: TypeError) -> Self {
        Self::Type(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round_trip_struct() {
        let v = Value::record([
            ("label", Value::str("counter")),
            ("count", Value::Int(7)),
            ("enabled", Value::Bool(true)),
        ]);
        let blob = encode(&v).unwrap();
        assert_eq!(decode(&blob).unwrap(), v);
    }

    #[test]
    fn decode_as_accepts_matching_shape() {
        let ty = ValueType::record([("count", ValueType::Int)]);
        let blob = encode(&Value::record([("count", Value::Int(1))])).unwrap();
        assert!(decode_as(&blob, &ty).is_ok());
    }

    #[test]
    fn decode_as_rejects_wrong_shape() {
        let ty = ValueType::record([("count", ValueType::Int)]);
        let blob = encode(&Value::record([("count", Value::str("one"))])).unwrap();
        let err = decode_as(&blob, &ty).unwrap_err();
        assert!(matches!(err, CodecError::Type(_)), "{err}");
    }

    #[test]
    fn garbage_blob_is_a_decode_error() {
        let err = decode(b"\xff\xfenot json").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Unit),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            "[a-z]{0,8}".prop_map(Value::Str),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                inner.clone().prop_map(Value::some),
                Just(Value::none()),
                prop::collection::vec(("[a-z]{1,6}", inner.clone()), 0..4)
                    .prop_map(Value::record),
                ("[A-Z][a-z]{0,5}", inner).prop_map(|(tag, payload)| Value::union(tag, payload)),
            ]
        })
    }

    proptest! {
        // Floats are excluded: non-finite floats are not representable in the
        // wire format and do not round-trip.
        #[test]
        fn encode_decode_identity(v in arb_value()) {
            let blob = encode(&v).unwrap();
            prop_assert_eq!(decode(&blob).unwrap(), v);
        }
    }
}
