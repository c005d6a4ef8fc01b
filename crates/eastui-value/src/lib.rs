#![forbid(unsafe_code)]

//! Typed value trees, schemas, and the state-blob codec for East UI.

pub mod codec;
pub mod types;
pub mod value;

pub use codec::{CodecError, decode, decode_as, encode};
pub use types::{TypeError, ValueType};
pub use value::Value;
