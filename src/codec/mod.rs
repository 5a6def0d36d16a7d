//! Codec module - host values and their transport-safe encoding.
//!
//! [`Value`] is the host value type the evaluation environment stores.
//! [`EncodedValue`] is the closed wire-safe closure of those values
//! (integers, floats, booleans, text, null, sequences, string-keyed
//! mappings), serialized as plain JSON text inside length-prefixed frames.
//!
//! Encoding is **total**: a value the wire closure cannot represent degrades
//! to its printable text rather than failing, so every handler call can
//! produce a well-formed response. Decoding is depth-capped.
//!
//! # Example
//!
//! ```
//! use evalwire::codec::{decode_str, encode_to_string, Value};
//!
//! let value = Value::Seq(vec![Value::Int(1), Value::Text("two".into())]);
//! let json = encode_to_string(&value).unwrap();
//! assert_eq!(json, r#"[1,"two"]"#);
//! assert_eq!(decode_str(&json).unwrap(), value);
//! ```

mod json;
mod value;

pub use json::{decode_str, encode_to_string, encode_value, MAX_VALUE_DEPTH};
pub use value::{EncodedValue, Value};
