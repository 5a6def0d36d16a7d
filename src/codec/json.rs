//! JSON text encoding and decoding for wire values.
//!
//! Encoding host values is total and never fails: numbers, booleans, text,
//! and null pass through; mappings and sequences recurse; opaque objects
//! and subtrees past the depth limit degrade to their printable text.
//! Decoding enforces the depth limit explicitly and widens numbers.

use std::collections::BTreeMap;

use super::value::{EncodedValue, Value};
use crate::error::{EvalwireError, Result};

/// Maximum nesting depth accepted when decoding and preserved when encoding.
///
/// Deeper *incoming* values fail with [`EvalwireError::ValueTooDeep`];
/// deeper *outgoing* subtrees degrade to text instead of failing.
/// serde_json's own parser recursion limit guards inputs beyond what this
/// conversion ever sees.
pub const MAX_VALUE_DEPTH: usize = 100;

/// Convert a host value into its transport-safe form.
///
/// Total by construction: this function cannot fail, because a
/// code-execution bridge must never fail to produce *some* response.
pub fn encode_value(value: &Value) -> EncodedValue {
    encode_at(value, 0)
}

fn encode_at(value: &Value, depth: usize) -> EncodedValue {
    if depth >= MAX_VALUE_DEPTH {
        // Too deep to represent structurally; degrade to the text form.
        return EncodedValue::Text(value.to_string());
    }
    match value {
        Value::Null => EncodedValue::Null,
        Value::Bool(b) => EncodedValue::Bool(*b),
        Value::Int(i) => EncodedValue::Int(*i),
        Value::Float(x) => EncodedValue::Float(*x),
        Value::Text(s) => EncodedValue::Text(s.clone()),
        Value::Seq(items) => {
            EncodedValue::Seq(items.iter().map(|item| encode_at(item, depth + 1)).collect())
        }
        Value::Map(entries) => EncodedValue::Map(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), encode_at(item, depth + 1)))
                .collect(),
        ),
        Value::Opaque(repr) => EncodedValue::Text(repr.clone()),
    }
}

/// Encode a host value as JSON text for the wire.
pub fn encode_to_string(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&encode_value(value))?)
}

/// Decode JSON text into a host value.
///
/// Accepts the wire closure: numbers, booleans, text, null, arrays,
/// objects. Numeric widening applies: integers in `i64` range decode as
/// [`Value::Int`]; anything else (fractional, or beyond `i64`) decodes as
/// [`Value::Float`]. Callers comparing round-tripped values must accept
/// that widening.
///
/// # Errors
///
/// Returns [`EvalwireError::Json`] for malformed JSON and
/// [`EvalwireError::ValueTooDeep`] past [`MAX_VALUE_DEPTH`] levels of
/// nesting. Both are recoverable at the message level.
pub fn decode_str(text: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    from_json(&json, 0)
}

fn from_json(json: &serde_json::Value, depth: usize) -> Result<Value> {
    if depth >= MAX_VALUE_DEPTH {
        return Err(EvalwireError::ValueTooDeep(MAX_VALUE_DEPTH));
    }
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            // u64 beyond i64 range, or fractional: widen to float.
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::Text(s.clone()),
        serde_json::Value::Array(items) => Value::Seq(
            items
                .iter()
                .map(|item| from_json(item, depth + 1))
                .collect::<Result<_>>()?,
        ),
        serde_json::Value::Object(entries) => {
            let mut map = BTreeMap::new();
            for (key, item) in entries {
                map.insert(key.clone(), from_json(item, depth + 1)?);
            }
            Value::Map(map)
        }
    })
}
