//! Host value and wire value types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A host value as stored in the evaluation environment.
///
/// Covers the wire-safe closure plus [`Value::Opaque`] for host objects the
/// closure cannot represent; those carry their printable form and encode as
/// text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Ordered sequence of values.
    Seq(Vec<Value>),
    /// Mapping from text keys to values.
    Map(BTreeMap<String, Value>),
    /// An otherwise-unrepresentable host object, reduced to its printable
    /// diagnostic form.
    Opaque(String),
}

impl fmt::Display for Value {
    /// Render the value in JSON-like text form.
    ///
    /// This is the textual fallback used when encoding must degrade, and
    /// the form expressions and traces quote fragments in.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {item}")?;
                }
                write!(f, "}}")
            }
            Value::Opaque(repr) => write!(f, "{repr}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Seq(v)
    }
}

/// The closed, transport-safe closure of host values.
///
/// Serializes as plain JSON: unit as `null`, sequences as arrays, mappings
/// as objects. Variant order matters for untagged deserialization (`Int`
/// before `Float`, so `3` decodes as an integer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EncodedValue {
    /// JSON null.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON integer.
    Int(i64),
    /// JSON non-integral number.
    Float(f64),
    /// JSON string.
    Text(String),
    /// JSON array.
    Seq(Vec<EncodedValue>),
    /// JSON object.
    Map(BTreeMap<String, EncodedValue>),
}

impl From<EncodedValue> for Value {
    /// Wire values inject into host values unchanged.
    fn from(encoded: EncodedValue) -> Self {
        match encoded {
            EncodedValue::Null => Value::Null,
            EncodedValue::Bool(b) => Value::Bool(b),
            EncodedValue::Int(i) => Value::Int(i),
            EncodedValue::Float(x) => Value::Float(x),
            EncodedValue::Text(s) => Value::Text(s),
            EncodedValue::Seq(items) => Value::Seq(items.into_iter().map(Value::from).collect()),
            EncodedValue::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, Value::from(item)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_primitives() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Text("hi".into()).to_string(), "\"hi\"");
    }

    #[test]
    fn test_display_nested() {
        let value = Value::Seq(vec![
            Value::Int(1),
            Value::Map(BTreeMap::from([("k".to_string(), Value::Bool(false))])),
        ]);
        assert_eq!(value.to_string(), r#"[1, {"k": false}]"#);
    }

    #[test]
    fn test_display_opaque_is_verbatim() {
        let value = Value::Opaque("<handle fd=3>".into());
        assert_eq!(value.to_string(), "<handle fd=3>");
    }

    #[test]
    fn test_encoded_value_serializes_as_plain_json() {
        let encoded = EncodedValue::Seq(vec![
            EncodedValue::Null,
            EncodedValue::Int(7),
            EncodedValue::Text("x".into()),
        ]);
        assert_eq!(serde_json::to_string(&encoded).unwrap(), r#"[null,7,"x"]"#);
    }

    #[test]
    fn test_encoded_value_untagged_deserialize_order() {
        // Int is tried before Float, so whole numbers stay integers.
        assert_eq!(
            serde_json::from_str::<EncodedValue>("3").unwrap(),
            EncodedValue::Int(3)
        );
        assert_eq!(
            serde_json::from_str::<EncodedValue>("3.5").unwrap(),
            EncodedValue::Float(3.5)
        );
        assert_eq!(
            serde_json::from_str::<EncodedValue>("null").unwrap(),
            EncodedValue::Null
        );
    }

    #[test]
    fn test_encoded_value_injects_into_value() {
        let encoded = EncodedValue::Map(BTreeMap::from([(
            "items".to_string(),
            EncodedValue::Seq(vec![EncodedValue::Float(1.5)]),
        )]));
        let value = Value::from(encoded);
        assert_eq!(
            value,
            Value::Map(BTreeMap::from([(
                "items".to_string(),
                Value::Seq(vec![Value::Float(1.5)])
            )]))
        );
    }
}
