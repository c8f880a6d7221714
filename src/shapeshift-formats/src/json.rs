//! Conversion between engine [`Value`]s and JSON text.

use serde_json::{Map, Number};
use shapeshift::{
    value::{Lookup, Sequence},
    Key, SerializationDefinition, Type, Value,
};

use crate::FormatError;

/// Converts a [`Value`] into a [`serde_json::Value`].
///
/// Non-finite floats have no JSON representation and become `null`.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::UInt(u) => serde_json::Value::Number((*u).into()),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Lookup(lookup) => {
            let mut object = Map::with_capacity(lookup.len());
            for (key, value) in lookup {
                object.insert(key.to_string(), to_json(value));
            }
            serde_json::Value::Object(object)
        }
        Value::Sequence(sequence) => {
            serde_json::Value::Array(sequence.iter().map(to_json).collect())
        }
    }
}

/// Converts a [`serde_json::Value`] into a [`Value`].
///
/// Integers become [`Value::Int`] when they fit and [`Value::UInt`]
/// otherwise; object keys are always string keys.
pub fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(array) => {
            let mut sequence = Sequence::with_capacity(array.len());
            for element in array {
                sequence.push(from_json(element));
            }
            Value::Sequence(sequence)
        }
        serde_json::Value::Object(object) => {
            let mut lookup = Lookup::with_capacity(object.len());
            for (key, value) in object {
                lookup.insert(Key::from(key), from_json(value));
            }
            Value::Lookup(lookup)
        }
    }
}

/// Renders a [`Value`] as compact JSON text.
pub fn to_json_string(value: &Value) -> Result<String, FormatError> {
    Ok(serde_json::to_string(&to_json(value))?)
}

/// Parses JSON text into a [`Value`].
pub fn from_json_str(text: &str) -> Result<Value, FormatError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(from_json(value))
}

/// Serializes a reflected value straight to JSON text.
pub fn serialize_to_string(
    value: &dyn Type,
    definition: &SerializationDefinition,
) -> Result<String, FormatError> {
    let value = definition.serialize(value)?;
    to_json_string(&value)
}

/// Deserializes a `T` from JSON text.
pub fn deserialize_from_str<T: Type + Default>(
    text: &str,
    definition: &SerializationDefinition,
) -> Result<T, FormatError> {
    let value = from_json_str(text)?;
    Ok(definition.deserialize(&value)?)
}
