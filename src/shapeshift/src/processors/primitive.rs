use super::{Context, Processor};
use crate::{value::Value, Result, Type};

/// Converts booleans, characters and numbers of every width.
///
/// Values are written natively where the definition allows it and as
/// culture-neutral strings otherwise. Reading is lenient and accepts
/// any representation that converts without loss.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrimitiveProcessor;

pub(crate) fn to_i64(data: &Value) -> Option<i64> {
    match data {
        Value::Int(v) => Some(*v),
        Value::UInt(v) => i64::try_from(*v).ok(),
        Value::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Some(*v as i64),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn to_u64(data: &Value) -> Option<u64> {
    match data {
        Value::Int(v) => u64::try_from(*v).ok(),
        Value::UInt(v) => Some(*v),
        Value::Float(v) if v.fract() == 0.0 && *v >= 0.0 && *v < u64::MAX as f64 => {
            Some(*v as u64)
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn to_f64(data: &Value) -> Option<f64> {
    match data {
        Value::Int(v) => Some(*v as f64),
        Value::UInt(v) => Some(*v as f64),
        Value::Float(v) => Some(*v),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn to_bool(data: &Value) -> Option<bool> {
    match data {
        Value::Bool(v) => Some(*v),
        Value::Int(0) | Value::UInt(0) => Some(false),
        Value::Int(1) | Value::UInt(1) => Some(true),
        Value::String(s) => match s.trim() {
            s if s.eq_ignore_ascii_case("true") || s == "1" => Some(true),
            s if s.eq_ignore_ascii_case("false") || s == "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn to_char(data: &Value) -> Option<char> {
    let s = data.as_str()?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

macro_rules! serialize_as {
    ($any:ident, $definition:ident, $encode:ident as $wide:ty => $($ty:ty),*) => {
        $(
            if let Some(v) = $any.downcast_ref::<$ty>() {
                return Some(Ok($definition.$encode(*v as $wide)));
            }
        )*
    };
}

macro_rules! deserialize_as {
    ($target:ident, $data:ident, $cx:ident, $read:ident => $($ty:ty),*) => {
        $(
            if let Some(slot) = $target.downcast_mut::<$ty>() {
                return Some(
                    $read($data)
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .map(|v| *slot = v)
                        .ok_or_else(|| $cx.mismatch(stringify!($ty), $data)),
                );
            }
        )*
    };
}

impl Processor for PrimitiveProcessor {
    fn name(&self) -> &'static str {
        "primitive"
    }

    fn serialize(&self, value: &dyn Type, cx: &Context<'_>) -> Option<Result<Value>> {
        let definition = cx.definition();
        let any = value.as_any();

        if let Some(v) = any.downcast_ref::<bool>() {
            return Some(Ok(definition.encode_bool(*v)));
        }
        if let Some(v) = any.downcast_ref::<char>() {
            return Some(Ok(Value::String(v.to_string())));
        }
        if let Some(v) = any.downcast_ref::<f32>() {
            return Some(Ok(definition.encode_f32(*v)));
        }
        if let Some(v) = any.downcast_ref::<f64>() {
            return Some(Ok(definition.encode_f64(*v)));
        }

        serialize_as!(any, definition, encode_i64 as i64 => i8, i16, i32, i64, isize);
        serialize_as!(any, definition, encode_u64 as u64 => u8, u16, u32, u64, usize);

        None
    }

    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>> {
        if let Some(slot) = target.downcast_mut::<bool>() {
            return Some(
                to_bool(data)
                    .map(|v| *slot = v)
                    .ok_or_else(|| cx.mismatch("bool", data)),
            );
        }
        if let Some(slot) = target.downcast_mut::<char>() {
            return Some(
                to_char(data)
                    .map(|v| *slot = v)
                    .ok_or_else(|| cx.mismatch("char", data)),
            );
        }
        if let Some(slot) = target.downcast_mut::<f32>() {
            return Some(
                to_f64(data)
                    .map(|v| *slot = v as f32)
                    .ok_or_else(|| cx.mismatch("f32", data)),
            );
        }
        if let Some(slot) = target.downcast_mut::<f64>() {
            return Some(
                to_f64(data)
                    .map(|v| *slot = v)
                    .ok_or_else(|| cx.mismatch("f64", data)),
            );
        }

        deserialize_as!(target, data, cx, to_i64 => i8, i16, i32, i64, isize);
        deserialize_as!(target, data, cx, to_u64 => u8, u16, u32, u64, usize);

        None
    }
}
