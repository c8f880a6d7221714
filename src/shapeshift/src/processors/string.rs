use std::borrow::Cow;

use super::{Context, Processor};
use crate::{value::Value, Result, Type};

/// Converts the owned string types.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringProcessor;

fn to_string(data: &Value, cx: &Context<'_>) -> Result<String> {
    data.to_key_string()
        .ok_or_else(|| cx.mismatch("string", data))
}

impl Processor for StringProcessor {
    fn name(&self) -> &'static str {
        "string"
    }

    fn serialize(&self, value: &dyn Type, _cx: &Context<'_>) -> Option<Result<Value>> {
        let any = value.as_any();

        let s = if let Some(v) = any.downcast_ref::<String>() {
            v.clone()
        } else if let Some(v) = any.downcast_ref::<Box<str>>() {
            v.to_string()
        } else if let Some(v) = any.downcast_ref::<Cow<'static, str>>() {
            v.to_string()
        } else {
            return None;
        };

        Some(Ok(Value::String(s)))
    }

    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>> {
        if let Some(slot) = target.downcast_mut::<String>() {
            return Some(to_string(data, cx).map(|s| *slot = s));
        }
        if let Some(slot) = target.downcast_mut::<Box<str>>() {
            return Some(to_string(data, cx).map(|s| *slot = s.into_boxed_str()));
        }
        if let Some(slot) = target.downcast_mut::<Cow<'static, str>>() {
            return Some(to_string(data, cx).map(|s| *slot = Cow::Owned(s)));
        }

        None
    }
}
