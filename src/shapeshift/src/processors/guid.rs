use uuid::Uuid;

use super::{Context, Processor};
use crate::{value::Value, Result, Type};

/// Converts [`Uuid`]s to and from their hyphenated string form.
#[derive(Clone, Copy, Debug, Default)]
pub struct GuidProcessor;

impl Processor for GuidProcessor {
    fn name(&self) -> &'static str {
        "guid"
    }

    fn serialize(&self, value: &dyn Type, _cx: &Context<'_>) -> Option<Result<Value>> {
        let guid = value.downcast_ref::<Uuid>()?;
        Some(Ok(Value::String(guid.hyphenated().to_string())))
    }

    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>> {
        let slot = target.downcast_mut::<Uuid>()?;

        let result = match data.as_str() {
            Some(s) => Uuid::parse_str(s.trim())
                .map(|guid| *slot = guid)
                .map_err(|e| cx.invalid(e)),
            None => Err(cx.mismatch("Uuid", data)),
        };
        Some(result)
    }
}
