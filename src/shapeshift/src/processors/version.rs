use super::{Context, Processor};
use crate::{value::Value, Result, Type, Version};

/// Converts [`Version`]s to and from dotted strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct VersionProcessor;

impl Processor for VersionProcessor {
    fn name(&self) -> &'static str {
        "version"
    }

    fn serialize(&self, value: &dyn Type, _cx: &Context<'_>) -> Option<Result<Value>> {
        let version = value.downcast_ref::<Version>()?;
        Some(Ok(Value::String(version.to_string())))
    }

    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>> {
        let slot = target.downcast_mut::<Version>()?;

        let result = match data.as_str() {
            Some(s) => s
                .parse::<Version>()
                .map(|version| *slot = version)
                .map_err(|e| cx.invalid(e)),
            None => Err(cx.mismatch("Version", data)),
        };
        Some(result)
    }
}
