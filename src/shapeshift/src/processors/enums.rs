use super::{primitive, Context, Processor};
use crate::{features::EnumAliases, value::Value, Result, Type, TypeMut, TypeRef};

/// Converts enums and flag sets.
///
/// Enums preferring their string form are written through the
/// definition's [`EnumAliases`] when it has them, and as integers
/// otherwise. Reading accepts both forms either way.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnumProcessor;

impl Processor for EnumProcessor {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn serialize(&self, value: &dyn Type, cx: &Context<'_>) -> Option<Result<Value>> {
        let TypeRef::Enum(value) = value.type_ref() else {
            return None;
        };

        let definition = cx.definition();
        let aliases = definition
            .feature::<EnumAliases>()
            .filter(|_| value.enum_info().prefers_string());

        Some(match aliases {
            Some(aliases) => aliases
                .format(value.type_info(), value.value(), cx)
                .map(Value::String),
            None => Ok(definition.encode_i64(value.value())),
        })
    }

    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>> {
        let TypeMut::Enum(target) = target.type_mut() else {
            return None;
        };

        let info = target.type_info();
        let value = match data {
            Value::String(text) => match text.trim().parse::<i64>() {
                Ok(value) => Ok(value),
                Err(_) => match cx.definition().feature::<EnumAliases>() {
                    Some(aliases) => aliases.parse(info, text, cx),
                    None => target
                        .enum_info()
                        .variant_named(text.trim())
                        .map(|v| v.value())
                        .ok_or_else(|| {
                            cx.invalid(format_args!(
                                "`{text}` names no variant of `{}`",
                                info.type_name()
                            ))
                        }),
                },
            },
            other => primitive::to_i64(other).ok_or_else(|| cx.mismatch(info.type_name(), other)),
        };

        Some(value.and_then(|value| {
            if target.update_value(value) {
                Ok(())
            } else {
                Err(cx.invalid(format_args!(
                    "{value} is no valid value of `{}`",
                    info.type_name()
                )))
            }
        }))
    }
}
