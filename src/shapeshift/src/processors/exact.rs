use super::{Context, Processor};
use crate::{definition::Natives, value::Value, Error, Result, Type, TypeMut, TypeRef};

/// Short-circuits nulls, optionals and values the format takes as-is.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactProcessor;

impl Processor for ExactProcessor {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn serialize(&self, value: &dyn Type, cx: &Context<'_>) -> Option<Result<Value>> {
        if let TypeRef::Optional(optional) = value.type_ref() {
            return Some(match optional.get() {
                Some(inner) => cx.serialize(inner),
                None => Ok(Value::Null),
            });
        }

        if let Some(value) = value.downcast_ref::<Value>() {
            return Some(Ok(value.clone()));
        }

        let natives = cx.definition().natives();
        let any = value.as_any();
        if natives.contains(Natives::STRING) {
            if let Some(v) = any.downcast_ref::<String>() {
                return Some(Ok(Value::String(v.clone())));
            }
        }
        if natives.contains(Natives::BOOL) {
            if let Some(v) = any.downcast_ref::<bool>() {
                return Some(Ok(Value::Bool(*v)));
            }
        }
        if natives.contains(Natives::INT) {
            if let Some(v) = any.downcast_ref::<i64>() {
                return Some(Ok(Value::Int(*v)));
            }
        }
        if natives.contains(Natives::UINT) {
            if let Some(v) = any.downcast_ref::<u64>() {
                return Some(Ok(Value::UInt(*v)));
            }
        }
        if natives.contains(Natives::FLOAT) {
            if let Some(v) = any.downcast_ref::<f64>() {
                return Some(Ok(Value::Float(*v)));
            }
        }

        None
    }

    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>> {
        if let Some(target) = target.downcast_mut::<Value>() {
            target.clone_from(data);
            return Some(Ok(()));
        }

        if let TypeMut::Optional(optional) = target.type_mut() {
            if data.is_null() {
                optional.clear();
                return Some(Ok(()));
            }

            let polymorphic = optional.is_polymorphic();
            let result = cx
                .instantiate(optional.inner_info(), data, polymorphic)
                .and_then(|mut inner| {
                    cx.deserialize(&mut *inner, data)?;
                    crate::container::Optional::replace(&mut *optional, inner).map_err(|inner| {
                        Error::configuration(format_args!(
                            "`{}` cannot hold a `{}`",
                            optional.type_info().type_name(),
                            inner.type_info().type_name()
                        ))
                    })
                });
            return Some(result);
        }

        // Nulls leave non-optional targets at their defaults.
        if data.is_null() {
            return Some(Ok(()));
        }

        if let (Some(target), Value::String(s)) = (target.downcast_mut::<String>(), data) {
            target.clone_from(s);
            return Some(Ok(()));
        }

        None
    }
}
