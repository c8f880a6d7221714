use super::Feature;
use crate::{
    reflection::TypeReflectionMap, type_info::HookFlags, Error, HookContext, Object, Result,
};

/// Invokes the lifecycle hooks of objects.
///
/// Hooks run along the embedded base chain, base first, and each
/// level only runs the hooks it declares itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct Callbacks;

impl Feature for Callbacks {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Hook {
    BeforeSerialize,
    AfterSerialize,
    BeforeDeserialize,
    AfterDeserialize,
}

impl Hook {
    pub(crate) fn flag(self) -> HookFlags {
        match self {
            Hook::BeforeSerialize => HookFlags::BEFORE_SERIALIZE,
            Hook::AfterSerialize => HookFlags::AFTER_SERIALIZE,
            Hook::BeforeDeserialize => HookFlags::BEFORE_DESERIALIZE,
            Hook::AfterDeserialize => HookFlags::AFTER_DESERIALIZE,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Hook::BeforeSerialize => "before_serialize",
            Hook::AfterSerialize => "after_serialize",
            Hook::BeforeDeserialize => "before_deserialize",
            Hook::AfterDeserialize => "after_deserialize",
        }
    }

    fn error(self, obj: &dyn Object, cx: &HookContext<'_>, source: anyhow::Error) -> Error {
        Error::Callback {
            hook: self.name(),
            type_name: obj.type_info().type_name(),
            path: cx.path().to_owned(),
            source,
        }
    }
}

impl Callbacks {
    /// Runs a serialization hook on every level of `obj`.
    pub(crate) fn run(
        &self,
        hook: Hook,
        obj: &dyn Object,
        map: &TypeReflectionMap,
        cx: &HookContext<'_>,
    ) -> Result<()> {
        if let (Some(base), Some(base_map)) = (obj.base(), map.base()) {
            self.run(hook, base, base_map, cx)?;
        }

        if map.hooks().contains(hook.flag()) {
            let result = match hook {
                Hook::BeforeSerialize => obj.before_serialize(cx),
                Hook::AfterSerialize => obj.after_serialize(cx),
                _ => Ok(()),
            };
            result.map_err(|e| hook.error(obj, cx, e))?;
        }

        Ok(())
    }

    /// Runs a deserialization hook on every level of `obj`.
    pub(crate) fn run_mut(
        &self,
        hook: Hook,
        obj: &mut dyn Object,
        map: &TypeReflectionMap,
        cx: &HookContext<'_>,
    ) -> Result<()> {
        if let (Some(base), Some(base_map)) = (obj.base_mut(), map.base()) {
            self.run_mut(hook, base, base_map, cx)?;
        }

        if map.hooks().contains(hook.flag()) {
            let result = match hook {
                Hook::BeforeDeserialize => obj.before_deserialize(cx),
                Hook::AfterDeserialize => obj.after_deserialize(cx),
                _ => Ok(()),
            };
            result.map_err(|e| hook.error(obj, cx, e))?;
        }

        Ok(())
    }
}
