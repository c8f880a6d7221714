//! The entry points of the engine.

use crate::{
    definition::SerializationDefinition, processors::Context, type_info::TypeInfo, value::Value,
    Result, Type,
};

/// Serializes `value` into a [`Value`] under the given definition.
///
/// Objects become lookups or sequences depending on the markers they
/// are declared under; everything else is converted by the first
/// processor of the definition's chain that accepts it.
pub fn serialize(value: &dyn Type, definition: &SerializationDefinition) -> Result<Value> {
    let cx = Context::root(definition, value.type_info());
    cx.serialize(value)
}

/// Deserializes a new `T` from `data`.
///
/// `T` itself is instantiated; use [`deserialize_type`] to obtain the
/// most-derived type the data describes.
pub fn deserialize<T: Type + Default>(
    data: &Value,
    definition: &SerializationDefinition,
) -> Result<T> {
    let mut value = T::default();
    deserialize_into(&mut value, data, definition)?;
    Ok(value)
}

/// Deserializes the most-derived type of `info` that `data` resolves to.
///
/// Fails with a type resolution error when the resolved type is
/// abstract.
pub fn deserialize_type(
    info: &'static TypeInfo,
    data: &Value,
    definition: &SerializationDefinition,
) -> Result<Box<dyn Type>> {
    let cx = Context::root(definition, info);

    let mut value = cx.instantiate(info, data, true)?;
    cx.deserialize(&mut *value, data)?;

    Ok(value)
}

/// Deserializes `data` onto an already constructed `target`.
///
/// Members absent from `data` keep their current values.
pub fn deserialize_into(
    target: &mut dyn Type,
    data: &Value,
    definition: &SerializationDefinition,
) -> Result<()> {
    let cx = Context::root(definition, target.type_info());
    cx.deserialize(target, data)
}
