use super::{Context, Processor, Segment};
use crate::{value::Value, Error, Key, List, Map, Result, Type, TypeMut, TypeRef};

/// Converts generic key to value containers into lookups.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapProcessor;

/// Converts generic sequence containers into sequences.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListProcessor;

fn to_key(value: Value, cx: &Context<'_>) -> Result<Key> {
    match value {
        Value::String(s) => Ok(Key::from(s)),
        Value::Int(i) => Ok(Key::Int(i)),
        Value::UInt(u) => Ok(i64::try_from(u).map_or_else(|_| Key::from(u.to_string()), Key::Int)),
        Value::Bool(b) => Ok(Key::from(b.to_string())),
        Value::Float(f) => Ok(Key::from(f.to_string())),
        other => Err(cx.invalid(format_args!(
            "a {} cannot be used as a lookup key",
            other.kind_name()
        ))),
    }
}

fn serialize_map(map: &dyn Map, cx: &Context<'_>) -> Result<Value> {
    let mut lookup = cx.definition().containers().create_lookup(map.len());

    for (key, value) in map.iter() {
        let key = to_key(cx.serialize(key)?, cx)?;
        let rendered = key.to_string();
        let value = cx.child(Segment::Key(&rendered)).serialize(value)?;
        lookup.insert(key, value);
    }

    Ok(Value::Lookup(lookup))
}

fn deserialize_map(map: &mut dyn Map, data: &Value, cx: &Context<'_>) -> Result<()> {
    let Value::Lookup(lookup) = data else {
        return Err(cx.mismatch(map.type_info().type_name(), data));
    };

    map.clear();
    let key_info = map.key_info();
    let value_info = map.value_info();

    for (key, data) in lookup {
        let rendered = key.to_string();
        let cx = cx.child(Segment::Key(&rendered));

        let key_data = Value::from(key.clone());
        let mut key = cx.instantiate(key_info, &key_data, false)?;
        cx.deserialize(&mut *key, &key_data)?;

        let mut value = cx.instantiate(value_info, data, false)?;
        cx.deserialize(&mut *value, data)?;

        map.insert_boxed(key, value).map_err(|_| {
            Error::configuration(format_args!(
                "`{}` rejected an entry of its own key and value types",
                map.type_info().type_name()
            ))
        })?;
    }

    Ok(())
}

fn serialize_list(list: &dyn List, cx: &Context<'_>) -> Result<Value> {
    let mut sequence = cx.definition().containers().create_sequence(list.len());

    for (idx, element) in list.iter().enumerate() {
        sequence.push(cx.child(Segment::Index(idx)).serialize(element)?);
    }

    Ok(Value::Sequence(sequence))
}

fn deserialize_list(list: &mut dyn List, data: &Value, cx: &Context<'_>) -> Result<()> {
    let Value::Sequence(sequence) = data else {
        return Err(cx.mismatch(list.type_info().type_name(), data));
    };

    list.clear();
    list.reserve(sequence.len());
    let element_info = list.element_info();

    for (idx, data) in sequence.iter().enumerate() {
        let cx = cx.child(Segment::Index(idx));

        let mut element = cx.instantiate(element_info, data, false)?;
        cx.deserialize(&mut *element, data)?;

        list.push_boxed(element).map_err(|element| {
            Error::configuration(format_args!(
                "`{}` rejected an element of type `{}`",
                list.type_info().type_name(),
                element.type_info().type_name()
            ))
        })?;
    }

    Ok(())
}

impl Processor for MapProcessor {
    fn name(&self) -> &'static str {
        "map"
    }

    fn serialize(&self, value: &dyn Type, cx: &Context<'_>) -> Option<Result<Value>> {
        match value.type_ref() {
            TypeRef::Map(map) => Some(serialize_map(map, cx)),
            _ => None,
        }
    }

    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>> {
        match target.type_mut() {
            TypeMut::Map(map) => Some(deserialize_map(map, data, cx)),
            _ => None,
        }
    }
}

impl Processor for ListProcessor {
    fn name(&self) -> &'static str {
        "list"
    }

    fn serialize(&self, value: &dyn Type, cx: &Context<'_>) -> Option<Result<Value>> {
        match value.type_ref() {
            TypeRef::List(list) => Some(serialize_list(list, cx)),
            _ => None,
        }
    }

    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>> {
        match target.type_mut() {
            TypeMut::List(list) => Some(deserialize_list(list, data, cx)),
            _ => None,
        }
    }
}
