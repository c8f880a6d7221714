use super::{Context, Processor, Segment};
use crate::{definition::StructuredStyle, value::Value, Key, Result, Type, TypeMut, TypeRef};

/// Converts vector-like primitives with named components.
///
/// They are written as `{"x": .., "y": ..}` or `[.., ..]` depending on
/// the definition's [`StructuredStyle`]; both forms are read.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructuredProcessor;

impl Processor for StructuredProcessor {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn serialize(&self, value: &dyn Type, cx: &Context<'_>) -> Option<Result<Value>> {
        let TypeRef::Structured(value) = value.type_ref() else {
            return None;
        };

        let definition = cx.definition();
        let names = value.component_names();
        let components = names
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| value.component(idx).map(|c| (*name, c)));

        let result = match definition.structured_style() {
            StructuredStyle::Lookup => {
                let mut lookup = definition.containers().create_lookup(names.len());
                components
                    .map(|(name, component)| {
                        let value = cx.child(Segment::Field(name)).serialize(component)?;
                        lookup.insert(Key::from_static(name), value);
                        Ok(())
                    })
                    .collect::<Result<()>>()
                    .map(|()| Value::Lookup(lookup))
            }
            StructuredStyle::Sequence => {
                let mut sequence = definition.containers().create_sequence(names.len());
                components
                    .map(|(name, component)| {
                        sequence.push(cx.child(Segment::Field(name)).serialize(component)?);
                        Ok(())
                    })
                    .collect::<Result<()>>()
                    .map(|()| Value::Sequence(sequence))
            }
        };

        Some(result)
    }

    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>> {
        let TypeMut::Structured(target) = target.type_mut() else {
            return None;
        };

        let comparison = cx.definition().key_comparison();
        let type_name = target.type_info().type_name();
        let names = target.component_names();

        let mut assign = |idx: usize, name: &'static str, data: &Value| -> Result<()> {
            match target.component_mut(idx) {
                Some(component) => cx.child(Segment::Field(name)).deserialize(component, data),
                None => Ok(()),
            }
        };

        let result = match data {
            Value::Lookup(lookup) => names.iter().enumerate().try_for_each(|(idx, name)| {
                match lookup.find(&Key::from_static(*name), comparison) {
                    Some(data) => assign(idx, *name, data),
                    None => Ok(()),
                }
            }),
            Value::Sequence(sequence) => {
                names
                    .iter()
                    .zip(sequence.iter())
                    .enumerate()
                    .try_for_each(|(idx, (name, data))| assign(idx, *name, data))
            }
            other => Err(cx.mismatch(type_name, other)),
        };

        Some(result)
    }
}
