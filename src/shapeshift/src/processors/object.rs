use std::sync::Arc;

use super::{Context, Processor, Segment};
use crate::{
    definition::KeyComparison,
    features::{Callbacks, Hook, ParallelProcessing, RequiredValues, TypeResolution},
    object::{upcast, upcast_mut},
    reflection::{MemberBinding, TypeReflectionMap},
    type_info::HookFlags,
    value::Value,
    Error, HookContext, Marker, Object, Result, Role, Slot, Type, TypeMut, TypeRef,
};

/// Converts objects declared under the definition's sequence marker.
///
/// When a type is declared under both markers, only sequence data is
/// read through this processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceObjectProcessor;

/// Converts objects declared under the definition's lookup marker.
#[derive(Clone, Copy, Debug, Default)]
pub struct LookupObjectProcessor;

fn reflection_map(obj: &dyn Object, cx: &Context<'_>) -> Result<Arc<TypeReflectionMap>> {
    cx.definition().cache().get_or_build(obj.type_info())
}

fn member_of<'o>(obj: &'o dyn Object, member: &MemberBinding) -> Result<&'o dyn Type> {
    upcast(obj, member.owner().type_id())
        .and_then(|owner| owner.field(member.field()))
        .ok_or_else(|| inaccessible(obj.type_info().type_name(), member))
}

fn member_of_mut<'o>(obj: &'o mut dyn Object, member: &MemberBinding) -> Result<&'o mut dyn Type> {
    let type_name = obj.type_info().type_name();
    upcast_mut(obj, member.owner().type_id())
        .and_then(|owner| owner.field_mut(member.field()))
        .ok_or_else(|| inaccessible(type_name, member))
}

fn replace_member(
    obj: &mut dyn Object,
    member: &MemberBinding,
    value: Box<dyn Type>,
) -> Result<Box<dyn Type>> {
    member_of_mut(obj, member)?.replace(value).map_err(|value| {
        Error::configuration(format_args!(
            "member `{}` cannot hold a `{}`",
            member.name(),
            value.type_info().type_name()
        ))
    })
}

fn inaccessible(type_name: &str, member: &MemberBinding) -> Error {
    Error::configuration(format_args!(
        "member `{}` of `{}` is not accessible from `{type_name}`",
        member.name(),
        member.owner().type_name()
    ))
}

fn hook_context<'a>(
    processor: &'a dyn Processor,
    cx: &Context<'a>,
    map: &TypeReflectionMap,
    hooks: HookFlags,
) -> Option<(&'a Callbacks, HookContext<'a>)> {
    let definition = cx.definition();
    let callbacks = definition.feature::<Callbacks>()?;
    map.any_hooks(hooks).then(|| {
        let hook_cx = HookContext {
            processor,
            definition,
            path: cx.path(),
        };
        (callbacks, hook_cx)
    })
}

/// The shared recursive step of both object processors.
struct ObjectCodec<'p> {
    processor: &'p dyn Processor,
    marker: Marker,
}

impl ObjectCodec<'_> {
    fn serialize(&self, obj: &dyn Object, map: &TypeReflectionMap, cx: &Context<'_>) -> Result<Value> {
        let definition = cx.definition();
        let hooks = hook_context(
            self.processor,
            cx,
            map,
            HookFlags::BEFORE_SERIALIZE | HookFlags::AFTER_SERIALIZE,
        );

        if let Some((callbacks, hook_cx)) = &hooks {
            callbacks.run(Hook::BeforeSerialize, obj, map, hook_cx)?;
        }

        let role = self.marker.role();
        let members = map.members(self.marker, true);

        let discriminators = match definition.feature::<TypeResolution>() {
            Some(resolution) => resolution.discriminators(map, members, role, definition)?,
            None => Vec::new(),
        };

        let convert = |member: &MemberBinding| -> Result<Value> {
            let value = member_of(obj, member)?;
            cx.child(Segment::Field(member.name())).serialize(value)
        };
        let values: Vec<Result<Value>> = match definition.feature::<ParallelProcessing>() {
            Some(parallel) if parallel.applies(members.len()) => parallel.map(members, convert),
            _ => members.iter().map(convert).collect(),
        };

        let containers = definition.containers();
        let mut slots = Vec::with_capacity(discriminators.len() + members.len());
        slots.extend(discriminators);
        for (member, value) in members.iter().zip(values) {
            slots.push((member.slot().clone(), value?));
        }

        let result = match role {
            Role::Lookup => {
                let mut lookup = containers.create_lookup(slots.len());
                for (slot, value) in slots {
                    if let Slot::Key(key) = slot {
                        lookup.insert(key, value);
                    }
                }
                Value::Lookup(lookup)
            }
            Role::Sequence => {
                let len = slots
                    .iter()
                    .filter_map(|(slot, _)| match slot {
                        Slot::Index(idx) => Some(idx + 1),
                        Slot::Key(_) => None,
                    })
                    .max()
                    .unwrap_or(0);

                let mut sequence = containers.create_sequence(len);
                for (slot, value) in slots {
                    if let Slot::Index(idx) = slot {
                        sequence.set(idx, value);
                    }
                }
                Value::Sequence(sequence)
            }
        };

        if let Some((callbacks, hook_cx)) = &hooks {
            callbacks.run(Hook::AfterSerialize, obj, map, hook_cx)?;
        }

        Ok(result)
    }

    fn deserialize(
        &self,
        obj: &mut dyn Object,
        map: &TypeReflectionMap,
        data: &Value,
        cx: &Context<'_>,
    ) -> Result<()> {
        let definition = cx.definition();
        let comparison = definition.key_comparison();
        let hooks = hook_context(
            self.processor,
            cx,
            map,
            HookFlags::BEFORE_DESERIALIZE | HookFlags::AFTER_DESERIALIZE,
        );

        if let Some((callbacks, hook_cx)) = &hooks {
            callbacks.run_mut(Hook::BeforeDeserialize, obj, map, hook_cx)?;
        }

        let members = map.members(self.marker, true);
        if let Some(resolution) = definition.feature::<TypeResolution>() {
            resolution.check_members(map, members, self.marker.role())?;
        }

        let present: Vec<(&MemberBinding, &Value)> = members
            .iter()
            .filter_map(|member| data.at(member.slot(), comparison).map(|data| (member, data)))
            .collect();

        let placeholders = match definition.feature::<ParallelProcessing>() {
            Some(parallel) if parallel.applies(present.len()) => present
                .iter()
                .map(|(member, _)| member.type_info().make_default())
                .collect::<Option<Vec<_>>>()
                .map(|placeholders| (parallel, placeholders)),
            _ => None,
        };

        match placeholders {
            Some((parallel, placeholders)) => {
                let mut taken = Vec::with_capacity(present.len());
                for ((member, data), placeholder) in present.iter().zip(placeholders) {
                    taken.push((replace_member(obj, member, placeholder)?, *member, *data));
                }

                let results = parallel.map_mut(&mut taken, |(value, member, data)| {
                    cx.child(Segment::Field(member.name()))
                        .deserialize(&mut **value, *data)
                });

                for (value, member, _) in taken {
                    replace_member(obj, member, value)?;
                }
                results.into_iter().collect::<Result<()>>()?;
            }
            None => {
                for (member, data) in &present {
                    let target = member_of_mut(obj, member)?;
                    cx.child(Segment::Field(member.name()))
                        .deserialize(target, data)?;
                }
            }
        }

        if tracing::enabled!(tracing::Level::TRACE) {
            if let Value::Lookup(lookup) = data {
                for (key, _) in lookup {
                    let known = members.iter().any(|member| match member.slot() {
                        Slot::Key(k) => match comparison {
                            KeyComparison::Exact => k == key,
                            KeyComparison::IgnoreAsciiCase => k.eq_ignore_ascii_case(key),
                        },
                        Slot::Index(_) => false,
                    });
                    if !known {
                        tracing::trace!(key = %key, path = %cx.path(), "ignored unknown key");
                    }
                }
            }
        }

        if let Some(required) = definition.feature::<RequiredValues>() {
            required.check(map, self.marker, data, cx)?;
        }

        if let Some((callbacks, hook_cx)) = &hooks {
            callbacks.run_mut(Hook::AfterDeserialize, obj, map, hook_cx)?;
        }

        Ok(())
    }
}

impl Processor for SequenceObjectProcessor {
    fn name(&self) -> &'static str {
        "sequence-object"
    }

    fn serialize(&self, value: &dyn Type, cx: &Context<'_>) -> Option<Result<Value>> {
        let TypeRef::Object(obj) = value.type_ref() else {
            return None;
        };
        let marker = cx.definition().sequence_marker()?;

        let map = match reflection_map(obj, cx) {
            Ok(map) => map,
            Err(e) => return Some(Err(e)),
        };
        if !map.has_marker(marker) {
            return None;
        }

        let codec = ObjectCodec {
            processor: self,
            marker,
        };
        Some(codec.serialize(obj, &map, cx))
    }

    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>> {
        let TypeMut::Object(obj) = target.type_mut() else {
            return None;
        };
        let definition = cx.definition();
        let marker = definition.sequence_marker()?;

        let map = match reflection_map(obj, cx) {
            Ok(map) => map,
            Err(e) => return Some(Err(e)),
        };
        if !map.has_marker(marker) {
            return None;
        }

        // Types that are also lookup objects leave other data to the
        // lookup processor.
        let dual = definition
            .lookup_marker()
            .map_or(false, |lookup| map.has_marker(lookup));
        if !matches!(data, Value::Sequence(_)) {
            return if dual {
                None
            } else {
                Some(Err(cx.mismatch(map.type_info().type_name(), data)))
            };
        }

        let codec = ObjectCodec {
            processor: self,
            marker,
        };
        Some(codec.deserialize(obj, &map, data, cx))
    }
}

impl Processor for LookupObjectProcessor {
    fn name(&self) -> &'static str {
        "lookup-object"
    }

    fn serialize(&self, value: &dyn Type, cx: &Context<'_>) -> Option<Result<Value>> {
        let TypeRef::Object(obj) = value.type_ref() else {
            return None;
        };
        let marker = cx.definition().lookup_marker()?;

        let map = match reflection_map(obj, cx) {
            Ok(map) => map,
            Err(e) => return Some(Err(e)),
        };
        if !map.has_marker(marker) {
            return None;
        }

        let codec = ObjectCodec {
            processor: self,
            marker,
        };
        Some(codec.serialize(obj, &map, cx))
    }

    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>> {
        let TypeMut::Object(obj) = target.type_mut() else {
            return None;
        };
        let marker = cx.definition().lookup_marker()?;

        let map = match reflection_map(obj, cx) {
            Ok(map) => map,
            Err(e) => return Some(Err(e)),
        };
        if !map.has_marker(marker) {
            return None;
        }

        if !matches!(data, Value::Lookup(_)) {
            return Some(Err(cx.mismatch(map.type_info().type_name(), data)));
        }

        let codec = ObjectCodec {
            processor: self,
            marker,
        };
        Some(codec.deserialize(obj, &map, data, cx))
    }
}
