use std::cmp::Reverse;

use super::Feature;
use crate::{
    definition::SerializationDefinition,
    processors::Context,
    reflection::{MemberBinding, ResolutionParameter, TypeReflectionMap},
    type_info::TypeInfo,
    value::Value,
    Error, Key, Result, Role, Slot,
};

/// Polymorphic type resolution through embedded discriminators.
///
/// Serialized objects carry the discriminators of every resolution
/// that leads to their exact type. On deserialization, a declared
/// base type is refined step by step to the most-derived type whose
/// discriminator the data holds.
#[derive(Clone, Debug)]
pub struct TypeResolution {
    key: Key,
    index: usize,
}

impl TypeResolution {
    /// The default lookup key of discriminators.
    pub const DEFAULT_KEY: Key = Key::from_static("$type");

    /// Creates the feature with the default key and index 0.
    pub fn new() -> Self {
        Self {
            key: Self::DEFAULT_KEY,
            index: 0,
        }
    }

    /// Sets the lookup key discriminators are stored under.
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the sequence index discriminators are stored at.
    pub fn index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Gets the default lookup key.
    pub fn default_key(&self) -> &Key {
        &self.key
    }

    /// Gets the default sequence index.
    pub fn default_index(&self) -> usize {
        self.index
    }

    fn slot(&self, parameter: &ResolutionParameter, role: Role) -> Slot {
        match role {
            Role::Lookup => Slot::Key(parameter.key().unwrap_or(&self.key).clone()),
            Role::Sequence => Slot::Index(parameter.index().unwrap_or(self.index)),
        }
    }

    fn expected(parameter: &ResolutionParameter, definition: &SerializationDefinition) -> Value {
        match parameter.value() {
            Some(Value::Bool(v)) => definition.encode_bool(*v),
            Some(Value::Int(v)) => definition.encode_i64(*v),
            Some(Value::UInt(v)) => definition.encode_u64(*v),
            Some(Value::Float(v)) => definition.encode_f64(*v),
            Some(other) => other.clone(),
            None => Value::String(parameter.target().simple_name().to_owned()),
        }
    }

    // Resolutions leading to the exact type of `map`, most specific first.
    fn applicable<'m>(&self, map: &'m TypeReflectionMap) -> Vec<&'m ResolutionParameter> {
        let info = map.type_info();
        let mut parameters: Vec<_> = map
            .resolution_parameters()
            .iter()
            .filter(|p| info.derives_from(p.target().type_id()))
            .collect();
        parameters.sort_by_key(|p| (Reverse(depth(p.target())), Reverse(depth(p.declared_by()))));
        parameters
    }

    /// Computes the discriminators to write for an object whose exact
    /// type is described by `map`.
    ///
    /// Each slot is written once, by the most specific resolution that
    /// leads to the type. A member bound to one of these slots is a
    /// configuration error.
    pub(crate) fn discriminators(
        &self,
        map: &TypeReflectionMap,
        members: &[MemberBinding],
        role: Role,
        definition: &SerializationDefinition,
    ) -> Result<Vec<(Slot, Value)>> {
        let mut discriminators: Vec<(Slot, Value)> = Vec::new();
        for parameter in self.applicable(map) {
            let slot = self.slot(parameter, role);
            if discriminators.iter().all(|(s, _)| *s != slot) {
                discriminators.push((slot, Self::expected(parameter, definition)));
            }
        }

        reject_collisions(map, members, discriminators.iter().map(|(slot, _)| slot))?;
        Ok(discriminators)
    }

    /// Fails when one of `members` sits on a discriminator slot of the
    /// type described by `map`.
    pub(crate) fn check_members(
        &self,
        map: &TypeReflectionMap,
        members: &[MemberBinding],
        role: Role,
    ) -> Result<()> {
        let slots: Vec<Slot> = self
            .applicable(map)
            .into_iter()
            .map(|parameter| self.slot(parameter, role))
            .collect();
        reject_collisions(map, members, &slots)
    }

    /// Resolves the most-derived type `data` describes, starting from
    /// `base`.
    ///
    /// Returns `base` itself when no resolution matches.
    pub fn resolve(
        &self,
        base: &'static TypeInfo,
        data: &Value,
        cx: &Context<'_>,
    ) -> Result<&'static TypeInfo> {
        let role = match data {
            Value::Lookup(_) => Role::Lookup,
            Value::Sequence(_) => Role::Sequence,
            _ => return Ok(base),
        };
        let definition = cx.definition();
        let comparison = definition.key_comparison();

        let mut resolved = base;
        'refine: loop {
            let map = definition.cache().get_or_build(resolved)?;

            for parameter in map.resolution_parameters() {
                let target = parameter.target();
                if target.type_id() == resolved.type_id()
                    || !target.derives_from(resolved.type_id())
                {
                    continue;
                }

                let slot = self.slot(parameter, role);
                let Some(found) = data.at(&slot, comparison) else {
                    continue;
                };

                if self.matches(parameter, &slot, role, found, definition)? {
                    tracing::trace!(
                        from = resolved.type_name(),
                        to = target.type_name(),
                        "refined polymorphic type"
                    );
                    resolved = target;
                    continue 'refine;
                }
            }

            break Ok(resolved);
        }
    }

    // A parameter matches a discriminator that names its own target or
    // any descendant its target resolves to at the same slot.
    fn matches(
        &self,
        parameter: &ResolutionParameter,
        slot: &Slot,
        role: Role,
        found: &Value,
        definition: &SerializationDefinition,
    ) -> Result<bool> {
        if Self::expected(parameter, definition).loosely_equals(found) {
            return Ok(true);
        }

        let target = parameter.target();
        let map = definition.cache().get_or_build(target)?;
        for descendant in map.resolution_parameters() {
            let refines = descendant.target().type_id() != target.type_id()
                && descendant.target().derives_from(target.type_id());
            if refines
                && self.slot(descendant, role) == *slot
                && self.matches(descendant, slot, role, found, definition)?
            {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

impl Default for TypeResolution {
    fn default() -> Self {
        Self::new()
    }
}

impl Feature for TypeResolution {}

fn reject_collisions<'s>(
    map: &TypeReflectionMap,
    members: &[MemberBinding],
    slots: impl IntoIterator<Item = &'s Slot>,
) -> Result<()> {
    for slot in slots {
        if let Some(member) = members.iter().find(|member| member.slot() == slot) {
            return Err(Error::configuration(format_args!(
                "member `{}` of `{}` occupies the discriminator slot {slot}",
                member.name(),
                map.type_info().type_name()
            )));
        }
    }
    Ok(())
}

fn depth(info: &TypeInfo) -> usize {
    info.as_object().map_or(0, |object| object.depth())
}
