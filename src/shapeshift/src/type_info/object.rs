use std::any::TypeId;

use bitflags::bitflags;

use super::{DefaultFn, InfoFn, ValueInfo};
use crate::{value::Value, Key, Marker, Slot, Type};

bitflags! {
    /// The lifecycle hooks an object type implements itself.
    ///
    /// Hooks are only invoked on the inheritance levels whose
    /// flags request them.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct HookFlags: u8 {
        const BEFORE_SERIALIZE = 1 << 0;
        const AFTER_SERIALIZE = 1 << 1;
        const BEFORE_DESERIALIZE = 1 << 2;
        const AFTER_DESERIALIZE = 1 << 3;
    }
}

/// Requiredness of a [`Member`] during deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Required {
    /// Whether an explicit null also counts as missing.
    pub non_null: bool,
}

/// A binding of a member to a slot under a specific marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub marker: Marker,
    pub slot: Slot,
}

/// Description of a reflected field in an object type.
///
/// Members are addressed through their `field` id, which indexes
/// into [`Object::field`][crate::Object::field] on the type that
/// declares them.
#[derive(Clone, Debug)]
pub struct Member {
    name: &'static str,
    field: usize,
    info: InfoFn,
    bindings: Vec<Binding>,
    required: Option<Required>,
}

impl Member {
    /// Creates a new member description.
    pub fn new(name: &'static str, field: usize, info: InfoFn) -> Self {
        Self {
            name,
            field,
            info,
            bindings: Vec::new(),
            required: None,
        }
    }

    /// Binds the member to `slot` under `marker`.
    pub fn bind(mut self, marker: Marker, slot: Slot) -> Self {
        self.bindings.push(Binding { marker, slot });
        self
    }

    /// Marks the member as required.
    pub fn required(mut self, non_null: bool) -> Self {
        self.required = Some(Required { non_null });
        self
    }

    /// Gets the name of the Rust field.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Gets the accessor id of the field.
    #[inline]
    pub fn field(&self) -> usize {
        self.field
    }

    /// Gets the [`TypeInfo`][super::TypeInfo] of the field's type.
    #[inline]
    pub fn info(&self) -> InfoFn {
        self.info
    }

    /// Gets all marker bindings of the member.
    #[inline]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Gets the requiredness of the member, if any.
    #[inline]
    pub fn requirement(&self) -> Option<Required> {
        self.required
    }
}

/// A declared polymorphic refinement of an object type.
///
/// The `target` must derive from or implement the declaring type.
/// The discriminator defaults to the target's simple name and is
/// found at the definition's well-known key or index unless one of
/// the overrides is set.
#[derive(Clone, Debug)]
pub struct Resolution {
    target: InfoFn,
    value: Option<Value>,
    key: Option<Key>,
    index: Option<usize>,
}

impl Resolution {
    /// Creates a new resolution towards `target`.
    pub fn new(target: InfoFn) -> Self {
        Self {
            target,
            value: None,
            key: None,
            index: None,
        }
    }

    /// Sets an explicit discriminator value.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Overrides the lookup key the discriminator is stored under.
    pub fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    /// Overrides the sequence index the discriminator is stored at.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    #[inline]
    pub fn target(&self) -> InfoFn {
        self.target
    }

    #[inline]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    #[inline]
    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

/// An object layout description for reflective introspection and
/// serialization.
///
/// Users should prefer the `#[derive(Type)]` macro for constructing
/// instances of this type.
#[derive(Clone, Debug)]
pub struct ObjectInfo {
    value: ValueInfo,
    markers: Vec<Marker>,
    members: Vec<Member>,
    base: Option<InfoFn>,
    interfaces: Vec<InfoFn>,
    resolutions: Vec<Resolution>,
    hooks: HookFlags,
}

impl ObjectInfo {
    /// Starts building the object info for a type `T`.
    pub fn builder<T: Type>(name: Option<&'static str>) -> ObjectInfoBuilder {
        ObjectInfoBuilder {
            info: ObjectInfo {
                value: ValueInfo::new::<T>(name),
                markers: Vec::new(),
                members: Vec::new(),
                base: None,
                interfaces: Vec::new(),
                resolutions: Vec::new(),
                hooks: HookFlags::empty(),
            },
        }
    }

    /// Gets the basic [`ValueInfo`] of the object type.
    #[inline]
    pub fn value_info(&self) -> &ValueInfo {
        &self.value
    }

    /// Gets the name of the object type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    /// Gets the [`TypeId`] of the represented type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.value.type_id()
    }

    /// Whether the type cannot be instantiated.
    #[inline]
    pub fn is_abstract(&self) -> bool {
        !self.value.has_default()
    }

    /// Gets the markers this type declares itself under.
    ///
    /// This includes every marker used by a member binding.
    #[inline]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Gets the members declared directly on this type.
    #[inline]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Attempts to find a member with a specific field name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Gets the link to the embedded base type, if one exists.
    #[inline]
    pub fn base(&self) -> Option<InfoFn> {
        self.base
    }

    /// Gets the links to implemented interface types.
    #[inline]
    pub fn interfaces(&self) -> &[InfoFn] {
        &self.interfaces
    }

    /// Gets the resolutions declared directly on this type.
    #[inline]
    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    /// Gets the hooks this type implements itself.
    #[inline]
    pub fn hooks(&self) -> HookFlags {
        self.hooks
    }

    /// Checks whether this type is, derives from, or implements the
    /// type identified by `id`.
    pub fn derives_from(&self, id: TypeId) -> bool {
        self.type_id() == id
            || self.base.map_or(false, |base| base().derives_from(id))
            || self.interfaces.iter().any(|i| i().derives_from(id))
    }

    /// Gets the number of base levels above this type.
    pub fn depth(&self) -> usize {
        let bases = self
            .base
            .and_then(|base| base().as_object().map(|b| b.depth() + 1))
            .unwrap_or(0);
        let interfaces = self
            .interfaces
            .iter()
            .filter_map(|i| i().as_object().map(|i| i.depth() + 1))
            .max()
            .unwrap_or(0);

        bases.max(interfaces)
    }
}

/// Builder for [`ObjectInfo`].
pub struct ObjectInfoBuilder {
    info: ObjectInfo,
}

impl ObjectInfoBuilder {
    /// Declares the type under a marker.
    pub fn marker(mut self, marker: Marker) -> Self {
        if !self.info.markers.contains(&marker) {
            self.info.markers.push(marker);
        }
        self
    }

    /// Adds a reflected member.
    pub fn member(mut self, member: Member) -> Self {
        for binding in &member.bindings {
            if !self.info.markers.contains(&binding.marker) {
                self.info.markers.push(binding.marker);
            }
        }
        self.info.members.push(member);
        self
    }

    /// Sets the embedded base type.
    pub fn base(mut self, base: InfoFn) -> Self {
        self.info.base = Some(base);
        self
    }

    /// Adds an implemented interface type.
    pub fn interface(mut self, interface: InfoFn) -> Self {
        self.info.interfaces.push(interface);
        self
    }

    /// Adds a polymorphic resolution.
    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.info.resolutions.push(resolution);
        self
    }

    /// Declares implemented lifecycle hooks.
    pub fn hooks(mut self, hooks: HookFlags) -> Self {
        self.info.hooks |= hooks;
        self
    }

    /// Makes the type concrete through a default factory.
    pub fn default_fn(mut self, f: DefaultFn) -> Self {
        self.info.value = self.info.value.with_default(f);
        self
    }

    pub fn build(self) -> ObjectInfo {
        self.info
    }
}
