use std::any::TypeId;

use crate::{definition::SerializationDefinition, processors::Processor, Type};

/// The result type of lifecycle hooks.
pub type HookResult = anyhow::Result<()>;

/// Information passed to lifecycle hooks.
pub struct HookContext<'a> {
    pub(crate) processor: &'a dyn Processor,
    pub(crate) definition: &'a SerializationDefinition,
    pub(crate) path: String,
}

impl<'a> HookContext<'a> {
    /// Gets the processor that is converting the object.
    #[inline]
    pub fn processor(&self) -> &'a dyn Processor {
        self.processor
    }

    /// Gets the definition the conversion runs under.
    #[inline]
    pub fn definition(&self) -> &'a SerializationDefinition {
        self.definition
    }

    /// Gets the path of the object inside the converted graph.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A Rust struct which provides reflected access and metadata
/// to its fields.
///
/// Field metadata lives in the type's
/// [`ObjectInfo`][crate::type_info::ObjectInfo]; fields are accessed
/// dynamically through their ids.
///
/// Inheritance is emulated by embedding the base type as a field,
/// exposed through [`Object::base`].
pub trait Object: Type {
    /// Provides reflective immutable access to a field.
    fn field(&self, id: usize) -> Option<&dyn Type>;

    /// Provides reflective mutable access to a field.
    fn field_mut(&mut self, id: usize) -> Option<&mut dyn Type>;

    /// Gets the embedded base object, if one exists.
    fn base(&self) -> Option<&dyn Object> {
        None
    }

    /// Gets the embedded base object, if one exists.
    fn base_mut(&mut self) -> Option<&mut dyn Object> {
        None
    }

    /// Implementation-specific behavior before the object is
    /// serialized.
    #[allow(unused_variables)]
    fn before_serialize(&self, cx: &HookContext<'_>) -> HookResult {
        Ok(())
    }

    /// Implementation-specific behavior after the object was
    /// serialized.
    #[allow(unused_variables)]
    fn after_serialize(&self, cx: &HookContext<'_>) -> HookResult {
        Ok(())
    }

    /// Implementation-specific behavior after the object was
    /// instantiated, before any member is assigned.
    #[allow(unused_variables)]
    fn before_deserialize(&mut self, cx: &HookContext<'_>) -> HookResult {
        Ok(())
    }

    /// Implementation-specific behavior once all members were
    /// assigned.
    #[allow(unused_variables)]
    fn after_deserialize(&mut self, cx: &HookContext<'_>) -> HookResult {
        Ok(())
    }
}

pub(crate) fn upcast(obj: &dyn Object, id: TypeId) -> Option<&dyn Object> {
    if obj.as_any().type_id() == id {
        return Some(obj);
    }
    obj.base().and_then(|base| upcast(base, id))
}

pub(crate) fn upcast_mut(obj: &mut dyn Object, id: TypeId) -> Option<&mut dyn Object> {
    if obj.as_any().type_id() == id {
        return Some(obj);
    }
    obj.base_mut().and_then(|base| upcast_mut(base, id))
}

/// Extension trait to [`Object`] which provides
/// shortcuts for downcasting and accessing bases.
pub trait ObjectExt {
    /// Recursively tries to find a base `T` in the
    /// emulated inheritance tree.
    fn base_as<T: Object>(&self) -> Option<&T>;

    /// Recursively tries to find a base `T` in the
    /// emulated inheritance tree.
    fn base_as_mut<T: Object>(&mut self) -> Option<&mut T>;

    /// Provides reflective access to a field as a downcasted type.
    fn field_as<T: Type>(&self, id: usize) -> Option<&T>;
}

impl ObjectExt for dyn Object {
    fn base_as<T: Object>(&self) -> Option<&T> {
        upcast(self, TypeId::of::<T>()).and_then(|obj| obj.as_any().downcast_ref())
    }

    fn base_as_mut<T: Object>(&mut self) -> Option<&mut T> {
        upcast_mut(self, TypeId::of::<T>()).and_then(|obj| obj.as_any_mut().downcast_mut())
    }

    fn field_as<T: Type>(&self, id: usize) -> Option<&T> {
        self.field(id).and_then(<dyn Type>::downcast_ref)
    }
}

impl<O: Object> ObjectExt for O {
    fn base_as<T: Object>(&self) -> Option<&T> {
        (self as &dyn Object).base_as()
    }

    fn base_as_mut<T: Object>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Object).base_as_mut()
    }

    fn field_as<T: Type>(&self, id: usize) -> Option<&T> {
        self.field(id).and_then(<dyn Type>::downcast_ref)
    }
}
