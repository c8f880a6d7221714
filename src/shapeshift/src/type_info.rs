//! Statically accessible type information for reflected Rust types.

use std::any::TypeId;

use crate::r#type::Type;

mod cell;
pub use cell::*;

mod r#enum;
pub use r#enum::*;

mod object;
pub use object::*;

mod value;
pub use value::*;

/// Statically accessible [`TypeInfo`] for reflected types.
///
/// Info is produced lazily so that descriptors may refer to each
/// other in cycles, like a base type naming its own subtypes.
pub trait Reflected {
    /// Gets a reference to the associated [`TypeInfo`].
    fn info() -> &'static TypeInfo;
}

/// Provides object-safe [`TypeInfo`] for reflected values.
///
/// It is preferred to implement [`Reflected`] as implementations of
/// this trait come for free through it.
pub trait DynReflected {
    /// Gets the [`TypeInfo`] for `self`.
    fn type_info(&self) -> &'static TypeInfo;
}

impl<T: Reflected> DynReflected for T {
    fn type_info(&self) -> &'static TypeInfo {
        T::info()
    }
}

/// A deferred link to another type's info.
pub type InfoFn = fn() -> &'static TypeInfo;

/// Type information for a reflected Rust type.
#[derive(Debug)]
pub enum TypeInfo {
    /// Type info for an object type.
    ///
    /// It stores members and their marker bindings, along
    /// with the base, interfaces and type resolutions.
    Object(ObjectInfo),
    /// Type info for a reflected enum.
    Enum(EnumInfo),
    /// Type info for a leaf value type.
    ///
    /// This covers primitives, containers and any other
    /// type that does not expose members.
    Leaf(ValueInfo),
}

impl TypeInfo {
    /// Creates new [`ValueInfo`]-backed type info with a default factory.
    #[inline]
    pub fn leaf<T: Type + Default>(name: Option<&'static str>) -> Self {
        Self::Leaf(ValueInfo::new::<T>(name).with_default(|| Box::<T>::default() as Box<dyn Type>))
    }

    /// Gets the underlying [`ValueInfo`].
    pub fn value_info(&self) -> &ValueInfo {
        match self {
            TypeInfo::Object(info) => info.value_info(),
            TypeInfo::Enum(info) => info.value_info(),
            TypeInfo::Leaf(info) => info,
        }
    }

    /// Gets the human-readable name of the type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.value_info().type_name()
    }

    /// Gets the unqualified name of the type.
    #[inline]
    pub fn simple_name(&self) -> &'static str {
        self.value_info().simple_name()
    }

    /// Gets the [`TypeId`] for the type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.value_info().type_id()
    }

    /// Checks if the type `T` matches the reflected type.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.value_info().is::<T>()
    }

    /// Gets the object info, if this describes an object type.
    pub fn as_object(&self) -> Option<&ObjectInfo> {
        match self {
            TypeInfo::Object(info) => Some(info),
            _ => None,
        }
    }

    /// Gets the enum info, if this describes an enum type.
    pub fn as_enum(&self) -> Option<&EnumInfo> {
        match self {
            TypeInfo::Enum(info) => Some(info),
            _ => None,
        }
    }

    /// Whether a value of this type can be instantiated.
    pub fn is_concrete(&self) -> bool {
        self.value_info().has_default()
    }

    /// Creates a default-initialized instance of the type.
    ///
    /// Returns [`None`] for abstract types.
    pub fn make_default(&self) -> Option<Box<dyn Type>> {
        self.value_info().make_default()
    }

    /// Checks whether this type is, derives from, or implements the
    /// type identified by `id`.
    pub fn derives_from(&self, id: TypeId) -> bool {
        match self {
            TypeInfo::Object(info) => info.derives_from(id),
            other => other.type_id() == id,
        }
    }
}
