use std::any::{type_name, TypeId};

use crate::Type;

/// Factory producing a default-initialized instance of a type.
pub type DefaultFn = fn() -> Box<dyn Type>;

/// Basic metadata shared by every kind of [`TypeInfo`].
///
/// [`TypeInfo`]: super::TypeInfo
#[derive(Clone, Copy, Debug)]
pub struct ValueInfo {
    type_name: &'static str,
    type_id: TypeId,
    default_fn: Option<DefaultFn>,
}

impl ValueInfo {
    /// Creates new metadata for the given `T`.
    ///
    /// The `name` argument optionally allows for choosing a custom
    /// type name. Defaults to Rust's [`type_name`] when missing.
    pub fn new<T: Type>(name: Option<&'static str>) -> Self {
        Self {
            type_name: name.unwrap_or_else(type_name::<T>),
            type_id: TypeId::of::<T>(),
            default_fn: None,
        }
    }

    /// Attaches a factory for default instances.
    pub fn with_default(mut self, f: DefaultFn) -> Self {
        self.default_fn = Some(f);
        self
    }

    /// Gets the name of the type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Gets the type name stripped of its module path and generics.
    pub fn simple_name(&self) -> &'static str {
        let name = self.type_name;
        let name = name.split('<').next().unwrap_or(name);
        name.rsplit("::").next().unwrap_or(name)
    }

    /// Gets the [`TypeId`] for the type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Checks if `T` matches the reflected type.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Whether the type can be default-constructed.
    #[inline]
    pub fn has_default(&self) -> bool {
        self.default_fn.is_some()
    }

    /// Creates a default instance, if the type is concrete.
    pub fn make_default(&self) -> Option<Box<dyn Type>> {
        self.default_fn.map(|f| f())
    }
}
