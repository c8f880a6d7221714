use std::{fmt, marker::PhantomData};

use crate::{
    impl_type_methods,
    type_info::{GenericTypeInfoCell, Reflected, TypeInfo},
    Object, ObjectExt, Optional, Type, TypeOwned,
};

/// A polymorphic, nullable pointer to an object.
///
/// A `Ptr<T>` can hold any [`Object`] whose type is `T`, derives from
/// `T` or implements `T`. On deserialization the most-derived type is
/// resolved from the data's discriminator.
pub struct Ptr<T> {
    // Invariant: The stored type derives from `T`.
    value: Option<Box<dyn Object>>,
    _t: PhantomData<fn() -> T>,
}

impl<T: Object + Reflected> Ptr<T> {
    /// Creates a new pointer to the given `value`.
    ///
    /// If `value` is not derived from `T`, it is handed back.
    pub fn try_new(value: Box<dyn Object>) -> Result<Self, Box<dyn Object>> {
        if value.type_info().derives_from(T::info().type_id()) {
            Ok(Self {
                value: Some(value),
                _t: PhantomData,
            })
        } else {
            Err(value)
        }
    }

    /// Creates a new pointer from a concrete value.
    ///
    /// # Panics
    ///
    /// Panics if `U` is not derived from `T`. Use [`Ptr::try_new`]
    /// for values of unknown type.
    pub fn new<U: Object>(value: U) -> Self {
        match Self::try_new(Box::new(value)) {
            Ok(ptr) => ptr,
            Err(value) => panic!(
                "`{}` does not derive from `{}`",
                value.type_info().type_name(),
                T::info().type_name()
            ),
        }
    }

    /// Creates a new pointer initialized to null.
    pub const fn null() -> Self {
        Self {
            value: None,
            _t: PhantomData,
        }
    }

    /// Whether the pointer is null, i.e. does not
    /// point to any value.
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Gets the raw value of the stored object.
    pub fn get_raw(&self) -> Option<&dyn Object> {
        self.value.as_deref()
    }

    /// Gets the inner value as a `T` reference.
    ///
    /// This is [`None`] for null pointers and when `T` is only an
    /// implemented interface instead of an embedded base.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.as_deref().and_then(|p| p.base_as::<T>())
    }

    /// Gets the inner value as a mutable `T` reference.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_deref_mut().and_then(|p| p.base_as_mut::<T>())
    }

    /// Gets the inner value downcasted to `U`, if that's the actual
    /// pointee type.
    pub fn downcast<U: Object>(&self) -> Option<&U> {
        self.value.as_ref().and_then(|p| p.as_any().downcast_ref())
    }

    /// Gets the inner value downcasted to `U`, if that's the actual
    /// pointee type.
    pub fn downcast_mut<U: Object>(&mut self) -> Option<&mut U> {
        self.value.as_mut().and_then(|p| p.as_any_mut().downcast_mut())
    }
}

impl<T: Object + Reflected> Default for Ptr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> fmt::Debug for Ptr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "Ptr({})", value.type_info().type_name()),
            None => f.write_str("Ptr(null)"),
        }
    }
}

impl<T: Object + Reflected> Reflected for Ptr<T> {
    fn info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self, _>(|| TypeInfo::leaf::<Self>(None))
    }
}

impl<T: Object + Reflected> Type for Ptr<T> {
    impl_type_methods!(Optional);
}

impl<T: Object + Reflected> Optional for Ptr<T> {
    fn inner_info(&self) -> &'static TypeInfo {
        T::info()
    }

    fn get(&self) -> Option<&dyn Type> {
        self.value.as_deref().map(|v| v.as_type())
    }

    fn get_mut(&mut self) -> Option<&mut dyn Type> {
        self.value.as_deref_mut().map(|v| v.as_type_mut())
    }

    fn clear(&mut self) {
        self.value = None;
    }

    fn replace(&mut self, value: Box<dyn Type>) -> Result<(), Box<dyn Type>> {
        match value.type_owned() {
            TypeOwned::Object(object) => {
                *self = Self::try_new(object).map_err(|object| object.as_boxed_type())?;
                Ok(())
            }
            other => Err(other.into_type()),
        }
    }

    fn is_polymorphic(&self) -> bool {
        true
    }
}
