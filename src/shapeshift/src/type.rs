use std::any::{Any, TypeId};

use crate::{type_info::DynReflected, Enum, List, Map, Object, Optional, Structured};

/// An immutable reference to a value categorized by
/// varying data types.
pub enum TypeRef<'ty> {
    /// A reflected object reference.
    Object(&'ty dyn Object),
    /// An enum reference.
    Enum(&'ty dyn Enum),
    /// A sequence-like collection reference.
    List(&'ty dyn List),
    /// A key to value collection reference.
    Map(&'ty dyn Map),
    /// A nullable value reference.
    Optional(&'ty dyn Optional),
    /// A vector-like primitive reference.
    Structured(&'ty dyn Structured),
    /// A regular value reference.
    Value(&'ty dyn Type),
}

/// A mutable reference to a value categorized by
/// varying data types.
pub enum TypeMut<'ty> {
    /// A reflected object reference.
    Object(&'ty mut dyn Object),
    /// An enum reference.
    Enum(&'ty mut dyn Enum),
    /// A sequence-like collection reference.
    List(&'ty mut dyn List),
    /// A key to value collection reference.
    Map(&'ty mut dyn Map),
    /// A nullable value reference.
    Optional(&'ty mut dyn Optional),
    /// A vector-like primitive reference.
    Structured(&'ty mut dyn Structured),
    /// A regular value reference.
    Value(&'ty mut dyn Type),
}

/// An owned value categorized by varying data types.
pub enum TypeOwned {
    Object(Box<dyn Object>),
    Enum(Box<dyn Enum>),
    List(Box<dyn List>),
    Map(Box<dyn Map>),
    Optional(Box<dyn Optional>),
    Structured(Box<dyn Structured>),
    Value(Box<dyn Type>),
}

impl TypeOwned {
    /// Converts the categorized value back into a plain [`Type`].
    pub fn into_type(self) -> Box<dyn Type> {
        match self {
            Self::Object(value) => value.as_boxed_type(),
            Self::Enum(value) => value.as_boxed_type(),
            Self::List(value) => value.as_boxed_type(),
            Self::Map(value) => value.as_boxed_type(),
            Self::Optional(value) => value.as_boxed_type(),
            Self::Structured(value) => value.as_boxed_type(),
            Self::Value(value) => value,
        }
    }
}

/// A reflected Rust type.
///
/// It is generally recommended to leave the work to the
/// `#[derive(Type)]` macro or [`impl_type_methods!`] unless
/// there is a reason not to.
///
/// - [`Type::as_any`] and [`Type::as_any_mut`] should
///   always return `self`.
///
/// - [`Type::as_type`] and [`Type::as_type_mut`] should
///   always return `self`.
///
/// [`impl_type_methods!`]: crate::impl_type_methods
pub trait Type: Any + Sync + Send + DynReflected + 'static {
    /// Gets the value as an [`Any`] reference.
    fn as_any(&self) -> &dyn Any;

    /// Gets the value as an [`Any`] reference.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Converts the boxed value into a boxed [`Any`].
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Gets the value as a [`Type`] reference.
    fn as_type(&self) -> &dyn Type;

    /// Gets the value as a [`Type`] reference.
    fn as_type_mut(&mut self) -> &mut dyn Type;

    /// Gets the value as a boxed [`Type`] object.
    fn as_boxed_type(self: Box<Self>) -> Box<dyn Type>;

    /// Gets `self` as a [`TypeRef`].
    fn type_ref(&self) -> TypeRef<'_>;

    /// Gets `self` as a [`TypeMut`].
    fn type_mut(&mut self) -> TypeMut<'_>;

    /// Gets `self` as a [`TypeOwned`].
    fn type_owned(self: Box<Self>) -> TypeOwned;

    /// Attempts to perform a type-checked assignment of
    /// `value` to `self`.
    ///
    /// If the types are incompatible with each other, then
    /// `value` will be passed back in the [`Err`] variant.
    fn set(&mut self, value: Box<dyn Type>) -> Result<(), Box<dyn Type>>;

    /// Swaps `value` into `self` and returns the previous value.
    ///
    /// Incompatible values are passed back in the [`Err`] variant.
    fn replace(&mut self, value: Box<dyn Type>) -> Result<Box<dyn Type>, Box<dyn Type>>;
}

impl dyn Type {
    /// Checks if this value is an instance of `T`.
    #[inline]
    pub fn is<T: Type>(&self) -> bool {
        self.as_any().type_id() == TypeId::of::<T>()
    }

    /// Downcasts the value into the concrete type if it
    /// is a `T` underneath.
    #[inline]
    pub fn downcast_ref<T: Type>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Downcasts the value into the concrete type if it
    /// is a `T` underneath.
    #[inline]
    pub fn downcast_mut<T: Type>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Consumes `self` and casts it into a concrete `T`,
    /// if it is one underneath.
    ///
    /// When that is not the case, `self` will be returned
    /// as-is in the error variant to re-gain ownership.
    pub fn downcast<T: Type>(self: Box<dyn Type>) -> Result<Box<T>, Box<dyn Type>> {
        if !self.is::<T>() {
            return Err(self);
        }

        match self.into_any().downcast() {
            Ok(value) => Ok(value),
            // `is` already compared the type ids.
            Err(_) => unreachable!(),
        }
    }
}
