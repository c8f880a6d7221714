mod chrono;
mod collections;
mod glam;
mod primitives;

/// Implements the [`Reflected`][crate::type_info::Reflected]
/// trait for custom leaf types.
///
/// The type must implement [`Default`]. Do not use this with
/// object or enum types; derive [`Type`][crate::Type] for those.
#[macro_export]
macro_rules! impl_leaf_info_for {
    ($ty:ty) => {
        $crate::impl_leaf_info_for!($ty, ::std::option::Option::None);
    };

    ($ty:ty, $name:expr) => {
        impl $crate::type_info::Reflected for $ty {
            fn info() -> &'static $crate::type_info::TypeInfo {
                static CELL: $crate::type_info::NonGenericTypeInfoCell =
                    $crate::type_info::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| $crate::type_info::TypeInfo::leaf::<$ty>($name))
            }
        }
    };
}

/// Implements the [`Type`][crate::Type] methods in-place.
///
/// The argument names the [`TypeRef`][crate::TypeRef] category
/// the implementing type falls into.
///
/// # Example
///
/// ```
/// # use shapeshift::{impl_leaf_info_for, impl_type_methods, Type};
/// #[derive(Default)]
/// struct Example;
///
/// impl Type for Example {
///     impl_type_methods!(Value);
/// }
/// impl_leaf_info_for!(Example);
/// ```
#[macro_export]
macro_rules! impl_type_methods {
    ($kind:ident) => {
        #[inline]
        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        #[inline]
        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }

        #[inline]
        fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
            self
        }

        #[inline]
        fn as_type(&self) -> &dyn $crate::Type {
            self
        }

        #[inline]
        fn as_type_mut(&mut self) -> &mut dyn $crate::Type {
            self
        }

        #[inline]
        fn as_boxed_type(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn $crate::Type> {
            self
        }

        #[inline]
        fn type_ref(&self) -> $crate::TypeRef<'_> {
            $crate::TypeRef::$kind(self)
        }

        #[inline]
        fn type_mut(&mut self) -> $crate::TypeMut<'_> {
            $crate::TypeMut::$kind(self)
        }

        #[inline]
        fn type_owned(self: ::std::boxed::Box<Self>) -> $crate::TypeOwned {
            $crate::TypeOwned::$kind(self)
        }

        #[inline]
        fn set(
            &mut self,
            value: ::std::boxed::Box<dyn $crate::Type>,
        ) -> ::std::result::Result<(), ::std::boxed::Box<dyn $crate::Type>> {
            *self = *value.downcast()?;
            ::std::result::Result::Ok(())
        }

        #[inline]
        fn replace(
            &mut self,
            value: ::std::boxed::Box<dyn $crate::Type>,
        ) -> ::std::result::Result<
            ::std::boxed::Box<dyn $crate::Type>,
            ::std::boxed::Box<dyn $crate::Type>,
        > {
            let mut value: ::std::boxed::Box<Self> = value.downcast()?;
            ::std::mem::swap(self, &mut *value);
            ::std::result::Result::Ok(value as ::std::boxed::Box<dyn $crate::Type>)
        }
    };
}

macro_rules! impl_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            $crate::impl_leaf_info_for!($ty);
            impl $crate::Type for $ty {
                $crate::impl_type_methods!(Value);
            }
        )*
    };
}
pub(crate) use impl_leaf;
