use crate::{type_info::EnumInfo, Type};

/// A reflected Rust enum or flag set with numbered values.
///
/// Variant names, aliases and representation preferences live in
/// the [`EnumInfo`] returned by [`Enum::enum_info`].
pub trait Enum: Type {
    /// Gets the reflection metadata of the enum.
    fn enum_info(&self) -> &'static EnumInfo;

    /// Gets the value of this variant.
    fn value(&self) -> i64;

    /// Updates the value of `self` to the given variant value.
    ///
    /// No-op returning `false` if no such variant exists.
    fn update_value(&mut self, value: i64) -> bool;
}
