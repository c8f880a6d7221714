use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

use once_cell::race::OnceBox;
use parking_lot::RwLock;

use super::TypeInfo;

/// A storage cell for [`TypeInfo`] of non-generic types,
/// allowing static storage of instances.
///
/// If your type **is** generic, use [`GenericTypeInfoCell`]
/// instead. Using this type will lead to unexpected results.
pub struct NonGenericTypeInfoCell(OnceBox<TypeInfo>);

impl NonGenericTypeInfoCell {
    /// Creates a new, empty cell for non-generic type info.
    pub const fn new() -> Self {
        Self(OnceBox::new())
    }

    /// Returns a reference to the [`TypeInfo`] stored.
    ///
    /// If no [`TypeInfo`] is written for the cell yet, a new
    /// one will be created as needed.
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(|| Box::new(f()))
    }
}

impl Default for NonGenericTypeInfoCell {
    fn default() -> Self {
        Self::new()
    }
}

/// A storage cell for [`TypeInfo`] of generic types,
/// allowing static storage of instances.
///
/// A single `static` in a generic function is shared between all
/// instantiations, so entries are keyed by the [`TypeId`] of the
/// concrete type.
pub struct GenericTypeInfoCell(OnceBox<RwLock<HashMap<TypeId, &'static TypeInfo>>>);

impl GenericTypeInfoCell {
    /// Creates a new, empty cell for generic type info.
    pub const fn new() -> Self {
        Self(OnceBox::new())
    }

    /// Returns a reference to the [`TypeInfo`] stored for `T`.
    ///
    /// If no info is yet registered for the type, a new one will be
    /// lazily created and stored.
    pub fn get_or_insert<T, F>(&self, f: F) -> &'static TypeInfo
    where
        T: Any + ?Sized,
        F: FnOnce() -> TypeInfo,
    {
        let type_id = TypeId::of::<T>();

        let mapping = self.0.get_or_init(Box::default);
        if let Some(info) = mapping.read().get(&type_id) {
            return info;
        }

        // Info is built outside of the lock; on a lost race the loser's
        // allocation is dropped and the first inserted entry wins.
        let info = f();
        let mut mapping = mapping.write();
        if let Some(info) = mapping.get(&type_id) {
            return info;
        }

        // Leaked on purpose: type info lives for the rest of the process.
        let info: &'static TypeInfo = Box::leak(Box::new(info));
        mapping.insert(type_id, info);
        info
    }
}

impl Default for GenericTypeInfoCell {
    fn default() -> Self {
        Self::new()
    }
}
