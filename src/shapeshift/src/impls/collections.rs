use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    hash::{BuildHasher, Hash},
};

use indexmap::IndexMap;

use crate::{
    impl_type_methods,
    type_info::{GenericTypeInfoCell, Reflected, TypeInfo},
    List, Map, Optional, Type,
};

macro_rules! impl_generic_info {
    ([$($params:tt)*] $ty:ty) => {
        impl<$($params)*> Reflected for $ty {
            fn info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self, _>(|| TypeInfo::leaf::<Self>(None))
            }
        }
    };
}

macro_rules! impl_list {
    ([$($params:tt)*] $ty:ty, $push:ident) => {
        impl_generic_info!([$($params)*] $ty);

        impl<$($params)*> Type for $ty {
            impl_type_methods!(List);
        }

        impl<$($params)*> List for $ty {
            fn element_info(&self) -> &'static TypeInfo {
                T::info()
            }

            fn len(&self) -> usize {
                <$ty>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Type> + '_> {
                Box::new(IntoIterator::into_iter(self).map(|v| v as &dyn Type))
            }

            fn clear(&mut self) {
                <$ty>::clear(self)
            }

            fn push_boxed(&mut self, value: Box<dyn Type>) -> Result<(), Box<dyn Type>> {
                let value = value.downcast::<T>()?;
                self.$push(*value);
                Ok(())
            }
        }
    };
}

impl_list!([T: Type + Reflected] Vec<T>, push);
impl_list!([T: Type + Reflected] VecDeque<T>, push_back);
impl_list!([T: Type + Reflected + Ord] BTreeSet<T>, insert);
impl_list!(
    [T: Type + Reflected + Eq + Hash, S: BuildHasher + Default + Send + Sync + 'static]
    HashSet<T, S>,
    insert
);

macro_rules! impl_map {
    ([$($params:tt)*] $ty:ty) => {
        impl_generic_info!([$($params)*] $ty);

        impl<$($params)*> Type for $ty {
            impl_type_methods!(Map);
        }

        impl<$($params)*> Map for $ty {
            fn key_info(&self) -> &'static TypeInfo {
                K::info()
            }

            fn value_info(&self) -> &'static TypeInfo {
                V::info()
            }

            fn len(&self) -> usize {
                <$ty>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Type, &dyn Type)> + '_> {
                Box::new(<$ty>::iter(self).map(|(k, v)| (k as &dyn Type, v as &dyn Type)))
            }

            fn clear(&mut self) {
                <$ty>::clear(self)
            }

            fn insert_boxed(
                &mut self,
                key: Box<dyn Type>,
                value: Box<dyn Type>,
            ) -> Result<(), (Box<dyn Type>, Box<dyn Type>)> {
                if !key.is::<K>() || !value.is::<V>() {
                    return Err((key, value));
                }

                match (key.downcast::<K>(), value.downcast::<V>()) {
                    (Ok(key), Ok(value)) => {
                        self.insert(*key, *value);
                        Ok(())
                    }
                    (key, value) => Err((
                        key.map_or_else(|k| k, |k| k as Box<dyn Type>),
                        value.map_or_else(|v| v, |v| v as Box<dyn Type>),
                    )),
                }
            }
        }
    };
}

impl_map!([K: Type + Reflected + Ord, V: Type + Reflected] BTreeMap<K, V>);
impl_map!(
    [K: Type + Reflected + Eq + Hash, V: Type + Reflected, S: BuildHasher + Default + Send + Sync + 'static]
    HashMap<K, V, S>
);
impl_map!(
    [K: Type + Reflected + Eq + Hash, V: Type + Reflected, S: BuildHasher + Default + Send + Sync + 'static]
    IndexMap<K, V, S>
);

impl_generic_info!([T: Type + Reflected] Option<T>);

impl<T: Type + Reflected> Type for Option<T> {
    impl_type_methods!(Optional);
}

impl<T: Type + Reflected> Optional for Option<T> {
    fn inner_info(&self) -> &'static TypeInfo {
        T::info()
    }

    fn get(&self) -> Option<&dyn Type> {
        self.as_ref().map(|v| v as &dyn Type)
    }

    fn get_mut(&mut self) -> Option<&mut dyn Type> {
        self.as_mut().map(|v| v as &mut dyn Type)
    }

    fn clear(&mut self) {
        *self = None;
    }

    fn replace(&mut self, value: Box<dyn Type>) -> Result<(), Box<dyn Type>> {
        *self = Some(*value.downcast::<T>()?);
        Ok(())
    }
}
