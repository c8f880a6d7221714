use crate::{type_info::TypeInfo, Type};

/// A dynamically growable container that stores sequences
/// of values.
pub trait List: Type {
    /// Gets the [`TypeInfo`] of the element type.
    fn element_info(&self) -> &'static TypeInfo;

    /// Returns the number of elements inside the container.
    fn len(&self) -> usize;

    /// Indicates whether the container is empty.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the elements, in storage order.
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Type> + '_>;

    /// Clears the container, removing all elements.
    fn clear(&mut self);

    /// Reserves memory for `capacity` more elements.
    #[allow(unused_variables)]
    fn reserve(&mut self, capacity: usize) {}

    /// Appends a new element.
    ///
    /// Hands the value back if it is not of the element type.
    fn push_boxed(&mut self, value: Box<dyn Type>) -> Result<(), Box<dyn Type>>;
}

/// A container associating keys with values.
pub trait Map: Type {
    /// Gets the [`TypeInfo`] of the key type.
    fn key_info(&self) -> &'static TypeInfo;

    /// Gets the [`TypeInfo`] of the value type.
    fn value_info(&self) -> &'static TypeInfo;

    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Indicates whether the map is empty.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over all key and value pairs.
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Type, &dyn Type)> + '_>;

    /// Clears the map, removing all entries.
    fn clear(&mut self);

    /// Inserts a new entry.
    ///
    /// Hands both values back if either is of the wrong type.
    fn insert_boxed(
        &mut self,
        key: Box<dyn Type>,
        value: Box<dyn Type>,
    ) -> Result<(), (Box<dyn Type>, Box<dyn Type>)>;
}

/// A value that may be absent.
pub trait Optional: Type {
    /// Gets the [`TypeInfo`] of the contained type.
    fn inner_info(&self) -> &'static TypeInfo;

    /// Gets the contained value, if present.
    fn get(&self) -> Option<&dyn Type>;

    /// Gets the contained value, if present.
    fn get_mut(&mut self) -> Option<&mut dyn Type>;

    /// Resets the value to absent.
    fn clear(&mut self);

    /// Stores a new contained value.
    fn replace(&mut self, value: Box<dyn Type>) -> Result<(), Box<dyn Type>>;

    /// Whether the contained value may be of a type derived from
    /// [`Optional::inner_info`] rather than exactly that type.
    fn is_polymorphic(&self) -> bool {
        false
    }
}

/// A small vector-like value with named numeric components.
pub trait Structured: Type {
    /// Gets the names of the components, in positional order.
    fn component_names(&self) -> &'static [&'static str];

    /// Gets a component by position.
    fn component(&self, idx: usize) -> Option<&dyn Type>;

    /// Gets a component by position.
    fn component_mut(&mut self, idx: usize) -> Option<&mut dyn Type>;
}
