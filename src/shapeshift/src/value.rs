//! The format-neutral data model produced and consumed by the engine.

use indexmap::{map, Equivalent, IndexMap};

use crate::{definition::KeyComparison, Key, Slot};

/// A primitive value or one of the canonical containers.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Lookup(Lookup),
    Sequence(Sequence),
}

impl Value {
    /// Whether the value is [`Value::Null`].
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Gets the value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Gets the value as a [`Lookup`], if it is one.
    pub fn as_lookup(&self) -> Option<&Lookup> {
        match self {
            Value::Lookup(l) => Some(l),
            _ => None,
        }
    }

    /// Gets the value as a [`Sequence`], if it is one.
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Gets the value stored at `slot` of a container.
    ///
    /// Keys only address lookups and indices only address sequences.
    pub fn at(&self, slot: &Slot, comparison: KeyComparison) -> Option<&Value> {
        match (self, slot) {
            (Value::Lookup(lookup), Slot::Key(key)) => lookup.find(key, comparison),
            (Value::Sequence(sequence), Slot::Index(idx)) => sequence.get(*idx),
            _ => None,
        }
    }

    /// A short name for the kind of value, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Lookup(_) => "lookup",
            Value::Sequence(_) => "sequence",
        }
    }

    /// Compares two primitive values across representations.
    ///
    /// Integers compare equal regardless of signedness, and anything
    /// compares equal to its string rendering. Containers fall back to
    /// structural equality.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        if self == other {
            return true;
        }

        match (self, other) {
            (Value::Int(a), Value::UInt(b)) | (Value::UInt(b), Value::Int(a)) => {
                u64::try_from(*a).map_or(false, |a| a == *b)
            }
            (Value::String(s), other) | (other, Value::String(s)) => other
                .to_key_string()
                .map_or(false, |rendered| rendered == *s),
            _ => false,
        }
    }

    /// Renders a primitive as the string it would be keyed by.
    pub fn to_key_string(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::UInt(u) => Some(u.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Lookup> for Value {
    fn from(value: Lookup) -> Self {
        Value::Lookup(value)
    }
}

impl From<Sequence> for Value {
    fn from(value: Sequence) -> Self {
        Value::Sequence(value)
    }
}

impl From<Key> for Value {
    fn from(value: Key) -> Self {
        match value {
            Key::Str(s) => Value::String(s.into_owned()),
            Key::Int(i) => Value::Int(i),
        }
    }
}

// Borrowed probe for string keys, hashing the same as `Key::Str`.
#[derive(Hash)]
struct StrKey<'a>(&'a str);

impl Equivalent<Key> for StrKey<'_> {
    fn equivalent(&self, key: &Key) -> bool {
        key.as_str() == Some(self.0)
    }
}

/// A key to value container that preserves insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lookup(IndexMap<Key, Value>);

impl Lookup {
    /// Creates an empty lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty lookup with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Inserts a value, returning the previous one under `key`.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Gets the value stored under an exact `key`.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.0.get(key)
    }

    /// Gets the value stored under a string key.
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.0.get(&StrKey(key))
    }

    /// Gets the value under `key` with the given key comparison.
    pub fn find(&self, key: &Key, comparison: KeyComparison) -> Option<&Value> {
        match comparison {
            KeyComparison::Exact => self.get(key),
            KeyComparison::IgnoreAsciiCase => self.get(key).or_else(|| {
                self.0
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            }),
        }
    }

    /// Whether an entry for `key` exists under the given comparison.
    pub fn contains(&self, key: &Key, comparison: KeyComparison) -> bool {
        self.find(key, comparison).is_some()
    }

    /// Gets the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the lookup has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> map::Iter<'_, Key, Value> {
        self.0.iter()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Lookup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut lookup = Lookup::new();
        for (k, v) in iter {
            lookup.insert(k, v);
        }
        lookup
    }
}

impl IntoIterator for Lookup {
    type Item = (Key, Value);
    type IntoIter = map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Lookup {
    type Item = (&'a Key, &'a Value);
    type IntoIter = map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// An ordered, index-addressed container.
///
/// Sequences are gap-tolerant: writing past the end pads the skipped
/// positions with [`Value::Null`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sequence(Vec<Value>);

impl Sequence {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sequence with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Appends a value to the back.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    /// Stores `value` at `index`, padding any gap with nulls.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) {
        if index >= self.0.len() {
            self.0.resize(index + 1, Value::Null);
        }
        self.0[index] = value.into();
    }

    /// Gets the value at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Gets the number of positions, placeholders included.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence has no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all positions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

impl<V: Into<Value>> FromIterator<V> for Sequence {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for Sequence {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builds a [`Lookup`] from `key => value` pairs.
///
/// ```
/// # use shapeshift::{lookup, value::Value};
/// let l = lookup! { "Name" => "Daily", "Score" => 9001_i64 };
/// assert_eq!(l.get_str("Score"), Some(&Value::Int(9001)));
/// ```
#[macro_export]
macro_rules! lookup {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut lookup = $crate::value::Lookup::new();
        $(lookup.insert($key, $value);)*
        lookup
    }};
}

/// Builds a [`Sequence`] from values.
#[macro_export]
macro_rules! sequence {
    ($($value:expr),* $(,)?) => {{
        let mut sequence = $crate::value::Sequence::new();
        $(sequence.push($value);)*
        sequence
    }};
}
