use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
};

/// The container role a [`Marker`] stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Record-like objects keyed by [`Key`].
    Lookup,
    /// Positional objects addressed by index.
    Sequence,
}

/// A marker vocabulary that members bind to.
///
/// Formats declare which markers they recognize; a member only takes
/// part in a format when it carries a binding for one of them. This
/// allows the same type to expose different keys to, say, JSON and
/// HTTP headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Marker {
    name: &'static str,
    role: Role,
}

impl Marker {
    /// The default marker for lookup-style objects.
    pub const LOOKUP: Marker = Marker::lookup("lookup");

    /// The default marker for sequence-style objects.
    pub const SEQUENCE: Marker = Marker::sequence("sequence");

    /// Creates a new marker in the lookup role.
    pub const fn lookup(name: &'static str) -> Self {
        Self {
            name,
            role: Role::Lookup,
        }
    }

    /// Creates a new marker in the sequence role.
    pub const fn sequence(name: &'static str) -> Self {
        Self {
            name,
            role: Role::Sequence,
        }
    }

    /// Gets the name of the marker.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Gets the [`Role`] of the marker.
    #[inline]
    pub const fn role(&self) -> Role {
        self.role
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A key in a [`Lookup`][crate::value::Lookup] container.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Key {
    Str(Cow<'static, str>),
    Int(i64),
}

impl Key {
    /// Creates a string key from a static string.
    pub const fn from_static(key: &'static str) -> Self {
        Self::Str(Cow::Borrowed(key))
    }

    /// Gets the key as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// Compares two keys, ignoring ASCII case of string keys.
    pub fn eq_ignore_ascii_case(&self, other: &Key) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a.eq_ignore_ascii_case(b),
            (a, b) => a == b,
        }
    }
}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Str(s) => s.hash(state),
            Self::Int(i) => i.hash(state),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&'static str> for Key {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Str(Cow::Owned(value))
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// The position of a member inside its container.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Key(Key),
    Index(usize),
}

impl Slot {
    /// Checks whether the slot kind fits a marker [`Role`].
    pub fn fits(&self, role: Role) -> bool {
        matches!(
            (self, role),
            (Slot::Key(_), Role::Lookup) | (Slot::Index(_), Role::Sequence)
        )
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "\"{key}\""),
            Self::Index(idx) => write!(f, "[{idx}]"),
        }
    }
}
