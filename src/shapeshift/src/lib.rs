//! A format-agnostic reflection and object serialization engine.
//!
//! Reflected types describe their members once, through
//! [`type_info::TypeInfo`] generated by `#[derive(Type)]`. A
//! [`SerializationDefinition`] then decides which of those members
//! participate in a given format and how values are represented.
//!
//! Every conversion produces or consumes a [`Value`], which is either a
//! primitive or one of the two canonical containers: a
//! [`Lookup`][value::Lookup] (key to value) or a
//! [`Sequence`][value::Sequence] (index to value). Turning those into
//! text or bytes is left to downstream encoders.
//!
//! ```
//! use shapeshift::{Marker, SerializationDefinition, Type, Value};
//!
//! #[derive(Debug, Default, PartialEq, Type)]
//! struct Point {
//!     #[member(key = "x")]
//!     x: i32,
//!     #[member(key = "y")]
//!     y: i32,
//! }
//!
//! let definition = SerializationDefinition::builder()
//!     .lookup_marker(Marker::LOOKUP)
//!     .build()
//!     .unwrap();
//!
//! let value = shapeshift::serialize(&Point { x: 1, y: 2 }, &definition).unwrap();
//! assert!(matches!(value, Value::Lookup(_)));
//!
//! let point: Point = shapeshift::deserialize(&value, &definition).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

#[allow(unused_extern_crates)]
extern crate self as shapeshift;

#[doc(hidden)]
pub mod __private {
    pub use std::any::type_name;

    pub use bitflags::bitflags;
}

pub use shapeshift_macros::{bitenum, Type};

mod container;
pub use container::*;

pub mod definition;
pub use definition::SerializationDefinition;

mod r#enum;
pub use r#enum::*;

mod error;
pub use error::*;

pub mod features;

mod impls;

mod marker;
pub use marker::*;

mod object;
pub use object::*;

pub mod processors;

mod ptr;
pub use ptr::Ptr;

pub mod reflection;

mod serializer;
pub use serializer::*;

mod r#type;
pub use r#type::*;

pub mod type_info;

pub mod value;
pub use value::Value;

mod version;
pub use version::{ParseVersionError, Version};
