//! Optional capabilities of a [`SerializationDefinition`].
//!
//! Definitions are probed for features with
//! [`SerializationDefinition::feature`]; processors only apply a
//! feature's behavior when the definition carries it.
//!
//! [`SerializationDefinition`]: crate::SerializationDefinition
//! [`SerializationDefinition::feature`]: crate::SerializationDefinition::feature

use std::any::Any;

mod callbacks;
pub use callbacks::Callbacks;
pub(crate) use callbacks::Hook;

mod enum_alias;
pub use enum_alias::{AliasTable, EnumAliases, EnumCache};

mod parallel;
pub use parallel::ParallelProcessing;

mod required;
pub use required::RequiredValues;

mod resolution;
pub use resolution::TypeResolution;

/// A capability a definition may expose.
pub trait Feature: Any + Send + Sync {}
