//! The processor chain that converts values to and from [`Value`]s.
//!
//! Every [`Processor`] handles one category of types. A definition
//! consults its processors in order and the first one to accept a
//! value wins, so the order of [`standard`] is significant: scalars
//! and enums come before the generic containers, and custom objects
//! are the final fallback.

use std::{fmt, sync::Arc};

use crate::{
    definition::SerializationDefinition,
    features::TypeResolution,
    type_info::TypeInfo,
    value::Value,
    Error, Result, Type,
};

mod collection;
pub use collection::{ListProcessor, MapProcessor};

mod datetime;
pub use datetime::DateTimeProcessor;

mod enums;
pub use enums::EnumProcessor;

mod exact;
pub use exact::ExactProcessor;

mod guid;
pub use guid::GuidProcessor;

mod object;
pub use object::{LookupObjectProcessor, SequenceObjectProcessor};

mod primitive;
pub use primitive::PrimitiveProcessor;

mod string;
pub use string::StringProcessor;

mod structured;
pub use structured::StructuredProcessor;

mod version;
pub use version::VersionProcessor;

/// A unit converting one category of values.
///
/// Both methods return [`None`] to pass on a value they do not
/// handle; the chain then moves on to the next processor.
pub trait Processor: fmt::Debug + Send + Sync {
    /// A short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Converts `value` into its [`Value`] representation.
    fn serialize(&self, value: &dyn Type, cx: &Context<'_>) -> Option<Result<Value>>;

    /// Assigns `data` to an already instantiated `target`.
    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>>;
}

/// Gets the standard processor chain in its priority order.
pub fn standard() -> Vec<Arc<dyn Processor>> {
    vec![
        Arc::new(ExactProcessor),
        Arc::new(EnumProcessor),
        Arc::new(PrimitiveProcessor),
        Arc::new(StringProcessor),
        Arc::new(DateTimeProcessor),
        Arc::new(GuidProcessor),
        Arc::new(VersionProcessor),
        Arc::new(StructuredProcessor),
        Arc::new(MapProcessor),
        Arc::new(ListProcessor),
        Arc::new(SequenceObjectProcessor),
        Arc::new(LookupObjectProcessor),
    ]
}

/// One step of the path from the root value to the current one.
#[derive(Clone, Copy, Debug)]
pub enum Segment<'a> {
    Root(&'static str),
    Field(&'a str),
    Key(&'a str),
    Index(usize),
}

/// The state of a single (de)serialization call at one nesting level.
///
/// Contexts form a parent-linked chain that renders as a member path
/// like `Leaderboard.entries[0].score` for error reporting.
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    definition: &'a SerializationDefinition,
    parent: Option<&'a Context<'a>>,
    segment: Segment<'a>,
    depth: usize,
}

impl<'a> Context<'a> {
    /// Creates the context for the root value of a call.
    pub fn root(definition: &'a SerializationDefinition, info: &'static TypeInfo) -> Self {
        Self {
            definition,
            parent: None,
            segment: Segment::Root(info.simple_name()),
            depth: 0,
        }
    }

    /// Creates a context one level below `self`.
    pub fn child<'b>(&'b self, segment: Segment<'b>) -> Context<'b> {
        Context {
            definition: self.definition,
            parent: Some(self),
            segment,
            depth: self.depth + 1,
        }
    }

    #[inline]
    pub fn definition(&self) -> &'a SerializationDefinition {
        self.definition
    }

    /// Gets the nesting depth, starting at 0 for the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Renders the path from the root to this level.
    pub fn path(&self) -> String {
        let mut path = match self.parent {
            Some(parent) => parent.path(),
            None => String::new(),
        };

        match self.segment {
            Segment::Root(name) => path.push_str(name),
            Segment::Field(name) => {
                path.push('.');
                path.push_str(name);
            }
            Segment::Key(key) => {
                path.push_str("[\"");
                path.push_str(key);
                path.push_str("\"]");
            }
            Segment::Index(idx) => {
                path.push('[');
                path.push_str(&idx.to_string());
                path.push(']');
            }
        }

        path
    }

    /// Creates an invalid data error at this level.
    pub fn invalid<T: fmt::Display>(&self, msg: T) -> Error {
        Error::invalid_data(msg, self.path())
    }

    /// Creates an error for data that does not fit `target`.
    pub fn mismatch(&self, target: &str, data: &Value) -> Error {
        self.invalid(format_args!("cannot read `{target}` from {}", data.kind_name()))
    }

    fn check_depth(&self) -> Result<()> {
        let limit = self.definition.max_depth();
        if self.depth > limit {
            return Err(Error::RecursionLimit {
                limit,
                path: self.path(),
            });
        }
        Ok(())
    }

    /// Runs `value` through the definition's processor chain.
    pub fn serialize(&self, value: &dyn Type) -> Result<Value> {
        self.check_depth()?;

        for processor in self.definition.processors() {
            if let Some(result) = processor.serialize(value, self) {
                tracing::trace!(processor = processor.name(), path = %self.path(), "serialized");
                return result;
            }
        }

        Err(Error::Unsupported {
            type_name: value.type_info().type_name(),
            path: self.path(),
        })
    }

    /// Runs `data` through the definition's processor chain into `target`.
    pub fn deserialize(&self, target: &mut dyn Type, data: &Value) -> Result<()> {
        self.check_depth()?;

        for processor in self.definition.processors() {
            if let Some(result) = processor.deserialize(target, data, self) {
                tracing::trace!(processor = processor.name(), path = %self.path(), "deserialized");
                return result;
            }
        }

        Err(Error::Unsupported {
            type_name: target.type_info().type_name(),
            path: self.path(),
        })
    }

    /// Creates a default instance of `info` to deserialize `data` into.
    ///
    /// With `polymorphic` set and type resolution enabled, the
    /// most-derived type the data's discriminators lead to is
    /// instantiated instead.
    pub fn instantiate(
        &self,
        info: &'static TypeInfo,
        data: &Value,
        polymorphic: bool,
    ) -> Result<Box<dyn Type>> {
        let resolved = match self.definition.feature::<TypeResolution>() {
            Some(resolution) if polymorphic => resolution.resolve(info, data, self)?,
            _ => info,
        };

        resolved.make_default().ok_or_else(|| Error::TypeResolution {
            type_name: resolved.type_name(),
            path: self.path(),
        })
    }
}
