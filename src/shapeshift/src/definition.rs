//! Per-format configuration of the engine.
//!
//! A [`SerializationDefinition`] is constructed once per format and
//! reused for the lifetime of the process. It is stateless with respect
//! to individual calls and may be shared between threads.

use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use bitflags::bitflags;

use crate::{
    features::Feature,
    processors::{self, Processor},
    reflection::ReflectionCache,
    serializer,
    type_info::TypeInfo,
    value::{Lookup, Sequence, Value},
    Error, Marker, Result, Role, Type,
};

bitflags! {
    /// The primitive kinds a format accepts as-is.
    ///
    /// Primitives outside of this set are rendered as strings.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Natives: u8 {
        const BOOL = 1 << 0;
        const INT = 1 << 1;
        const UINT = 1 << 2;
        const FLOAT = 1 << 3;
        const STRING = 1 << 4;
    }
}

impl Default for Natives {
    fn default() -> Self {
        Self::all()
    }
}

/// How date and time values are represented.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DateEncoding {
    /// RFC 3339 strings, e.g. `2024-01-02T03:04:05Z`.
    #[default]
    Rfc3339,
    /// Whole seconds since the Unix epoch.
    UnixSeconds,
    /// Milliseconds since the Unix epoch.
    UnixMillis,
    /// Strings rendered with a `strftime`-style pattern.
    Pattern(String),
}

/// Culture-neutral formatting rules of a definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatProvider {
    pub dates: DateEncoding,
}

/// How vector-like primitives are encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StructuredStyle {
    /// `{"x": 1, "y": 2}`
    #[default]
    Lookup,
    /// `[1, 2]`
    Sequence,
}

/// How lookup keys in source data are matched against member keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyComparison {
    #[default]
    Exact,
    IgnoreAsciiCase,
}

/// The container roles a definition supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    LookupOnly,
    SequenceOnly,
    Combined,
}

/// Creates the concrete containers for each role.
pub trait ContainerFactory: fmt::Debug + Send + Sync {
    fn create_lookup(&self, capacity: usize) -> Lookup;

    fn create_sequence(&self, capacity: usize) -> Sequence;
}

/// The default [`ContainerFactory`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardContainers;

impl ContainerFactory for StandardContainers {
    fn create_lookup(&self, capacity: usize) -> Lookup {
        Lookup::with_capacity(capacity)
    }

    fn create_sequence(&self, capacity: usize) -> Sequence {
        Sequence::with_capacity(capacity)
    }
}

/// The capabilities a definition exposes, keyed by type.
#[derive(Default)]
struct FeatureSet {
    features: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    names: Vec<&'static str>,
}

impl FeatureSet {
    fn insert<F: Feature>(&mut self, feature: F) {
        if self
            .features
            .insert(TypeId::of::<F>(), Box::new(feature))
            .is_none()
        {
            self.names.push(type_name::<F>());
        }
    }

    fn get<F: Feature>(&self) -> Option<&F> {
        self.features
            .get(&TypeId::of::<F>())
            .and_then(|f| f.downcast_ref())
    }
}

impl fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.names).finish()
    }
}

/// The default maximum nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// The configuration for one serialization format.
#[derive(Debug)]
pub struct SerializationDefinition {
    lookup_marker: Option<Marker>,
    sequence_marker: Option<Marker>,
    natives: Natives,
    processors: Vec<Arc<dyn Processor>>,
    format: FormatProvider,
    structured_style: StructuredStyle,
    key_comparison: KeyComparison,
    containers: Arc<dyn ContainerFactory>,
    cache: Arc<ReflectionCache>,
    max_depth: usize,
    features: FeatureSet,
}

impl SerializationDefinition {
    /// Starts building a new definition.
    pub fn builder() -> DefinitionBuilder {
        DefinitionBuilder::default()
    }

    #[inline]
    pub fn lookup_marker(&self) -> Option<Marker> {
        self.lookup_marker
    }

    #[inline]
    pub fn sequence_marker(&self) -> Option<Marker> {
        self.sequence_marker
    }

    /// Gets the container roles this definition supports.
    pub fn shape(&self) -> Shape {
        match (self.lookup_marker, self.sequence_marker) {
            (Some(_), Some(_)) => Shape::Combined,
            (None, Some(_)) => Shape::SequenceOnly,
            _ => Shape::LookupOnly,
        }
    }

    #[inline]
    pub fn natives(&self) -> Natives {
        self.natives
    }

    /// Gets the ordered processor chain.
    #[inline]
    pub fn processors(&self) -> &[Arc<dyn Processor>] {
        &self.processors
    }

    #[inline]
    pub fn format(&self) -> &FormatProvider {
        &self.format
    }

    #[inline]
    pub fn structured_style(&self) -> StructuredStyle {
        self.structured_style
    }

    #[inline]
    pub fn key_comparison(&self) -> KeyComparison {
        self.key_comparison
    }

    #[inline]
    pub fn containers(&self) -> &dyn ContainerFactory {
        &*self.containers
    }

    /// Gets the reflection map cache this definition reads from.
    #[inline]
    pub fn cache(&self) -> &Arc<ReflectionCache> {
        &self.cache
    }

    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Probes the definition for a feature capability.
    pub fn feature<F: Feature>(&self) -> Option<&F> {
        self.features.get()
    }

    /// Whether the definition exposes a feature capability.
    pub fn supports<F: Feature>(&self) -> bool {
        self.feature::<F>().is_some()
    }

    pub fn encode_bool(&self, value: bool) -> Value {
        if self.natives.contains(Natives::BOOL) {
            Value::Bool(value)
        } else {
            Value::String(value.to_string())
        }
    }

    pub fn encode_i64(&self, value: i64) -> Value {
        if self.natives.contains(Natives::INT) {
            Value::Int(value)
        } else {
            Value::String(value.to_string())
        }
    }

    pub fn encode_u64(&self, value: u64) -> Value {
        if self.natives.contains(Natives::UINT) {
            Value::UInt(value)
        } else if self.natives.contains(Natives::INT) && i64::try_from(value).is_ok() {
            Value::Int(value as i64)
        } else {
            Value::String(value.to_string())
        }
    }

    pub fn encode_f64(&self, value: f64) -> Value {
        if self.natives.contains(Natives::FLOAT) {
            Value::Float(value)
        } else {
            Value::String(value.to_string())
        }
    }

    pub fn encode_f32(&self, value: f32) -> Value {
        if self.natives.contains(Natives::FLOAT) {
            Value::Float(value as f64)
        } else {
            Value::String(value.to_string())
        }
    }

    /// Serializes `value` into a [`Value`].
    pub fn serialize(&self, value: &dyn Type) -> Result<Value> {
        serializer::serialize(value, self)
    }

    /// Deserializes an instance of `T` from `data`.
    pub fn deserialize<T: Type + Default>(&self, data: &Value) -> Result<T> {
        serializer::deserialize(data, self)
    }

    /// Deserializes the most-derived resolvable type from `data`.
    pub fn deserialize_type(&self, info: &'static TypeInfo, data: &Value) -> Result<Box<dyn Type>> {
        serializer::deserialize_type(info, data, self)
    }

    /// Deserializes `data` onto an existing instance.
    pub fn deserialize_into(&self, target: &mut dyn Type, data: &Value) -> Result<()> {
        serializer::deserialize_into(target, data, self)
    }
}

/// Builder for [`SerializationDefinition`].
#[derive(Debug)]
pub struct DefinitionBuilder {
    lookup_marker: Option<Marker>,
    sequence_marker: Option<Marker>,
    natives: Natives,
    processors: Option<Vec<Arc<dyn Processor>>>,
    format: FormatProvider,
    structured_style: StructuredStyle,
    key_comparison: KeyComparison,
    containers: Arc<dyn ContainerFactory>,
    cache: Option<Arc<ReflectionCache>>,
    max_depth: usize,
    features: FeatureSet,
}

impl Default for DefinitionBuilder {
    fn default() -> Self {
        Self {
            lookup_marker: None,
            sequence_marker: None,
            natives: Natives::all(),
            processors: None,
            format: FormatProvider::default(),
            structured_style: StructuredStyle::default(),
            key_comparison: KeyComparison::default(),
            containers: Arc::new(StandardContainers),
            cache: None,
            max_depth: DEFAULT_MAX_DEPTH,
            features: FeatureSet::default(),
        }
    }
}

impl DefinitionBuilder {
    /// Sets the marker that makes types eligible as lookup objects.
    pub fn lookup_marker(mut self, marker: Marker) -> Self {
        self.lookup_marker = Some(marker);
        self
    }

    /// Sets the marker that makes types eligible as sequence objects.
    pub fn sequence_marker(mut self, marker: Marker) -> Self {
        self.sequence_marker = Some(marker);
        self
    }

    pub fn natives(mut self, natives: Natives) -> Self {
        self.natives = natives;
        self
    }

    /// Replaces the processor chain.
    pub fn processors(mut self, processors: Vec<Arc<dyn Processor>>) -> Self {
        self.processors = Some(processors);
        self
    }

    pub fn format(mut self, format: FormatProvider) -> Self {
        self.format = format;
        self
    }

    pub fn dates(mut self, dates: DateEncoding) -> Self {
        self.format.dates = dates;
        self
    }

    pub fn structured_style(mut self, style: StructuredStyle) -> Self {
        self.structured_style = style;
        self
    }

    pub fn key_comparison(mut self, comparison: KeyComparison) -> Self {
        self.key_comparison = comparison;
        self
    }

    pub fn containers(mut self, containers: Arc<dyn ContainerFactory>) -> Self {
        self.containers = containers;
        self
    }

    /// Shares a reflection map cache with other definitions.
    ///
    /// Each definition gets a private cache otherwise.
    pub fn cache(mut self, cache: Arc<ReflectionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Adds a feature capability.
    pub fn feature<F: Feature>(mut self, feature: F) -> Self {
        self.features.insert(feature);
        self
    }

    /// Validates the configuration and builds the definition.
    pub fn build(self) -> Result<SerializationDefinition> {
        if self.lookup_marker.is_none() && self.sequence_marker.is_none() {
            return Err(Error::configuration(
                "a definition needs a lookup marker, a sequence marker or both",
            ));
        }
        if let Some(marker) = self.lookup_marker {
            if marker.role() != Role::Lookup {
                return Err(Error::configuration(format_args!(
                    "lookup marker `{marker}` has the sequence role"
                )));
            }
        }
        if let Some(marker) = self.sequence_marker {
            if marker.role() != Role::Sequence {
                return Err(Error::configuration(format_args!(
                    "sequence marker `{marker}` has the lookup role"
                )));
            }
        }
        if self.max_depth == 0 {
            return Err(Error::configuration("max depth must be at least 1"));
        }

        let processors = self.processors.unwrap_or_else(processors::standard);
        if processors.is_empty() {
            return Err(Error::configuration("the processor chain is empty"));
        }

        Ok(SerializationDefinition {
            lookup_marker: self.lookup_marker,
            sequence_marker: self.sequence_marker,
            natives: self.natives,
            processors,
            format: self.format,
            structured_style: self.structured_style,
            key_comparison: self.key_comparison,
            containers: self.containers,
            cache: self.cache.unwrap_or_default(),
            max_depth: self.max_depth,
            features: self.features,
        })
    }
}
