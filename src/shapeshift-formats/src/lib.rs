//! Prebuilt [`SerializationDefinition`]s for common payload formats.
//!
//! Every constructor takes the [`ReflectionCache`] to share, so that
//! all formats of a process reflect each type only once:
//!
//! ```
//! use std::sync::Arc;
//!
//! use shapeshift::reflection::ReflectionCache;
//!
//! let cache = Arc::new(ReflectionCache::new());
//! let json = shapeshift_formats::json(cache.clone()).unwrap();
//! let header = shapeshift_formats::http_header(cache).unwrap();
//! # let _ = (json, header);
//! ```

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::sync::Arc;

use shapeshift::{
    definition::{DateEncoding, KeyComparison, Natives},
    features::{Callbacks, EnumAliases, ParallelProcessing, RequiredValues, TypeResolution},
    reflection::ReflectionCache,
    Marker, Result, SerializationDefinition,
};

mod error;
pub use error::FormatError;

pub mod json;

/// Members bound for XML documents.
pub const XML: Marker = Marker::lookup("xml");

/// Members transported as HTTP headers.
pub const HEADER: Marker = Marker::lookup("header");

/// Members transported in URL query strings.
pub const QUERY: Marker = Marker::lookup("query");

/// JSON documents.
///
/// Objects may be lookups or sequences; discriminators are stored
/// under `"$type"`.
pub fn json(cache: Arc<ReflectionCache>) -> Result<SerializationDefinition> {
    let definition = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .sequence_marker(Marker::SEQUENCE)
        .cache(cache)
        .feature(TypeResolution::new())
        .feature(RequiredValues)
        .feature(EnumAliases::new())
        .feature(Callbacks)
        .build()?;

    tracing::debug!(format = "json", "built definition");
    Ok(definition)
}

/// XML documents, where every primitive is text.
pub fn xml(cache: Arc<ReflectionCache>) -> Result<SerializationDefinition> {
    let definition = SerializationDefinition::builder()
        .lookup_marker(XML)
        .natives(Natives::STRING)
        .dates(DateEncoding::Rfc3339)
        .cache(cache)
        .feature(TypeResolution::new().key("type"))
        .feature(RequiredValues)
        .feature(EnumAliases::new())
        .feature(Callbacks)
        .build()?;

    tracing::debug!(format = "xml", "built definition");
    Ok(definition)
}

/// HTTP request and response bodies.
pub fn http_body(cache: Arc<ReflectionCache>) -> Result<SerializationDefinition> {
    let definition = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .sequence_marker(Marker::SEQUENCE)
        .cache(cache)
        .feature(TypeResolution::new())
        .feature(RequiredValues)
        .feature(Callbacks)
        .build()?;

    tracing::debug!(format = "http-body", "built definition");
    Ok(definition)
}

/// HTTP headers, matched case-insensitively.
pub fn http_header(cache: Arc<ReflectionCache>) -> Result<SerializationDefinition> {
    let definition = SerializationDefinition::builder()
        .lookup_marker(HEADER)
        .natives(Natives::STRING)
        .key_comparison(KeyComparison::IgnoreAsciiCase)
        .cache(cache)
        .build()?;

    tracing::debug!(format = "http-header", "built definition");
    Ok(definition)
}

/// URL query parameters.
pub fn http_url(cache: Arc<ReflectionCache>) -> Result<SerializationDefinition> {
    let definition = SerializationDefinition::builder()
        .lookup_marker(QUERY)
        .natives(Natives::STRING)
        .cache(cache)
        .build()?;

    tracing::debug!(format = "http-url", "built definition");
    Ok(definition)
}

/// RPC payloads.
///
/// Discriminators go to index 0 or key `"t"`, dates are Unix
/// milliseconds and large objects are converted in parallel.
pub fn rpc_body(cache: Arc<ReflectionCache>) -> Result<SerializationDefinition> {
    let definition = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .sequence_marker(Marker::SEQUENCE)
        .dates(DateEncoding::UnixMillis)
        .cache(cache)
        .feature(TypeResolution::new().key("t").index(0))
        .feature(ParallelProcessing::new())
        .build()?;

    tracing::debug!(format = "rpc-body", "built definition");
    Ok(definition)
}
