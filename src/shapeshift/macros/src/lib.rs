//! Procedural macros for use with [`shapeshift`].
//!
//! There is no need to directly add this crate to application
//! dependencies as these macros are already re-exported by
//! [`shapeshift`].
//!
//! [`shapeshift`]: ../shapeshift/

#[macro_use]
extern crate quote;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod bitenum;
mod r#type;
mod utils;

/// Derives reflection for structs and fieldless enums.
///
/// # Structs
///
/// Container attributes, all inside `#[object(..)]`:
///
/// - `lookup`, `sequence`: declares the type under the default lookup
///   or sequence marker.
/// - `marker = EXPR`: declares the type under a custom marker.
/// - `name = "..."`: a custom type name, also used as the default
///   discriminator of resolutions targeting the type.
/// - `abstract`: the type is never instantiated on its own.
/// - `implements(Type, ..)`: interface types the struct implements.
/// - `resolve(Target, value = LIT, key = "...", index = N)`: a
///   polymorphic refinement towards `Target`.
/// - `before_serialize = path`, `after_serialize = path`,
///   `before_deserialize = path`, `after_deserialize = path`:
///   lifecycle hooks.
///
/// Field attributes, `#[member(..)]`, may be repeated per marker:
///
/// - `key = "..."` or `key = INT`: binds the field to a lookup key.
/// - `index = N`: binds the field to a sequence position.
/// - `marker = EXPR`: the marker of the binding, defaulting to the
///   default marker of the slot kind.
/// - `required`, `required(non_null)`: the member must be present.
/// - `base`: the field embeds the base type.
///
/// A bare `#[member]` binds the field under its own name. Fields
/// without the attribute are not reflected.
///
/// # Enums
///
/// `#[enumeration(as_string, name = "...")]` on the type and
/// `#[variant(alias = "...")]` on variants.
#[proc_macro_derive(Type, attributes(shapeshift, object, member, enumeration, variant))]
pub fn derive_type(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    r#type::derive(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Declares a reflected flag set backed by `bitflags`.
///
/// Flags may carry `#[alias("...")]` and the type may carry
/// `#[enumeration(as_string)]`.
#[proc_macro]
pub fn bitenum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as bitenum::Input);
    bitenum::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
