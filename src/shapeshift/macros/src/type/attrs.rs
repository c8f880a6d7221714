use proc_macro2::Span;
use syn::{
    parenthesized,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    token, Attribute, Error, Expr, Lit, LitInt, LitStr, Meta, Result, Token,
};

mod kw {
    syn::custom_keyword!(lookup);
    syn::custom_keyword!(sequence);
    syn::custom_keyword!(marker);
    syn::custom_keyword!(name);
    syn::custom_keyword!(implements);
    syn::custom_keyword!(resolve);
    syn::custom_keyword!(value);
    syn::custom_keyword!(key);
    syn::custom_keyword!(index);
    syn::custom_keyword!(required);
    syn::custom_keyword!(non_null);
    syn::custom_keyword!(base);
    syn::custom_keyword!(as_string);
    syn::custom_keyword!(alias);
    syn::custom_keyword!(before_serialize);
    syn::custom_keyword!(after_serialize);
    syn::custom_keyword!(before_deserialize);
    syn::custom_keyword!(after_deserialize);
}

pub struct Attrs<'a> {
    pub krate: Option<CrateAttr<'a>>,
    pub object: Option<ObjectAttr<'a>>,
    pub members: Vec<MemberAttr<'a>>,
    pub enumeration: Option<EnumAttr<'a>>,
    pub variant: Option<VariantAttr<'a>>,
}

pub fn get(input: &[Attribute]) -> Result<Attrs<'_>> {
    let mut attrs = Attrs {
        krate: None,
        object: None,
        members: Vec::new(),
        enumeration: None,
        variant: None,
    };

    for attr in input {
        if attr.path().is_ident("shapeshift") {
            parse_crate_attr(&mut attrs, attr)?;
        } else if attr.path().is_ident("object") {
            parse_object_attr(&mut attrs, attr)?;
        } else if attr.path().is_ident("member") {
            parse_member_attr(&mut attrs, attr)?;
        } else if attr.path().is_ident("enumeration") {
            parse_enum_attr(&mut attrs, attr)?;
        } else if attr.path().is_ident("variant") {
            parse_variant_attr(&mut attrs, attr)?;
        }
    }

    Ok(attrs)
}

/// #[shapeshift(crate = ...)]
///
/// Only on structs and enums.
pub struct CrateAttr<'a> {
    pub original: &'a Attribute,
    pub krate: syn::Path,
}

fn parse_crate_attr<'a>(attrs: &mut Attrs<'a>, attr: &'a Attribute) -> Result<()> {
    if attrs.krate.is_some() {
        return Err(Error::new_spanned(
            attr,
            "duplicate #[shapeshift(crate)] attribute found",
        ));
    }

    attrs.krate = Some(CrateAttr {
        original: attr,
        krate: attr.parse_args_with(parse_mod_path::<Token![crate]>)?,
    });
    Ok(())
}

/// #[object(..)]
///
/// Only on structs. Repeated attributes are merged.
pub struct ObjectAttr<'a> {
    pub original: &'a Attribute,
    name: Option<LitStr>,
    pub lookup: bool,
    pub sequence: bool,
    pub markers: Vec<Expr>,
    pub is_abstract: bool,
    pub implements: Vec<syn::Type>,
    pub resolutions: Vec<ResolveAttr>,
    pub before_serialize: Option<syn::Path>,
    pub after_serialize: Option<syn::Path>,
    pub before_deserialize: Option<syn::Path>,
    pub after_deserialize: Option<syn::Path>,
}

impl<'a> ObjectAttr<'a> {
    pub fn name(&self) -> Option<String> {
        self.name.as_ref().map(|name| name.value())
    }
}

/// resolve(Target, value = ..., key = "...", index = N)
pub struct ResolveAttr {
    pub target: syn::Type,
    pub value: Option<Lit>,
    pub key: Option<LitStr>,
    pub index: Option<LitInt>,
}

impl Parse for ResolveAttr {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut resolve = ResolveAttr {
            target: input.parse()?,
            value: None,
            key: None,
            index: None,
        };

        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }

            let look = input.lookahead1();
            if look.peek(kw::value) {
                let AttrWrapper::<kw::value, Lit> { ident, value } = input.parse()?;
                set_once(&mut resolve.value, value, ident.span, "resolve(value)")?;
            } else if look.peek(kw::key) {
                let AttrWrapper::<kw::key, LitStr> { ident, value } = input.parse()?;
                set_once(&mut resolve.key, value, ident.span, "resolve(key)")?;
            } else if look.peek(kw::index) {
                let AttrWrapper::<kw::index, LitInt> { ident, value } = input.parse()?;
                set_once(&mut resolve.index, value, ident.span, "resolve(index)")?;
            } else {
                return Err(look.error());
            }
        }

        Ok(resolve)
    }
}

fn parse_object_attr<'a>(attrs: &mut Attrs<'a>, attr: &'a Attribute) -> Result<()> {
    let object = attrs.object.get_or_insert_with(|| ObjectAttr {
        original: attr,
        name: None,
        lookup: false,
        sequence: false,
        markers: Vec::new(),
        is_abstract: false,
        implements: Vec::new(),
        resolutions: Vec::new(),
        before_serialize: None,
        after_serialize: None,
        before_deserialize: None,
        after_deserialize: None,
    });

    attr.parse_args_with(|input: ParseStream<'_>| {
        let mut first = true;
        while !input.is_empty() {
            if !first {
                input.parse::<Token![,]>()?;
                if input.is_empty() {
                    break;
                }
            }

            let look = input.lookahead1();
            if look.peek(kw::name) {
                let AttrWrapper::<kw::name, LitStr> { ident, value } = input.parse()?;
                set_once(&mut object.name, value, ident.span, "object(name)")?;
            } else if look.peek(kw::lookup) {
                input.parse::<kw::lookup>()?;
                object.lookup = true;
            } else if look.peek(kw::sequence) {
                input.parse::<kw::sequence>()?;
                object.sequence = true;
            } else if look.peek(kw::marker) {
                let AttrWrapper::<kw::marker, Expr> { value, .. } = input.parse()?;
                object.markers.push(value);
            } else if look.peek(Token![abstract]) {
                input.parse::<Token![abstract]>()?;
                object.is_abstract = true;
            } else if look.peek(kw::implements) {
                input.parse::<kw::implements>()?;
                let content;
                parenthesized!(content in input);
                let types: Punctuated<syn::Type, Token![,]> =
                    content.parse_terminated(syn::Type::parse, Token![,])?;
                object.implements.extend(types);
            } else if look.peek(kw::resolve) {
                input.parse::<kw::resolve>()?;
                let content;
                parenthesized!(content in input);
                object.resolutions.push(content.parse()?);
            } else if look.peek(kw::before_serialize) {
                let path = parse_mod_path::<kw::before_serialize>(input)?;
                set_once(&mut object.before_serialize, path, attr.span(), "object(before_serialize)")?;
            } else if look.peek(kw::after_serialize) {
                let path = parse_mod_path::<kw::after_serialize>(input)?;
                set_once(&mut object.after_serialize, path, attr.span(), "object(after_serialize)")?;
            } else if look.peek(kw::before_deserialize) {
                let path = parse_mod_path::<kw::before_deserialize>(input)?;
                set_once(
                    &mut object.before_deserialize,
                    path,
                    attr.span(),
                    "object(before_deserialize)",
                )?;
            } else if look.peek(kw::after_deserialize) {
                let path = parse_mod_path::<kw::after_deserialize>(input)?;
                set_once(
                    &mut object.after_deserialize,
                    path,
                    attr.span(),
                    "object(after_deserialize)",
                )?;
            } else {
                return Err(look.error());
            }

            first = false;
        }

        Ok(())
    })
}

/// The key of a lookup binding.
pub enum KeyLit {
    Str(LitStr),
    Int(LitInt),
}

/// #[member(..)]
///
/// Only on struct fields. Every attribute describes one binding.
pub struct MemberAttr<'a> {
    pub original: &'a Attribute,
    pub key: Option<KeyLit>,
    pub index: Option<LitInt>,
    pub marker: Option<Expr>,
    pub required: Option<bool>,
    pub base: bool,
}

impl MemberAttr<'_> {
    /// Whether the attribute only sets flags and declares no slot.
    pub fn is_flag_only(&self) -> bool {
        self.key.is_none()
            && self.index.is_none()
            && self.marker.is_none()
            && (self.base || self.required.is_some())
    }
}

fn parse_member_attr<'a>(attrs: &mut Attrs<'a>, attr: &'a Attribute) -> Result<()> {
    let mut member = MemberAttr {
        original: attr,
        key: None,
        index: None,
        marker: None,
        required: None,
        base: false,
    };

    // Allow the `#[member]` notation to be accepted.
    if let Meta::Path(_) = attr.meta {
        attrs.members.push(member);
        return Ok(());
    }

    attr.parse_args_with(|input: ParseStream<'_>| {
        let mut first = true;
        while !input.is_empty() {
            if !first {
                input.parse::<Token![,]>()?;
                if input.is_empty() {
                    break;
                }
            }

            let look = input.lookahead1();
            if look.peek(kw::key) {
                let AttrWrapper::<kw::key, Lit> { ident, value } = input.parse()?;
                let key = match value {
                    Lit::Str(s) => KeyLit::Str(s),
                    Lit::Int(i) => KeyLit::Int(i),
                    other => {
                        return Err(Error::new_spanned(
                            other,
                            "member keys must be string or integer literals",
                        ))
                    }
                };
                set_once(&mut member.key, key, ident.span, "member(key)")?;
            } else if look.peek(kw::index) {
                let AttrWrapper::<kw::index, LitInt> { ident, value } = input.parse()?;
                set_once(&mut member.index, value, ident.span, "member(index)")?;
            } else if look.peek(kw::marker) {
                let AttrWrapper::<kw::marker, Expr> { ident, value } = input.parse()?;
                set_once(&mut member.marker, value, ident.span, "member(marker)")?;
            } else if look.peek(kw::required) {
                let span = input.parse::<kw::required>()?.span;
                let non_null = if input.peek(token::Paren) {
                    let content;
                    parenthesized!(content in input);
                    content.parse::<kw::non_null>()?;
                    true
                } else {
                    false
                };
                set_once(&mut member.required, non_null, span, "member(required)")?;
            } else if look.peek(kw::base) {
                input.parse::<kw::base>()?;
                member.base = true;
            } else {
                return Err(look.error());
            }

            first = false;
        }

        Ok(())
    })?;

    if member.key.is_some() && member.index.is_some() {
        return Err(Error::new_spanned(
            attr,
            "a #[member] binds either a key or an index, not both",
        ));
    }

    attrs.members.push(member);
    Ok(())
}

/// #[enumeration(..)]
///
/// Only on enums.
pub struct EnumAttr<'a> {
    pub original: &'a Attribute,
    name: Option<LitStr>,
    pub as_string: bool,
}

impl<'a> EnumAttr<'a> {
    pub fn name(&self) -> Option<String> {
        self.name.as_ref().map(|name| name.value())
    }
}

fn parse_enum_attr<'a>(attrs: &mut Attrs<'a>, attr: &'a Attribute) -> Result<()> {
    let enumeration = attrs.enumeration.get_or_insert_with(|| EnumAttr {
        original: attr,
        name: None,
        as_string: false,
    });

    attr.parse_args_with(|input: ParseStream<'_>| {
        let mut first = true;
        while !input.is_empty() {
            if !first {
                input.parse::<Token![,]>()?;
                if input.is_empty() {
                    break;
                }
            }

            let look = input.lookahead1();
            if look.peek(kw::as_string) {
                input.parse::<kw::as_string>()?;
                enumeration.as_string = true;
            } else if look.peek(kw::name) {
                let AttrWrapper::<kw::name, LitStr> { ident, value } = input.parse()?;
                set_once(&mut enumeration.name, value, ident.span, "enumeration(name)")?;
            } else {
                return Err(look.error());
            }

            first = false;
        }

        Ok(())
    })
}

/// #[variant(..)]
///
/// Only on enum variants.
pub struct VariantAttr<'a> {
    pub original: &'a Attribute,
    pub alias: Option<LitStr>,
}

fn parse_variant_attr<'a>(attrs: &mut Attrs<'a>, attr: &'a Attribute) -> Result<()> {
    if attrs.variant.is_some() {
        return Err(Error::new_spanned(
            attr,
            "duplicate #[variant] attribute found",
        ));
    }

    let alias = attr.parse_args_with(|input: ParseStream<'_>| {
        let look = input.lookahead1();
        if look.peek(kw::alias) {
            let AttrWrapper::<kw::alias, LitStr> { value, .. } = input.parse()?;
            Ok(value)
        } else {
            Err(look.error())
        }
    })?;

    attrs.variant = Some(VariantAttr {
        original: attr,
        alias: Some(alias),
    });
    Ok(())
}

fn set_once<T>(slot: &mut Option<T>, value: T, span: Span, what: &str) -> Result<()> {
    if slot.is_some() {
        return Err(Error::new(span, format!("duplicate #[{what}] found")));
    }

    *slot = Some(value);
    Ok(())
}

pub(crate) struct AttrWrapper<K, V> {
    pub ident: K,
    pub value: V,
}

impl<K: Parse, V: Parse> Parse for AttrWrapper<K, V> {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let ident = input.parse()?;
        let value = if input.peek(token::Paren) {
            // #[ident(value)]
            let value;
            parenthesized!(value in input);
            value.parse()?
        } else {
            // #[ident = value]
            input.parse::<Token![=]>()?;
            input.parse()?
        };

        Ok(Self { ident, value })
    }
}

pub(crate) fn parse_mod_path<K: Parse>(input: ParseStream<'_>) -> Result<syn::Path> {
    input.parse::<K>()?;
    if input.peek(token::Paren) {
        // #[ident(path)]
        let value;
        parenthesized!(value in input);
        value.call(syn::Path::parse_mod_style)
    } else {
        // #[ident = path]
        input.parse::<Token![=]>()?;
        input.call(syn::Path::parse_mod_style)
    }
}
