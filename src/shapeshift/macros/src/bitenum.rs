use proc_macro2::TokenStream;
use syn::{
    parse::{Parse, ParseStream, Result},
    punctuated::Punctuated,
    Attribute, Error, LitStr, Path, Token,
};

use crate::utils::default_crate_path;

pub struct Input {
    pub krate: Option<Path>,
    pub item: Bits,
}

impl Parse for Input {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let krate = if input.peek(Token![#]) && input.peek2(Token![!]) {
            // #![crate = shapeshift]

            input.parse::<Token![#]>()?;
            input.parse::<Token![!]>()?;

            let content;
            syn::bracketed!(content in input);

            content.parse::<Token![crate]>()?;
            content.parse::<Token![=]>()?;

            Some(content.call(Path::parse_mod_style)?)
        } else {
            None
        };

        Ok(Input {
            krate,
            item: input.parse()?,
        })
    }
}

pub struct Bits {
    pub attrs: Vec<Attribute>,
    pub vis: syn::Visibility,
    pub ident: syn::Ident,
    pub repr: syn::Type,
    pub flags: Punctuated<Flag, Token![;]>,
}

impl Parse for Bits {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;
        input.parse::<Token![struct]>()?;
        let ident = input.parse()?;

        let repr = if input.peek(Token![:]) {
            input.parse::<Token![:]>()?;
            input.parse()?
        } else {
            syn::parse_quote!(::std::primitive::u32)
        };

        let content;
        syn::braced!(content in input);
        let flags = content.parse_terminated(Flag::parse, Token![;])?;

        Ok(Self {
            attrs,
            vis,
            ident,
            repr,
            flags,
        })
    }
}

pub struct Flag {
    pub attrs: Vec<Attribute>,
    pub ident: syn::Ident,
    pub value: syn::Expr,
}

impl Parse for Flag {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;

        input.parse::<syn::Visibility>()?; // We tolerate explicit visibility.
        input.parse::<Token![const]>()?;

        let ident = input.parse()?;
        input.parse::<Token![=]>()?;
        let value = input.parse()?;

        Ok(Self {
            attrs,
            ident,
            value,
        })
    }
}

struct EnumOptions {
    name: Option<LitStr>,
    as_string: bool,
}

fn enum_options(attrs: &[Attribute]) -> Result<EnumOptions> {
    let mut options = EnumOptions {
        name: None,
        as_string: false,
    };

    for attr in attrs.iter().filter(|a| a.path().is_ident("enumeration")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("as_string") {
                options.as_string = true;
                Ok(())
            } else if meta.path.is_ident("name") {
                options.name = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported #[enumeration] option"))
            }
        })?;
    }

    Ok(options)
}

fn alias(attrs: &[Attribute]) -> Result<Option<LitStr>> {
    let mut aliases = attrs.iter().filter(|a| a.path().is_ident("alias"));
    let alias = aliases.next().map(|a| a.parse_args()).transpose()?;
    if let Some(extra) = aliases.next() {
        return Err(Error::new_spanned(extra, "duplicate #[alias] attribute found"));
    }
    Ok(alias)
}

fn is_reflection_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("enumeration") || attr.path().is_ident("alias")
}

pub fn expand(input: Input) -> Result<TokenStream> {
    let path = input.krate.unwrap_or_else(default_crate_path);

    let Bits {
        attrs,
        vis,
        ident: ty,
        repr,
        flags,
    } = &input.item;

    let options = enum_options(attrs)?;
    let attrs = attrs.iter().filter(|a| !is_reflection_attr(a));

    let bits: Vec<_> = flags.iter().collect();
    let bit_attrs: Vec<Vec<_>> = bits
        .iter()
        .map(|f| f.attrs.iter().filter(|a| !is_reflection_attr(a)).collect())
        .collect();
    let bit_idents: Vec<_> = bits.iter().map(|f| &f.ident).collect();
    let bit_exprs = bits.iter().map(|f| &f.value);
    let variants = bits
        .iter()
        .map(|f| {
            let ident = &f.ident;
            let name = ident.to_string();
            let alias = alias(&f.attrs)?.map(|alias| quote!(.with_alias(#alias)));
            Ok(quote! {
                .variant(
                    #path::type_info::VariantInfo::new(
                        #name,
                        #ty::#ident.bits() as ::std::primitive::i64,
                    )
                    #alias
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let name_option = match &options.name {
        Some(name) => quote!(::std::option::Option::Some(#name)),
        None => quote!(::std::option::Option::None),
    };
    let as_string = options.as_string.then(|| quote!(.as_string()));

    Ok(quote! {
        #path::__private::bitflags! {
            #(#attrs)*
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
            #vis struct #ty: #repr {
                #(
                    #(#bit_attrs)*
                    const #bit_idents = #bit_exprs;
                )*
            }
        }

        impl ::std::default::Default for #ty {
            fn default() -> Self {
                Self::empty()
            }
        }

        impl #path::type_info::Reflected for #ty {
            fn info() -> &'static #path::type_info::TypeInfo {
                static CELL: #path::type_info::NonGenericTypeInfoCell =
                    #path::type_info::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    #path::type_info::TypeInfo::Enum(
                        #path::type_info::EnumInfo::new::<Self>(#name_option, || {
                            ::std::boxed::Box::new(#ty::empty()) as ::std::boxed::Box<dyn #path::Type>
                        })
                        .flags()
                        #(#variants)*
                        #as_string
                    )
                })
            }
        }

        impl #path::Type for #ty {
            #path::impl_type_methods!(Enum);
        }

        impl #path::Enum for #ty {
            fn enum_info(&self) -> &'static #path::type_info::EnumInfo {
                match <Self as #path::type_info::Reflected>::info() {
                    #path::type_info::TypeInfo::Enum(info) => info,
                    _ => ::std::unreachable!(),
                }
            }

            fn value(&self) -> ::std::primitive::i64 {
                self.bits() as ::std::primitive::i64
            }

            fn update_value(&mut self, value: ::std::primitive::i64) -> ::std::primitive::bool {
                match <#repr as ::std::convert::TryFrom<::std::primitive::i64>>::try_from(value)
                    .ok()
                    .and_then(Self::from_bits)
                {
                    ::std::option::Option::Some(flags) => {
                        *self = flags;
                        true
                    }
                    ::std::option::Option::None => false,
                }
            }
        }
    })
}
