use proc_macro2::TokenStream;
use syn::{parse_quote, spanned::Spanned, Data, Lit, Path, Result, Visibility};

use crate::utils::default_crate_path;

mod ast;
use self::ast::Input;

mod attrs;

pub fn derive(node: syn::DeriveInput) -> Result<TokenStream> {
    let input = Input::from_syn(&node)?;
    input.validate()?;

    let path = crate_path(&input);
    match input {
        Input::Struct(input) => derive_struct(input, &path),
        Input::Enum(input) => derive_enum(input, &path),
    }
}

macro_rules! spanned_trait {
    ($trait:path, $input:expr, $path:ident) => {{
        let vis_span = match &$input.vis {
            Visibility::Public(vis) => Some(vis.span()),
            Visibility::Restricted(vis) => Some(vis.pub_token.span()),
            Visibility::Inherited => None,
        };
        let data_span = match &$input.data {
            Data::Struct(data) => data.struct_token.span(),
            Data::Enum(data) => data.enum_token.span(),
            Data::Union(data) => data.union_token.span(),
        };
        let first_span = vis_span.unwrap_or(data_span);
        let last_span = $input.ident.span();

        let path = quote_spanned!(first_span => #$path::);
        let ty = quote_spanned!(last_span => $trait);

        quote!(#path #ty)
    }};
}

fn derive_struct(input: ast::Struct<'_>, path: &Path) -> Result<TokenStream> {
    let ty = &input.ident;

    // Every type parameter takes part in reflection.
    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#path::Type));
        param.bounds.push(parse_quote!(#path::type_info::Reflected));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let object = input.attrs.object.as_ref();
    let name_option = object
        .and_then(|o| o.name())
        .map(|name| quote!(::std::option::Option::Some(#name)))
        .unwrap_or_else(|| quote!(::std::option::Option::None));

    let mut markers = Vec::new();
    if let Some(object) = object {
        if object.lookup {
            markers.push(quote!(#path::Marker::LOOKUP));
        }
        if object.sequence {
            markers.push(quote!(#path::Marker::SEQUENCE));
        }
        markers.extend(object.markers.iter().map(|marker| quote!(#marker)));
    }

    let members: Vec<_> = input.members().collect();
    let idents: Vec<_> = members.iter().map(|f| &f.ident).collect();
    let ids: Vec<_> = (0..members.len()).collect();
    let member_infos = members.iter().zip(&ids).map(|(field, id)| {
        let name = field.name();
        let field_ty = field.ty;
        let bindings = field.bindings(path);
        let required = field
            .required()
            .map(|non_null| quote!(.required(#non_null)));

        quote! {
            #path::type_info::Member::new(
                #name,
                #id,
                <#field_ty as #path::type_info::Reflected>::info,
            )
            #(#bindings)*
            #required
        }
    });

    let (base_info, base_methods) = match input.base() {
        Some(base) => {
            let base_ty = base.ty;
            let base_ident = &base.ident;
            (
                quote!(.base(<#base_ty as #path::type_info::Reflected>::info)),
                quote! {
                    fn base(&self) -> ::std::option::Option<&dyn #path::Object> {
                        ::std::option::Option::Some(&self.#base_ident as &dyn #path::Object)
                    }

                    fn base_mut(&mut self) -> ::std::option::Option<&mut dyn #path::Object> {
                        ::std::option::Option::Some(&mut self.#base_ident as &mut dyn #path::Object)
                    }
                },
            )
        }
        None => (TokenStream::new(), TokenStream::new()),
    };

    let interfaces = object
        .map(|o| o.implements.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|iface| quote!(.interface(<#iface as #path::type_info::Reflected>::info)));

    let resolutions = object
        .map(|o| o.resolutions.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|resolve| {
            let target = &resolve.target;
            let value = resolve.value.as_ref().map(|value| {
                let value = match value {
                    Lit::Str(s) => {
                        quote!(#path::value::Value::String(::std::string::String::from(#s)))
                    }
                    Lit::Int(i) => quote!(#path::value::Value::Int(#i)),
                    Lit::Bool(b) => quote!(#path::value::Value::Bool(#b)),
                    Lit::Float(f) => quote!(#path::value::Value::Float(#f)),
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "unsupported discriminator literal",
                        ))
                    }
                };
                Ok(quote!(.with_value(#value)))
            });
            let value = value.transpose()?;
            let key = resolve
                .key
                .as_ref()
                .map(|key| quote!(.with_key(#path::Key::from_static(#key))));
            let index = resolve
                .index
                .as_ref()
                .map(|index| quote!(.with_index(#index)));

            Ok(quote! {
                .resolution(
                    #path::type_info::Resolution::new(
                        <#target as #path::type_info::Reflected>::info,
                    )
                    #value
                    #key
                    #index
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut hook_flags = Vec::new();
    let mut hook_methods = Vec::new();
    if let Some(object) = object {
        if let Some(hook) = &object.before_serialize {
            hook_flags.push(quote!(BEFORE_SERIALIZE));
            hook_methods.push(quote! {
                fn before_serialize(&self, cx: &#path::HookContext<'_>) -> #path::HookResult {
                    #hook(self, cx)
                }
            });
        }
        if let Some(hook) = &object.after_serialize {
            hook_flags.push(quote!(AFTER_SERIALIZE));
            hook_methods.push(quote! {
                fn after_serialize(&self, cx: &#path::HookContext<'_>) -> #path::HookResult {
                    #hook(self, cx)
                }
            });
        }
        if let Some(hook) = &object.before_deserialize {
            hook_flags.push(quote!(BEFORE_DESERIALIZE));
            hook_methods.push(quote! {
                fn before_deserialize(&mut self, cx: &#path::HookContext<'_>) -> #path::HookResult {
                    #hook(self, cx)
                }
            });
        }
        if let Some(hook) = &object.after_deserialize {
            hook_flags.push(quote!(AFTER_DESERIALIZE));
            hook_methods.push(quote! {
                fn after_deserialize(&mut self, cx: &#path::HookContext<'_>) -> #path::HookResult {
                    #hook(self, cx)
                }
            });
        }
    }

    let default_fn = (!input.is_abstract()).then(|| {
        quote! {
            .default_fn(|| {
                ::std::boxed::Box::new(<Self as ::std::default::Default>::default())
                    as ::std::boxed::Box<dyn #path::Type>
            })
        }
    });

    let info = quote! {
        #path::type_info::TypeInfo::Object(
            #path::type_info::ObjectInfo::builder::<Self>(#name_option)
                #(.marker(#markers))*
                #(.member(#member_infos))*
                #base_info
                #(#interfaces)*
                #(#resolutions)*
                .hooks(
                    #path::type_info::HookFlags::empty()
                        #(.union(#path::type_info::HookFlags::#hook_flags))*
                )
                #default_fn
                .build()
        )
    };

    let cell = if input.generics.type_params().next().is_some() {
        quote! {
            static CELL: #path::type_info::GenericTypeInfoCell =
                #path::type_info::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self, _>(|| #info)
        }
    } else {
        quote! {
            static CELL: #path::type_info::NonGenericTypeInfoCell =
                #path::type_info::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| #info)
        }
    };

    let reflected = spanned_trait!(type_info::Reflected, input.original, path);
    let type_trait = spanned_trait!(Type, input.original, path);
    let object_trait = spanned_trait!(Object, input.original, path);

    Ok(quote! {
        impl #impl_generics #reflected for #ty #ty_generics #where_clause {
            fn info() -> &'static #path::type_info::TypeInfo {
                #cell
            }
        }

        impl #impl_generics #type_trait for #ty #ty_generics #where_clause {
            #path::impl_type_methods!(Object);
        }

        impl #impl_generics #object_trait for #ty #ty_generics #where_clause {
            fn field(&self, id: ::std::primitive::usize) -> ::std::option::Option<&dyn #path::Type> {
                match id {
                    #(#ids => ::std::option::Option::Some(&self.#idents as &dyn #path::Type),)*
                    _ => ::std::option::Option::None,
                }
            }

            fn field_mut(
                &mut self,
                id: ::std::primitive::usize,
            ) -> ::std::option::Option<&mut dyn #path::Type> {
                match id {
                    #(#ids => ::std::option::Option::Some(&mut self.#idents as &mut dyn #path::Type),)*
                    _ => ::std::option::Option::None,
                }
            }

            #base_methods

            #(#hook_methods)*
        }
    })
}

fn derive_enum(input: ast::Enum<'_>, path: &Path) -> Result<TokenStream> {
    let ty = &input.ident;

    let idents: Vec<_> = input.variants.iter().map(|v| &v.ident).collect();
    let variants = input.variants.iter().map(|v| {
        let ident = &v.ident;
        let name = v.name();
        let alias = v.alias().map(|alias| quote!(.with_alias(#alias)));
        quote! {
            .variant(
                #path::type_info::VariantInfo::new(#name, #ty::#ident as ::std::primitive::i64)
                #alias
            )
        }
    });
    let first = idents[0];

    let name_option = input
        .name()
        .map(|name| quote!(::std::option::Option::Some(#name)))
        .unwrap_or_else(|| quote!(::std::option::Option::None));
    let as_string = input.as_string().then(|| quote!(.as_string()));

    let reflected = spanned_trait!(type_info::Reflected, input.original, path);
    let type_trait = spanned_trait!(Type, input.original, path);
    let enum_trait = spanned_trait!(Enum, input.original, path);

    Ok(quote! {
        impl #reflected for #ty {
            fn info() -> &'static #path::type_info::TypeInfo {
                static CELL: #path::type_info::NonGenericTypeInfoCell =
                    #path::type_info::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    #path::type_info::TypeInfo::Enum(
                        #path::type_info::EnumInfo::new::<Self>(#name_option, || {
                            ::std::boxed::Box::new(#ty::#first) as ::std::boxed::Box<dyn #path::Type>
                        })
                        #(#variants)*
                        #as_string
                    )
                })
            }
        }

        impl #type_trait for #ty {
            #path::impl_type_methods!(Enum);
        }

        impl #enum_trait for #ty {
            fn enum_info(&self) -> &'static #path::type_info::EnumInfo {
                match <Self as #path::type_info::Reflected>::info() {
                    #path::type_info::TypeInfo::Enum(info) => info,
                    _ => ::std::unreachable!(),
                }
            }

            fn value(&self) -> ::std::primitive::i64 {
                match self {
                    #(#ty::#idents => #ty::#idents as ::std::primitive::i64,)*
                }
            }

            fn update_value(&mut self, value: ::std::primitive::i64) -> ::std::primitive::bool {
                match value {
                    #(
                        v if v == #ty::#idents as ::std::primitive::i64 => {
                            *self = #ty::#idents;
                            true
                        }
                    )*
                    _ => false,
                }
            }
        }
    })
}

fn crate_path(input: &Input<'_>) -> Path {
    let attrs = match input {
        Input::Struct(data) => &data.attrs,
        Input::Enum(data) => &data.attrs,
    };

    attrs
        .krate
        .as_ref()
        .map(|attr| attr.krate.clone())
        .unwrap_or_else(default_crate_path)
}
