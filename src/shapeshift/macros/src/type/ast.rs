use proc_macro2::TokenStream;
use syn::{
    Data, DataEnum, DataStruct, DeriveInput, Error, Fields, GenericParam, Generics, Ident, Path,
    Result, Type,
};

use super::attrs::{self, Attrs, KeyLit};

pub enum Input<'a> {
    Struct(Struct<'a>),
    Enum(Enum<'a>),
}

impl<'a> Input<'a> {
    pub fn from_syn(node: &'a DeriveInput) -> Result<Self> {
        match &node.data {
            Data::Struct(data) => Struct::from_syn(node, data).map(Input::Struct),
            Data::Enum(data) => Enum::from_syn(node, data).map(Input::Enum),
            Data::Union(_) => Err(Error::new_spanned(
                node,
                "union reflection is not supported",
            )),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Input::Struct(input) => input.validate(),
            Input::Enum(input) => input.validate(),
        }
    }
}

pub struct Struct<'a> {
    pub original: &'a DeriveInput,
    pub attrs: Attrs<'a>,
    pub ident: Ident,
    pub generics: &'a Generics,
    pub fields: Vec<Field<'a>>,
}

pub struct Field<'a> {
    pub original: &'a syn::Field,
    pub attrs: Attrs<'a>,
    pub ident: Ident,
    pub ty: &'a Type,
}

impl Field<'_> {
    pub fn is_base(&self) -> bool {
        self.attrs.members.iter().any(|m| m.base)
    }

    /// Whether the field is reflected as a member.
    pub fn is_member(&self) -> bool {
        !self.attrs.members.is_empty() && !self.is_base()
    }

    pub fn name(&self) -> String {
        self.ident.to_string()
    }

    pub fn required(&self) -> Option<bool> {
        self.attrs.members.iter().find_map(|m| m.required)
    }

    /// Expands the marker bindings of the field.
    ///
    /// A field without explicit slots binds its own name as a key
    /// under the default lookup marker.
    pub fn bindings(&self, path: &Path) -> Vec<TokenStream> {
        let mut bindings: Vec<_> = self
            .attrs
            .members
            .iter()
            .filter(|m| !m.is_flag_only())
            .map(|m| {
                let (slot, default_marker) = match (&m.key, &m.index) {
                    (Some(KeyLit::Str(key)), _) => (
                        quote!(#path::Slot::Key(#path::Key::from_static(#key))),
                        quote!(#path::Marker::LOOKUP),
                    ),
                    (Some(KeyLit::Int(key)), _) => (
                        quote!(#path::Slot::Key(#path::Key::Int(#key))),
                        quote!(#path::Marker::LOOKUP),
                    ),
                    (None, Some(index)) => (
                        quote!(#path::Slot::Index(#index)),
                        quote!(#path::Marker::SEQUENCE),
                    ),
                    (None, None) => {
                        let name = self.name();
                        (
                            quote!(#path::Slot::Key(#path::Key::from_static(#name))),
                            quote!(#path::Marker::LOOKUP),
                        )
                    }
                };

                let marker = m
                    .marker
                    .as_ref()
                    .map(|marker| quote!(#marker))
                    .unwrap_or(default_marker);
                quote!(.bind(#marker, #slot))
            })
            .collect();

        if bindings.is_empty() {
            let name = self.name();
            bindings.push(quote! {
                .bind(
                    #path::Marker::LOOKUP,
                    #path::Slot::Key(#path::Key::from_static(#name)),
                )
            });
        }

        bindings
    }
}

pub struct Enum<'a> {
    pub original: &'a DeriveInput,
    pub attrs: Attrs<'a>,
    pub ident: Ident,
    pub variants: Vec<Variant<'a>>,
}

pub struct Variant<'a> {
    pub attrs: Attrs<'a>,
    pub ident: Ident,
}

impl<'a> Struct<'a> {
    fn from_syn(node: &'a DeriveInput, data: &'a DataStruct) -> Result<Self> {
        Ok(Self {
            original: node,
            attrs: attrs::get(&node.attrs)?,
            ident: node.ident.clone(),
            generics: &node.generics,
            fields: Field::multiple_from_syn(&data.fields)?,
        })
    }

    fn validate(&self) -> Result<()> {
        require_no_member(&self.attrs)?;
        require_no_enumeration(&self.attrs)?;
        require_no_variant(&self.attrs)?;
        require_static(self.generics)?;

        for field in &self.fields {
            field.validate()?;
        }

        let mut bases = self.fields.iter().filter(|f| f.is_base());
        bases.next();
        if let Some(extra) = bases.next() {
            return Err(Error::new_spanned(
                extra.original,
                "only one #[member(base)] field allowed",
            ));
        }

        Ok(())
    }

    pub fn is_abstract(&self) -> bool {
        self.attrs.object.as_ref().map_or(false, |o| o.is_abstract)
    }

    pub fn base(&self) -> Option<&Field<'a>> {
        self.fields.iter().find(|f| f.is_base())
    }

    pub fn members(&self) -> impl Iterator<Item = &Field<'a>> {
        self.fields.iter().filter(|f| f.is_member())
    }
}

impl<'a> Enum<'a> {
    fn from_syn(node: &'a DeriveInput, data: &'a DataEnum) -> Result<Self> {
        Ok(Self {
            original: node,
            attrs: attrs::get(&node.attrs)?,
            ident: node.ident.clone(),
            variants: data
                .variants
                .iter()
                .map(Variant::from_syn)
                .collect::<Result<_>>()?,
        })
    }

    fn validate(&self) -> Result<()> {
        require_no_object(&self.attrs)?;
        require_no_member(&self.attrs)?;
        require_no_variant(&self.attrs)?;

        if !self.original.generics.params.is_empty() {
            return Err(Error::new_spanned(
                &self.original.generics,
                "generic enums cannot be reflected",
            ));
        }
        if self.variants.is_empty() {
            return Err(Error::new_spanned(
                self.original,
                "reflected enums need at least one variant",
            ));
        }

        for variant in &self.variants {
            variant.validate()?;
        }

        Ok(())
    }

    pub fn name(&self) -> Option<String> {
        self.attrs.enumeration.as_ref().and_then(|e| e.name())
    }

    pub fn as_string(&self) -> bool {
        self.attrs.enumeration.as_ref().map_or(false, |e| e.as_string)
    }
}

impl<'a> Field<'a> {
    fn from_syn(node: &'a syn::Field) -> Result<Self> {
        let ident = node.ident.clone().ok_or_else(|| {
            Error::new_spanned(node, "tuple struct fields cannot be reflected")
        })?;

        Ok(Self {
            original: node,
            attrs: attrs::get(&node.attrs)?,
            ident,
            ty: &node.ty,
        })
    }

    fn multiple_from_syn(fields: &'a Fields) -> Result<Vec<Self>> {
        fields.iter().map(Field::from_syn).collect()
    }

    fn validate(&self) -> Result<()> {
        require_no_crate(&self.attrs)?;
        require_no_object(&self.attrs)?;
        require_no_enumeration(&self.attrs)?;
        require_no_variant(&self.attrs)?;

        if self.is_base() {
            if let Some(member) = self
                .attrs
                .members
                .iter()
                .find(|m| m.key.is_some() || m.index.is_some() || m.required.is_some())
            {
                return Err(Error::new_spanned(
                    member.original,
                    "a #[member(base)] field cannot be bound or required",
                ));
            }
        }

        Ok(())
    }
}

impl<'a> Variant<'a> {
    fn from_syn(node: &'a syn::Variant) -> Result<Self> {
        if !node.fields.is_empty() {
            return Err(Error::new_spanned(
                node,
                "only fieldless enum variants can be reflected",
            ));
        }

        Ok(Self {
            attrs: attrs::get(&node.attrs)?,
            ident: node.ident.clone(),
        })
    }

    fn validate(&self) -> Result<()> {
        require_no_crate(&self.attrs)?;
        require_no_object(&self.attrs)?;
        require_no_member(&self.attrs)?;
        require_no_enumeration(&self.attrs)
    }

    pub fn name(&self) -> String {
        self.ident.to_string()
    }

    pub fn alias(&self) -> Option<String> {
        self.attrs
            .variant
            .as_ref()
            .and_then(|v| v.alias.as_ref())
            .map(|alias| alias.value())
    }
}

fn require_static(generics: &Generics) -> Result<()> {
    match generics
        .params
        .iter()
        .find(|p| matches!(p, GenericParam::Lifetime(_)))
    {
        Some(lifetime) => Err(Error::new_spanned(
            lifetime,
            "reflected types must be 'static",
        )),
        None => Ok(()),
    }
}

fn require_no_crate(attrs: &Attrs<'_>) -> Result<()> {
    if let Some(krate) = &attrs.krate {
        return Err(Error::new_spanned(
            krate.original,
            "unexpected #[shapeshift] attribute only allowed on structs and enums",
        ));
    }
    Ok(())
}

fn require_no_object(attrs: &Attrs<'_>) -> Result<()> {
    if let Some(object) = &attrs.object {
        return Err(Error::new_spanned(
            object.original,
            "unexpected #[object] attribute only allowed on structs",
        ));
    }
    Ok(())
}

fn require_no_member(attrs: &Attrs<'_>) -> Result<()> {
    if let Some(member) = attrs.members.first() {
        return Err(Error::new_spanned(
            member.original,
            "unexpected #[member] attribute only allowed on struct fields",
        ));
    }
    Ok(())
}

fn require_no_enumeration(attrs: &Attrs<'_>) -> Result<()> {
    if let Some(enumeration) = &attrs.enumeration {
        return Err(Error::new_spanned(
            enumeration.original,
            "unexpected #[enumeration] attribute only allowed on enums",
        ));
    }
    Ok(())
}

fn require_no_variant(attrs: &Attrs<'_>) -> Result<()> {
    if let Some(variant) = &attrs.variant {
        return Err(Error::new_spanned(
            variant.original,
            "unexpected #[variant] attribute only allowed on enum variants",
        ));
    }
    Ok(())
}
