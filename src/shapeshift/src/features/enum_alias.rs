use std::{any::TypeId, borrow::Cow, collections::HashMap, sync::Arc};

use parking_lot::RwLock;

use super::Feature;
use crate::{
    processors::Context,
    type_info::{EnumInfo, TypeInfo, VariantInfo},
    Error, Result,
};

/// The textual forms of one enum type.
#[derive(Debug)]
pub struct AliasTable {
    info: &'static EnumInfo,
    values: HashMap<&'static str, i64>,
}

impl AliasTable {
    fn build(info: &'static EnumInfo) -> Self {
        let mut values = HashMap::with_capacity(info.variants().len() * 2);
        for variant in info.variants() {
            values.entry(variant.name()).or_insert(variant.value());
            if let Some(alias) = variant.alias() {
                values.entry(alias).or_insert(variant.value());
            }
        }

        Self { info, values }
    }

    /// Gets the metadata of the described enum.
    #[inline]
    pub fn enum_info(&self) -> &'static EnumInfo {
        self.info
    }

    /// Whether the table describes a combinable flag set.
    #[inline]
    pub fn is_flags(&self) -> bool {
        self.info.is_flags()
    }

    /// Looks up the value named by an alias or an original name.
    pub fn value(&self, text: &str) -> Option<i64> {
        self.values.get(text).copied()
    }
}

/// Insert-once storage of [`AliasTable`]s, keyed by enum type.
#[derive(Debug, Default)]
pub struct EnumCache {
    tables: RwLock<HashMap<TypeId, Arc<AliasTable>>>,
}

impl EnumCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the alias table of an enum type, building it on first use.
    ///
    /// Fails with a configuration error for any other kind of type.
    pub fn get(&self, info: &'static TypeInfo) -> Result<Arc<AliasTable>> {
        let Some(enum_info) = info.as_enum() else {
            return Err(Error::configuration(format_args!(
                "`{}` is not an enum type",
                info.type_name()
            )));
        };

        let type_id = info.type_id();
        if let Some(table) = self.tables.read().get(&type_id) {
            return Ok(table.clone());
        }

        let table = Arc::new(AliasTable::build(enum_info));
        let mut tables = self.tables.write();
        let table = tables.entry(type_id).or_insert_with(|| {
            tracing::debug!(
                type_name = info.type_name(),
                variants = enum_info.variants().len(),
                "built enum alias table"
            );
            table
        });

        Ok(table.clone())
    }
}

/// String representation of enums through names and aliases.
///
/// Applies to enums that prefer their string form. Flag combinations
/// are split into their named components, each rendered by its alias
/// or name and joined with the separator.
#[derive(Debug)]
pub struct EnumAliases {
    separator: Cow<'static, str>,
    cache: EnumCache,
}

impl EnumAliases {
    /// The default flag separator.
    pub const DEFAULT_SEPARATOR: &'static str = ", ";

    pub fn new() -> Self {
        Self {
            separator: Cow::Borrowed(Self::DEFAULT_SEPARATOR),
            cache: EnumCache::new(),
        }
    }

    /// Sets the separator between flag components.
    pub fn separator(mut self, separator: impl Into<Cow<'static, str>>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Gets the enum table cache.
    pub fn cache(&self) -> &EnumCache {
        &self.cache
    }

    /// Renders an enum value as text.
    pub fn format(&self, info: &'static TypeInfo, value: i64, cx: &Context<'_>) -> Result<String> {
        let table = self.cache.get(info)?;
        let enum_info = table.enum_info();

        let text = |variant: &VariantInfo| variant.alias().unwrap_or(variant.name());

        if table.is_flags() {
            let parts = enum_info.decompose(value).ok_or_else(|| {
                cx.invalid(format_args!(
                    "{value:#x} is no combination of `{}` flags",
                    info.type_name()
                ))
            })?;

            Ok(parts
                .into_iter()
                .map(text)
                .collect::<Vec<_>>()
                .join(self.separator.as_ref()))
        } else {
            enum_info.variant_for(value).map(|v| text(v).to_owned()).ok_or_else(|| {
                cx.invalid(format_args!(
                    "{value} is no variant of `{}`",
                    info.type_name()
                ))
            })
        }
    }

    /// Parses text produced by [`EnumAliases::format`].
    ///
    /// Tokens may be aliases, original names or plain numbers.
    pub fn parse(&self, info: &'static TypeInfo, text: &str, cx: &Context<'_>) -> Result<i64> {
        let table = self.cache.get(info)?;

        let tokens: Vec<&str> = if !table.is_flags() {
            vec![text.trim()]
        } else if self.separator.trim().is_empty() {
            text.split_whitespace().collect()
        } else {
            text.split(self.separator.trim())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect()
        };

        let mut value = 0;
        for token in tokens {
            let component = table
                .value(token)
                .or_else(|| token.parse().ok())
                .ok_or_else(|| {
                    cx.invalid(format_args!(
                        "`{token}` names no variant of `{}`",
                        info.type_name()
                    ))
                })?;

            if table.is_flags() {
                value |= component;
            } else {
                value = component;
            }
        }

        Ok(value)
    }
}

impl Default for EnumAliases {
    fn default() -> Self {
        Self::new()
    }
}

impl Feature for EnumAliases {}
