use std::cmp::Reverse;

use super::{DefaultFn, ValueInfo};
use crate::Type;

/// Description of a single enum variant or flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantInfo {
    name: &'static str,
    alias: Option<&'static str>,
    value: i64,
}

impl VariantInfo {
    pub const fn new(name: &'static str, value: i64) -> Self {
        Self {
            name,
            alias: None,
            value,
        }
    }

    /// Sets the string alias of the variant.
    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn alias(&self) -> Option<&'static str> {
        self.alias
    }

    #[inline]
    pub const fn value(&self) -> i64 {
        self.value
    }
}

/// Reflection metadata for enums and flag sets.
#[derive(Clone, Debug)]
pub struct EnumInfo {
    value: ValueInfo,
    variants: Vec<VariantInfo>,
    flags: bool,
    as_string: bool,
}

impl EnumInfo {
    /// Creates new enum info for `T` with a default factory.
    pub fn new<T: Type>(name: Option<&'static str>, default_fn: DefaultFn) -> Self {
        Self {
            value: ValueInfo::new::<T>(name).with_default(default_fn),
            variants: Vec::new(),
            flags: false,
            as_string: false,
        }
    }

    /// Adds a variant.
    pub fn variant(mut self, variant: VariantInfo) -> Self {
        self.variants.push(variant);
        self
    }

    /// Marks the enum as a combinable flag set.
    pub fn flags(mut self) -> Self {
        self.flags = true;
        self
    }

    /// Marks the enum as preferring its string representation.
    pub fn as_string(mut self) -> Self {
        self.as_string = true;
        self
    }

    #[inline]
    pub fn value_info(&self) -> &ValueInfo {
        &self.value
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    #[inline]
    pub fn variants(&self) -> &[VariantInfo] {
        &self.variants
    }

    #[inline]
    pub fn is_flags(&self) -> bool {
        self.flags
    }

    #[inline]
    pub fn prefers_string(&self) -> bool {
        self.as_string
    }

    /// Finds the variant for a discriminant value.
    pub fn variant_for(&self, value: i64) -> Option<&VariantInfo> {
        self.variants.iter().find(|v| v.value == value)
    }

    /// Finds the variant with the given Rust name.
    pub fn variant_named(&self, name: &str) -> Option<&VariantInfo> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Splits a flag combination into its named components.
    ///
    /// The widest flags are taken first, so a composite flag stands in
    /// for its parts. Components are returned in ascending order.
    /// Returns [`None`] when bits remain that no flag covers.
    pub fn decompose(&self, value: i64) -> Option<Vec<&VariantInfo>> {
        if value == 0 {
            return Some(self.variants.iter().filter(|v| v.value == 0).take(1).collect());
        }

        let mut candidates: Vec<_> = self.variants.iter().filter(|v| v.value != 0).collect();
        candidates.sort_by_key(|v| Reverse(v.value));

        let mut remaining = value;
        let mut parts = Vec::new();
        for variant in candidates {
            if remaining & variant.value == variant.value {
                parts.push(variant);
                remaining &= !variant.value;
            }
        }
        parts.reverse();

        (remaining == 0).then_some(parts)
    }
}
