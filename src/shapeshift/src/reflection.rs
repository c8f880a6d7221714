//! Per-type reflection maps and the cache that builds them.
//!
//! A [`TypeReflectionMap`] flattens what an object type exposes to
//! serialization: its members grouped by marker (merged with the base
//! chain), the type resolutions reachable from it, and the hooks it
//! implements. Maps are built at most once per type by a
//! [`ReflectionCache`] and are immutable afterwards.

use std::{
    any::TypeId,
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use crate::{
    type_info::{HookFlags, InfoFn, Required, TypeInfo},
    value::Value,
    Error, Key, Marker, Result, Slot,
};

/// A member as seen by a single marker vocabulary.
#[derive(Clone, Debug)]
pub struct MemberBinding {
    owner: &'static TypeInfo,
    name: &'static str,
    field: usize,
    slot: Slot,
    info: InfoFn,
    required: Option<Required>,
}

impl MemberBinding {
    /// Gets the type that declares the member.
    #[inline]
    pub fn owner(&self) -> &'static TypeInfo {
        self.owner
    }

    /// Gets the Rust field name of the member.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Gets the accessor id on the owning type.
    #[inline]
    pub fn field(&self) -> usize {
        self.field
    }

    /// Gets the key or index the member is stored at.
    #[inline]
    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    /// Gets the [`TypeInfo`] of the member's declared type.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.info)()
    }

    /// Gets the requiredness of the member, if any.
    #[inline]
    pub fn required(&self) -> Option<Required> {
        self.required
    }
}

/// A type resolution parameter reachable from a type.
#[derive(Clone, Debug)]
pub struct ResolutionParameter {
    declared_by: &'static TypeInfo,
    target: &'static TypeInfo,
    value: Option<Value>,
    key: Option<Key>,
    index: Option<usize>,
}

impl ResolutionParameter {
    /// Gets the type that declared the parameter.
    #[inline]
    pub fn declared_by(&self) -> &'static TypeInfo {
        self.declared_by
    }

    /// Gets the refined type the parameter resolves to.
    #[inline]
    pub fn target(&self) -> &'static TypeInfo {
        self.target
    }

    /// Gets the explicitly declared discriminator, if any.
    #[inline]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Gets the lookup key override, if any.
    #[inline]
    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    /// Gets the sequence index override, if any.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

/// The cached serialization view of one type.
#[derive(Debug)]
pub struct TypeReflectionMap {
    info: &'static TypeInfo,
    base: Option<Arc<TypeReflectionMap>>,
    markers: Vec<Marker>,
    own: HashMap<Marker, Vec<MemberBinding>>,
    all: HashMap<Marker, Vec<MemberBinding>>,
    resolutions: Vec<ResolutionParameter>,
    hooks: HookFlags,
}

impl TypeReflectionMap {
    /// Gets the [`TypeInfo`] of the described type.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    /// Gets the map of the embedded base type, if one exists.
    #[inline]
    pub fn base(&self) -> Option<&Arc<TypeReflectionMap>> {
        self.base.as_ref()
    }

    /// Gets all markers the type and its ancestors declare.
    #[inline]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Whether the type is declared under `marker`.
    #[inline]
    pub fn has_marker(&self, marker: Marker) -> bool {
        self.markers.contains(&marker)
    }

    /// Gets the members bound under `marker`.
    ///
    /// With `include_base`, members of the base chain come first and a
    /// derived member re-binding an inherited slot replaces the
    /// inherited entry in place.
    pub fn members(&self, marker: Marker, include_base: bool) -> &[MemberBinding] {
        let members = if include_base { &self.all } else { &self.own };
        members.get(&marker).map(Vec::as_slice).unwrap_or_default()
    }

    /// Gets the required members bound under `marker`, base included.
    pub fn required_members(&self, marker: Marker) -> impl Iterator<Item = &MemberBinding> {
        self.members(marker, true)
            .iter()
            .filter(|m| m.required.is_some())
    }

    /// Gets all resolution parameters reachable from the type.
    ///
    /// Parameters declared closer to the type come first.
    #[inline]
    pub fn resolution_parameters(&self) -> &[ResolutionParameter] {
        &self.resolutions
    }

    /// Gets the hooks the type implements itself.
    #[inline]
    pub fn hooks(&self) -> HookFlags {
        self.hooks
    }

    /// Whether any level of the base chain implements one of `hooks`.
    pub fn any_hooks(&self, hooks: HookFlags) -> bool {
        self.hooks.intersects(hooks) || self.base.as_ref().map_or(false, |b| b.any_hooks(hooks))
    }

    fn empty(info: &'static TypeInfo) -> Self {
        Self {
            info,
            base: None,
            markers: Vec::new(),
            own: HashMap::new(),
            all: HashMap::new(),
            resolutions: Vec::new(),
            hooks: HookFlags::empty(),
        }
    }
}

type Entry = Arc<OnceCell<Arc<TypeReflectionMap>>>;

/// A long-lived, shareable cache of [`TypeReflectionMap`]s.
///
/// Maps are keyed by type identity and built at most once: concurrent
/// first requests for the same type wait for a single build and all
/// observe the same map. Entries are never invalidated.
#[derive(Debug, Default)]
pub struct ReflectionCache {
    maps: RwLock<HashMap<TypeId, Entry>>,
    builds: AtomicUsize,
}

impl ReflectionCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the number of maps this cache has constructed.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Acquire)
    }

    /// Gets the number of types with a cached map.
    pub fn len(&self) -> usize {
        self.maps.read().len()
    }

    /// Whether no map was requested yet.
    pub fn is_empty(&self) -> bool {
        self.maps.read().is_empty()
    }

    /// Gets the map for a type, building it on first request.
    ///
    /// Leaf and enum types yield an empty map. Misconfigured object
    /// types fail with a configuration error, which is reported again
    /// on every subsequent request.
    pub fn get_or_build(&self, info: &'static TypeInfo) -> Result<Arc<TypeReflectionMap>> {
        let type_id = info.type_id();

        let entry = self.maps.read().get(&type_id).cloned();
        let entry = match entry {
            Some(entry) => entry,
            None => self.maps.write().entry(type_id).or_default().clone(),
        };

        // The build runs outside of the map lock so that base maps can be
        // requested recursively; the cell serializes builders per type.
        entry.get_or_try_init(|| self.build(info)).cloned()
    }

    fn build(&self, info: &'static TypeInfo) -> Result<Arc<TypeReflectionMap>> {
        let object = match info {
            TypeInfo::Object(object) => object,
            _ => return Ok(Arc::new(TypeReflectionMap::empty(info))),
        };

        let base = match object.base() {
            Some(base) => {
                let base = base();
                if base.as_object().is_none() {
                    return Err(Error::configuration(format_args!(
                        "base `{}` of `{}` is not an object type",
                        base.type_name(),
                        object.type_name()
                    )));
                }
                Some(self.get_or_build(base)?)
            }
            None => None,
        };

        let mut interfaces = Vec::with_capacity(object.interfaces().len());
        for interface in object.interfaces() {
            let interface = interface();
            if interface.as_object().is_none() {
                return Err(Error::configuration(format_args!(
                    "interface `{}` of `{}` is not an object type",
                    interface.type_name(),
                    object.type_name()
                )));
            }
            interfaces.push(self.get_or_build(interface)?);
        }

        // Markers are inherited from bases and interfaces.
        let mut markers = object.markers().to_vec();
        for parent in base.iter().chain(interfaces.iter()) {
            for marker in parent.markers() {
                if !markers.contains(marker) {
                    markers.push(*marker);
                }
            }
        }

        // Members declared on this type, validated per marker.
        let mut own: HashMap<Marker, Vec<MemberBinding>> = HashMap::new();
        for member in object.members() {
            for binding in member.bindings() {
                if !binding.slot.fits(binding.marker.role()) {
                    return Err(Error::configuration(format_args!(
                        "member `{}.{}` binds {} to {:?} marker `{}`",
                        object.type_name(),
                        member.name(),
                        binding.slot,
                        binding.marker.role(),
                        binding.marker
                    )));
                }

                let bindings = own.entry(binding.marker).or_default();
                if bindings.iter().any(|b| b.slot == binding.slot) {
                    return Err(Error::configuration(format_args!(
                        "duplicate slot {} under marker `{}` in `{}`",
                        binding.slot,
                        binding.marker,
                        object.type_name()
                    )));
                }

                bindings.push(MemberBinding {
                    owner: info,
                    name: member.name(),
                    field: member.field(),
                    slot: binding.slot.clone(),
                    info: member.info(),
                    required: member.requirement(),
                });
            }
        }

        // Base members first; re-bound slots are replaced in place.
        let mut all = base.as_ref().map(|b| b.all.clone()).unwrap_or_default();
        for (marker, bindings) in &own {
            let merged = all.entry(*marker).or_default();
            for binding in bindings {
                match merged.iter_mut().find(|b| b.slot == binding.slot) {
                    Some(inherited) => *inherited = binding.clone(),
                    None => merged.push(binding.clone()),
                }
            }
        }

        let mut resolutions = Vec::new();
        for resolution in object.resolutions() {
            let target = (resolution.target())();
            if target.type_id() == info.type_id() || !target.derives_from(info.type_id()) {
                return Err(Error::configuration(format_args!(
                    "resolution target `{}` does not derive from `{}`",
                    target.type_name(),
                    object.type_name()
                )));
            }

            resolutions.push(ResolutionParameter {
                declared_by: info,
                target,
                value: resolution.value().cloned(),
                key: resolution.key().cloned(),
                index: resolution.index(),
            });
        }
        let mut seen = HashSet::new();
        for parent in base.iter().chain(interfaces.iter()) {
            for parameter in parent.resolution_parameters() {
                let id = (
                    parameter.declared_by.type_id(),
                    parameter.target.type_id(),
                );
                if seen.insert(id) {
                    resolutions.push(parameter.clone());
                }
            }
        }

        let map = TypeReflectionMap {
            info,
            base,
            markers,
            own,
            all,
            resolutions,
            hooks: object.hooks(),
        };

        self.builds.fetch_add(1, Ordering::AcqRel);
        tracing::debug!(
            type_name = object.type_name(),
            markers = map.markers.len(),
            resolutions = map.resolutions.len(),
            "built reflection map"
        );

        Ok(Arc::new(map))
    }
}
