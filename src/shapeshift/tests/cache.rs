use std::sync::Arc;

use shapeshift::{
    reflection::ReflectionCache,
    type_info::{Reflected, TypeInfo},
    Marker, SerializationDefinition, Type,
};
use tracing_subscriber::filter::LevelFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(LevelFilter::DEBUG)
        .try_init();
}

#[derive(Debug, Default, Type)]
pub struct Base {
    #[member(key = "id")]
    id: u32,
    #[member(index = 0)]
    #[member(key = "tag", marker = Marker::lookup("alt"))]
    tag: String,
}

#[derive(Debug, Default, Type)]
pub struct Derived {
    #[member(base)]
    base: Base,
    #[member(key = "extra")]
    extra: bool,
    #[member(key = "id")]
    renamed: u32,
}

#[test]
fn maps_are_built_once() {
    init_logging();
    let cache = ReflectionCache::new();
    let info = <Derived as Reflected>::info();

    let cache = &cache;
    let maps: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(move || cache.get_or_build(info).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for map in &maps[1..] {
        assert!(Arc::ptr_eq(&maps[0], map));
    }
    // `Derived` and its base.
    assert_eq!(cache.builds(), 2);
    assert_eq!(cache.len(), 2);

    let again = cache.get_or_build(info).unwrap();
    assert!(Arc::ptr_eq(&maps[0], &again));
    assert_eq!(cache.builds(), 2);
}

#[test]
fn members_merge_with_the_base_chain() {
    let cache = ReflectionCache::new();
    let map = cache.get_or_build(<Derived as Reflected>::info()).unwrap();

    let names: Vec<_> = map
        .members(Marker::LOOKUP, true)
        .iter()
        .map(|m| m.name())
        .collect();
    assert_eq!(names, ["renamed", "extra"]);

    let own: Vec<_> = map
        .members(Marker::LOOKUP, false)
        .iter()
        .map(|m| m.name())
        .collect();
    assert_eq!(own, ["extra", "renamed"]);

    assert_eq!(map.members(Marker::SEQUENCE, true).len(), 1);
    assert_eq!(map.members(Marker::SEQUENCE, false).len(), 0);
    assert_eq!(map.members(Marker::lookup("alt"), true)[0].name(), "tag");
    assert!(map.members(Marker::lookup("unused"), true).is_empty());

    assert!(map.has_marker(Marker::LOOKUP));
    assert!(map.has_marker(Marker::SEQUENCE));
    assert!(map.base().is_some());
}

#[test]
fn leaf_types_have_empty_maps() {
    let cache = ReflectionCache::new();
    let map = cache.get_or_build(<String as Reflected>::info()).unwrap();

    assert!(map.markers().is_empty());
    assert!(map.resolution_parameters().is_empty());
    assert!(matches!(map.type_info(), TypeInfo::Leaf(_)));
}

#[test]
fn definitions_share_a_cache() {
    init_logging();
    let cache = Arc::new(ReflectionCache::new());
    let lookup = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .cache(cache.clone())
        .build()
        .unwrap();
    let alt = SerializationDefinition::builder()
        .lookup_marker(Marker::lookup("alt"))
        .cache(cache.clone())
        .build()
        .unwrap();

    let derived = Derived::default();
    lookup.serialize(&derived).unwrap();
    let builds = cache.builds();
    alt.serialize(&derived).unwrap();

    assert!(Arc::ptr_eq(lookup.cache(), alt.cache()));
    assert_eq!(cache.builds(), builds);
}
