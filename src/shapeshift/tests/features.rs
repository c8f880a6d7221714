use anyhow::anyhow;
use shapeshift::{
    features::{Callbacks, EnumAliases, ParallelProcessing, RequiredValues, TypeResolution},
    value::Lookup,
    Error, ErrorKind, HookContext, HookResult, Marker, Ptr, SerializationDefinition, Type, Value,
};

fn definition() -> SerializationDefinition {
    SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .sequence_marker(Marker::SEQUENCE)
        .feature(TypeResolution::new())
        .feature(RequiredValues)
        .feature(EnumAliases::new())
        .feature(Callbacks)
        .build()
        .unwrap()
}

#[derive(Debug, Default, PartialEq, Type)]
pub struct Credentials {
    #[member(key = "user", required)]
    user: String,
    #[member(key = "token", required(non_null))]
    token: Option<String>,
    #[member(key = "note", required)]
    note: Option<String>,
}

#[test]
fn required_members_must_be_present() {
    let mut data = Lookup::new();
    data.insert("token", "abc");
    data.insert("note", Value::Null);

    let err = definition()
        .deserialize::<Credentials>(&Value::Lookup(data))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequiredValue);
    assert!(matches!(err, Error::RequiredMissing { member: "user", .. }));
}

#[test]
fn required_non_null_rejects_null() {
    let mut data = Lookup::new();
    data.insert("user", "ada");
    data.insert("token", Value::Null);
    data.insert("note", Value::Null);

    let err = definition()
        .deserialize::<Credentials>(&Value::Lookup(data))
        .unwrap_err();
    assert!(matches!(err, Error::RequiredNull { member: "token", .. }));
}

#[test]
fn required_members_accept_null_unless_non_null() {
    let mut data = Lookup::new();
    data.insert("user", "ada");
    data.insert("token", "abc");
    data.insert("note", Value::Null);

    let credentials: Credentials = definition().deserialize(&Value::Lookup(data)).unwrap();
    assert_eq!(
        credentials,
        Credentials {
            user: "ada".into(),
            token: Some("abc".into()),
            note: None,
        }
    );
}

#[test]
fn required_is_ignored_without_the_feature() {
    let definition = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .build()
        .unwrap();

    let credentials: Credentials = definition.deserialize(&Value::Lookup(Lookup::new())).unwrap();
    assert_eq!(credentials, Credentials::default());
}

fn base_loaded(base: &mut Tracked, _cx: &HookContext<'_>) -> HookResult {
    base.trace.push("base");
    Ok(())
}

fn derived_loaded(derived: &mut TrackedChild, _cx: &HookContext<'_>) -> HookResult {
    derived.base.trace.push("child");
    derived.total = derived.base.count * 2;
    Ok(())
}

fn before_save(tracked: &Tracked, cx: &HookContext<'_>) -> HookResult {
    if tracked.count < 0 {
        return Err(anyhow!("negative count at {}", cx.path()));
    }
    Ok(())
}

#[derive(Debug, Default, Type)]
#[object(after_deserialize = base_loaded, before_serialize = before_save)]
pub struct Tracked {
    #[member(key = "count")]
    count: i32,
    trace: Vec<&'static str>,
}

#[derive(Debug, Default, Type)]
#[object(after_deserialize = derived_loaded)]
pub struct TrackedChild {
    #[member(base)]
    base: Tracked,
    total: i32,
}

#[test]
fn hooks_run_base_first() {
    let mut data = Lookup::new();
    data.insert("count", 21_i64);

    let child: TrackedChild = definition().deserialize(&Value::Lookup(data)).unwrap();
    assert_eq!(child.base.trace, ["base", "child"]);
    assert_eq!(child.total, 42);
}

#[test]
fn hooks_need_the_feature() {
    let definition = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .build()
        .unwrap();

    let mut data = Lookup::new();
    data.insert("count", 21_i64);

    let child: TrackedChild = definition.deserialize(&Value::Lookup(data)).unwrap();
    assert!(child.base.trace.is_empty());
    assert_eq!(child.total, 0);
}

#[test]
fn failing_hooks_abort() {
    let child = TrackedChild {
        base: Tracked {
            count: -1,
            trace: Vec::new(),
        },
        total: 0,
    };

    let err = definition().serialize(&child).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Callback);
    match err {
        Error::Callback {
            hook,
            type_name,
            source,
            ..
        } => {
            assert_eq!(hook, "before_serialize");
            assert!(type_name.ends_with("Tracked"));
            assert!(source.to_string().contains("negative count"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[derive(Debug, Default, PartialEq, Type)]
pub struct Stats {
    #[member(key = "a")]
    a: u32,
    #[member(key = "b")]
    b: String,
    #[member(key = "c")]
    c: Vec<i64>,
    #[member(key = "d")]
    d: Option<f64>,
    #[member(key = "e")]
    e: bool,
    #[member(key = "nested")]
    nested: Vec<Inner>,
}

#[derive(Debug, Default, PartialEq, Type)]
pub struct Inner {
    #[member(index = 0)]
    x: i16,
    #[member(index = 1)]
    y: i16,
}

fn stats() -> Stats {
    Stats {
        a: 7,
        b: "seven".into(),
        c: vec![1, -2, 3],
        d: Some(0.5),
        e: true,
        nested: (0..16).map(|i| Inner { x: i, y: -i }).collect(),
    }
}

#[test]
fn parallel_matches_sequential() {
    let sequential = definition();
    let parallel = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .sequence_marker(Marker::SEQUENCE)
        .feature(ParallelProcessing::with_threads(2).unwrap().min_members(2))
        .build()
        .unwrap();

    let stats = stats();
    let expected = sequential.serialize(&stats).unwrap();
    let actual = parallel.serialize(&stats).unwrap();
    assert_eq!(actual, expected);

    let keys: Vec<_> = actual
        .as_lookup()
        .unwrap()
        .iter()
        .map(|(k, _)| k.to_string())
        .collect();
    assert_eq!(keys, ["a", "b", "c", "d", "e", "nested"]);

    let back: Stats = parallel.deserialize(&actual).unwrap();
    assert_eq!(back, stats);
}

#[test]
fn parallel_errors_propagate() {
    let parallel = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .feature(ParallelProcessing::new().min_members(2))
        .build()
        .unwrap();

    let mut data = Lookup::new();
    data.insert("a", "not a number");
    data.insert("b", "fine");
    let err = parallel.deserialize::<Stats>(&Value::Lookup(data)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[derive(Debug, Default, PartialEq, Type)]
pub struct Profile {
    #[member(key = "name")]
    name: String,
    #[member(key = "level")]
    level: u32,
}

#[derive(Debug, Default, PartialEq, Type)]
#[object(abstract, resolve(Medal, value = "medal"))]
pub struct Badge {
    #[member(key = "title")]
    title: String,
}

#[derive(Debug, Default, PartialEq, Type)]
pub struct Medal {
    #[member(base)]
    base: Badge,
    #[member(key = "grade")]
    grade: u8,
}

#[derive(Debug, Default, Type)]
pub struct SaveGame {
    #[member(key = "profile")]
    profile: Profile,
    #[member(key = "slot")]
    slot: u8,
    #[member(key = "counter")]
    counter: TrackedChild,
    #[member(key = "badge")]
    badge: Ptr<Badge>,
}

fn save_game() -> SaveGame {
    SaveGame {
        profile: Profile {
            name: "ada".into(),
            level: 3,
        },
        slot: 1,
        ..Default::default()
    }
}

fn parallel_definition() -> SerializationDefinition {
    SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .sequence_marker(Marker::SEQUENCE)
        .feature(TypeResolution::new())
        .feature(Callbacks)
        .feature(ParallelProcessing::with_threads(2).unwrap().min_members(2))
        .build()
        .unwrap()
}

#[test]
fn parallel_updates_existing_instances() {
    let mut profile = Lookup::new();
    profile.insert("level", 4_i64);
    let mut counter = Lookup::new();
    counter.insert("count", 5_i64);
    let mut badge = Lookup::new();
    badge.insert("$type", "medal");
    badge.insert("title", "gold");
    badge.insert("grade", 2_i64);

    let mut data = Lookup::new();
    data.insert("profile", profile);
    data.insert("slot", 2_i64);
    data.insert("counter", counter);
    data.insert("badge", badge);
    let data = Value::Lookup(data);

    let mut sequential = save_game();
    shapeshift::deserialize_into(&mut sequential, &data, &definition()).unwrap();
    let mut parallel = save_game();
    shapeshift::deserialize_into(&mut parallel, &data, &parallel_definition()).unwrap();

    for save in [&sequential, &parallel] {
        assert_eq!(
            save.profile,
            Profile {
                name: "ada".into(),
                level: 4
            }
        );
        assert_eq!(save.slot, 2);
        assert_eq!(save.counter.base.count, 5);
        assert_eq!(save.counter.base.trace, ["base", "child"]);
        assert_eq!(save.counter.total, 10);
        assert_eq!(
            save.badge.downcast::<Medal>(),
            Some(&Medal {
                base: Badge {
                    title: "gold".into()
                },
                grade: 2
            })
        );
    }
}

#[test]
fn parallel_failures_keep_members() {
    let mut profile = Lookup::new();
    profile.insert("level", 9_i64);
    let mut data = Lookup::new();
    data.insert("profile", profile);
    data.insert("slot", "many");

    let mut save = save_game();
    let err = shapeshift::deserialize_into(&mut save, &Value::Lookup(data), &parallel_definition())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_eq!(save.profile.name, "ada");
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Type)]
#[enumeration(as_string)]
pub enum Rarity {
    #[default]
    Common = 0,
    #[variant(alias = "uncommon")]
    Uncommon = 1,
    Legendary = 5,
}

#[derive(Debug, Default, PartialEq, Type)]
pub struct Item {
    #[member(key = "rarity")]
    rarity: Rarity,
    #[member(key = "mode")]
    mode: Mode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Type)]
pub enum Mode {
    #[default]
    Off,
    On,
}

#[test]
fn enum_aliases() {
    let definition = definition();
    let item = Item {
        rarity: Rarity::Uncommon,
        mode: Mode::On,
    };

    let value = definition.serialize(&item).unwrap();
    let lookup = value.as_lookup().unwrap();
    assert_eq!(lookup.get_str("rarity"), Some(&Value::from("uncommon")));
    // Enums without a string preference stay numeric.
    assert_eq!(lookup.get_str("mode"), Some(&Value::Int(1)));

    let back: Item = definition.deserialize(&value).unwrap();
    assert_eq!(back, item);

    for (text, rarity) in [
        ("Uncommon", Rarity::Uncommon),
        ("Legendary", Rarity::Legendary),
        ("5", Rarity::Legendary),
    ] {
        let mut data = Lookup::new();
        data.insert("rarity", text);
        let item: Item = definition.deserialize(&Value::Lookup(data)).unwrap();
        assert_eq!(item.rarity, rarity);
    }

    let mut data = Lookup::new();
    data.insert("rarity", "mythic");
    let err = definition.deserialize::<Item>(&Value::Lookup(data)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn enums_without_aliases_use_numbers() {
    let definition = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .build()
        .unwrap();

    let value = definition
        .serialize(&Item {
            rarity: Rarity::Legendary,
            mode: Mode::Off,
        })
        .unwrap();
    assert_eq!(
        value.as_lookup().unwrap().get_str("rarity"),
        Some(&Value::Int(5))
    );

    let mut data = Lookup::new();
    data.insert("rarity", "Legendary");
    let item: Item = definition.deserialize(&Value::Lookup(data)).unwrap();
    assert_eq!(item.rarity, Rarity::Legendary);
}

#[test]
fn definitions_expose_features() {
    let definition = definition();
    assert!(definition.supports::<Callbacks>());
    assert!(definition.feature::<TypeResolution>().is_some());
    assert!(!definition.supports::<ParallelProcessing>());
}
