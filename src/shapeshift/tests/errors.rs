use std::sync::Arc;

use shapeshift::{
    features::EnumAliases,
    processors::{Processor, StringProcessor},
    type_info::Reflected,
    value::{Lookup, Sequence},
    Error, ErrorKind, Marker, Ptr, SerializationDefinition, Type, Value,
};

fn definition() -> SerializationDefinition {
    SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .sequence_marker(Marker::SEQUENCE)
        .build()
        .unwrap()
}

#[test]
fn builder_validation() {
    let err = SerializationDefinition::builder().build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = SerializationDefinition::builder()
        .lookup_marker(Marker::SEQUENCE)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = SerializationDefinition::builder()
        .sequence_marker(Marker::lookup("wire"))
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .max_depth(0)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .processors(Vec::new())
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn duplicate_slots_are_rejected() {
    #[derive(Debug, Default, Type)]
    struct Clash {
        #[member(key = "a")]
        first: i32,
        #[member(key = "a")]
        second: i32,
    }

    let definition = definition();
    let err = definition.serialize(&Clash::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    // Same result on every later request.
    let err = definition
        .deserialize::<Clash>(&Value::Lookup(Lookup::new()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn slots_must_fit_the_marker_role() {
    #[derive(Debug, Default, Type)]
    struct Misplaced {
        #[member(key = "a", marker = Marker::SEQUENCE)]
        a: i32,
    }

    let err = definition().serialize(&Misplaced::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn resolution_targets_must_derive() {
    #[derive(Debug, Default, Type)]
    struct Unrelated {
        #[member(key = "x")]
        x: i32,
    }

    #[derive(Debug, Default, Type)]
    #[object(resolve(Unrelated))]
    struct Root {
        #[member(key = "y")]
        y: i32,
    }

    let err = definition().serialize(&Root::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn alias_tables_need_enums() {
    let aliases = EnumAliases::new();
    let err = aliases.cache().get(<i32 as Reflected>::info()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn unmarked_types_are_unsupported() {
    #[derive(Debug, Default, Type)]
    struct Bare {
        hidden: i32,
    }

    let err = definition().serialize(&Bare::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);

    #[derive(Debug, Default, Type)]
    struct Named {
        #[member(key = "name")]
        name: String,
    }

    let sequence_only = SerializationDefinition::builder()
        .sequence_marker(Marker::SEQUENCE)
        .build()
        .unwrap();
    let err = sequence_only.serialize(&Named::default()).unwrap_err();
    assert!(matches!(err, Error::Unsupported { path, .. } if path == "Named"));
}

#[test]
fn custom_chains_limit_support() {
    #[derive(Debug, Default, Type)]
    struct Label {
        #[member(key = "text")]
        text: String,
    }

    let strings_only = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .processors(vec![Arc::new(StringProcessor) as Arc<dyn Processor>])
        .build()
        .unwrap();

    assert_eq!(
        strings_only.serialize(&String::from("plain")).unwrap(),
        Value::from("plain")
    );
    let err = strings_only.serialize(&Label::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

#[derive(Debug, Default, Type)]
pub struct Node {
    #[member(key = "value")]
    value: i32,
    #[member(key = "next")]
    next: Ptr<Node>,
}

fn chain(len: i32) -> Node {
    let mut node = Node::default();
    for value in 0..len {
        node = Node {
            value,
            next: Ptr::new(node),
        };
    }
    node
}

#[test]
fn recursion_is_limited() {
    let shallow = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .max_depth(4)
        .build()
        .unwrap();

    let short = shallow.serialize(&chain(2)).unwrap();
    assert!(shallow.deserialize::<Node>(&short).is_ok());

    let err = shallow.serialize(&chain(10)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RecursionLimit);

    let deep = definition().serialize(&chain(10)).unwrap();
    let err = shallow.deserialize::<Node>(&deep).unwrap_err();
    match err {
        Error::RecursionLimit { limit, path } => {
            assert_eq!(limit, 4);
            assert!(path.starts_with("Node.next.next"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[derive(Debug, Default, Type)]
pub struct Leaderboard {
    #[member(key = "Entries")]
    entries: Vec<Entry>,
    #[member(key = "Totals")]
    totals: std::collections::BTreeMap<String, u32>,
}

#[derive(Debug, Default, Type)]
pub struct Entry {
    #[member(index = 0)]
    rank: i32,
    #[member(index = 1)]
    player_id: i32,
}

#[test]
fn invalid_data_reports_paths() {
    let entry: Sequence = [Value::Int(1), Value::from("x")].into_iter().collect();
    let entries: Sequence = [Value::Sequence(entry)].into_iter().collect();
    let mut data = Lookup::new();
    data.insert("Entries", entries);

    let err = definition()
        .deserialize::<Leaderboard>(&Value::Lookup(data))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert!(matches!(
        &err,
        Error::InvalidData { path, .. } if path == "Leaderboard.entries[0].player_id"
    ));
    assert!(err.to_string().contains("Leaderboard.entries[0].player_id"));

    let mut totals = Lookup::new();
    totals.insert("gold", -5_i64);
    let mut data = Lookup::new();
    data.insert("Totals", totals);

    let err = definition()
        .deserialize::<Leaderboard>(&Value::Lookup(data))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidData { path, .. } if path == "Leaderboard.totals[\"gold\"]"
    ));
}

#[test]
fn mismatched_containers() {
    let err = definition()
        .deserialize::<Leaderboard>(&Value::from("board"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);

    let mut data = Lookup::new();
    data.insert("Entries", Lookup::new());
    let err = definition()
        .deserialize::<Leaderboard>(&Value::Lookup(data))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}
