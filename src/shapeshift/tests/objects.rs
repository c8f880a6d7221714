use shapeshift::{
    features::{RequiredValues, TypeResolution},
    type_info::{Reflected, TypeInfo},
    value::{Lookup, Sequence},
    Key, Marker, Object, ObjectExt, SerializationDefinition, Slot, Type, Value,
};

#[derive(Clone, Debug, Default, PartialEq, Type)]
pub struct Leaderboard {
    #[member(key = "Name")]
    name: String,
    #[member(key = "Entries")]
    entries: Vec<Entry>,
}

#[derive(Clone, Debug, Default, PartialEq, Type)]
pub struct Entry {
    #[member(index = 0)]
    rank: i32,
    #[member(index = 1)]
    player_id: i32,
    #[member(index = 2)]
    score: i32,
}

fn definition() -> SerializationDefinition {
    SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .sequence_marker(Marker::SEQUENCE)
        .feature(TypeResolution::new())
        .feature(RequiredValues)
        .build()
        .unwrap()
}

fn daily() -> Leaderboard {
    Leaderboard {
        name: "Daily".into(),
        entries: vec![Entry {
            rank: 1,
            player_id: 42,
            score: 9001,
        }],
    }
}

#[test]
fn leaderboard_layout() {
    let definition = definition();
    let value = definition.serialize(&daily()).unwrap();

    let mut entry = Sequence::new();
    entry.push(Value::Int(1));
    entry.push(Value::Int(42));
    entry.push(Value::Int(9001));
    let mut entries = Sequence::new();
    entries.push(entry);
    let mut expected = Lookup::new();
    expected.insert("Name", "Daily");
    expected.insert("Entries", entries);

    assert_eq!(value, Value::Lookup(expected));

    let keys: Vec<_> = value
        .as_lookup()
        .unwrap()
        .iter()
        .map(|(k, _)| k.to_string())
        .collect();
    assert_eq!(keys, ["Name", "Entries"]);
}

#[test]
fn leaderboard_round_trip() {
    let definition = definition();
    let board = daily();

    let value = definition.serialize(&board).unwrap();
    let back: Leaderboard = definition.deserialize(&value).unwrap();
    assert_eq!(back, board);
}

#[test]
fn absent_members_keep_defaults() {
    #[derive(Debug, PartialEq, Type)]
    struct Settings {
        #[member(key = "volume")]
        volume: u8,
        #[member(key = "muted")]
        muted: bool,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                volume: 50,
                muted: false,
            }
        }
    }

    let mut data = Lookup::new();
    data.insert("muted", true);
    data.insert("unknown", 5_i64);

    let settings: Settings = definition().deserialize(&Value::Lookup(data)).unwrap();
    assert_eq!(
        settings,
        Settings {
            volume: 50,
            muted: true
        }
    );
}

#[test]
fn sparse_sequence() {
    #[derive(Debug, Default, PartialEq, Type)]
    struct Sparse {
        #[member(index = 0)]
        first: String,
        #[member(index = 2)]
        third: u16,
    }

    let definition = definition();
    let sparse = Sparse {
        first: "a".into(),
        third: 3,
    };

    let value = definition.serialize(&sparse).unwrap();
    let sequence = value.as_sequence().unwrap();
    assert_eq!(sequence.len(), 3);
    assert_eq!(sequence.get(1), Some(&Value::Null));

    let back: Sparse = definition.deserialize(&value).unwrap();
    assert_eq!(back, sparse);

    let short: Sequence = [Value::from("only")].into_iter().collect();
    let partial: Sparse = definition.deserialize(&Value::Sequence(short)).unwrap();
    assert_eq!(
        partial,
        Sparse {
            first: "only".into(),
            third: 0
        }
    );
}

#[test]
fn collections_round_trip() {
    use std::collections::{BTreeMap, HashMap};

    #[derive(Debug, Default, PartialEq, Type)]
    struct Inventory {
        #[member(key = "counts")]
        counts: BTreeMap<String, u32>,
        #[member(key = "slots")]
        slots: HashMap<i64, String>,
        #[member(key = "nickname")]
        nickname: Option<String>,
        #[member(key = "tags")]
        tags: Vec<Option<String>>,
    }

    let definition = definition();
    let inventory = Inventory {
        counts: [("potion".to_owned(), 3), ("key".to_owned(), 1)]
            .into_iter()
            .collect(),
        slots: [(1, "sword".to_owned()), (7, "shield".to_owned())]
            .into_iter()
            .collect(),
        nickname: None,
        tags: vec![Some("rare".into()), None],
    };

    let value = definition.serialize(&inventory).unwrap();
    let lookup = value.as_lookup().unwrap();
    assert_eq!(lookup.get_str("nickname"), Some(&Value::Null));
    assert!(lookup
        .get_str("slots")
        .and_then(Value::as_lookup)
        .and_then(|slots| slots.get(&Key::Int(7)))
        .is_some());

    let back: Inventory = definition.deserialize(&value).unwrap();
    assert_eq!(back, inventory);
}

#[test]
fn markers_select_members() {
    const ADMIN: Marker = Marker::lookup("admin");

    #[derive(Debug, Default, PartialEq, Type)]
    struct Account {
        #[member(key = "name")]
        #[member(key = "user", marker = ADMIN)]
        name: String,
        #[member(key = "password_hash", marker = ADMIN)]
        password_hash: String,
    }

    let account = Account {
        name: "ada".into(),
        password_hash: "x1".into(),
    };

    let public = definition().serialize(&account).unwrap();
    let public = public.as_lookup().unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public.get_str("name"), Some(&Value::from("ada")));

    let admin = SerializationDefinition::builder()
        .lookup_marker(ADMIN)
        .build()
        .unwrap();
    let private = admin.serialize(&account).unwrap();
    let private = private.as_lookup().unwrap();
    assert_eq!(private.get_str("user"), Some(&Value::from("ada")));
    assert_eq!(private.get_str("password_hash"), Some(&Value::from("x1")));

    let back: Account = admin.deserialize(&admin.serialize(&account).unwrap()).unwrap();
    assert_eq!(back, account);
}

#[test]
fn lookup_and_sequence_forms() {
    #[derive(Debug, Default, PartialEq, Type)]
    struct Point {
        #[member(key = "x")]
        #[member(index = 0)]
        x: i32,
        #[member(key = "y")]
        #[member(index = 1)]
        y: i32,
    }

    let point = Point { x: 3, y: -4 };

    let both = definition();
    // The sequence form wins when a type is declared under both.
    let value = both.serialize(&point).unwrap();
    assert!(matches!(value, Value::Sequence(_)));
    assert_eq!(both.deserialize::<Point>(&value).unwrap(), point);

    // Lookup data still reads through the lookup processor.
    let mut lookup = Lookup::new();
    lookup.insert("x", 3_i64);
    lookup.insert("y", -4_i64);
    assert_eq!(both.deserialize::<Point>(&Value::Lookup(lookup)).unwrap(), point);

    let lookup_only = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .build()
        .unwrap();
    let value = lookup_only.serialize(&point).unwrap();
    assert!(matches!(value, Value::Lookup(_)));
    assert_eq!(lookup_only.deserialize::<Point>(&value).unwrap(), point);
}

#[test]
fn integer_keys() {
    #[derive(Debug, Default, PartialEq, Type)]
    struct Packet {
        #[member(key = 1)]
        opcode: u8,
        #[member(key = 2)]
        payload: String,
    }

    let definition = definition();
    let packet = Packet {
        opcode: 9,
        payload: "hi".into(),
    };

    let value = definition.serialize(&packet).unwrap();
    assert_eq!(
        value.at(&Slot::Key(Key::Int(1)), Default::default()),
        Some(&Value::UInt(9))
    );
    assert_eq!(definition.deserialize::<Packet>(&value).unwrap(), packet);
}

#[test]
fn emulated_inheritance() {
    #[derive(Clone, Debug, Default, PartialEq, Type)]
    struct Actor {
        #[member(key = "id")]
        id: u64,
    }

    #[derive(Clone, Debug, Default, PartialEq, Type)]
    struct Npc {
        #[member(base)]
        base: Actor,
        #[member(key = "dialogue")]
        dialogue: String,
    }

    #[derive(Clone, Debug, Default, PartialEq, Type)]
    struct Merchant {
        #[member(base)]
        base: Npc,
        #[member(key = "gold")]
        gold: u32,
        // Re-binds the inherited slot of `Actor::id`.
        #[member(key = "id")]
        shop_id: u64,
    }

    let merchant = Merchant {
        base: Npc {
            base: Actor { id: 1 },
            dialogue: "Wares!".into(),
        },
        gold: 250,
        shop_id: 99,
    };

    assert_eq!(merchant.base_as::<Actor>(), Some(&Actor { id: 1 }));
    assert_eq!(merchant.base_as::<Npc>().map(|n| n.dialogue.as_str()), Some("Wares!"));
    assert!(merchant.base().is_some());

    let info = <Merchant as Reflected>::info();
    assert!(info.derives_from(<Actor as Reflected>::info().type_id()));
    assert!(matches!(info, TypeInfo::Object(o) if o.depth() == 2));

    let definition = definition();
    let value = definition.serialize(&merchant).unwrap();
    let keys: Vec<_> = value
        .as_lookup()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    assert_eq!(
        keys,
        [
            ("id".to_owned(), Value::UInt(99)),
            ("dialogue".to_owned(), Value::from("Wares!")),
            ("gold".to_owned(), Value::UInt(250)),
        ]
    );

    let back: Merchant = definition.deserialize(&value).unwrap();
    assert_eq!(back.shop_id, 99);
    assert_eq!(back.base.dialogue, "Wares!");
    assert_eq!(back.gold, 250);
    // The overridden base member is not read anymore.
    assert_eq!(back.base.base.id, 0);
}

#[test]
fn dynamic_field_access() {
    let mut entry: Box<dyn Object> = Box::new(Entry {
        rank: 3,
        player_id: 7,
        score: 10,
    });

    assert_eq!(entry.field_as::<i32>(1), Some(&7));
    assert!(entry.field(3).is_none());

    assert!(entry.field_mut(2).unwrap().set(Box::new(11_i32)).is_ok());
    assert_eq!(entry.field_as::<i32>(2), Some(&11));

    assert!(entry
        .field_mut(2)
        .unwrap()
        .set(Box::new(String::from("nope")))
        .is_err());
}

#[test]
fn deserialize_into_existing() {
    let definition = definition();
    let mut board = daily();

    let mut data = Lookup::new();
    data.insert("Name", "Weekly");

    shapeshift::deserialize_into(&mut board, &Value::Lookup(data), &definition).unwrap();
    assert_eq!(board.name, "Weekly");
    assert_eq!(board.entries.len(), 1);
}
