use proptest::prelude::*;
use shapeshift::{
    bitenum,
    features::EnumAliases,
    type_info::{Reflected, TypeInfo},
    value::Lookup,
    ErrorKind, Marker, SerializationDefinition, Type, Value,
};

bitenum! {
    #[enumeration(as_string)]
    pub struct Abilities: u32 {
        #[alias("alpha")]
        const A = 1 << 0;
        const B = 1 << 1;
        const C = 1 << 2;
    }
}

bitenum! {
    pub struct Permissions: u8 {
        const READ = 1;
        const WRITE = 2;
    }
}

#[derive(Debug, Default, PartialEq, Type)]
pub struct Hero {
    #[member(key = "abilities")]
    abilities: Abilities,
    #[member(key = "permissions")]
    permissions: Permissions,
}

fn definition(separator: Option<&'static str>) -> SerializationDefinition {
    let aliases = match separator {
        Some(separator) => EnumAliases::new().separator(separator),
        None => EnumAliases::new(),
    };

    SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .feature(aliases)
        .build()
        .unwrap()
}

#[test]
fn flags_are_reflected() {
    let TypeInfo::Enum(info) = <Abilities as Reflected>::info() else {
        panic!("flag sets are enums");
    };

    assert!(info.is_flags());
    assert!(info.prefers_string());
    assert_eq!(info.variants().len(), 3);
    assert_eq!(info.variant_named("A").and_then(|v| v.alias()), Some("alpha"));
    assert_eq!(
        info.decompose(0b101).map(|parts| parts.len()),
        Some(2)
    );
    assert!(info.decompose(0b1000).is_none());
}

#[test]
fn flags_render_through_aliases() {
    let definition = definition(None);
    let hero = Hero {
        abilities: Abilities::A | Abilities::C,
        permissions: Permissions::READ | Permissions::WRITE,
    };

    let value = definition.serialize(&hero).unwrap();
    let lookup = value.as_lookup().unwrap();
    assert_eq!(lookup.get_str("abilities"), Some(&Value::from("alpha, C")));
    // No string preference, so the raw bits are written.
    assert_eq!(lookup.get_str("permissions"), Some(&Value::Int(3)));

    let back: Hero = definition.deserialize(&value).unwrap();
    assert_eq!(back, hero);
}

#[test]
fn flags_parse_names_aliases_and_numbers() {
    let definition = definition(None);

    for (text, expected) in [
        ("alpha", Abilities::A),
        ("A, B", Abilities::A | Abilities::B),
        ("C,alpha", Abilities::A | Abilities::C),
        ("2, 4", Abilities::B | Abilities::C),
        ("7", Abilities::all()),
    ] {
        let mut data = Lookup::new();
        data.insert("abilities", text);
        let hero: Hero = definition.deserialize(&Value::Lookup(data)).unwrap();
        assert_eq!(hero.abilities, expected, "parsing {text:?}");
    }

    let mut data = Lookup::new();
    data.insert("abilities", "alpha, D");
    let err = definition.deserialize::<Hero>(&Value::Lookup(data)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn custom_separator() {
    let definition = definition(Some(" | "));
    let hero = Hero {
        abilities: Abilities::all(),
        permissions: Permissions::empty(),
    };

    let value = definition.serialize(&hero).unwrap();
    assert_eq!(
        value.as_lookup().unwrap().get_str("abilities"),
        Some(&Value::from("alpha | B | C"))
    );
    assert_eq!(definition.deserialize::<Hero>(&value).unwrap(), hero);
}

#[test]
fn unknown_bits_are_rejected() {
    let definition = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .build()
        .unwrap();

    let mut data = Lookup::new();
    data.insert("permissions", 4_i64);
    let err = definition.deserialize::<Hero>(&Value::Lookup(data)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

bitenum! {
    #[enumeration(as_string)]
    pub struct Access: u8 {
        const R = 1;
        const W = 2;
        const RW = 3;
        const X = 4;
    }
}

#[derive(Debug, Default, PartialEq, Type)]
pub struct Door {
    #[member(key = "access")]
    access: Access,
}

#[test]
fn composite_flags_cover_their_parts() {
    let TypeInfo::Enum(info) = <Access as Reflected>::info() else {
        panic!("flag sets are enums");
    };
    let names = |value| {
        info.decompose(value)
            .unwrap()
            .iter()
            .map(|v| v.name())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(3), ["RW"]);
    assert_eq!(names(7), ["RW", "X"]);
    assert_eq!(names(5), ["R", "X"]);

    let definition = definition(None);
    let door = Door {
        access: Access::R | Access::W,
    };
    let value = definition.serialize(&door).unwrap();
    assert_eq!(
        value.as_lookup().unwrap().get_str("access"),
        Some(&Value::from("RW"))
    );
    assert_eq!(definition.deserialize::<Door>(&value).unwrap(), door);

    let mut data = Lookup::new();
    data.insert("access", "R, W");
    assert_eq!(definition.deserialize::<Door>(&Value::Lookup(data)).unwrap(), door);
}

proptest! {
    #[test]
    fn flags_round_trip(bits in 0u32..8) {
        let definition = definition(None);
        let hero = Hero {
            abilities: Abilities::from_bits_truncate(bits),
            permissions: Permissions::from_bits_truncate((bits & 3) as u8),
        };

        let value = definition.serialize(&hero).unwrap();
        let back: Hero = definition.deserialize(&value).unwrap();
        prop_assert_eq!(back, hero);
    }
}
