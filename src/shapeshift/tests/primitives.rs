use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use glam::{IVec3, Vec2};
use proptest::prelude::*;
use shapeshift::{
    definition::{DateEncoding, Natives, StructuredStyle},
    value::{Lookup, Sequence},
    Marker, SerializationDefinition, Type, Value, Version,
};
use uuid::Uuid;

fn lookup_definition() -> SerializationDefinition {
    SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .build()
        .unwrap()
}

#[derive(Debug, Default, PartialEq, Type)]
pub struct Transform {
    #[member(key = "position")]
    position: Vec2,
    #[member(key = "cell")]
    cell: IVec3,
}

#[test]
fn structured_styles() {
    let transform = Transform {
        position: Vec2::new(1.5, -2.0),
        cell: IVec3::new(1, 2, 3),
    };

    let value = lookup_definition().serialize(&transform).unwrap();
    let position = value
        .as_lookup()
        .and_then(|l| l.get_str("position"))
        .and_then(Value::as_lookup)
        .unwrap();
    assert_eq!(position.get_str("x"), Some(&Value::Float(1.5)));
    assert_eq!(position.get_str("y"), Some(&Value::Float(-2.0)));

    let compact = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .structured_style(StructuredStyle::Sequence)
        .build()
        .unwrap();
    let value = compact.serialize(&transform).unwrap();
    let cell: Sequence = [1_i64, 2, 3].into_iter().map(Value::Int).collect();
    assert_eq!(
        value.as_lookup().unwrap().get_str("cell"),
        Some(&Value::Sequence(cell))
    );

    // Both forms are always read.
    assert_eq!(compact.deserialize::<Transform>(&value).unwrap(), transform);
    let verbose = lookup_definition().serialize(&transform).unwrap();
    assert_eq!(compact.deserialize::<Transform>(&verbose).unwrap(), transform);
}

#[derive(Debug, Default, PartialEq, Type)]
pub struct Session {
    #[member(key = "started")]
    started: DateTime<Utc>,
    #[member(key = "day")]
    day: NaiveDate,
    #[member(key = "alarm")]
    alarm: NaiveTime,
    #[member(key = "timeout")]
    timeout: Duration,
}

fn session() -> Session {
    Session {
        started: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        day: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        alarm: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        timeout: Duration::from_millis(1500),
    }
}

#[test]
fn dates_as_rfc3339() {
    let definition = lookup_definition();
    let session = session();

    let value = definition.serialize(&session).unwrap();
    let lookup = value.as_lookup().unwrap();
    assert_eq!(
        lookup.get_str("started"),
        Some(&Value::from("2024-01-02T03:04:05Z"))
    );
    assert_eq!(lookup.get_str("day"), Some(&Value::from("2024-02-29")));
    assert_eq!(lookup.get_str("timeout"), Some(&Value::Float(1.5)));

    assert_eq!(definition.deserialize::<Session>(&value).unwrap(), session);
}

#[test]
fn dates_as_unix_millis() {
    let definition = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .dates(DateEncoding::UnixMillis)
        .build()
        .unwrap();
    let session = session();

    let value = definition.serialize(&session).unwrap();
    let lookup = value.as_lookup().unwrap();
    assert_eq!(
        lookup.get_str("started"),
        Some(&Value::Int(session.started.timestamp_millis()))
    );
    assert_eq!(lookup.get_str("alarm"), Some(&Value::Int(27_000_000)));
    assert_eq!(lookup.get_str("timeout"), Some(&Value::UInt(1500)));

    assert_eq!(definition.deserialize::<Session>(&value).unwrap(), session);
}

#[test]
fn dates_with_pattern() {
    let definition = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .dates(DateEncoding::Pattern("%d.%m.%Y".into()))
        .build()
        .unwrap();

    #[derive(Debug, Default, PartialEq, Type)]
    struct Holiday {
        #[member(key = "day")]
        day: NaiveDate,
    }

    let mut data = Lookup::new();
    data.insert("day", "24.12.2023");
    let holiday: Holiday = definition.deserialize(&Value::Lookup(data)).unwrap();
    assert_eq!(holiday.day, NaiveDate::from_ymd_opt(2023, 12, 24).unwrap());

    let value = definition.serialize(&holiday).unwrap();
    assert_eq!(
        value.as_lookup().unwrap().get_str("day"),
        Some(&Value::from("24.12.2023"))
    );
}

#[derive(Debug, Default, PartialEq, Type)]
pub struct Release {
    #[member(key = "id")]
    id: Uuid,
    #[member(key = "version")]
    version: Version,
    #[member(key = "initial")]
    initial: char,
    #[member(key = "ratio")]
    ratio: f32,
    #[member(key = "extra")]
    extra: Value,
}

#[test]
fn guids_versions_and_raw_values() {
    let definition = lookup_definition();
    let mut extra = Lookup::new();
    extra.insert("anything", true);

    let release = Release {
        id: Uuid::from_u128(0x6f9619ff_8b86_d011_b42d_00c04fc964ff),
        version: Version::new(1, 2).with_build(3),
        initial: 'r',
        ratio: 0.25,
        extra: Value::Lookup(extra),
    };

    let value = definition.serialize(&release).unwrap();
    let lookup = value.as_lookup().unwrap();
    assert_eq!(
        lookup.get_str("id"),
        Some(&Value::from("6f9619ff-8b86-d011-b42d-00c04fc964ff"))
    );
    assert_eq!(lookup.get_str("version"), Some(&Value::from("1.2.3")));
    assert_eq!(lookup.get_str("initial"), Some(&Value::from("r")));

    assert_eq!(definition.deserialize::<Release>(&value).unwrap(), release);
}

#[test]
fn versions_parse() {
    assert_eq!("4.0".parse::<Version>().unwrap(), Version::new(4, 0));
    assert_eq!(
        "1.2.3.4".parse::<Version>().unwrap(),
        Version::new(1, 2).with_build(3).with_revision(4)
    );
    assert!("1".parse::<Version>().is_err());
    assert!("1.x".parse::<Version>().is_err());
}

#[derive(Debug, Default, PartialEq, Type)]
pub struct Counters {
    #[member(key = "small")]
    small: i8,
    #[member(key = "wide")]
    wide: u64,
    #[member(key = "flag")]
    flag: bool,
    #[member(key = "real")]
    real: f64,
}

#[test]
fn string_natives() {
    let definition = SerializationDefinition::builder()
        .lookup_marker(Marker::LOOKUP)
        .natives(Natives::STRING)
        .build()
        .unwrap();
    let counters = Counters {
        small: -8,
        wide: u64::MAX,
        flag: true,
        real: 2.5,
    };

    let value = definition.serialize(&counters).unwrap();
    let lookup = value.as_lookup().unwrap();
    assert_eq!(lookup.get_str("small"), Some(&Value::from("-8")));
    assert_eq!(
        lookup.get_str("wide"),
        Some(&Value::from(u64::MAX.to_string()))
    );
    assert_eq!(lookup.get_str("flag"), Some(&Value::from("true")));
    assert_eq!(lookup.get_str("real"), Some(&Value::from("2.5")));

    assert_eq!(definition.deserialize::<Counters>(&value).unwrap(), counters);
}

#[test]
fn lenient_number_reading() {
    let mut data = Lookup::new();
    data.insert("small", 3.0);
    data.insert("wide", 12_i64);
    data.insert("flag", 1_i64);
    data.insert("real", 4_u64);

    let counters: Counters = lookup_definition().deserialize(&Value::Lookup(data)).unwrap();
    assert_eq!(
        counters,
        Counters {
            small: 3,
            wide: 12,
            flag: true,
            real: 4.0,
        }
    );

    let mut data = Lookup::new();
    data.insert("small", 300_i64);
    assert!(lookup_definition()
        .deserialize::<Counters>(&Value::Lookup(data))
        .is_err());
}

proptest! {
    #[test]
    fn primitives_round_trip(
        small in any::<i8>(),
        wide in any::<u64>(),
        flag in any::<bool>(),
        real in -1.0e12f64..1.0e12,
    ) {
        let counters = Counters { small, wide, flag, real };
        for natives in [Natives::all(), Natives::STRING] {
            let definition = SerializationDefinition::builder()
                .lookup_marker(Marker::LOOKUP)
                .natives(natives)
                .build()
                .unwrap();

            let value = definition.serialize(&counters).unwrap();
            let back: Counters = definition.deserialize(&value).unwrap();
            prop_assert_eq!(&back, &counters);
        }
    }
}
