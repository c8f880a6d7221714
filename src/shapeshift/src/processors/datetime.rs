use std::{fmt::Write, time::Duration};

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, SecondsFormat, TimeZone,
    Timelike, Utc,
};

use super::{primitive, Context, Processor};
use crate::{definition::DateEncoding, value::Value, Result, Type};

const DATE: &str = "%Y-%m-%d";
const TIME: &str = "%H:%M:%S%.f";
const DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Converts chrono date and time types as well as [`Duration`]s.
///
/// The representation follows the definition's
/// [`DateEncoding`]: RFC 3339 strings, Unix timestamps or a custom
/// pattern. Numeric timestamps are always accepted when reading.
#[derive(Clone, Copy, Debug, Default)]
pub struct DateTimeProcessor;

fn render(item: impl std::fmt::Display, cx: &Context<'_>) -> Result<Value> {
    let mut out = String::new();
    write!(out, "{item}").map_err(|_| cx.invalid("malformed date pattern"))?;
    Ok(Value::String(out))
}

fn encode_instant<Tz>(v: &DateTime<Tz>, cx: &Context<'_>) -> Result<Value>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let definition = cx.definition();
    match &definition.format().dates {
        DateEncoding::Rfc3339 => Ok(Value::String(
            v.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        )),
        DateEncoding::UnixSeconds => Ok(definition.encode_i64(v.timestamp())),
        DateEncoding::UnixMillis => Ok(definition.encode_i64(v.timestamp_millis())),
        DateEncoding::Pattern(pattern) => render(v.format(pattern), cx),
    }
}

fn from_timestamp(data: &Value, cx: &Context<'_>) -> Result<DateTime<Utc>> {
    let stamp = primitive::to_i64(data).ok_or_else(|| cx.mismatch("date-time", data))?;
    let instant = match cx.definition().format().dates {
        DateEncoding::UnixMillis => Utc.timestamp_millis_opt(stamp),
        _ => Utc.timestamp_opt(stamp, 0),
    };

    instant
        .single()
        .ok_or_else(|| cx.invalid(format_args!("timestamp {stamp} is out of range")))
}

fn decode_instant(data: &Value, cx: &Context<'_>) -> Result<DateTime<FixedOffset>> {
    if let Value::String(s) = data {
        let s = s.trim();
        match &cx.definition().format().dates {
            DateEncoding::Pattern(pattern) => {
                return DateTime::parse_from_str(s, pattern)
                    .or_else(|_| {
                        NaiveDateTime::parse_from_str(s, pattern)
                            .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Utc.fix()))
                    })
                    .map_err(|e| cx.invalid(e));
            }
            _ => {
                if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
                    return Ok(instant);
                }
            }
        }
    }

    from_timestamp(data, cx).map(|utc| utc.with_timezone(&Utc.fix()))
}

fn encode_naive(v: &NaiveDateTime, cx: &Context<'_>) -> Result<Value> {
    match &cx.definition().format().dates {
        DateEncoding::Rfc3339 => render(v.format(DATE_TIME), cx),
        DateEncoding::Pattern(pattern) => render(v.format(pattern), cx),
        _ => encode_instant(&Utc.from_utc_datetime(v), cx),
    }
}

fn decode_naive(data: &Value, cx: &Context<'_>) -> Result<NaiveDateTime> {
    if let Value::String(s) = data {
        let s = s.trim();
        let pattern = match &cx.definition().format().dates {
            DateEncoding::Pattern(pattern) => pattern.as_str(),
            _ => DATE_TIME,
        };
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
            return Ok(naive);
        }
    }

    decode_instant(data, cx).map(|instant| instant.naive_utc())
}

fn encode_date(v: &NaiveDate, cx: &Context<'_>) -> Result<Value> {
    match &cx.definition().format().dates {
        DateEncoding::Rfc3339 => render(v.format(DATE), cx),
        DateEncoding::Pattern(pattern) => render(v.format(pattern), cx),
        _ => {
            let midnight = v
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| cx.invalid("date has no midnight"))?;
            encode_instant(&Utc.from_utc_datetime(&midnight), cx)
        }
    }
}

fn decode_date(data: &Value, cx: &Context<'_>) -> Result<NaiveDate> {
    if let Value::String(s) = data {
        let s = s.trim();
        let pattern = match &cx.definition().format().dates {
            DateEncoding::Pattern(pattern) => pattern.as_str(),
            _ => DATE,
        };
        if let Ok(date) = NaiveDate::parse_from_str(s, pattern) {
            return Ok(date);
        }
    }

    decode_instant(data, cx).map(|instant| instant.naive_utc().date())
}

fn encode_time(v: &NaiveTime, cx: &Context<'_>) -> Result<Value> {
    let definition = cx.definition();
    let seconds = i64::from(v.num_seconds_from_midnight());
    match &definition.format().dates {
        DateEncoding::Rfc3339 => render(v.format(TIME), cx),
        DateEncoding::Pattern(pattern) => render(v.format(pattern), cx),
        DateEncoding::UnixSeconds => Ok(definition.encode_i64(seconds)),
        DateEncoding::UnixMillis => Ok(definition.encode_i64(
            seconds * 1000 + i64::from(v.nanosecond() / 1_000_000),
        )),
    }
}

fn decode_time(data: &Value, cx: &Context<'_>) -> Result<NaiveTime> {
    let dates = &cx.definition().format().dates;

    if let Value::String(s) = data {
        let s = s.trim();
        let pattern = match dates {
            DateEncoding::Pattern(pattern) => pattern.as_str(),
            _ => TIME,
        };
        if let Ok(time) = NaiveTime::parse_from_str(s, pattern) {
            return Ok(time);
        }
    }

    let stamp = primitive::to_u64(data).ok_or_else(|| cx.mismatch("NaiveTime", data))?;
    let (seconds, nanos) = match dates {
        DateEncoding::UnixMillis => (stamp / 1000, (stamp % 1000) * 1_000_000),
        _ => (stamp, 0),
    };

    u32::try_from(seconds)
        .ok()
        .and_then(|seconds| NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos as u32))
        .ok_or_else(|| cx.invalid(format_args!("{stamp} is no time of day")))
}

fn encode_duration(v: &Duration, cx: &Context<'_>) -> Value {
    let definition = cx.definition();
    match definition.format().dates {
        DateEncoding::UnixMillis => {
            definition.encode_u64(u64::try_from(v.as_millis()).unwrap_or(u64::MAX))
        }
        _ => definition.encode_f64(v.as_secs_f64()),
    }
}

fn decode_duration(data: &Value, cx: &Context<'_>) -> Result<Duration> {
    match cx.definition().format().dates {
        DateEncoding::UnixMillis => primitive::to_u64(data)
            .map(Duration::from_millis)
            .ok_or_else(|| cx.mismatch("Duration", data)),
        _ => {
            let seconds = primitive::to_f64(data).ok_or_else(|| cx.mismatch("Duration", data))?;
            Duration::try_from_secs_f64(seconds).map_err(|e| cx.invalid(e))
        }
    }
}

impl Processor for DateTimeProcessor {
    fn name(&self) -> &'static str {
        "datetime"
    }

    fn serialize(&self, value: &dyn Type, cx: &Context<'_>) -> Option<Result<Value>> {
        let any = value.as_any();

        if let Some(v) = any.downcast_ref::<DateTime<Utc>>() {
            return Some(encode_instant(v, cx));
        }
        if let Some(v) = any.downcast_ref::<DateTime<FixedOffset>>() {
            return Some(encode_instant(v, cx));
        }
        if let Some(v) = any.downcast_ref::<NaiveDateTime>() {
            return Some(encode_naive(v, cx));
        }
        if let Some(v) = any.downcast_ref::<NaiveDate>() {
            return Some(encode_date(v, cx));
        }
        if let Some(v) = any.downcast_ref::<NaiveTime>() {
            return Some(encode_time(v, cx));
        }
        if let Some(v) = any.downcast_ref::<Duration>() {
            return Some(Ok(encode_duration(v, cx)));
        }

        None
    }

    fn deserialize(
        &self,
        target: &mut dyn Type,
        data: &Value,
        cx: &Context<'_>,
    ) -> Option<Result<()>> {
        if let Some(slot) = target.downcast_mut::<DateTime<Utc>>() {
            return Some(decode_instant(data, cx).map(|v| *slot = v.with_timezone(&Utc)));
        }
        if let Some(slot) = target.downcast_mut::<DateTime<FixedOffset>>() {
            return Some(decode_instant(data, cx).map(|v| *slot = v));
        }
        if let Some(slot) = target.downcast_mut::<NaiveDateTime>() {
            return Some(decode_naive(data, cx).map(|v| *slot = v));
        }
        if let Some(slot) = target.downcast_mut::<NaiveDate>() {
            return Some(decode_date(data, cx).map(|v| *slot = v));
        }
        if let Some(slot) = target.downcast_mut::<NaiveTime>() {
            return Some(decode_time(data, cx).map(|v| *slot = v));
        }
        if let Some(slot) = target.downcast_mut::<Duration>() {
            return Some(decode_duration(data, cx).map(|v| *slot = v));
        }

        None
    }
}
