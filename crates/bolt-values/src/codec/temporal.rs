//! Temporal struct encoding/decoding.
//!
//! Wire layouts (all fields integers unless noted):
//!
//! | Struct | Fields |
//! |---|---|
//! | Date `D` | epoch days |
//! | LocalTime `t` | nanos of day |
//! | Time `T` | nanos of day, offset seconds |
//! | LocalDateTime `d` | epoch seconds, nanos |
//! | DateTime `I` / `F` | epoch seconds, nanos, offset seconds |
//! | DateTimeZoneId `i` / `f` | epoch seconds, nanos, zone name (string) |
//! | Duration `E` | months, days, seconds, nanos |
//!
//! `I`/`i` carry UTC epoch seconds; the legacy `F`/`f` carry the epoch
//! seconds of the local wall-clock time.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;

use crate::codec::header::{tag, write_header};
use crate::codec::primitives::{Reader, Writer};
use crate::codec::registry::StructDecoder;
use crate::codec::strategy::DateTimeEncoding;
use crate::codec::value::ValueReader;
use crate::error::{DecodeError, EncodeError};
use crate::model::{Duration, Temporal, Value};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_DAY: i64 = 86_400 * NANOS_PER_SECOND;

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAY_FROM_CE: i64 = 719_163;

// =============================================================================
// FIELD HELPERS
// =============================================================================

/// Reads an integer field whose wire domain is 32-bit.
fn read_i32_field(reader: &mut Reader<'_>, field: &'static str) -> Result<i32, DecodeError> {
    let value = reader.read_int(field)?;
    i32::try_from(value).map_err(|_| {
        DecodeError::argument(field, format!("value {} is out of range for a 32-bit integer", value))
    })
}

/// Reads the nanosecond remainder of an instant, which must be below one second.
fn read_nanos(reader: &mut Reader<'_>) -> Result<u32, DecodeError> {
    let nanos = read_i32_field(reader, "nanoseconds")?;
    if !(0..NANOS_PER_SECOND as i32).contains(&nanos) {
        return Err(DecodeError::argument(
            "nanoseconds",
            format!("value {} is outside [0, 999999999]", nanos),
        ));
    }
    Ok(nanos as u32)
}

fn read_offset(reader: &mut Reader<'_>) -> Result<FixedOffset, DecodeError> {
    let seconds = read_i32_field(reader, "tz_offset_seconds")?;
    FixedOffset::east_opt(seconds).ok_or_else(|| {
        DecodeError::argument(
            "tz_offset_seconds",
            format!("offset of {} seconds is not a valid UTC offset", seconds),
        )
    })
}

fn time_from_nano_of_day(nano_of_day: i64) -> Result<NaiveTime, DecodeError> {
    if !(0..NANOS_PER_DAY).contains(&nano_of_day) {
        return Err(DecodeError::argument(
            "nanoseconds",
            format!("nano of day {} is outside a single day", nano_of_day),
        ));
    }
    let seconds = (nano_of_day / NANOS_PER_SECOND) as u32;
    let nanos = (nano_of_day % NANOS_PER_SECOND) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos)
        .ok_or_else(|| DecodeError::argument("nanoseconds", "invalid time of day"))
}

/// Nanosecond remainder for the wire. chrono represents a leap second as a
/// remainder of one second or more, which has no wire form.
fn subsecond_nanos(nanos: u32) -> Result<i64, EncodeError> {
    let nanos = nanos as i64;
    if nanos >= NANOS_PER_SECOND {
        return Err(EncodeError::argument(
            "nanoseconds",
            format!("leap second remainder {} cannot be encoded", nanos),
        ));
    }
    Ok(nanos)
}

fn nano_of_day(time: &NaiveTime) -> Result<i64, EncodeError> {
    Ok(time.num_seconds_from_midnight() as i64 * NANOS_PER_SECOND + subsecond_nanos(time.nanosecond())?)
}

/// Interprets `(seconds, nanos)` as a point on the UTC time line.
fn instant(seconds: i64, nanos: u32) -> Result<NaiveDateTime, DecodeError> {
    DateTime::from_timestamp(seconds, nanos)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| {
            DecodeError::argument(
                "seconds",
                format!("epoch second {} is outside the supported range", seconds),
            )
        })
}

fn epoch_second(local: &NaiveDateTime) -> i64 {
    local.and_utc().timestamp()
}

// =============================================================================
// DECODING
// =============================================================================

/// Decoders for the temporal structs of one date-time encoding.
pub fn decoders(encoding: DateTimeEncoding) -> [&'static dyn StructDecoder; 7] {
    let (offset, zoned) = match encoding {
        DateTimeEncoding::Utc => (&UTC_DATE_TIME, &UTC_DATE_TIME_ZONE_ID),
        DateTimeEncoding::Local => (&LEGACY_DATE_TIME, &LEGACY_DATE_TIME_ZONE_ID),
    };
    [
        &DateDecoder,
        &TimeDecoder,
        &LocalTimeDecoder,
        &LocalDateTimeDecoder,
        offset,
        zoned,
        &DurationDecoder,
    ]
}

static UTC_DATE_TIME: DateTimeDecoder = DateTimeDecoder {
    encoding: DateTimeEncoding::Utc,
};
static LEGACY_DATE_TIME: DateTimeDecoder = DateTimeDecoder {
    encoding: DateTimeEncoding::Local,
};
static UTC_DATE_TIME_ZONE_ID: DateTimeZoneIdDecoder = DateTimeZoneIdDecoder {
    encoding: DateTimeEncoding::Utc,
};
static LEGACY_DATE_TIME_ZONE_ID: DateTimeZoneIdDecoder = DateTimeZoneIdDecoder {
    encoding: DateTimeEncoding::Local,
};

#[derive(Debug, Clone, Copy)]
pub struct DateDecoder;

impl StructDecoder for DateDecoder {
    fn tag(&self) -> u8 {
        tag::DATE
    }

    fn arity(&self) -> u16 {
        1
    }

    fn decode(&self, reader: &mut Reader<'_>, _: &ValueReader<'_>) -> Result<Value, DecodeError> {
        let days = reader.read_int("days")?;
        let date = days
            .checked_add(UNIX_EPOCH_DAY_FROM_CE)
            .and_then(|d| i32::try_from(d).ok())
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| {
                DecodeError::argument("days", format!("epoch day {} is outside the supported range", days))
            })?;
        Ok(Value::Temporal(Temporal::Date(date)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LocalTimeDecoder;

impl StructDecoder for LocalTimeDecoder {
    fn tag(&self) -> u8 {
        tag::LOCAL_TIME
    }

    fn arity(&self) -> u16 {
        1
    }

    fn decode(&self, reader: &mut Reader<'_>, _: &ValueReader<'_>) -> Result<Value, DecodeError> {
        let time = time_from_nano_of_day(reader.read_int("nanoseconds")?)?;
        Ok(Value::Temporal(Temporal::LocalTime(time)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimeDecoder;

impl StructDecoder for TimeDecoder {
    fn tag(&self) -> u8 {
        tag::TIME
    }

    fn arity(&self) -> u16 {
        2
    }

    fn decode(&self, reader: &mut Reader<'_>, _: &ValueReader<'_>) -> Result<Value, DecodeError> {
        let nanos = reader.read_int("nanoseconds")?;
        let offset = read_offset(reader)?;
        let time = time_from_nano_of_day(nanos)?;
        Ok(Value::Temporal(Temporal::Time { time, offset }))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LocalDateTimeDecoder;

impl StructDecoder for LocalDateTimeDecoder {
    fn tag(&self) -> u8 {
        tag::LOCAL_DATE_TIME
    }

    fn arity(&self) -> u16 {
        2
    }

    fn decode(&self, reader: &mut Reader<'_>, _: &ValueReader<'_>) -> Result<Value, DecodeError> {
        let seconds = reader.read_int("seconds")?;
        let nanos = read_nanos(reader)?;
        Ok(Value::Temporal(Temporal::LocalDateTime(instant(seconds, nanos)?)))
    }
}

/// Offset date-time; `encoding` selects the tag and epoch frame.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeDecoder {
    encoding: DateTimeEncoding,
}

impl StructDecoder for DateTimeDecoder {
    fn tag(&self) -> u8 {
        self.encoding.offset_tag()
    }

    fn arity(&self) -> u16 {
        3
    }

    fn decode(&self, reader: &mut Reader<'_>, _: &ValueReader<'_>) -> Result<Value, DecodeError> {
        let seconds = reader.read_int("seconds")?;
        let nanos = read_nanos(reader)?;
        let offset = read_offset(reader)?;
        let naive = instant(seconds, nanos)?;

        let value = match self.encoding {
            DateTimeEncoding::Utc => offset.from_utc_datetime(&naive),
            DateTimeEncoding::Local => offset.from_local_datetime(&naive).single().ok_or_else(|| {
                DecodeError::argument("seconds", format!("local epoch second {} overflows with offset {}", seconds, offset))
            })?,
        };
        Ok(Value::Temporal(Temporal::OffsetDateTime(value)))
    }
}

/// Zoned date-time; `encoding` selects the tag and epoch frame.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeZoneIdDecoder {
    encoding: DateTimeEncoding,
}

impl StructDecoder for DateTimeZoneIdDecoder {
    fn tag(&self) -> u8 {
        self.encoding.zone_id_tag()
    }

    fn arity(&self) -> u16 {
        3
    }

    fn decode(&self, reader: &mut Reader<'_>, values: &ValueReader<'_>) -> Result<Value, DecodeError> {
        let seconds = reader.read_int("seconds")?;
        let nanos = read_nanos(reader)?;
        let zone_name = values.read_string(reader, "tz_id")?;
        let zone: Tz = zone_name
            .parse()
            .map_err(|_| DecodeError::argument("tz_id", format!("unknown time zone {:?}", zone_name)))?;
        let naive = instant(seconds, nanos)?;

        let value = match self.encoding {
            DateTimeEncoding::Utc => zone.from_utc_datetime(&naive),
            // ambiguous wall-clock times resolve to the earlier instant
            DateTimeEncoding::Local => zone.from_local_datetime(&naive).earliest().ok_or_else(|| {
                DecodeError::argument("seconds", format!("local date-time {} does not exist in {}", naive, zone_name))
            })?,
        };
        Ok(Value::Temporal(Temporal::ZonedDateTime(value)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DurationDecoder;

impl StructDecoder for DurationDecoder {
    fn tag(&self) -> u8 {
        tag::DURATION
    }

    fn arity(&self) -> u16 {
        4
    }

    fn decode(&self, reader: &mut Reader<'_>, _: &ValueReader<'_>) -> Result<Value, DecodeError> {
        let months = reader.read_int("months")?;
        let days = reader.read_int("days")?;
        let seconds = reader.read_int("seconds")?;
        let nanos = read_i32_field(reader, "nanoseconds")?;
        Ok(Value::Temporal(Temporal::Duration(Duration::new(months, days, seconds, nanos))))
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writes a temporal value. Only date-times depend on `encoding`.
pub fn write_temporal(writer: &mut Writer, value: &Temporal, encoding: DateTimeEncoding) -> Result<(), EncodeError> {
    match value {
        Temporal::Date(date) => {
            write_header(writer, tag::DATE, 1)?;
            writer.write_int(date.num_days_from_ce() as i64 - UNIX_EPOCH_DAY_FROM_CE);
        }
        Temporal::LocalTime(time) => {
            write_header(writer, tag::LOCAL_TIME, 1)?;
            writer.write_int(nano_of_day(time)?);
        }
        Temporal::Time { time, offset } => {
            write_header(writer, tag::TIME, 2)?;
            writer.write_int(nano_of_day(time)?);
            writer.write_int(offset.local_minus_utc() as i64);
        }
        Temporal::LocalDateTime(dt) => {
            write_header(writer, tag::LOCAL_DATE_TIME, 2)?;
            writer.write_int(epoch_second(dt));
            writer.write_int(subsecond_nanos(dt.nanosecond())?);
        }
        Temporal::OffsetDateTime(dt) => {
            write_header(writer, encoding.offset_tag(), 3)?;
            write_date_time_seconds(writer, dt, encoding)?;
            writer.write_int(dt.offset().local_minus_utc() as i64);
        }
        Temporal::ZonedDateTime(dt) => {
            write_header(writer, encoding.zone_id_tag(), 3)?;
            write_date_time_seconds(writer, dt, encoding)?;
            writer.write_string(dt.timezone().name())?;
        }
        Temporal::Duration(d) => {
            write_header(writer, tag::DURATION, 4)?;
            writer.write_int(d.months);
            writer.write_int(d.days);
            writer.write_int(d.seconds);
            writer.write_int(d.nanos as i64);
        }
    }
    Ok(())
}

fn write_date_time_seconds<Z: TimeZone>(
    writer: &mut Writer,
    dt: &DateTime<Z>,
    encoding: DateTimeEncoding,
) -> Result<(), EncodeError> {
    let nanos = subsecond_nanos(dt.timestamp_subsec_nanos())?;
    let seconds = match encoding {
        DateTimeEncoding::Utc => dt.timestamp(),
        DateTimeEncoding::Local => epoch_second(&dt.naive_local()),
    };
    writer.write_int(seconds);
    writer.write_int(nanos);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::registry::StructRegistry;
    use crate::codec::strategy::WriterVariant;
    use crate::codec::value::{decode_value, encode_value};

    fn roundtrip(value: Temporal, variant: WriterVariant) -> Temporal {
        let bytes = encode_value(&Value::Temporal(value), variant).unwrap();
        match decode_value(&bytes, StructRegistry::for_parameters(variant)).unwrap() {
            Value::Temporal(t) => t,
            other => panic!("expected temporal, got {:?}", other),
        }
    }

    fn decode_raw(bytes: &[u8], variant: WriterVariant) -> Result<Value, DecodeError> {
        decode_value(bytes, StructRegistry::for_parameters(variant))
    }

    #[test]
    fn test_date_wire_format() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        let bytes = encode_value(&Value::Temporal(Temporal::Date(date)), WriterVariant::Default).unwrap();
        assert_eq!(bytes, vec![0xB1, b'D', 0x01]);

        let date = NaiveDate::from_ymd_opt(1969, 12, 31).unwrap();
        let bytes = encode_value(&Value::Temporal(Temporal::Date(date)), WriterVariant::Default).unwrap();
        assert_eq!(bytes, vec![0xB1, b'D', 0xFF]);
    }

    #[test]
    fn test_date_roundtrip() {
        for (y, m, d) in [(1970, 1, 1), (2024, 2, 29), (1, 1, 1), (9999, 12, 31), (-200, 6, 15)] {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            assert_eq!(roundtrip(Temporal::Date(date), WriterVariant::Default), Temporal::Date(date));
        }
    }

    #[test]
    fn test_date_arity_enforced() {
        // Date with two fields
        let bytes = [0xB2, b'D', 0x01, 0x02];
        assert_eq!(
            decode_raw(&bytes, WriterVariant::Default),
            Err(DecodeError::StructSize {
                tag: tag::DATE,
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_date_out_of_range() {
        let mut writer = Writer::new();
        write_header(&mut writer, tag::DATE, 1).unwrap();
        writer.write_int(i64::MAX);
        assert!(matches!(
            decode_raw(writer.as_bytes(), WriterVariant::Default),
            Err(DecodeError::StructArgument { field: "days", .. })
        ));
    }

    #[test]
    fn test_time_roundtrip() {
        let time = NaiveTime::from_hms_nano_opt(13, 45, 1, 123_456_789).unwrap();
        let offset = FixedOffset::east_opt(-5 * 3600).unwrap();
        let value = Temporal::Time { time, offset };
        assert_eq!(roundtrip(value.clone(), WriterVariant::Legacy), value);
        assert_eq!(
            roundtrip(Temporal::LocalTime(time), WriterVariant::Default),
            Temporal::LocalTime(time)
        );
    }

    #[test]
    fn test_time_offset_out_of_i32_range() {
        let mut writer = Writer::new();
        write_header(&mut writer, tag::TIME, 2).unwrap();
        writer.write_int(0);
        writer.write_int(1i64 << 31);
        assert!(matches!(
            decode_raw(writer.as_bytes(), WriterVariant::Default),
            Err(DecodeError::StructArgument { field: "tz_offset_seconds", .. })
        ));
    }

    #[test]
    fn test_time_offset_beyond_a_day() {
        let mut writer = Writer::new();
        write_header(&mut writer, tag::TIME, 2).unwrap();
        writer.write_int(0);
        writer.write_int(90_000);
        assert!(matches!(
            decode_raw(writer.as_bytes(), WriterVariant::Default),
            Err(DecodeError::StructArgument { field: "tz_offset_seconds", .. })
        ));
    }

    #[test]
    fn test_local_time_outside_day() {
        let mut writer = Writer::new();
        write_header(&mut writer, tag::LOCAL_TIME, 1).unwrap();
        writer.write_int(NANOS_PER_DAY);
        assert!(matches!(
            decode_raw(writer.as_bytes(), WriterVariant::Default),
            Err(DecodeError::StructArgument { field: "nanoseconds", .. })
        ));
    }

    #[test]
    fn test_local_date_time_roundtrip() {
        let dt = NaiveDate::from_ymd_opt(2021, 7, 4)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap();
        assert_eq!(
            roundtrip(Temporal::LocalDateTime(dt), WriterVariant::Utc),
            Temporal::LocalDateTime(dt)
        );
    }

    #[test]
    fn test_local_date_time_seconds_overflow() {
        let mut writer = Writer::new();
        write_header(&mut writer, tag::LOCAL_DATE_TIME, 2).unwrap();
        writer.write_int(i64::MAX);
        writer.write_int(0);
        assert!(matches!(
            decode_raw(writer.as_bytes(), WriterVariant::Default),
            Err(DecodeError::StructArgument { field: "seconds", .. })
        ));
    }

    #[test]
    fn test_date_time_seconds_overflow() {
        for variant in [WriterVariant::Default, WriterVariant::Legacy] {
            let encoding = variant.date_time_encoding();

            let mut writer = Writer::new();
            write_header(&mut writer, encoding.offset_tag(), 3).unwrap();
            writer.write_int(i64::MAX);
            writer.write_int(0);
            writer.write_int(3600);
            assert!(matches!(
                decode_raw(writer.as_bytes(), variant),
                Err(DecodeError::StructArgument { field: "seconds", .. })
            ));

            let mut writer = Writer::new();
            write_header(&mut writer, encoding.zone_id_tag(), 3).unwrap();
            writer.write_int(i64::MAX);
            writer.write_int(0);
            writer.write_string("Europe/Stockholm").unwrap();
            assert!(matches!(
                decode_raw(writer.as_bytes(), variant),
                Err(DecodeError::StructArgument { field: "seconds", .. })
            ));
        }
    }

    #[test]
    fn test_leap_second_rejected_on_encode() {
        let leap_time = NaiveTime::from_hms_nano_opt(23, 59, 59, 1_500_000_000).unwrap();
        let leap = NaiveDate::from_ymd_opt(2016, 12, 31).unwrap().and_time(leap_time);
        let offset = FixedOffset::east_opt(3600).unwrap();
        let zone: Tz = "Europe/Stockholm".parse().unwrap();

        let values = [
            Temporal::LocalTime(leap_time),
            Temporal::Time { time: leap_time, offset },
            Temporal::LocalDateTime(leap),
            Temporal::OffsetDateTime(offset.from_utc_datetime(&leap)),
            Temporal::ZonedDateTime(zone.from_utc_datetime(&leap)),
        ];
        for value in values {
            for variant in [WriterVariant::Default, WriterVariant::Utc, WriterVariant::Legacy] {
                assert!(
                    matches!(
                        encode_value(&Value::Temporal(value.clone()), variant),
                        Err(EncodeError::StructArgument { field: "nanoseconds", .. })
                    ),
                    "{:?} encoded with {:?}",
                    value,
                    variant
                );
            }
        }
    }

    #[test]
    fn test_offset_date_time_utc_vs_legacy_seconds() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let dt = offset.with_ymd_and_hms(1970, 1, 1, 1, 0, 0).unwrap();

        // UTC frame: 00:00 UTC is epoch second 0
        let utc = encode_value(&Value::Temporal(Temporal::OffsetDateTime(dt)), WriterVariant::Utc).unwrap();
        assert_eq!(utc, vec![0xB3, b'I', 0x00, 0x00, 0xC9, 0x0E, 0x10]);

        // local frame: 01:00 wall clock is epoch second 3600
        let legacy = encode_value(&Value::Temporal(Temporal::OffsetDateTime(dt)), WriterVariant::Legacy).unwrap();
        assert_eq!(legacy, vec![0xB3, b'F', 0xC9, 0x0E, 0x10, 0x00, 0xC9, 0x0E, 0x10]);
    }

    #[test]
    fn test_offset_date_time_roundtrip_all_variants() {
        let offset = FixedOffset::west_opt(2 * 3600 + 30 * 60).unwrap();
        let dt = offset.with_ymd_and_hms(2023, 3, 26, 2, 30, 0).unwrap();
        for variant in [WriterVariant::Default, WriterVariant::Utc, WriterVariant::Legacy] {
            let decoded = roundtrip(Temporal::OffsetDateTime(dt), variant);
            match decoded {
                Temporal::OffsetDateTime(d) => {
                    assert_eq!(d, dt);
                    assert_eq!(d.offset(), dt.offset());
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_zoned_date_time_roundtrip_all_variants() {
        let zone: Tz = "Europe/Stockholm".parse().unwrap();
        let dt = zone.with_ymd_and_hms(2022, 6, 15, 12, 0, 0).unwrap();
        for variant in [WriterVariant::Default, WriterVariant::Utc, WriterVariant::Legacy] {
            match roundtrip(Temporal::ZonedDateTime(dt), variant) {
                Temporal::ZonedDateTime(d) => {
                    assert_eq!(d, dt);
                    assert_eq!(d.timezone(), zone);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_zoned_date_time_unknown_zone() {
        let mut writer = Writer::new();
        write_header(&mut writer, tag::DATE_TIME_ZONE_ID, 3).unwrap();
        writer.write_int(0);
        writer.write_int(0);
        writer.write_string("Mars/Olympus_Mons").unwrap();
        assert!(matches!(
            decode_raw(writer.as_bytes(), WriterVariant::Default),
            Err(DecodeError::StructArgument { field: "tz_id", .. })
        ));
    }

    #[test]
    fn test_legacy_zoned_date_time_in_gap() {
        // 2023-03-26 02:30 does not exist in Stockholm
        let local = NaiveDate::from_ymd_opt(2023, 3, 26)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let mut writer = Writer::new();
        write_header(&mut writer, tag::LEGACY_DATE_TIME_ZONE_ID, 3).unwrap();
        writer.write_int(epoch_second(&local));
        writer.write_int(0);
        writer.write_string("Europe/Stockholm").unwrap();
        assert!(matches!(
            decode_raw(writer.as_bytes(), WriterVariant::Legacy),
            Err(DecodeError::StructArgument { field: "seconds", .. })
        ));
    }

    #[test]
    fn test_nanos_out_of_range() {
        let mut writer = Writer::new();
        write_header(&mut writer, tag::DATE_TIME, 3).unwrap();
        writer.write_int(0);
        writer.write_int(NANOS_PER_SECOND);
        writer.write_int(0);
        assert!(matches!(
            decode_raw(writer.as_bytes(), WriterVariant::Default),
            Err(DecodeError::StructArgument { field: "nanoseconds", .. })
        ));
    }

    #[test]
    fn test_legacy_tag_rejected_by_utc_catalog() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let dt = offset.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let legacy = encode_value(&Value::Temporal(Temporal::OffsetDateTime(dt)), WriterVariant::Legacy).unwrap();
        assert_eq!(
            decode_raw(&legacy, WriterVariant::Default),
            Err(DecodeError::UnknownStruct {
                tag: tag::LEGACY_DATE_TIME
            })
        );
    }

    #[test]
    fn test_duration_roundtrip() {
        let d = Duration::new(5, -3, 100, 0);
        assert_eq!(roundtrip(Temporal::Duration(d), WriterVariant::Default), Temporal::Duration(d));

        let d = Duration::new(i64::MIN, i64::MAX, -1, i32::MIN);
        assert_eq!(roundtrip(Temporal::Duration(d), WriterVariant::Legacy), Temporal::Duration(d));
    }

    #[test]
    fn test_duration_nanos_range() {
        let mut writer = Writer::new();
        write_header(&mut writer, tag::DURATION, 4).unwrap();
        writer.write_int(0);
        writer.write_int(0);
        writer.write_int(0);
        writer.write_int(i64::from(i32::MAX) + 1);
        assert!(matches!(
            decode_raw(writer.as_bytes(), WriterVariant::Default),
            Err(DecodeError::StructArgument { field: "nanoseconds", .. })
        ));
    }
}
