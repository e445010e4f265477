//! Temporal value types.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

/// An amount of time split into calendar and clock components.
///
/// Components are independent; no normalization between them happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Duration {
    pub months: i64,
    pub days: i64,
    pub seconds: i64,
    pub nanos: i32,
}

impl Duration {
    pub fn new(months: i64, days: i64, seconds: i64, nanos: i32) -> Self {
        Self {
            months,
            days,
            seconds,
            nanos,
        }
    }
}

/// A date, time, date-time or duration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Temporal {
    /// Calendar date without a time zone.
    Date(NaiveDate),

    /// Time of day without a time zone.
    LocalTime(NaiveTime),

    /// Time of day with a fixed UTC offset.
    Time { time: NaiveTime, offset: FixedOffset },

    /// Date and time without a time zone.
    LocalDateTime(NaiveDateTime),

    /// Instant with a fixed UTC offset.
    OffsetDateTime(DateTime<FixedOffset>),

    /// Instant in a named time zone.
    ZonedDateTime(DateTime<Tz>),

    Duration(Duration),
}

impl Temporal {
    /// Returns a short name of the temporal kind for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Temporal::Date(_) => "Date",
            Temporal::LocalTime(_) => "LocalTime",
            Temporal::Time { .. } => "Time",
            Temporal::LocalDateTime(_) => "LocalDateTime",
            Temporal::OffsetDateTime(_) => "OffsetDateTime",
            Temporal::ZonedDateTime(_) => "ZonedDateTime",
            Temporal::Duration(_) => "Duration",
        }
    }
}

impl From<NaiveDate> for Temporal {
    fn from(value: NaiveDate) -> Self {
        Temporal::Date(value)
    }
}

impl From<NaiveTime> for Temporal {
    fn from(value: NaiveTime) -> Self {
        Temporal::LocalTime(value)
    }
}

impl From<NaiveDateTime> for Temporal {
    fn from(value: NaiveDateTime) -> Self {
        Temporal::LocalDateTime(value)
    }
}

impl From<DateTime<FixedOffset>> for Temporal {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Temporal::OffsetDateTime(value)
    }
}

impl From<DateTime<Tz>> for Temporal {
    fn from(value: DateTime<Tz>) -> Self {
        Temporal::ZonedDateTime(value)
    }
}

impl From<Duration> for Temporal {
    fn from(value: Duration) -> Self {
        Temporal::Duration(value)
    }
}
