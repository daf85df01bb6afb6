//! TOML date and time values.
//!
//! TOML has four temporal literal forms, each mapped to a `chrono` type:
//!
//! | TOML form         | Example                          | chrono type              |
//! |-------------------|----------------------------------|--------------------------|
//! | offset date-time  | `1979-05-27T07:32:00-08:00`      | `DateTime<FixedOffset>`  |
//! | local date-time   | `1979-05-27T07:32:00.999`        | `NaiveDateTime`          |
//! | local date        | `1979-05-27`                     | `NaiveDate`              |
//! | local time        | `07:32:00`                       | `NaiveTime`              |
//!
//! The variant decides the form, so a value without a time component is
//! always written as a bare date. Fractional seconds are written only when
//! present, without trailing zeros.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use serde_tomlw::Datetime;
//!
//! let date = Datetime::from(NaiveDate::from_ymd_opt(1979, 5, 27).unwrap());
//! assert_eq!(date.to_string(), "1979-05-27");
//!
//! let parsed: Datetime = "1979-05-27T07:32:00Z".parse().unwrap();
//! assert!(parsed.is_offset_date_time());
//! ```

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Struct name the `toml` crate uses to smuggle datetimes through serde.
pub(crate) const DATETIME_STRUCT: &str = "$__toml_private_Datetime";
/// Field name of the single field in [`DATETIME_STRUCT`].
pub(crate) const DATETIME_FIELD: &str = "$__toml_private_datetime";

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// A TOML date, time, or date-time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Datetime {
    OffsetDateTime(DateTime<FixedOffset>),
    LocalDateTime(NaiveDateTime),
    LocalDate(NaiveDate),
    LocalTime(NaiveTime),
}

/// Error returned when a string is not one of the four TOML datetime forms.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid TOML datetime `{input}`")]
pub struct DatetimeParseError {
    input: String,
}

impl Datetime {
    #[inline]
    #[must_use]
    pub const fn is_offset_date_time(&self) -> bool {
        matches!(self, Datetime::OffsetDateTime(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_local_date_time(&self) -> bool {
        matches!(self, Datetime::LocalDateTime(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_local_date(&self) -> bool {
        matches!(self, Datetime::LocalDate(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_local_time(&self) -> bool {
        matches!(self, Datetime::LocalTime(_))
    }

    /// Checks that RFC 3339 can express this value.
    ///
    /// RFC 3339 only has four-digit years and minute-granular UTC offsets.
    pub fn check_representable(&self) -> Result<(), String> {
        let year = match self {
            Datetime::OffsetDateTime(dt) => {
                if dt.offset().local_minus_utc() % 60 != 0 {
                    return Err(format!(
                        "UTC offset {} has a seconds component",
                        dt.offset()
                    ));
                }
                Some(dt.year())
            }
            Datetime::LocalDateTime(dt) => Some(dt.year()),
            Datetime::LocalDate(date) => Some(date.year()),
            Datetime::LocalTime(_) => None,
        };
        match year {
            Some(year) if !(0..=9999).contains(&year) => {
                Err(format!("year {} is outside 0000-9999", year))
            }
            _ => Ok(()),
        }
    }
}

fn write_date<D: Datelike>(f: &mut fmt::Formatter<'_>, date: &D) -> fmt::Result {
    write!(f, "{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

fn write_time<T: Timelike>(f: &mut fmt::Formatter<'_>, time: &T) -> fmt::Result {
    // chrono stores a leap second as second 59 with nanoseconds >= 1s
    let (second, nanos) = if time.nanosecond() >= NANOS_PER_SEC {
        (time.second() + 1, time.nanosecond() - NANOS_PER_SEC)
    } else {
        (time.second(), time.nanosecond())
    };
    write!(f, "{:02}:{:02}:{:02}", time.hour(), time.minute(), second)?;
    if nanos > 0 {
        let digits = format!("{:09}", nanos);
        write!(f, ".{}", digits.trim_end_matches('0'))?;
    }
    Ok(())
}

fn write_offset(f: &mut fmt::Formatter<'_>, offset: &FixedOffset) -> fmt::Result {
    let total = offset.local_minus_utc();
    if total == 0 {
        return f.write_str("Z");
    }
    let sign = if total < 0 { '-' } else { '+' };
    let total = total.abs();
    write!(f, "{}{:02}:{:02}", sign, total / 3600, (total % 3600) / 60)?;
    if total % 60 != 0 {
        write!(f, ":{:02}", total % 60)?;
    }
    Ok(())
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datetime::OffsetDateTime(dt) => {
                write_date(f, dt)?;
                f.write_str("T")?;
                write_time(f, dt)?;
                write_offset(f, dt.offset())
            }
            Datetime::LocalDateTime(dt) => {
                write_date(f, dt)?;
                f.write_str("T")?;
                write_time(f, dt)
            }
            Datetime::LocalDate(date) => write_date(f, date),
            Datetime::LocalTime(time) => write_time(f, time),
        }
    }
}

impl FromStr for Datetime {
    type Err = DatetimeParseError;

    /// Parses any of the four TOML datetime forms. The date/time separator
    /// may be `T`, `t` or a space, as in TOML.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DatetimeParseError {
            input: s.to_string(),
        };

        let mut normalized = s.trim().to_string();
        if normalized.len() > 10 && normalized.is_char_boundary(10) {
            let separator = normalized[10..].chars().next();
            if let Some(' ' | 't') = separator {
                normalized.replace_range(10..11, "T");
            }
        }
        if normalized.ends_with('z') {
            normalized.pop();
            normalized.push('Z');
        }

        if normalized.contains('T') {
            let time_part = normalized.get(10..).unwrap_or("");
            let has_offset = normalized.ends_with('Z')
                || time_part.contains('+')
                || time_part.contains('-');
            if has_offset {
                DateTime::parse_from_rfc3339(&normalized)
                    .map(Datetime::OffsetDateTime)
                    .map_err(|_| err())
            } else {
                NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(Datetime::LocalDateTime)
                    .map_err(|_| err())
            }
        } else if normalized.contains(':') {
            NaiveTime::parse_from_str(&normalized, "%H:%M:%S%.f")
                .map(Datetime::LocalTime)
                .map_err(|_| err())
        } else {
            NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                .map(Datetime::LocalDate)
                .map_err(|_| err())
        }
    }
}

impl From<DateTime<FixedOffset>> for Datetime {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Datetime::OffsetDateTime(value)
    }
}

impl From<DateTime<Utc>> for Datetime {
    fn from(value: DateTime<Utc>) -> Self {
        Datetime::OffsetDateTime(value.fixed_offset())
    }
}

impl From<NaiveDateTime> for Datetime {
    fn from(value: NaiveDateTime) -> Self {
        Datetime::LocalDateTime(value)
    }
}

impl From<NaiveDate> for Datetime {
    fn from(value: NaiveDate) -> Self {
        Datetime::LocalDate(value)
    }
}

impl From<NaiveTime> for Datetime {
    fn from(value: NaiveTime) -> Self {
        Datetime::LocalTime(value)
    }
}

// Serialized the way the `toml` crate serializes its own datetimes, so both
// this crate's serializer and `toml` recognise it as a datetime, not a string.
impl Serialize for Datetime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct(DATETIME_STRUCT, 1)?;
        s.serialize_field(DATETIME_FIELD, &self.to_string())?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for Datetime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DatetimeVisitor;

        impl<'de> Visitor<'de> for DatetimeVisitor {
            type Value = Datetime;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a TOML datetime")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Datetime, E> {
                value.parse().map_err(E::custom)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Datetime, A::Error>
            where
                A: MapAccess<'de>,
            {
                match map.next_key::<String>()? {
                    Some(key) if key == DATETIME_FIELD => {
                        let raw: String = map.next_value()?;
                        raw.parse().map_err(de::Error::custom)
                    }
                    _ => Err(de::Error::custom("expected a TOML datetime")),
                }
            }
        }

        deserializer.deserialize_any(DatetimeVisitor)
    }
}
