//! FileMan dates.
//!
//! The backend stores timestamps in FileMan format: `YYYMMDD[.HHMMSS]` where
//! `YYY` is the Gregorian year minus 1700, so `3200101` is 1 January 2020 and
//! `3200101.1425` is 14:25 on that day. The fractional time part may be
//! truncated on the wire (trailing zeros dropped); parsing pads it back out.
//!
//! [`FmDate`] keeps the parsed calendar values and converts to and from
//! chrono types at the edges. Rendering produces the backend's canonical
//! truncated form so values survive a round trip through the wire format.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// The FileMan year offset: wire year `000` is Gregorian 1700.
const FM_YEAR_BASE: i32 = 1700;

/// The largest year the three-digit wire offset can carry (`999` = 2699).
const FM_YEAR_MAX: i32 = FM_YEAR_BASE + 999;

/// Errors that can occur when parsing or constructing an [`FmDate`].
#[derive(Debug, thiserror::Error)]
pub enum FmDateError {
    /// The input was empty or contained only whitespace.
    #[error("FileMan date cannot be empty")]
    Empty,
    /// The date part was not exactly seven decimal digits.
    #[error("FileMan date part must be seven digits (YYYMMDD): {0:?}")]
    MalformedDate(String),
    /// The time part was empty, too long, or not decimal digits.
    #[error("FileMan time part must be one to six digits (HHMMSS): {0:?}")]
    MalformedTime(String),
    /// The date digits do not name a real calendar day.
    #[error("invalid calendar date: year {year}, month {month}, day {day}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    /// The time digits do not name a real time of day.
    #[error("invalid time of day: {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },
    /// The year is before the FileMan epoch and has no wire representation.
    #[error("year {0} predates the FileMan epoch (1700)")]
    BeforeEpoch(i32),
    /// The year is past the largest three-digit wire offset.
    #[error("year {0} exceeds the FileMan wire range (2699)")]
    BeyondWireRange(i32),
}

/// A FileMan date, optionally carrying a time of day.
///
/// A bare date (`3200101`) and a midnight timestamp are distinct on the wire;
/// this type preserves that distinction by keeping the time as an `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FmDate {
    date: NaiveDate,
    time: Option<NaiveTime>,
}

impl FmDate {
    /// Creates an `FmDate` carrying only a calendar date.
    ///
    /// Years outside 1700..=2699 have no wire representation and are
    /// rejected.
    pub fn from_date(date: NaiveDate) -> Result<Self, FmDateError> {
        if date.year() < FM_YEAR_BASE {
            return Err(FmDateError::BeforeEpoch(date.year()));
        }
        if date.year() > FM_YEAR_MAX {
            return Err(FmDateError::BeyondWireRange(date.year()));
        }
        Ok(Self { date, time: None })
    }

    /// Creates an `FmDate` from a full timestamp.
    ///
    /// A midnight time is normalised away so that the result renders as a
    /// bare date, matching how the backend emits such values.
    pub fn from_datetime(datetime: NaiveDateTime) -> Result<Self, FmDateError> {
        let mut value = Self::from_date(datetime.date())?;
        let time = datetime.time();
        if time != NaiveTime::MIN {
            value.time = Some(time.with_nanosecond(0).unwrap_or(time));
        }
        Ok(value)
    }

    /// Parses an `FmDate` from its wire form `YYYMMDD[.HHMMSS]`.
    ///
    /// The time part may be truncated (`.14` means 14:00:00); missing digits
    /// are treated as zeros. An all-zero time part is equivalent to no time
    /// part at all.
    pub fn parse(input: &str) -> Result<Self, FmDateError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FmDateError::Empty);
        }

        let (date_part, time_part) = match trimmed.split_once('.') {
            Some((d, t)) => (d, Some(t)),
            None => (trimmed, None),
        };

        let date = parse_date_part(date_part)?;
        let time = match time_part {
            Some(t) => parse_time_part(t)?,
            None => None,
        };

        Ok(Self { date, time })
    }

    /// Returns the calendar date.
    pub fn to_date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the full timestamp, using midnight when no time is carried.
    pub fn to_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }

    /// Returns the time of day, if the wire value carried one.
    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }
}

/// Parse the seven-digit `YYYMMDD` date part.
fn parse_date_part(part: &str) -> Result<NaiveDate, FmDateError> {
    if part.len() != 7 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FmDateError::MalformedDate(part.to_owned()));
    }

    let year = FM_YEAR_BASE + part[0..3].parse::<i32>().unwrap_or(0);
    let month = part[3..5].parse::<u32>().unwrap_or(0);
    let day = part[5..7].parse::<u32>().unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(FmDateError::InvalidDate { year, month, day })
}

/// Parse the `HHMMSS` time part, padding truncated input with zeros.
fn parse_time_part(part: &str) -> Result<Option<NaiveTime>, FmDateError> {
    if part.is_empty() || part.len() > 6 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FmDateError::MalformedTime(part.to_owned()));
    }

    let padded = format!("{part:0<6}");
    let hour = padded[0..2].parse::<u32>().unwrap_or(0);
    let minute = padded[2..4].parse::<u32>().unwrap_or(0);
    let second = padded[4..6].parse::<u32>().unwrap_or(0);

    if hour == 0 && minute == 0 && second == 0 {
        return Ok(None);
    }

    NaiveTime::from_hms_opt(hour, minute, second)
        .map(Some)
        .ok_or(FmDateError::InvalidTime {
            hour,
            minute,
            second,
        })
}

impl fmt::Display for FmDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03}{:02}{:02}",
            self.date.year() - FM_YEAR_BASE,
            self.date.month(),
            self.date.day()
        )?;

        if let Some(time) = self.time {
            let mut digits = format!("{:02}{:02}{:02}", time.hour(), time.minute(), time.second());
            // Canonical wire form drops trailing zero pairs from the time.
            while digits.len() > 2 && digits.ends_with("00") {
                digits.truncate(digits.len() - 2);
            }
            write!(f, ".{digits}")?;
        }

        Ok(())
    }
}

impl FromStr for FmDate {
    type Err = FmDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FmDate::parse(s)
    }
}

impl serde::Serialize for FmDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for FmDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FmDate::parse(&s).map_err(serde::de::Error::custom)
    }
}
