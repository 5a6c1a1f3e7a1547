//! Calendar day - the key daily quotas reset on
//!
//! A day is derived from a UTC instant through a [`DayBoundary`]: either the
//! process-local timezone or a fixed UTC offset (UTC+8 by default).

use chrono::{DateTime, Days, FixedOffset, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar date used as the quota key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    #[inline]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year/month/day, `None` if the date does not exist
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    #[inline]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// The day `n` days earlier (saturates at the minimum date)
    pub fn days_before(self, n: u32) -> Self {
        Self(
            self.0
                .checked_sub_days(Days::new(u64::from(n)))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// The following day (saturates at the maximum date)
    pub fn next(self) -> Self {
        Self(self.0.succ_opt().unwrap_or(NaiveDate::MAX))
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// How instants are mapped onto calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBoundary {
    /// Use the process-local timezone
    Local,
    /// Use a fixed offset east of UTC
    Fixed(FixedOffset),
}

impl DayBoundary {
    /// UTC+8, the boundary used by the shared board
    pub fn utc_plus_8() -> Self {
        Self::from_offset_seconds(8 * 3600).unwrap_or(Self::Local)
    }

    /// Fixed offset in seconds east of UTC, `None` if out of range
    pub fn from_offset_seconds(seconds: i32) -> Option<Self> {
        FixedOffset::east_opt(seconds).map(Self::Fixed)
    }

    /// Calendar day the given instant falls on
    pub fn day_of(&self, instant: DateTime<Utc>) -> CalendarDay {
        match self {
            Self::Local => CalendarDay(instant.with_timezone(&Local).date_naive()),
            Self::Fixed(offset) => CalendarDay(instant.with_timezone(offset).date_naive()),
        }
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc_plus_8()
    }
}

impl fmt::Display for DayBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

/// Error when parsing a day boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid day boundary '{0}', expected 'local', 'utc' or an offset like '+08:00'")]
pub struct DayBoundaryParseError(pub String);

impl std::str::FromStr for DayBoundary {
    type Err = DayBoundaryParseError;

    /// Accepts `local`, `utc`, or `±HH:MM` / `±HH`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let err = || DayBoundaryParseError(value.to_string());

        match value.to_ascii_lowercase().as_str() {
            "local" => return Ok(Self::Local),
            "utc" | "z" => return Self::from_offset_seconds(0).ok_or_else(err),
            _ => {}
        }

        let (sign, rest) = match value.as_bytes().first() {
            Some(b'+') => (1, &value[1..]),
            Some(b'-') => (-1, &value[1..]),
            _ => return Err(err()),
        };
        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None => (rest, "0"),
        };
        let hours: i32 = hours.parse().map_err(|_| err())?;
        let minutes: i32 = minutes.parse().map_err(|_| err())?;
        if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
            return Err(err());
        }

        Self::from_offset_seconds(sign * (hours * 3600 + minutes * 60)).ok_or_else(err)
    }
}
