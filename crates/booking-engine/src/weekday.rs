//! Weekday identifiers and next-occurrence date resolution.
//!
//! Availability templates key their slots by lowercase English weekday names.
//! [`DayOfWeek`] is the closed set of those names, mapped through one
//! exhaustive table so that an unrecognized key is an error instead of a
//! silent miss.
//!
//! [`resolve_next_date`] takes "today" as an explicit argument. Nothing in
//! this module reads the system clock; see [`crate::clock`] for that.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BookingError;

/// A canonical weekday identifier.
///
/// Variants are declared in canonical order (Sunday = 0 … Saturday = 6), so
/// the derived `Ord` sorts days the way the availability UI lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

/// Name, variant, and chrono weekday for every day, in canonical order.
const DAY_TABLE: [(&str, DayOfWeek, Weekday); 7] = [
    ("sunday", DayOfWeek::Sunday, Weekday::Sun),
    ("monday", DayOfWeek::Monday, Weekday::Mon),
    ("tuesday", DayOfWeek::Tuesday, Weekday::Tue),
    ("wednesday", DayOfWeek::Wednesday, Weekday::Wed),
    ("thursday", DayOfWeek::Thursday, Weekday::Thu),
    ("friday", DayOfWeek::Friday, Weekday::Fri),
    ("saturday", DayOfWeek::Saturday, Weekday::Sat),
];

impl DayOfWeek {
    /// All seven days in canonical order.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    /// Zero-based index in canonical order (Sunday = 0 … Saturday = 6).
    pub fn index(self) -> u32 {
        self as u32
    }

    /// The lowercase identifier used in availability templates.
    pub fn as_str(self) -> &'static str {
        DAY_TABLE[self.index() as usize].0
    }

    /// Build from a zero-based canonical index, wrapping modulo 7.
    pub fn from_index(index: u32) -> Self {
        DAY_TABLE[(index % 7) as usize].1
    }

    /// The matching [`chrono::Weekday`].
    pub fn to_chrono(self) -> Weekday {
        DAY_TABLE[self.index() as usize].2
    }

    /// The day following this one, wrapping Saturday to Sunday.
    pub fn succ(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The weekday a calendar date falls on.
    pub fn of(date: NaiveDate) -> Self {
        DayOfWeek::from(date.weekday())
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        Self::from_index(weekday.num_days_from_sunday())
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = BookingError;

    /// Parse one of the seven canonical names. Case and surrounding
    /// whitespace are normalized; abbreviations are not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        DAY_TABLE
            .iter()
            .find(|(name, _, _)| *name == normalized)
            .map(|(_, day, _)| *day)
            .ok_or_else(|| BookingError::InvalidWeekday(format!("'{}'", s.trim())))
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DayOfWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Resolve the next calendar date, inclusive of `today`, that falls on `day`.
///
/// When `today` already is `day`, `today` is returned: same-day booking is
/// allowed. Whether a slot later today has already started is not checked
/// here; [`crate::availability::AvailabilityTemplate::bookable_slots`] does that.
///
/// # Examples
///
/// ```
/// use booking_engine::weekday::{resolve_next_date, DayOfWeek};
/// use chrono::NaiveDate;
///
/// // 2024-03-13 is a Wednesday.
/// let today = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
/// let friday = resolve_next_date(DayOfWeek::Friday, today);
/// assert_eq!(friday, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
/// ```
pub fn resolve_next_date(day: DayOfWeek, today: NaiveDate) -> NaiveDate {
    let mut delta = day.index() as i64 - DayOfWeek::of(today).index() as i64;
    if delta < 0 {
        delta += 7;
    }
    today + chrono::Duration::days(delta)
}

// ── Tests ───────────────────────────────────────────────────────────────────
