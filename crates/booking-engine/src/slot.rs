//! Time-slot parsing and slot-to-interval conversion.
//!
//! A slot is written `HH:MM-HH:MM` (24-hour, zero-padded). The digits are
//! UTC wall-clock: tutor availability is defined in UTC, so converting a
//! slot on a calendar date involves no timezone arithmetic.
//!
//! # Overnight slots
//!
//! A slot whose end is earlier than its start (`"23:00-01:00"`) crosses
//! midnight. The end instant is rolled forward to the following day so the
//! interval always runs forward in time. A slot whose end equals its start
//! names no interval and is rejected as invalid availability data.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BookingError;

/// A bookable time range within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    /// Build a slot from its endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidSlot`] when `start == end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, BookingError> {
        if start == end {
            return Err(BookingError::InvalidSlot(format!(
                "'{}' has zero length",
                format_slot(start, end)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether the slot crosses midnight (end earlier than start).
    pub fn is_overnight(&self) -> bool {
        self.end < self.start
    }

    /// Convert the slot on `date` into an absolute UTC interval.
    ///
    /// The start is `date` at the slot's start time. The end is `date` at the
    /// slot's end time, or the following day for an overnight slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use booking_engine::slot::TimeSlot;
    /// use chrono::NaiveDate;
    ///
    /// let slot: TimeSlot = "09:00-10:30".parse().unwrap();
    /// let interval = slot.on_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    /// assert_eq!(interval.start.to_rfc3339(), "2024-03-15T09:00:00+00:00");
    /// assert_eq!(interval.end.to_rfc3339(), "2024-03-15T10:30:00+00:00");
    /// ```
    pub fn on_date(&self, date: NaiveDate) -> SessionInterval {
        let start = Utc.from_utc_datetime(&date.and_time(self.start));
        let end_date = if self.is_overnight() {
            date + chrono::Duration::days(1)
        } else {
            date
        };
        let end = Utc.from_utc_datetime(&end_date.and_time(self.end));
        SessionInterval { start, end }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_slot(self.start, self.end))
    }
}

impl FromStr for TimeSlot {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 2 {
            return Err(BookingError::InvalidSlot(format!(
                "'{s}': expected exactly one '-' between two HH:MM times"
            )));
        }
        let start = parse_hhmm(parts[0])
            .ok_or_else(|| BookingError::InvalidSlot(format!("'{s}': bad start time")))?;
        let end = parse_hhmm(parts[1])
            .ok_or_else(|| BookingError::InvalidSlot(format!("'{s}': bad end time")))?;
        TimeSlot::new(start, end)
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// An absolute UTC time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SessionInterval {
    /// Whether two half-open intervals share any instant.
    pub fn overlaps(&self, other: &SessionInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// Start as an ISO-8601 UTC string with millisecond precision.
    pub fn start_iso(&self) -> String {
        format_instant(&self.start)
    }

    /// End as an ISO-8601 UTC string with millisecond precision.
    pub fn end_iso(&self) -> String {
        format_instant(&self.end)
    }
}

/// Format an instant as `YYYY-MM-DDTHH:MM:SS.sssZ`, the form the booking
/// backend expects.
pub fn format_instant(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn format_slot(start: NaiveTime, end: NaiveTime) -> String {
    format!(
        "{:02}:{:02}-{:02}:{:02}",
        start.hour(),
        start.minute(),
        end.hour(),
        end.minute()
    )
}

/// Parse a strict `HH:MM` token: two digits, colon, two digits.
fn parse_hhmm(token: &str) -> Option<NaiveTime> {
    let bytes = token.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let hour = u32::from(digits[0] - b'0') * 10 + u32::from(digits[1] - b'0');
    let minute = u32::from(digits[2] - b'0') * 10 + u32::from(digits[3] - b'0');
    if hour > 23 || minute > 59 {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

// ── Tests ───────────────────────────────────────────────────────────────────
