//! Weekly availability templates and bookable-slot resolution.
//!
//! A tutor publishes a recurring weekly template: weekday name → list of
//! `HH:MM-HH:MM` slots. Slots within a day are kept in template order; they
//! are not assumed to be sorted or non-overlapping.
//!
//! [`AvailabilityTemplate::bookable_slots`] projects the template onto the
//! coming seven days and drops every slot that has already started or that
//! collides with a session already booked with the tutor.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::slot::{SessionInterval, TimeSlot};
use crate::weekday::{resolve_next_date, DayOfWeek};

/// A tutor's recurring weekly schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityTemplate {
    days: BTreeMap<DayOfWeek, Vec<TimeSlot>>,
}

/// A session already booked with the tutor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSession {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl BookedSession {
    pub fn interval(&self) -> SessionInterval {
        SessionInterval {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// One (day, slot) pair that can still be booked, with its concrete interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookableSlot {
    pub day: DayOfWeek,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub interval: SessionInterval,
}

impl AvailabilityTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slot to `day`, keeping insertion order.
    pub fn with_slot(mut self, day: DayOfWeek, slot: TimeSlot) -> Self {
        self.days.entry(day).or_default().push(slot);
        self
    }

    /// Slots listed for `day`, in template order. Empty when none.
    pub fn slots_for(&self, day: DayOfWeek) -> &[TimeSlot] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the tutor offers anything on `day`.
    pub fn offers_day(&self, day: DayOfWeek) -> bool {
        !self.slots_for(day).is_empty()
    }

    /// Whether `slot` is listed for `day`.
    pub fn offers(&self, day: DayOfWeek, slot: &TimeSlot) -> bool {
        self.slots_for(day).contains(slot)
    }

    /// Days with at least one slot, in canonical order (Sunday first).
    pub fn days(&self) -> impl Iterator<Item = DayOfWeek> + '_ {
        self.days
            .iter()
            .filter(|(_, slots)| !slots.is_empty())
            .map(|(day, _)| *day)
    }

    pub fn is_empty(&self) -> bool {
        self.days().next().is_none()
    }

    /// Resolve every slot in the coming week that can still be booked.
    ///
    /// Days are visited starting from `now`'s weekday, so today's slots come
    /// first and the same weekday is never revisited next week. A slot is
    /// kept when its start is strictly after `now` and its interval overlaps
    /// no entry of `booked`.
    pub fn bookable_slots(
        &self,
        now: DateTime<Utc>,
        booked: &[BookedSession],
    ) -> Vec<BookableSlot> {
        let today = now.date_naive();
        let first = DayOfWeek::of(today);

        (0..7)
            .map(|offset| DayOfWeek::from_index(first.index() + offset))
            .flat_map(|day| {
                let date = resolve_next_date(day, today);
                self.slots_for(day).iter().map(move |slot| BookableSlot {
                    day,
                    date,
                    slot: *slot,
                    interval: slot.on_date(date),
                })
            })
            .filter(|candidate| candidate.interval.start > now)
            .filter(|candidate| {
                !booked
                    .iter()
                    .any(|session| session.interval().overlaps(&candidate.interval))
            })
            .collect()
    }
}

impl FromIterator<(DayOfWeek, TimeSlot)> for AvailabilityTemplate {
    fn from_iter<I: IntoIterator<Item = (DayOfWeek, TimeSlot)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |template, (day, slot)| template.with_slot(day, slot))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
