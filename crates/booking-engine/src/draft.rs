//! The booking draft: one in-progress selection of day, slot and purpose.
//!
//! The draft is a single tagged value. Each stage carries exactly the fields
//! that are meaningful in it, so moving back to an earlier stage drops the
//! downstream selections by construction:
//!
//! ```text
//! Idle ─select_tutor─▶ DaySelection ─choose_day─▶ TimeSelection ─choose_slot─▶ PurposeEntry
//!                                       ▲  choose_day                             │  ▲
//!                                       └──────────────────────────────────────────┤  │ empty
//!                                                                        non-empty ▼  │ purpose
//!                                                                                 Ready ─finalize─▶ SessionRequest
//! ```
//!
//! `cancel` from any stage returns to `Idle`.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::error::{BookingError, Result};
use crate::request::SessionRequest;
use crate::slot::TimeSlot;
use crate::tutor::Tutor;
use crate::weekday::{resolve_next_date, DayOfWeek};

/// Where a draft stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStage {
    Idle,
    DaySelection,
    TimeSelection,
    PurposeEntry,
    Ready,
}

impl DraftStage {
    pub fn as_str(self) -> &'static str {
        match self {
            DraftStage::Idle => "idle",
            DraftStage::DaySelection => "selecting a day",
            DraftStage::TimeSelection => "selecting a time",
            DraftStage::PurposeEntry => "entering a purpose",
            DraftStage::Ready => "ready",
        }
    }
}

impl fmt::Display for DraftStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-progress booking selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BookingDraft {
    #[default]
    Idle,
    DaySelection {
        tutor: Tutor,
    },
    TimeSelection {
        tutor: Tutor,
        day: DayOfWeek,
        date: NaiveDate,
    },
    PurposeEntry {
        tutor: Tutor,
        day: DayOfWeek,
        date: NaiveDate,
        slot: TimeSlot,
        /// Text typed so far; blank in this stage.
        purpose: String,
    },
    Ready {
        tutor: Tutor,
        day: DayOfWeek,
        date: NaiveDate,
        slot: TimeSlot,
        purpose: String,
    },
}

impl BookingDraft {
    pub fn stage(&self) -> DraftStage {
        match self {
            BookingDraft::Idle => DraftStage::Idle,
            BookingDraft::DaySelection { .. } => DraftStage::DaySelection,
            BookingDraft::TimeSelection { .. } => DraftStage::TimeSelection,
            BookingDraft::PurposeEntry { .. } => DraftStage::PurposeEntry,
            BookingDraft::Ready { .. } => DraftStage::Ready,
        }
    }

    /// Whether the "Book Session" control may be enabled.
    pub fn can_submit(&self) -> bool {
        self.stage() == DraftStage::Ready
    }

    pub fn tutor(&self) -> Option<&Tutor> {
        match self {
            BookingDraft::Idle => None,
            BookingDraft::DaySelection { tutor }
            | BookingDraft::TimeSelection { tutor, .. }
            | BookingDraft::PurposeEntry { tutor, .. }
            | BookingDraft::Ready { tutor, .. } => Some(tutor),
        }
    }

    pub fn day(&self) -> Option<DayOfWeek> {
        self.day_and_date().map(|(day, _)| day)
    }

    /// The concrete date the chosen weekday resolved to.
    pub fn date(&self) -> Option<NaiveDate> {
        self.day_and_date().map(|(_, date)| date)
    }

    pub fn slot(&self) -> Option<TimeSlot> {
        match self {
            BookingDraft::PurposeEntry { slot, .. } | BookingDraft::Ready { slot, .. } => {
                Some(*slot)
            }
            _ => None,
        }
    }

    pub fn purpose(&self) -> Option<&str> {
        match self {
            BookingDraft::PurposeEntry { purpose, .. } | BookingDraft::Ready { purpose, .. } => {
                Some(purpose)
            }
            _ => None,
        }
    }

    fn day_and_date(&self) -> Option<(DayOfWeek, NaiveDate)> {
        match self {
            BookingDraft::TimeSelection { day, date, .. }
            | BookingDraft::PurposeEntry { day, date, .. }
            | BookingDraft::Ready { day, date, .. } => Some((*day, *date)),
            _ => None,
        }
    }

    fn into_tutor(self) -> Option<Tutor> {
        match self {
            BookingDraft::Idle => None,
            BookingDraft::DaySelection { tutor }
            | BookingDraft::TimeSelection { tutor, .. }
            | BookingDraft::PurposeEntry { tutor, .. }
            | BookingDraft::Ready { tutor, .. } => Some(tutor),
        }
    }

    fn invalid(&self, action: &'static str) -> BookingError {
        BookingError::InvalidTransition {
            action,
            stage: self.stage().as_str(),
        }
    }

    /// Start a draft for `tutor`, discarding any previous selection.
    pub fn select_tutor(&mut self, tutor: Tutor) {
        debug!(tutor_id = %tutor.id, "booking draft: tutor selected");
        *self = BookingDraft::DaySelection { tutor };
    }

    /// Choose a weekday and resolve it against `today`.
    ///
    /// Clears any slot and purpose chosen earlier. Returns the resolved date.
    ///
    /// # Errors
    ///
    /// [`BookingError::InvalidTransition`] when no tutor is selected;
    /// [`BookingError::DayUnavailable`] when the tutor offers nothing that day.
    pub fn choose_day(&mut self, day: DayOfWeek, today: NaiveDate) -> Result<NaiveDate> {
        let tutor = self.tutor().ok_or_else(|| self.invalid("choose a day"))?;
        if !tutor.availability.offers_day(day) {
            return Err(BookingError::DayUnavailable(day.to_string()));
        }
        let date = resolve_next_date(day, today);
        let tutor = std::mem::take(self)
            .into_tutor()
            .ok_or_else(|| self.invalid("choose a day"))?;
        debug!(%day, %date, "booking draft: day chosen");
        *self = BookingDraft::TimeSelection { tutor, day, date };
        Ok(date)
    }

    /// Choose one of the slots the tutor lists for the chosen day.
    ///
    /// Clears any purpose typed earlier.
    ///
    /// # Errors
    ///
    /// [`BookingError::InvalidTransition`] before a day is chosen;
    /// [`BookingError::SlotUnavailable`] when the slot is not listed.
    pub fn choose_slot(&mut self, slot: TimeSlot) -> Result<()> {
        self.select_slot(slot, None)
    }

    /// [`choose_slot`](Self::choose_slot), rejecting a slot that has already
    /// started at `now` on the resolved date.
    ///
    /// # Errors
    ///
    /// [`BookingError::SlotInPast`] when the slot's start is not after `now`,
    /// plus everything [`choose_slot`](Self::choose_slot) returns.
    pub fn choose_slot_at(&mut self, slot: TimeSlot, now: DateTime<Utc>) -> Result<()> {
        self.select_slot(slot, Some(now))
    }

    fn select_slot(&mut self, slot: TimeSlot, now: Option<DateTime<Utc>>) -> Result<()> {
        let (day, date) = self
            .day_and_date()
            .ok_or_else(|| self.invalid("choose a slot"))?;
        let offered = self
            .tutor()
            .is_some_and(|tutor| tutor.availability.offers(day, &slot));
        if !offered {
            return Err(BookingError::SlotUnavailable {
                day: day.to_string(),
                slot: slot.to_string(),
            });
        }
        if let Some(now) = now {
            ensure_upcoming(&slot, date, now)?;
        }
        let tutor = std::mem::take(self)
            .into_tutor()
            .ok_or_else(|| self.invalid("choose a slot"))?;
        debug!(%day, %slot, "booking draft: slot chosen");
        *self = BookingDraft::PurposeEntry {
            tutor,
            day,
            date,
            slot,
            purpose: String::new(),
        };
        Ok(())
    }

    /// Update the purpose text. Non-blank text makes the draft ready; blank
    /// text returns it to purpose entry.
    ///
    /// # Errors
    ///
    /// [`BookingError::InvalidTransition`] before a slot is chosen.
    pub fn set_purpose(&mut self, text: impl Into<String>) -> Result<()> {
        let (day, date) = self
            .day_and_date()
            .ok_or_else(|| self.invalid("enter a purpose"))?;
        let slot = self.slot().ok_or_else(|| self.invalid("enter a purpose"))?;
        let tutor = std::mem::take(self)
            .into_tutor()
            .ok_or_else(|| self.invalid("enter a purpose"))?;
        let purpose = text.into();
        *self = if purpose.trim().is_empty() {
            BookingDraft::PurposeEntry {
                tutor,
                day,
                date,
                slot,
                purpose,
            }
        } else {
            BookingDraft::Ready {
                tutor,
                day,
                date,
                slot,
                purpose,
            }
        };
        Ok(())
    }

    /// Build the session request from a ready draft.
    ///
    /// # Errors
    ///
    /// [`BookingError::IncompleteDraft`] naming the first missing field when
    /// the draft is not ready. No request is built in that case.
    pub fn finalize(&self) -> Result<SessionRequest> {
        match self {
            BookingDraft::Ready {
                tutor,
                date,
                slot,
                purpose,
                ..
            } => Ok(SessionRequest::new(
                tutor.id.clone(),
                purpose.trim(),
                slot.on_date(*date),
            )),
            BookingDraft::Idle => Err(BookingError::IncompleteDraft("tutor")),
            BookingDraft::DaySelection { .. } => Err(BookingError::IncompleteDraft("day")),
            BookingDraft::TimeSelection { .. } => Err(BookingError::IncompleteDraft("slot")),
            BookingDraft::PurposeEntry { .. } => Err(BookingError::IncompleteDraft("purpose")),
        }
    }

    /// [`finalize`](Self::finalize), rejecting a request whose start is not
    /// after `now`. Same-day slots go stale while the dialog is open.
    pub fn finalize_at(&self, now: DateTime<Utc>) -> Result<SessionRequest> {
        let request = self.finalize()?;
        if let (Some(date), Some(slot)) = (self.date(), self.slot()) {
            ensure_upcoming(&slot, date, now)?;
        }
        Ok(request)
    }

    /// Discard the draft. Returns whether there was anything to discard.
    pub fn cancel(&mut self) -> bool {
        let active = self.stage() != DraftStage::Idle;
        if active {
            debug!(stage = %self.stage(), "booking draft: cancelled");
        }
        *self = BookingDraft::Idle;
        active
    }
}

fn ensure_upcoming(slot: &TimeSlot, date: NaiveDate, now: DateTime<Utc>) -> Result<()> {
    if slot.on_date(date).start <= now {
        return Err(BookingError::SlotInPast(format!("{slot} on {date}")));
    }
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────────────
