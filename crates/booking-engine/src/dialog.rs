//! The booking dialog controller.
//!
//! [`BookingDialog`] owns one [`BookingDraft`] for the lifetime of the dialog
//! and is the boundary where every failure becomes a [`Notification`] for the
//! user. Nothing past this point returns a [`BookingError`].
//!
//! Submission is guarded by an in-flight flag: while one booking request is
//! awaiting the backend, further submissions are rejected without touching
//! the network. A failed submission leaves the draft as it was so the user
//! can retry without re-selecting day, time and purpose.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::api::BookingApi;
use crate::availability::{BookableSlot, BookedSession};
use crate::clock::Clock;
use crate::draft::{BookingDraft, DraftStage};
use crate::error::BookingError;
use crate::slot::TimeSlot;
use crate::tutor::Tutor;
use crate::weekday::DayOfWeek;

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    /// The user's input was incomplete or not offered; nothing was sent.
    Validation,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&BookingError> for Notification {
    fn from(err: &BookingError) -> Self {
        let (kind, message) = match err {
            BookingError::IncompleteDraft("purpose") => (
                NotificationKind::Validation,
                "Please describe the purpose of the session before booking.".to_string(),
            ),
            BookingError::IncompleteDraft(field) => (
                NotificationKind::Validation,
                format!("Please choose a {field} before booking."),
            ),
            BookingError::SubmissionInFlight => (
                NotificationKind::Info,
                "Your booking is already being submitted.".to_string(),
            ),
            BookingError::Transport(_) => (
                NotificationKind::Error,
                "Could not reach the booking service. Please try again.".to_string(),
            ),
            BookingError::Service { message, .. } => {
                (NotificationKind::Error, format!("Booking failed: {message}"))
            }
            BookingError::MissingPaymentRedirect => (
                NotificationKind::Error,
                "Booking failed: no payment link was returned. Please try again.".to_string(),
            ),
            other if other.is_validation() => (NotificationKind::Validation, other.to_string()),
            other => (NotificationKind::Error, other.to_string()),
        };
        Notification { kind, message }
    }
}

/// Clears the in-flight flag when the submission finishes, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn begin(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct BookingDialog<A, C> {
    api: A,
    clock: C,
    draft: Mutex<BookingDraft>,
    submitting: AtomicBool,
}

impl<A: BookingApi, C: Clock> BookingDialog<A, C> {
    pub fn new(api: A, clock: C) -> Self {
        Self {
            api,
            clock,
            draft: Mutex::new(BookingDraft::Idle),
            submitting: AtomicBool::new(false),
        }
    }

    /// Fetch the tutor listing.
    pub async fn load_tutors(&self) -> Result<Vec<Tutor>, Notification> {
        self.api.fetch_tutors().await.map_err(|e| {
            warn!(error = %e, "failed to load tutors");
            Notification::from(&e)
        })
    }

    /// Open the dialog for `tutor`, starting a fresh draft.
    pub fn open(&self, tutor: Tutor) {
        self.draft.lock().select_tutor(tutor);
    }

    /// Snapshot of the current draft.
    pub fn draft(&self) -> BookingDraft {
        self.draft.lock().clone()
    }

    pub fn stage(&self) -> DraftStage {
        self.draft.lock().stage()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Whether the "Book Session" control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.draft.lock().can_submit()
    }

    /// Slots of the selected tutor that can still be booked, given the
    /// sessions already taken.
    pub fn bookable_slots(&self, booked: &[BookedSession]) -> Vec<BookableSlot> {
        self.draft
            .lock()
            .tutor()
            .map(|tutor| tutor.availability.bookable_slots(self.clock.now(), booked))
            .unwrap_or_default()
    }

    /// Choose a weekday; returns the date it resolved to.
    pub fn choose_day(&self, day: DayOfWeek) -> Result<NaiveDate, Notification> {
        let today = self.clock.today();
        self.draft
            .lock()
            .choose_day(day, today)
            .map_err(|e| Notification::from(&e))
    }

    pub fn choose_slot(&self, slot: TimeSlot) -> Result<(), Notification> {
        self.draft
            .lock()
            .choose_slot_at(slot, self.clock.now())
            .map_err(|e| Notification::from(&e))
    }

    pub fn set_purpose(&self, text: impl Into<String>) -> Result<(), Notification> {
        self.draft
            .lock()
            .set_purpose(text)
            .map_err(|e| Notification::from(&e))
    }

    /// Close the dialog without booking. Returns whether a draft was open.
    pub fn cancel(&self) -> bool {
        self.draft.lock().cancel()
    }

    /// Submit the draft.
    ///
    /// On success the submitted draft is discarded and the payment redirect
    /// URL is returned for the caller to navigate to. A draft the user started
    /// while the request was pending is left alone. Incomplete drafts and
    /// slots that have already started are rejected locally; backend failures
    /// and responses without a redirect URL leave the draft intact.
    pub async fn submit(&self) -> Result<String, Notification> {
        let Some(_guard) = InFlight::begin(&self.submitting) else {
            return Err(Notification::from(&BookingError::SubmissionInFlight));
        };

        let request = self
            .draft
            .lock()
            .finalize_at(self.clock.now())
            .map_err(|e| Notification::from(&e))?;

        info!(
            tutor_id = %request.tutor_id,
            start = %request.start_time,
            end = %request.end_time,
            "submitting booking"
        );

        let result = self
            .api
            .submit_booking(&request)
            .await
            .and_then(|confirmation| confirmation.into_redirect_url());

        match result {
            Ok(url) => {
                let mut draft = self.draft.lock();
                if draft.finalize().is_ok_and(|current| current == request) {
                    draft.cancel();
                }
                drop(draft);
                info!(tutor_id = %request.tutor_id, "booking submitted");
                Ok(url)
            }
            Err(e) => {
                warn!(error = %e, tutor_id = %request.tutor_id, "booking failed; draft kept");
                Err(Notification::from(&e))
            }
        }
    }
}
