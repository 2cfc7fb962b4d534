//! The booking payload sent to the backend and the response it returns.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::BookingError;
use crate::slot::{format_instant, SessionInterval};
use crate::tutor::TutorId;

/// A finalized, submittable booking.
///
/// Only [`crate::draft::BookingDraft::finalize`] builds one from user input,
/// and only once day, slot and purpose are all present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub tutor_id: TutorId,
    pub purpose: String,
    #[serde(serialize_with = "serialize_instant")]
    pub start_time: DateTime<Utc>,
    #[serde(serialize_with = "serialize_instant")]
    pub end_time: DateTime<Utc>,
}

fn serialize_instant<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_instant(dt))
}

impl SessionRequest {
    pub fn new(tutor_id: TutorId, purpose: impl Into<String>, interval: SessionInterval) -> Self {
        Self {
            tutor_id,
            purpose: purpose.into(),
            start_time: interval.start,
            end_time: interval.end,
        }
    }

    pub fn interval(&self) -> SessionInterval {
        SessionInterval {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Human-readable confirmation of the session in the student's timezone,
    /// e.g. `"Friday, March 15, 2024, 3:00 PM to 4:00 PM GMT"`.
    pub fn summary_in(&self, tz: Tz) -> String {
        let start = self.start_time.with_timezone(&tz);
        let end = self.end_time.with_timezone(&tz);
        let end_fmt = if start.date_naive() == end.date_naive() {
            "%-I:%M %p %Z"
        } else {
            "%A, %B %-d, %-I:%M %p %Z"
        };
        format!(
            "{} to {}",
            start.format("%A, %B %-d, %Y, %-I:%M %p"),
            end.format(end_fmt)
        )
    }
}

/// Backend response to a booking submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    #[serde(default)]
    pub payment_redirect_url: Option<String>,
}

impl BookingConfirmation {
    /// The URL the caller must navigate to for payment.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::MissingPaymentRedirect`] when the field is
    /// absent or blank: a nominally successful response without it is a
    /// failed booking.
    pub fn into_redirect_url(self) -> Result<String, BookingError> {
        match self.payment_redirect_url {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => Err(BookingError::MissingPaymentRedirect),
        }
    }
}
