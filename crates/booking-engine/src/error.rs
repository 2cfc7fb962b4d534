//! Error types for booking-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Invalid slot: {0}")]
    InvalidSlot(String),

    #[error("Day unavailable: tutor offers no slots on {0}")]
    DayUnavailable(String),

    #[error("Slot unavailable: {slot} is not offered on {day}")]
    SlotUnavailable { day: String, slot: String },

    #[error("Slot in the past: {0} has already started")]
    SlotInPast(String),

    #[error("Invalid transition: cannot {action} while {stage}")]
    InvalidTransition {
        action: &'static str,
        stage: &'static str,
    },

    #[error("Incomplete booking: {0} is missing")]
    IncompleteDraft(&'static str),

    #[error("A booking submission is already in flight")]
    SubmissionInFlight,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Booking response did not include a payment redirect URL")]
    MissingPaymentRedirect,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BookingError {
    /// Whether the error was caused by user input rather than the backend.
    ///
    /// Validation errors are rejected locally before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookingError::InvalidWeekday(_)
                | BookingError::InvalidSlot(_)
                | BookingError::DayUnavailable(_)
                | BookingError::SlotUnavailable { .. }
                | BookingError::SlotInPast(_)
                | BookingError::InvalidTransition { .. }
                | BookingError::IncompleteDraft(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
