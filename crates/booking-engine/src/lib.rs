//! # booking-engine
//!
//! Deterministic session booking for a tutoring platform.
//!
//! Given a tutor's weekly availability template, the engine resolves which
//! (weekday, slot) pairs can be booked, maps a chosen weekday to its next
//! calendar date, converts a slot on that date into an absolute UTC interval,
//! and walks the student through a booking draft until a session request can
//! be submitted. Scheduling and payment authority stay with the backend; this
//! crate only shapes what is sent to it.
//!
//! ## Modules
//!
//! - [`weekday`] — canonical weekday identifiers and next-occurrence resolution
//! - [`slot`] — `HH:MM-HH:MM` slots and slot-to-interval conversion
//! - [`availability`] — weekly templates and bookable-slot resolution
//! - [`clock`] — injected "current time"
//! - [`tutor`] — tutor listing records and discovery filters
//! - [`request`] — the booking payload and the backend's confirmation
//! - [`draft`] — the booking draft state machine
//! - [`api`] — the booking backend collaborator (HTTP implementation behind the `http` feature)
//! - [`dialog`] — the dialog controller that turns failures into user notifications
//! - [`config`] — client configuration
//! - [`error`] — Error types

pub mod api;
pub mod availability;
pub mod clock;
pub mod config;
pub mod dialog;
pub mod draft;
pub mod error;
pub mod request;
pub mod slot;
pub mod tutor;
pub mod weekday;

pub use api::BookingApi;
#[cfg(feature = "http")]
pub use api::HttpBookingApi;
pub use availability::{AvailabilityTemplate, BookableSlot, BookedSession};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ClientConfig;
pub use dialog::{BookingDialog, Notification, NotificationKind};
pub use draft::{BookingDraft, DraftStage};
pub use error::BookingError;
pub use request::{BookingConfirmation, SessionRequest};
pub use slot::{SessionInterval, TimeSlot};
pub use tutor::{Tutor, TutorFilter, TutorId};
pub use weekday::{resolve_next_date, DayOfWeek};
