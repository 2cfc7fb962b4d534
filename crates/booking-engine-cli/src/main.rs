//! `tutorbook` — resolve tutor availability and submit session bookings.
//!
//! Offline commands (`resolve-date`, `interval`, `slots`, `request`) work on
//! local JSON files. Online commands (`tutors`, `book`) talk to the booking
//! backend configured in `tutorbook.toml` or via `--config`.
//!
//! Output is JSON on stdout. Logs go to stderr, filtered by `RUST_LOG`
//! directives such as `booking_engine=debug` (default: warn).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use booking_engine::{
    AvailabilityTemplate, BookedSession, BookingDialog, BookingDraft, ClientConfig, Clock,
    DayOfWeek, FixedClock, HttpBookingApi, SessionInterval, SystemClock, TimeSlot, Tutor,
    TutorFilter, TutorId,
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use chrono_tz::Tz;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tutorbook", version, about = "Tutor session booking from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a weekday name to its next calendar date (today included)
    ResolveDate {
        /// Weekday name, e.g. "friday"
        day: DayOfWeek,
        /// Reference date, YYYY-MM-DD (default: today in UTC)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Convert a slot on a date into a UTC interval
    Interval {
        /// Calendar date, YYYY-MM-DD
        date: NaiveDate,
        /// Slot, HH:MM-HH:MM
        slot: TimeSlot,
    },
    /// List the slots of an availability template that can still be booked
    Slots {
        /// JSON availability template: {"friday": ["14:00-15:00"], ...}
        availability: PathBuf,
        /// JSON array of booked sessions: [{"startTime": ..., "endTime": ...}]
        #[arg(long)]
        booked: Option<PathBuf>,
        /// Reference instant, RFC 3339 (default: now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Build the booking request for a day, slot and purpose
    Request {
        #[arg(long)]
        tutor_id: String,
        /// JSON availability template of the tutor
        #[arg(long)]
        availability: PathBuf,
        #[arg(long)]
        day: DayOfWeek,
        #[arg(long)]
        slot: TimeSlot,
        #[arg(long)]
        purpose: String,
        /// Reference instant, RFC 3339 (default: now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// IANA zone to summarize the session in, e.g. "Europe/London"
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Fetch and filter the tutor listing
    Tutors {
        /// Configuration file (default: ./tutorbook.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        study_level: Option<String>,
        #[arg(long)]
        max_rate: Option<f64>,
        /// Free-text search over name, subject, university and description
        #[arg(long)]
        query: Option<String>,
    },
    /// Book a session and print the payment redirect URL
    Book {
        /// Configuration file (default: ./tutorbook.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        tutor_id: String,
        #[arg(long)]
        day: DayOfWeek,
        #[arg(long)]
        slot: TimeSlot,
        #[arg(long)]
        purpose: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let output = match cli.command {
        Command::ResolveDate { day, today } => {
            let today = today.unwrap_or_else(|| SystemClock.today());
            let date = booking_engine::resolve_next_date(day, today);
            json!({ "day": day, "date": date.to_string() })
        }
        Command::Interval { date, slot } => interval_json(&slot.on_date(date)),
        Command::Slots {
            availability,
            booked,
            now,
        } => {
            let template: AvailabilityTemplate = read_json(&availability)?;
            let booked: Vec<BookedSession> = match booked {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };
            let now = now.unwrap_or_else(|| SystemClock.now());
            let slots: Vec<Value> = template
                .bookable_slots(now, &booked)
                .iter()
                .map(|b| {
                    let mut entry = interval_json(&b.interval);
                    entry["day"] = json!(b.day);
                    entry["date"] = json!(b.date.to_string());
                    entry["slot"] = json!(b.slot.to_string());
                    entry
                })
                .collect();
            Value::Array(slots)
        }
        Command::Request {
            tutor_id,
            availability,
            day,
            slot,
            purpose,
            now,
            timezone,
        } => {
            let tz = timezone.as_deref().map(parse_timezone).transpose()?;
            let template: AvailabilityTemplate = read_json(&availability)?;
            let clock = FixedClock(now.unwrap_or_else(|| SystemClock.now()));
            let mut draft = BookingDraft::default();
            draft.select_tutor(offline_tutor(tutor_id, template));
            draft.choose_day(day, clock.today())?;
            draft.choose_slot_at(slot, clock.now())?;
            draft.set_purpose(purpose)?;
            let request = draft.finalize_at(clock.now())?;
            match tz {
                Some(tz) => json!({ "request": request, "session": request.summary_in(tz) }),
                None => serde_json::to_value(request)?,
            }
        }
        Command::Tutors {
            config,
            subject,
            study_level,
            max_rate,
            query,
        } => {
            let config = load_config(config.as_deref())?;
            let dialog = BookingDialog::new(HttpBookingApi::new(&config)?, SystemClock);
            let tutors = dialog.load_tutors().await.map_err(|n| anyhow!(n.message))?;
            let filter = TutorFilter {
                subject,
                study_level,
                max_hourly_rate: max_rate,
                query,
            };
            serde_json::to_value(filter.apply(&tutors))?
        }
        Command::Book {
            config,
            tutor_id,
            day,
            slot,
            purpose,
        } => {
            let config = load_config(config.as_deref())?;
            let tz = config.timezone()?;
            let dialog = BookingDialog::new(HttpBookingApi::new(&config)?, SystemClock);
            let tutors = dialog.load_tutors().await.map_err(|n| anyhow!(n.message))?;
            let tutor = tutors
                .into_iter()
                .find(|t| t.id.0 == tutor_id)
                .ok_or_else(|| anyhow!("no tutor with id '{tutor_id}'"))?;
            dialog.open(tutor);
            dialog.choose_day(day).map_err(|n| anyhow!(n.message))?;
            dialog.choose_slot(slot).map_err(|n| anyhow!(n.message))?;
            dialog.set_purpose(purpose).map_err(|n| anyhow!(n.message))?;
            let summary = dialog
                .draft()
                .finalize()
                .map(|request| request.summary_in(tz))?;
            let url = dialog.submit().await.map_err(|n| anyhow!(n.message))?;
            json!({ "paymentRedirectUrl": url, "session": summary })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn interval_json(interval: &SessionInterval) -> Value {
    json!({ "startTime": interval.start_iso(), "endTime": interval.end_iso() })
}

/// A tutor record for offline commands, which only know id and availability.
fn offline_tutor(id: String, availability: AvailabilityTemplate) -> Tutor {
    Tutor {
        id: TutorId(id),
        full_name: String::new(),
        subject: String::new(),
        university: String::new(),
        experience: String::new(),
        hourly_rate: 0.0,
        study_level: String::new(),
        description: String::new(),
        profile_picture_url: None,
        availability,
    }
}

fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| anyhow!("Invalid timezone '{name}'"))
}

fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    let config = match path {
        Some(path) => ClientConfig::from_file(path)?
            .with_env_override(env::var(booking_engine::config::API_URL_ENV).ok())?,
        None => ClientConfig::from_default_location()?,
    };
    debug!(api_base_url = %config.api_base_url, "configuration loaded");
    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        bail!("{} is empty", path.display());
    }
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}
