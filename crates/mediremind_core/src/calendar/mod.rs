//! iCalendar export builder.
//!
//! # Responsibility
//! - Translate the document into calendar events with recurrence rules.
//! - Emit refill alerts as all-day events on the computed refill date.
//!
//! # Invariants
//! - Events follow document iteration order; no further ordering guarantee.
//! - A medication outside the selection contributes nothing, including its
//!   refill alert.
//! - An unparseable appointment timestamp aborts generation; nothing partial
//!   is emitted.

use crate::model::record::Document;
use crate::reminder::{next_reminder, refill_date};
use chrono::NaiveDateTime;
use icalendar::{Calendar, Component, Event, EventLike};
use log::info;
use std::collections::HashMap;
use std::convert::Infallible;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Download file name for the calendar export.
pub const CALENDAR_FILE_NAME: &str = "mediremind.ics";

/// Media type of the calendar export.
pub const CALENDAR_MEDIA_TYPE: &str = "text/calendar";

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Failure while building the calendar export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// A stored appointment timestamp does not parse.
    InvalidAppointmentDateTime { index: usize, value: String },
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAppointmentDateTime { value, .. } => {
                write!(f, "invalid appointment date/time `{value}`")
            }
        }
    }
}

impl Error for CalendarError {}

/// Reminder recurrence for one medication.
///
/// Configured per medication by the front-end; not part of the persisted
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frequency {
    /// Every day at the scheduled time.
    #[default]
    Daily,
    /// Every second day at the scheduled time.
    EveryOtherDay,
    /// Weekly on Monday.
    Weekly,
}

impl Frequency {
    /// Returns the RFC 5545 recurrence rule value for this frequency.
    pub fn rrule(self) -> &'static str {
        match self {
            Self::Daily => "FREQ=DAILY",
            Self::EveryOtherDay => "FREQ=DAILY;INTERVAL=2",
            Self::Weekly => "FREQ=WEEKLY;BYDAY=MO",
        }
    }
}

impl FromStr for Frequency {
    type Err = Infallible;

    /// Anything other than the two named variants selects plain daily.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "every_other_day" => Self::EveryOtherDay,
            "weekly" => Self::Weekly,
            _ => Self::Daily,
        })
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::EveryOtherDay => write!(f, "every_other_day"),
            Self::Weekly => write!(f, "weekly"),
        }
    }
}

/// Per-export options supplied by the front-end.
#[derive(Debug, Clone, Default)]
pub struct CalendarOptions {
    /// Medications to include by name; `None` includes all.
    pub selected_names: Option<Vec<String>>,
    /// Per-medication recurrence; missing entries default to daily.
    pub frequencies: HashMap<String, Frequency>,
}

impl CalendarOptions {
    /// Returns whether a medication name is part of this export.
    pub fn includes(&self, name: &str) -> bool {
        match &self.selected_names {
            Some(names) => names.iter().any(|candidate| candidate == name),
            None => true,
        }
    }

    /// Returns the configured recurrence for a medication name.
    pub fn frequency_for(&self, name: &str) -> Frequency {
        self.frequencies.get(name).copied().unwrap_or_default()
    }
}

/// Builds the iCalendar export for the document.
///
/// # Contract
/// - One recurring "Take {name}" event per selected medication, starting at
///   its next reminder relative to `now`.
/// - One non-recurring all-day "Refill {name}" event per selected medication
///   whose refill date is defined.
/// - One non-recurring event per appointment, titled by its (defaulted)
///   description.
/// - Returns the serialized calendar bytes, ready for transfer.
pub fn generate(
    document: &Document,
    options: &CalendarOptions,
    now: NaiveDateTime,
) -> CalendarResult<Vec<u8>> {
    let mut calendar = Calendar::new();
    let mut event_count = 0usize;

    for medication in document
        .medications
        .iter()
        .filter(|medication| options.includes(&medication.name))
    {
        let mut take = Event::new();
        take.summary(&format!("Take {}", medication.name));
        take.starts(next_reminder(medication, now));
        take.add_property("RRULE", options.frequency_for(&medication.name).rrule());
        calendar.push(take.done());
        event_count += 1;

        if let Some(date) = medication
            .stock
            .as_ref()
            .and_then(|stock| refill_date(stock, now.date()))
        {
            let mut refill = Event::new();
            refill.summary(&format!("Refill {}", medication.name));
            refill.all_day(date);
            calendar.push(refill.done());
            event_count += 1;
        }
    }

    for (index, appointment) in document.appointments.iter().enumerate() {
        let starts_at = appointment.parse_date_time().map_err(|_| {
            CalendarError::InvalidAppointmentDateTime {
                index,
                value: appointment.date_time.clone(),
            }
        })?;
        let mut visit = Event::new();
        visit.summary(appointment.display_description());
        visit.starts(starts_at);
        calendar.push(visit.done());
        event_count += 1;
    }

    info!("event=calendar_generate module=calendar status=ok events={event_count}");
    Ok(calendar.to_string().into_bytes())
}
