//! Next-occurrence and refill arithmetic.
//!
//! # Responsibility
//! - Compute the next daily reminder for a medication schedule.
//! - Compute the refill horizon from stock tracking fields.
//! - Build the sorted upcoming-events summary shown on the home surface.
//!
//! # Invariants
//! - Reminders are pure functions of wall-clock time and the configured
//!   time-of-day; no last-taken history exists.
//! - A schedule instant equal to `now` counts as today, not tomorrow.

use crate::model::record::{Document, Medication, StockInfo};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ReminderResult<T> = Result<T, ReminderError>;

/// Failure while building the upcoming-events summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    /// A stored appointment timestamp does not parse.
    InvalidAppointmentDateTime { index: usize, value: String },
}

impl Display for ReminderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAppointmentDateTime { value, .. } => {
                write!(f, "invalid appointment date/time `{value}`")
            }
        }
    }
}

impl Error for ReminderError {}

/// One entry of the upcoming-events summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingEvent {
    pub starts_at: NaiveDateTime,
    pub summary: String,
}

/// Returns the next future (or current-instant) occurrence of the daily
/// schedule.
///
/// # Contract
/// - Combines the calendar date of `now` with `medication.schedule`.
/// - Adds exactly one day when that instant is strictly before `now`.
pub fn next_reminder(medication: &Medication, now: NaiveDateTime) -> NaiveDateTime {
    let candidate = now.date().and_time(medication.schedule);
    if candidate < now {
        candidate + Duration::days(1)
    } else {
        candidate
    }
}

/// Returns the whole days until stock falls to the alert threshold.
///
/// Defined only when `consumption_rate > 0` and `current_quantity` is
/// strictly above `alert_threshold`; `None` means no refill alert.
pub fn days_until_low(stock: &StockInfo) -> Option<i64> {
    if stock.consumption_rate > 0.0 && stock.current_quantity > stock.alert_threshold {
        let days = (stock.current_quantity - stock.alert_threshold) / stock.consumption_rate;
        Some(days.ceil() as i64)
    } else {
        None
    }
}

/// Returns the calendar date a refill alert should fire on, when defined.
pub fn refill_date(stock: &StockInfo, today: NaiveDate) -> Option<NaiveDate> {
    days_until_low(stock).map(|days| today + Duration::days(days))
}

/// Builds the upcoming-events summary, sorted ascending by start time.
///
/// One "Take {name}" entry per medication at its next reminder, one
/// "Refill {name}" entry per medication with a defined refill date, and one
/// entry per appointment titled by its (defaulted) description. Ties keep
/// document order.
pub fn upcoming_events(document: &Document, now: NaiveDateTime) -> ReminderResult<Vec<UpcomingEvent>> {
    let mut events = Vec::new();

    for medication in &document.medications {
        events.push(UpcomingEvent {
            starts_at: next_reminder(medication, now),
            summary: format!("Take {}", medication.name),
        });
        if let Some(date) = medication
            .stock
            .as_ref()
            .and_then(|stock| refill_date(stock, now.date()))
        {
            events.push(UpcomingEvent {
                starts_at: date.and_time(NaiveTime::MIN),
                summary: format!("Refill {}", medication.name),
            });
        }
    }

    for (index, appointment) in document.appointments.iter().enumerate() {
        let starts_at = appointment.parse_date_time().map_err(|_| {
            ReminderError::InvalidAppointmentDateTime {
                index,
                value: appointment.date_time.clone(),
            }
        })?;
        events.push(UpcomingEvent {
            starts_at,
            summary: appointment.display_description().to_string(),
        });
    }

    events.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
    Ok(events)
}
