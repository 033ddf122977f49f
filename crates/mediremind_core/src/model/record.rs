//! Medication, appointment and document records.
//!
//! # Responsibility
//! - Define the wire shape of the persisted JSON document.
//! - Provide the save/import validation gate for every record type.
//!
//! # Invariants
//! - `Medication::schedule` serializes as `HH:MM:SS`; a malformed stored
//!   value is a parse failure at the serde boundary, not a validation state.
//! - `Appointment::date_time` stays a string: parse failure of a free-text
//!   edit is a first-class validation outcome.
//! - If `stock` is present, all three sub-fields must pass validation before
//!   any persist.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Summary title used when an appointment description is blank.
pub const DEFAULT_APPOINTMENT_DESCRIPTION: &str = "Doctor Appointment";

/// Accepted `date_time` layouts, tried in order.
///
/// Seconds and fractional seconds are optional, and either `T` or a single
/// space may separate date and time.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Optional stock tracking attached to a medication.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    /// Units currently on hand. Must be `>= 0`.
    pub current_quantity: f64,
    /// Units consumed per day. Must be `> 0`.
    pub consumption_rate: f64,
    /// Refill is due once stock falls to this level. Must be `>= 0`.
    pub alert_threshold: f64,
}

impl StockInfo {
    /// Validates stock sub-fields in quantity, rate, threshold order.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.current_quantity < 0.0 {
            return Err(RecordValidationError::NegativeQuantity);
        }
        if self.consumption_rate <= 0.0 {
            return Err(RecordValidationError::NonPositiveRate);
        }
        if self.alert_threshold < 0.0 {
            return Err(RecordValidationError::NegativeThreshold);
        }
        Ok(())
    }
}

/// One medication with a daily schedule and optional stock tracking.
///
/// Names are unique in practice but uniqueness is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    /// Display name. Must not be empty or whitespace-only.
    pub name: String,
    /// Time of day the medication is taken. Wire format `HH:MM:SS`.
    pub schedule: NaiveTime,
    /// Omitted from the wire entirely when stock is not tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<StockInfo>,
}

impl Medication {
    /// Creates a medication without stock tracking.
    pub fn new(name: impl Into<String>, schedule: NaiveTime) -> Self {
        Self {
            name: name.into(),
            schedule,
            stock: None,
        }
    }

    /// Validates this record for save/import.
    ///
    /// # Contract
    /// - Name check runs first, then stock sub-fields when present.
    /// - Returns the first failing condition only.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.name.trim().is_empty() {
            return Err(RecordValidationError::EmptyName);
        }
        if let Some(stock) = &self.stock {
            stock.validate()?;
        }
        Ok(())
    }
}

/// One doctor appointment at an absolute timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// ISO-8601 date+time, validated on save/import.
    pub date_time: String,
    /// Free text. Blank falls back to [`DEFAULT_APPOINTMENT_DESCRIPTION`]
    /// anywhere the appointment is displayed.
    #[serde(default)]
    pub description: String,
}

impl Appointment {
    /// Creates an appointment from a parsed timestamp.
    pub fn new(date_time: NaiveDateTime, description: impl Into<String>) -> Self {
        Self {
            date_time: date_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
            description: description.into(),
        }
    }

    /// Parses `date_time` as an ISO-8601 date+time.
    pub fn parse_date_time(&self) -> Result<NaiveDateTime, RecordValidationError> {
        let raw = self.date_time.trim();
        DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .ok_or(RecordValidationError::InvalidDateTime)
    }

    /// Validates this record for save/import.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        self.parse_date_time().map(|_| ())
    }

    /// Returns the description, or the default title when blank.
    pub fn display_description(&self) -> &str {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            DEFAULT_APPOINTMENT_DESCRIPTION
        } else {
            trimmed
        }
    }
}

/// The whole persisted document.
///
/// Mutated in place through a session and persisted wholesale; there are no
/// partial writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub medications: Vec<Medication>,
    pub appointments: Vec<Appointment>,
}

impl Document {
    /// Returns the empty document used when no valid data file exists.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validates every record, medications first, short-circuiting on the
    /// first failure.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        for (index, medication) in self.medications.iter().enumerate() {
            medication
                .validate()
                .map_err(|source| DocumentValidationError::Medication { index, source })?;
        }
        for (index, appointment) in self.appointments.iter().enumerate() {
            appointment
                .validate()
                .map_err(|source| DocumentValidationError::Appointment { index, source })?;
        }
        Ok(())
    }
}

/// Field-level validation failure for one record.
///
/// `Display` renders the exact user-visible message for each condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyName,
    NegativeQuantity,
    NonPositiveRate,
    NegativeThreshold,
    InvalidDateTime,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Medication name cannot be empty"),
            Self::NegativeQuantity => write!(f, "Current quantity cannot be negative"),
            Self::NonPositiveRate => write!(f, "Consumption rate must be positive"),
            Self::NegativeThreshold => write!(f, "Alert threshold cannot be negative"),
            Self::InvalidDateTime => write!(f, "Invalid date/time format"),
        }
    }
}

impl Error for RecordValidationError {}

/// First failing record of a document-level validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentValidationError {
    Medication {
        index: usize,
        source: RecordValidationError,
    },
    Appointment {
        index: usize,
        source: RecordValidationError,
    },
}

impl DocumentValidationError {
    /// Returns the underlying field-level failure.
    pub fn record_error(&self) -> RecordValidationError {
        match self {
            Self::Medication { source, .. } | Self::Appointment { source, .. } => *source,
        }
    }
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Medication { source, .. } => write!(f, "Invalid medication: {source}"),
            Self::Appointment { source, .. } => write!(f, "Invalid appointment: {source}"),
        }
    }
}

impl Error for DocumentValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Medication { source, .. } | Self::Appointment { source, .. } => Some(source),
        }
    }
}
