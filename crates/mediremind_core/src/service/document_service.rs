//! Document session service.
//!
//! # Responsibility
//! - Own the in-memory document for one session.
//! - Provide validated save, import/export, summary and calendar entry
//!   points for the front-end collaborator.
//!
//! # Invariants
//! - The front-end holds the sole mutable handle, obtained through
//!   `document_mut`.
//! - No persist path bypasses document validation.
//! - Import swaps the document only after the whole payload validates.

use crate::calendar::{self, CalendarError, CalendarOptions};
use crate::model::record::{Document, DocumentValidationError};
use crate::reminder::{upcoming_events, ReminderError, UpcomingEvent};
use crate::store::json_store::{
    import_document, to_pretty_json, DocumentStore, ImportError, LoadWarning, StoreError,
};
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a session-level operation.
#[derive(Debug)]
pub enum ServiceError {
    Validation(DocumentValidationError),
    Store(StoreError),
    Import(ImportError),
    Calendar(CalendarError),
    Reminder(ReminderError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::Calendar(err) => write!(f, "{err}"),
            Self::Reminder(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::Calendar(err) => Some(err),
            Self::Reminder(err) => Some(err),
        }
    }
}

impl From<DocumentValidationError> for ServiceError {
    fn from(value: DocumentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ImportError> for ServiceError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<CalendarError> for ServiceError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

impl From<ReminderError> for ServiceError {
    fn from(value: ReminderError) -> Self {
        Self::Reminder(value)
    }
}

/// Session wrapper owning the loaded document and its store.
pub struct DocumentService<S: DocumentStore> {
    store: S,
    document: Document,
    load_warning: Option<LoadWarning>,
}

impl<S: DocumentStore> DocumentService<S> {
    /// Loads the document from the store and opens a session over it.
    ///
    /// Never fails; a missing or corrupt backing file leaves the empty
    /// document plus a retrievable warning.
    pub fn open(store: S) -> Self {
        let (document, load_warning) = store.load();
        Self {
            store,
            document,
            load_warning,
        }
    }

    /// Returns the load warning from session start, if any.
    pub fn load_warning(&self) -> Option<&LoadWarning> {
        self.load_warning.as_ref()
    }

    /// Read access to the session document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The single mutable handle to the session document.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Validates every record, then persists the document wholesale.
    ///
    /// # Contract
    /// - The first failing record blocks the save; nothing is written.
    pub fn save_checked(&self) -> ServiceResult<()> {
        self.document.validate()?;
        self.store.save(&self.document)?;
        Ok(())
    }

    /// Replaces the session document with an imported payload and persists.
    ///
    /// # Contract
    /// - The current document is untouched on any failure, including a
    ///   failed persist of the imported payload.
    pub fn import_bytes(&mut self, bytes: &[u8]) -> ServiceResult<()> {
        let document = import_document(bytes)?;
        self.store.save(&document)?;
        self.document = document;
        Ok(())
    }

    /// Serializes the session document for the raw data export.
    pub fn export_bytes(&self) -> ServiceResult<Vec<u8>> {
        Ok(to_pretty_json(&self.document)?)
    }

    /// Returns the sorted upcoming-events summary.
    pub fn upcoming(&self, now: NaiveDateTime) -> ServiceResult<Vec<UpcomingEvent>> {
        Ok(upcoming_events(&self.document, now)?)
    }

    /// Returns the next upcoming event, if any.
    pub fn next_event(&self, now: NaiveDateTime) -> ServiceResult<Option<UpcomingEvent>> {
        Ok(self.upcoming(now)?.into_iter().next())
    }

    /// Builds the iCalendar export for the session document.
    pub fn generate_calendar(
        &self,
        options: &CalendarOptions,
        now: NaiveDateTime,
    ) -> ServiceResult<Vec<u8>> {
        Ok(calendar::generate(&self.document, options, now)?)
    }
}
