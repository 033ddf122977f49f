//! Core domain logic for MediRemind.
//! This crate is the single source of truth for business invariants.

pub mod calendar;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod service;
pub mod store;

pub use calendar::{
    generate, CalendarError, CalendarOptions, CalendarResult, Frequency, CALENDAR_FILE_NAME,
    CALENDAR_MEDIA_TYPE,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{
    Appointment, Document, DocumentValidationError, Medication, RecordValidationError, StockInfo,
    DEFAULT_APPOINTMENT_DESCRIPTION,
};
pub use reminder::{
    days_until_low, next_reminder, refill_date, upcoming_events, ReminderError, ReminderResult,
    UpcomingEvent,
};
pub use service::document_service::{DocumentService, ServiceError, ServiceResult};
pub use store::json_store::{
    import_document, to_pretty_json, DocumentStore, ImportError, JsonFileStore, LoadWarning,
    StoreError, StoreResult, DATA_FILE_NAME, DATA_MEDIA_TYPE,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
