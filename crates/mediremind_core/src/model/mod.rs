//! Domain model for the medication/appointment document.
//!
//! # Responsibility
//! - Define the canonical data structures persisted in the JSON document.
//! - Keep record-level validation next to the records it protects.
//!
//! # Invariants
//! - The document is persisted wholesale; records carry no synthetic IDs.
//! - Validation is enforced at save/import time, not continuously.

pub mod record;
