//! Session-level use-case services.
//!
//! # Responsibility
//! - Orchestrate store, validation, reminder and calendar calls behind one
//!   owned document handle.
//! - Keep the front-end decoupled from persistence details.

pub mod document_service;
