//! Persistence layer for the JSON document.
//!
//! # Responsibility
//! - Define the use-case oriented store contract.
//! - Isolate file and serialization details from service orchestration.
//!
//! # Invariants
//! - Loading never fails; missing or corrupt files degrade to the empty
//!   document plus a warning.
//! - Saving overwrites the whole file; there are no partial writes.

pub mod json_store;
