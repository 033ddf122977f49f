//! Document store contract and JSON file implementation.
//!
//! # Responsibility
//! - Load and persist the document as pretty-printed JSON.
//! - Gate the import path behind shape and record validation.
//!
//! # Invariants
//! - `load` never fails; every failure case degrades to the empty document
//!   plus a [`LoadWarning`].
//! - `save` writes the document wholesale with 4-space indentation.
//! - Import applies nothing unless the whole payload passes validation.

use crate::model::record::{Document, DocumentValidationError};
use log::{info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default file name of the persisted document.
pub const DATA_FILE_NAME: &str = "mediremind_data.json";

/// Media type used when the raw document is offered as a download.
pub const DATA_MEDIA_TYPE: &str = "text/json";

pub type StoreResult<T> = Result<T, StoreError>;

/// Recoverable persistence failure on the save path.
#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Error saving data: {} ({source})", path.display())
            }
            Self::Serialize(source) => write!(f, "Error saving data: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(source) => Some(source),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Non-fatal load outcome surfaced to the caller.
///
/// `Display` renders the user-visible warning text; the fields keep enough
/// detail for diagnostics.
#[derive(Debug)]
pub enum LoadWarning {
    MissingFile { path: PathBuf },
    Unreadable { path: PathBuf, source: io::Error },
    MalformedJson { path: PathBuf, message: String },
}

impl Display for LoadWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFile { .. } => {
                write!(f, "Data file not found. Starting with empty data.")
            }
            Self::Unreadable { source, .. } => {
                write!(f, "Error reading data file: {source}. Starting with empty data.")
            }
            Self::MalformedJson { .. } => {
                write!(f, "Error parsing JSON file. Please check the format.")
            }
        }
    }
}

/// Wholesale import failure; nothing is applied on any variant.
#[derive(Debug)]
pub enum ImportError {
    /// The payload is not parseable JSON, or does not decode into records.
    Parse(String),
    /// The top-level value is not an object with both document keys.
    InvalidShape,
    /// The first record that failed validation.
    InvalidRecord(DocumentValidationError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(_) => write!(f, "Invalid JSON file format"),
            Self::InvalidShape => write!(
                f,
                "Invalid data format. Please upload a valid MediRemind JSON file."
            ),
            Self::InvalidRecord(source) => write!(f, "{source}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(_) | Self::InvalidShape => None,
            Self::InvalidRecord(source) => Some(source),
        }
    }
}

impl From<DocumentValidationError> for ImportError {
    fn from(value: DocumentValidationError) -> Self {
        Self::InvalidRecord(value)
    }
}

/// Store contract between the session service and persistence.
pub trait DocumentStore {
    /// Loads the document, degrading to the empty document on failure.
    fn load(&self) -> (Document, Option<LoadWarning>);
    /// Persists the document wholesale, overwriting previous contents.
    fn save(&self, document: &Document) -> StoreResult<()>;
}

/// JSON-file-backed document store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store over the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> (Document, Option<LoadWarning>) {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                info!(
                    "event=store_load module=store status=warn reason=missing_file path={}",
                    self.path.display()
                );
                return (
                    Document::empty(),
                    Some(LoadWarning::MissingFile {
                        path: self.path.clone(),
                    }),
                );
            }
            Err(source) => {
                warn!(
                    "event=store_load module=store status=warn reason=unreadable path={} error={source}",
                    self.path.display()
                );
                return (
                    Document::empty(),
                    Some(LoadWarning::Unreadable {
                        path: self.path.clone(),
                        source,
                    }),
                );
            }
        };

        match serde_json::from_str::<Document>(&text) {
            Ok(document) => {
                info!(
                    "event=store_load module=store status=ok medications={} appointments={}",
                    document.medications.len(),
                    document.appointments.len()
                );
                (document, None)
            }
            Err(source) => {
                warn!(
                    "event=store_load module=store status=warn reason=malformed_json path={} error={source}",
                    self.path.display()
                );
                (
                    Document::empty(),
                    Some(LoadWarning::MalformedJson {
                        path: self.path.clone(),
                        message: source.to_string(),
                    }),
                )
            }
        }
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        let bytes = to_pretty_json(document)?;
        fs::write(&self.path, bytes).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(
            "event=store_save module=store status=ok medications={} appointments={} path={}",
            document.medications.len(),
            document.appointments.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Serializes a document as pretty JSON with 4-space indentation.
///
/// The same bytes are used for the data file and for the raw data export.
pub fn to_pretty_json(document: &Document) -> StoreResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Parses and validates an imported document.
///
/// # Contract
/// - Shape check first: the top-level value must be an object carrying both
///   `medications` and `appointments`.
/// - Then record decoding, then per-record validation (medications first),
///   short-circuiting on the first failure.
/// - Nothing is applied on failure; the caller swaps documents only on `Ok`.
pub fn import_document(bytes: &[u8]) -> Result<Document, ImportError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|source| ImportError::Parse(source.to_string()))?;

    let shape_ok = value
        .as_object()
        .is_some_and(|map| map.contains_key("medications") && map.contains_key("appointments"));
    if !shape_ok {
        warn!("event=import module=store status=error reason=invalid_shape");
        return Err(ImportError::InvalidShape);
    }

    let document: Document =
        serde_json::from_value(value).map_err(|source| ImportError::Parse(source.to_string()))?;
    document.validate()?;

    info!(
        "event=import module=store status=ok medications={} appointments={}",
        document.medications.len(),
        document.appointments.len()
    );
    Ok(document)
}
