use chrono::NaiveTime;
use mediremind_core::{
    import_document, Appointment, Document, DocumentService, DocumentStore, ImportError,
    LoadWarning, Medication, ServiceError, StoreResult,
};
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory store double recording every persisted document.
///
/// The saved log is shared so tests can observe persists after the store has
/// moved into the service.
struct MemoryStore {
    saved: Rc<RefCell<Vec<Document>>>,
}

impl MemoryStore {
    fn new() -> (Self, Rc<RefCell<Vec<Document>>>) {
        let saved = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                saved: Rc::clone(&saved),
            },
            saved,
        )
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> (Document, Option<LoadWarning>) {
        (Document::empty(), None)
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        self.saved.borrow_mut().push(document.clone());
        Ok(())
    }
}

fn valid_payload() -> Vec<u8> {
    serde_json::json!({
        "medications": [
            {
                "name": "Aspirin",
                "schedule": "08:00:00",
                "stock": {
                    "current_quantity": 30.0,
                    "consumption_rate": 5.0,
                    "alert_threshold": 10.0
                }
            }
        ],
        "appointments": [
            {"date_time": "2026-08-10T09:30:00", "description": "Dentist"}
        ]
    })
    .to_string()
    .into_bytes()
}

#[test]
fn import_accepts_a_valid_document() {
    let document = import_document(&valid_payload()).unwrap();
    assert_eq!(document.medications.len(), 1);
    assert_eq!(document.medications[0].name, "Aspirin");
    assert_eq!(document.appointments.len(), 1);
}

#[test]
fn import_rejects_payloads_missing_a_top_level_key() {
    let err = import_document(br#"{"medications": []}"#).unwrap_err();
    assert!(matches!(err, ImportError::InvalidShape));
    assert_eq!(
        err.to_string(),
        "Invalid data format. Please upload a valid MediRemind JSON file."
    );

    let err = import_document(br#"{"appointments": []}"#).unwrap_err();
    assert!(matches!(err, ImportError::InvalidShape));
}

#[test]
fn import_rejects_non_object_payloads() {
    let err = import_document(b"[]").unwrap_err();
    assert!(matches!(err, ImportError::InvalidShape));
}

#[test]
fn import_rejects_unparseable_json() {
    let err = import_document(b"{not json").unwrap_err();
    assert!(matches!(err, ImportError::Parse(_)));
    assert_eq!(err.to_string(), "Invalid JSON file format");
}

#[test]
fn import_rejects_records_that_do_not_decode() {
    // Shape-valid, but the medication record itself is not decodable.
    let err = import_document(
        br#"{"medications": [{"name": 42}], "appointments": []}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ImportError::Parse(_)));
}

#[test]
fn import_rejects_the_first_invalid_record() {
    let payload = serde_json::json!({
        "medications": [
            {
                "name": "Aspirin",
                "schedule": "08:00:00",
                "stock": {
                    "current_quantity": 30.0,
                    "consumption_rate": 0.0,
                    "alert_threshold": 10.0
                }
            }
        ],
        "appointments": []
    })
    .to_string();

    let err = import_document(payload.as_bytes()).unwrap_err();
    assert!(matches!(err, ImportError::InvalidRecord(_)));
    assert_eq!(
        err.to_string(),
        "Invalid medication: Consumption rate must be positive"
    );
}

#[test]
fn service_import_applies_nothing_on_failure() {
    let (store, saved) = MemoryStore::new();
    let mut service = DocumentService::open(store);
    service.document_mut().medications.push(Medication::new(
        "Existing",
        NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
    ));

    let err = service.import_bytes(b"{not json").unwrap_err();
    assert!(matches!(err, ServiceError::Import(_)));

    // The session document and the store are both untouched.
    assert_eq!(service.document().medications.len(), 1);
    assert_eq!(service.document().medications[0].name, "Existing");
    assert!(saved.borrow().is_empty());
}

#[test]
fn service_import_replaces_the_document_and_persists() {
    let (store, saved) = MemoryStore::new();
    let mut service = DocumentService::open(store);
    service.import_bytes(&valid_payload()).unwrap();

    assert_eq!(service.document().medications.len(), 1);
    assert_eq!(service.document().appointments.len(), 1);
    assert_eq!(saved.borrow().len(), 1);
    assert_eq!(&saved.borrow()[0], service.document());
}

#[test]
fn save_checked_blocks_on_the_first_invalid_record() {
    let (store, saved) = MemoryStore::new();
    let mut service = DocumentService::open(store);
    service.document_mut().medications.push(Medication::new(
        "",
        NaiveTime::from_hms_opt(0, 0, 0).expect("valid time"),
    ));

    let err = service.save_checked().unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(
        err.to_string(),
        "Invalid medication: Medication name cannot be empty"
    );
    assert!(saved.borrow().is_empty());
}

#[test]
fn save_checked_persists_a_valid_document() {
    let (store, saved) = MemoryStore::new();
    let mut service = DocumentService::open(store);
    service.document_mut().appointments.push(Appointment {
        date_time: "2026-08-10T09:30:00".to_string(),
        description: String::new(),
    });

    service.save_checked().unwrap();
    assert_eq!(saved.borrow().len(), 1);
}

#[test]
fn export_bytes_are_pretty_printed_and_decode_back() {
    let (store, _saved) = MemoryStore::new();
    let mut service = DocumentService::open(store);
    service.document_mut().medications.push(Medication::new(
        "Aspirin",
        NaiveTime::from_hms_opt(8, 0, 0).expect("valid time"),
    ));

    let bytes = service.export_bytes().unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.contains("\n    \"medications\": ["));

    let decoded: Document = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(&decoded, service.document());
}
