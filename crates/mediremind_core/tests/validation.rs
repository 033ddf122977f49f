use chrono::NaiveTime;
use mediremind_core::{
    Appointment, Document, DocumentValidationError, Medication, RecordValidationError, StockInfo,
};

fn schedule(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).expect("valid schedule time")
}

fn stock(current_quantity: f64, consumption_rate: f64, alert_threshold: f64) -> StockInfo {
    StockInfo {
        current_quantity,
        consumption_rate,
        alert_threshold,
    }
}

#[test]
fn empty_medication_name_is_rejected() {
    let medication = Medication::new("", schedule(0, 0, 0));
    let err = medication.validate().unwrap_err();
    assert_eq!(err, RecordValidationError::EmptyName);
    assert_eq!(err.to_string(), "Medication name cannot be empty");
}

#[test]
fn whitespace_only_medication_name_is_rejected() {
    let medication = Medication::new("   ", schedule(8, 0, 0));
    assert_eq!(
        medication.validate().unwrap_err(),
        RecordValidationError::EmptyName
    );
}

#[test]
fn zero_consumption_rate_is_rejected() {
    let mut medication = Medication::new("Aspirin", schedule(8, 0, 0));
    medication.stock = Some(stock(30.0, 0.0, 10.0));

    let err = medication.validate().unwrap_err();
    assert_eq!(err, RecordValidationError::NonPositiveRate);
    assert_eq!(err.to_string(), "Consumption rate must be positive");
}

#[test]
fn negative_stock_fields_are_rejected_with_exact_messages() {
    assert_eq!(
        stock(-1.0, 5.0, 10.0).validate().unwrap_err().to_string(),
        "Current quantity cannot be negative"
    );
    assert_eq!(
        stock(30.0, -5.0, 10.0).validate().unwrap_err().to_string(),
        "Consumption rate must be positive"
    );
    assert_eq!(
        stock(30.0, 5.0, -1.0).validate().unwrap_err().to_string(),
        "Alert threshold cannot be negative"
    );
}

#[test]
fn stock_checks_run_in_quantity_rate_threshold_order() {
    // Several fields invalid at once: the first failing condition wins.
    let err = stock(-1.0, 0.0, -1.0).validate().unwrap_err();
    assert_eq!(err, RecordValidationError::NegativeQuantity);

    let err = stock(30.0, 0.0, -1.0).validate().unwrap_err();
    assert_eq!(err, RecordValidationError::NonPositiveRate);
}

#[test]
fn valid_medication_with_stock_passes() {
    let mut medication = Medication::new("Aspirin", schedule(8, 0, 0));
    medication.stock = Some(stock(30.0, 5.0, 10.0));
    assert!(medication.validate().is_ok());
}

#[test]
fn boundary_stock_values_pass() {
    // Zero quantity and zero threshold are allowed; only the rate must be
    // strictly positive.
    assert!(stock(0.0, 0.5, 0.0).validate().is_ok());
}

#[test]
fn unparseable_appointment_date_time_is_rejected() {
    let appointment = Appointment {
        date_time: "invalid".to_string(),
        description: String::new(),
    };
    let err = appointment.validate().unwrap_err();
    assert_eq!(err, RecordValidationError::InvalidDateTime);
    assert_eq!(err.to_string(), "Invalid date/time format");
}

#[test]
fn appointment_accepts_common_iso_layouts() {
    for raw in [
        "2026-08-10T09:30:00",
        "2026-08-10 09:30:00",
        "2026-08-10T09:30",
        "2026-08-10 09:30",
        "2026-08-10T09:30:00.250",
    ] {
        let appointment = Appointment {
            date_time: raw.to_string(),
            description: String::new(),
        };
        assert!(appointment.validate().is_ok(), "should accept `{raw}`");
    }
}

#[test]
fn appointment_rejects_date_without_time() {
    let appointment = Appointment {
        date_time: "2026-08-10".to_string(),
        description: String::new(),
    };
    assert!(appointment.validate().is_err());
}

#[test]
fn document_validation_reports_medications_before_appointments() {
    let document = Document {
        medications: vec![Medication::new("", schedule(0, 0, 0))],
        appointments: vec![Appointment {
            date_time: "invalid".to_string(),
            description: String::new(),
        }],
    };

    let err = document.validate().unwrap_err();
    assert_eq!(
        err,
        DocumentValidationError::Medication {
            index: 0,
            source: RecordValidationError::EmptyName,
        }
    );
    assert_eq!(
        err.to_string(),
        "Invalid medication: Medication name cannot be empty"
    );
}

#[test]
fn document_validation_reports_first_failing_appointment() {
    let document = Document {
        medications: vec![Medication::new("Aspirin", schedule(8, 0, 0))],
        appointments: vec![
            Appointment {
                date_time: "2026-08-10T09:30:00".to_string(),
                description: String::new(),
            },
            Appointment {
                date_time: "next tuesday".to_string(),
                description: String::new(),
            },
        ],
    };

    let err = document.validate().unwrap_err();
    assert_eq!(
        err,
        DocumentValidationError::Appointment {
            index: 1,
            source: RecordValidationError::InvalidDateTime,
        }
    );
    assert_eq!(err.to_string(), "Invalid appointment: Invalid date/time format");
}

#[test]
fn empty_document_is_valid() {
    assert!(Document::empty().validate().is_ok());
}
