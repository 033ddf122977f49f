//! MediRemind command-line front end.
//!
//! # Responsibility
//! - Hold the single mutable handle to the session document.
//! - Map subcommands onto the core components: store, validator, reminder
//!   calculator and calendar builder.
//!
//! # Invariants
//! - Every edit validates the affected record before it is applied.
//! - Mutating commands persist the document at the end of the command.
//! - Warnings print and continue; errors print and exit nonzero.

mod args;

use args::{ApptCommand, CalendarArgs, Cli, Command, ExportArgs, ImportArgs, MedCommand};
use chrono::Local;
use clap::Parser;
use log::info;
use mediremind_core::{
    default_log_level, init_logging, Appointment, CalendarOptions, Document, DocumentService,
    JsonFileStore, Medication, StockInfo, CALENDAR_MEDIA_TYPE, DATA_MEDIA_TYPE,
};

fn main() {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    if let Err(message) = init_logging(&level, cli.log_dir.as_deref()) {
        eprintln!("warning: {message}");
    }

    if let Err(message) = run(cli) {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    info!(
        "event=session_open module=cli status=ok data_file={}",
        cli.data_file.display()
    );
    let mut service = DocumentService::open(JsonFileStore::new(&cli.data_file));
    if let Some(warning) = service.load_warning() {
        eprintln!("warning: {warning}");
    }
    let now = Local::now().naive_local();

    match cli.command {
        Command::Next => {
            match service.next_event(now).map_err(|err| err.to_string())? {
                Some(event) => println!(
                    "Next event: {} at {}",
                    event.summary,
                    event.starts_at.format("%Y-%m-%d %H:%M")
                ),
                None => println!("No upcoming events."),
            }
            Ok(())
        }
        Command::List => {
            print_document(service.document());
            Ok(())
        }
        Command::Med(command) => {
            apply_med_command(service.document_mut(), command)?;
            persist(&service)
        }
        Command::Appt(command) => {
            apply_appt_command(service.document_mut(), command)?;
            persist(&service)
        }
        Command::Calendar(args) => generate_calendar(&service, args, now),
        Command::Export(args) => export_data(&service, args),
        Command::Import(args) => import_data(&mut service, args),
    }
}

fn persist(service: &DocumentService<JsonFileStore>) -> Result<(), String> {
    service.save_checked().map_err(|err| err.to_string())?;
    println!("Changes saved successfully");
    Ok(())
}

fn apply_med_command(document: &mut Document, command: MedCommand) -> Result<(), String> {
    match command {
        MedCommand::Add {
            name,
            schedule,
            stock,
        } => {
            let mut medication = Medication::new(name, schedule);
            medication.stock = stock.into_stock()?;
            medication.validate().map_err(|err| err.to_string())?;
            document.medications.push(medication);
        }
        MedCommand::Remove { name } => {
            let before = document.medications.len();
            document.medications.retain(|med| med.name != name);
            if document.medications.len() == before {
                return Err(format!("no medication named `{name}`"));
            }
        }
        MedCommand::SetSchedule { name, schedule } => {
            find_medication(document, &name)?.schedule = schedule;
        }
        MedCommand::SetStock {
            name,
            quantity,
            rate,
            threshold,
        } => {
            let stock = StockInfo {
                current_quantity: quantity,
                consumption_rate: rate,
                alert_threshold: threshold,
            };
            stock.validate().map_err(|err| err.to_string())?;
            find_medication(document, &name)?.stock = Some(stock);
        }
        MedCommand::ClearStock { name } => {
            find_medication(document, &name)?.stock = None;
        }
    }
    Ok(())
}

fn apply_appt_command(document: &mut Document, command: ApptCommand) -> Result<(), String> {
    match command {
        ApptCommand::Add {
            date_time,
            description,
        } => {
            let appointment = Appointment {
                date_time,
                description,
            };
            appointment.validate().map_err(|err| err.to_string())?;
            document.appointments.push(appointment);
        }
        ApptCommand::Remove { index } => {
            if index >= document.appointments.len() {
                return Err(format!("no appointment at index {index}"));
            }
            document.appointments.remove(index);
        }
    }
    Ok(())
}

fn generate_calendar(
    service: &DocumentService<JsonFileStore>,
    args: CalendarArgs,
    now: chrono::NaiveDateTime,
) -> Result<(), String> {
    let options = CalendarOptions {
        selected_names: if args.select.is_empty() {
            None
        } else {
            Some(args.select)
        },
        frequencies: args.freq.into_iter().collect(),
    };
    let bytes = service
        .generate_calendar(&options, now)
        .map_err(|err| err.to_string())?;
    std::fs::write(&args.out, &bytes)
        .map_err(|err| format!("cannot write `{}`: {err}", args.out.display()))?;
    println!(
        "Calendar written to {} ({CALENDAR_MEDIA_TYPE}, {} bytes)",
        args.out.display(),
        bytes.len()
    );
    Ok(())
}

fn export_data(service: &DocumentService<JsonFileStore>, args: ExportArgs) -> Result<(), String> {
    let bytes = service.export_bytes().map_err(|err| err.to_string())?;
    std::fs::write(&args.out, &bytes)
        .map_err(|err| format!("cannot write `{}`: {err}", args.out.display()))?;
    println!(
        "Data exported to {} ({DATA_MEDIA_TYPE})",
        args.out.display()
    );
    Ok(())
}

fn import_data(
    service: &mut DocumentService<JsonFileStore>,
    args: ImportArgs,
) -> Result<(), String> {
    let bytes = std::fs::read(&args.file)
        .map_err(|err| format!("cannot read `{}`: {err}", args.file.display()))?;
    service.import_bytes(&bytes).map_err(|err| err.to_string())?;
    println!("Data imported successfully");
    Ok(())
}

fn find_medication<'doc>(
    document: &'doc mut Document,
    name: &str,
) -> Result<&'doc mut Medication, String> {
    document
        .medications
        .iter_mut()
        .find(|med| med.name == name)
        .ok_or_else(|| format!("no medication named `{name}`"))
}

fn print_document(document: &Document) {
    println!("Medications:");
    if document.medications.is_empty() {
        println!("  (none)");
    }
    for med in &document.medications {
        match &med.stock {
            Some(stock) => println!(
                "  {} at {} (stock: {} on hand, {}/day, alert at {})",
                med.name,
                med.schedule.format("%H:%M:%S"),
                stock.current_quantity,
                stock.consumption_rate,
                stock.alert_threshold
            ),
            None => println!("  {} at {}", med.name, med.schedule.format("%H:%M:%S")),
        }
    }

    println!("Appointments:");
    if document.appointments.is_empty() {
        println!("  (none)");
    }
    for (index, appointment) in document.appointments.iter().enumerate() {
        println!(
            "  [{index}] {} - {}",
            appointment.date_time,
            appointment.display_description()
        );
    }
}
