//! Command-line definitions for the MediRemind front end.
//!
//! Subcommands stand in for the UI pages of the tool: `next` (home summary),
//! `med`/`appt` (record management), `calendar` (ICS export) and
//! `export`/`import` (raw data exchange).

use chrono::NaiveTime;
use clap::{Args, Parser, Subcommand};
use mediremind_core::{Frequency, StockInfo, CALENDAR_FILE_NAME, DATA_FILE_NAME};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(
    name = "mediremind",
    version,
    about = "Personal medication and appointment reminders"
)]
pub struct Cli {
    /// Path of the JSON data file.
    #[arg(long, value_name = "FILE", default_value = DATA_FILE_NAME)]
    pub data_file: PathBuf,

    /// Absolute directory for rotating log files; logs to stderr when omitted.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the next upcoming reminder or appointment.
    Next,
    /// List stored medications and appointments.
    List,
    /// Add, edit or remove medications.
    #[command(subcommand)]
    Med(MedCommand),
    /// Add or remove doctor appointments.
    #[command(subcommand)]
    Appt(ApptCommand),
    /// Generate the iCalendar export.
    Calendar(CalendarArgs),
    /// Export the raw JSON document.
    Export(ExportArgs),
    /// Import a JSON document, replacing current data.
    Import(ImportArgs),
}

#[derive(Debug, Subcommand)]
pub enum MedCommand {
    /// Add a medication.
    Add {
        /// Display name.
        name: String,
        /// Time of day the medication is taken, HH:MM:SS.
        #[arg(long, value_name = "TIME", default_value = "00:00:00")]
        schedule: NaiveTime,
        #[command(flatten)]
        stock: StockArgs,
    },
    /// Remove a medication by name.
    Remove {
        name: String,
    },
    /// Change a medication's schedule time.
    SetSchedule {
        name: String,
        /// Time of day, HH:MM:SS.
        schedule: NaiveTime,
    },
    /// Attach or replace stock tracking on a medication.
    SetStock {
        name: String,
        /// Units currently on hand.
        #[arg(long)]
        quantity: f64,
        /// Units consumed per day.
        #[arg(long)]
        rate: f64,
        /// Refill alert fires once stock falls to this level.
        #[arg(long)]
        threshold: f64,
    },
    /// Remove stock tracking from a medication.
    ClearStock {
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ApptCommand {
    /// Add an appointment.
    Add {
        /// ISO-8601 date+time, e.g. 2026-08-10T09:30:00.
        date_time: String,
        /// Purpose of the visit.
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Remove an appointment by list position.
    Remove {
        index: usize,
    },
}

/// Optional stock tracking flags; all three or none.
#[derive(Debug, Args)]
pub struct StockArgs {
    /// Units currently on hand.
    #[arg(long)]
    pub quantity: Option<f64>,
    /// Units consumed per day.
    #[arg(long)]
    pub rate: Option<f64>,
    /// Refill alert fires once stock falls to this level.
    #[arg(long)]
    pub threshold: Option<f64>,
}

impl StockArgs {
    /// Converts the flag triple into stock info.
    ///
    /// # Errors
    /// - When only some of the three flags are given.
    pub fn into_stock(self) -> Result<Option<StockInfo>, String> {
        match (self.quantity, self.rate, self.threshold) {
            (None, None, None) => Ok(None),
            (Some(current_quantity), Some(consumption_rate), Some(alert_threshold)) => {
                Ok(Some(StockInfo {
                    current_quantity,
                    consumption_rate,
                    alert_threshold,
                }))
            }
            _ => Err(
                "stock tracking needs all of --quantity, --rate and --threshold".to_string(),
            ),
        }
    }
}

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// Medication to include; repeatable. All medications when omitted.
    #[arg(long = "select", value_name = "NAME")]
    pub select: Vec<String>,

    /// Per-medication frequency as `NAME=daily|every_other_day|weekly`;
    /// repeatable. Unlisted medications default to daily.
    #[arg(long = "freq", value_name = "NAME=FREQ", value_parser = parse_frequency_pair)]
    pub freq: Vec<(String, Frequency)>,

    /// Output path of the .ics file.
    #[arg(long, value_name = "FILE", default_value = CALENDAR_FILE_NAME)]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output path of the JSON export.
    #[arg(long, value_name = "FILE", default_value = DATA_FILE_NAME)]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file of the document shape.
    pub file: PathBuf,
}

fn parse_frequency_pair(raw: &str) -> Result<(String, Frequency), String> {
    let (name, frequency) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=FREQ, got `{raw}`"))?;
    if name.trim().is_empty() {
        return Err(format!("expected NAME=FREQ, got `{raw}`"));
    }
    // Frequency parsing is total: unknown values select daily.
    let frequency = Frequency::from_str(frequency).unwrap_or_default();
    Ok((name.trim().to_string(), frequency))
}
