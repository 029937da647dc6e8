mod cli;
mod format;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::models::{CustomerStatus, InstallationStatus, Period};

pub(crate) use cli::as_cli;

/// Subscription billing, payments and installation cost ledger.
#[derive(Parser, Debug)]
#[command(name = "utiledger", author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Ledger database file (default: the platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) db: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Manage subscribers
    Customer {
        #[command(subcommand)]
        action: CustomerCmd,
    },
    /// Manage installation jobs
    Installation {
        #[command(subcommand)]
        action: InstallationCmd,
    },
    /// Material lines of an installation
    Material {
        #[command(subcommand)]
        action: MaterialCmd,
    },
    /// Reusable material presets
    Preset {
        #[command(subcommand)]
        action: PresetCmd,
    },
    /// Monthly subscription bills
    Bills {
        #[command(subcommand)]
        action: BillsCmd,
    },
    /// Customer payments
    Payment {
        #[command(subcommand)]
        action: PaymentCmd,
    },
    /// Outstanding balances per customer
    Arrears {
        #[arg(long)]
        customer: Option<i64>,
        /// Also write the rows to a CSV file
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },
    /// Financial reports
    Report {
        #[command(subcommand)]
        kind: ReportCmd,
    },
    /// Stored settings and fee defaults
    Settings {
        #[command(subcommand)]
        action: SettingsCmd,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum CustomerCmd {
    Add {
        name: String,
        address: String,
        #[arg(long)]
        phone: Option<String>,
        /// Subscription start date, YYYY-MM-DD (default: today)
        #[arg(long, value_name = "DATE")]
        since: Option<NaiveDate>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Pass an empty string to clear
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, value_parser = parse_customer_status)]
        status: Option<CustomerStatus>,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub(crate) enum InstallationCmd {
    Add {
        customer_id: i64,
        /// Defaults to the installation_fee setting
        #[arg(long)]
        fee: Option<Decimal>,
        #[arg(long, value_name = "DATE")]
        scheduled: Option<NaiveDate>,
    },
    Update {
        id: i64,
        #[arg(long, value_parser = parse_installation_status)]
        status: Option<InstallationStatus>,
        #[arg(long)]
        fee_paid: Option<bool>,
        /// Completion date (default: today when completing)
        #[arg(long, value_name = "DATE")]
        completed: Option<NaiveDate>,
    },
    List {
        #[arg(long)]
        customer: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum MaterialCmd {
    Add {
        installation_id: i64,
        name: String,
        quantity: Decimal,
        /// Defaults to the price of the preset with the same name
        #[arg(long)]
        unit_price: Option<Decimal>,
    },
    List { installation_id: i64 },
}

#[derive(Subcommand, Debug)]
pub(crate) enum PresetCmd {
    Add {
        name: String,
        price: Decimal,
        #[arg(long, default_value = "pcs")]
        unit: String,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub(crate) enum BillsCmd {
    Generate {
        /// YYYY-MM (default: current month)
        period: Option<Period>,
        /// Defaults to the monthly_fee setting
        #[arg(long)]
        amount: Option<Decimal>,
    },
    List {
        #[arg(long)]
        customer: Option<i64>,
        #[arg(long)]
        period: Option<Period>,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum PaymentCmd {
    Record {
        customer_id: i64,
        amount: Decimal,
        #[arg(long)]
        bill: Option<i64>,
        /// YYYY-MM-DD (default: today)
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    List {
        #[arg(long)]
        customer: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum ReportCmd {
    Monthly {
        /// YYYY-MM (default: current month)
        period: Option<Period>,
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },
    Installations {
        #[arg(long, value_name = "DATE")]
        from: Option<NaiveDate>,
        #[arg(long, value_name = "DATE")]
        to: Option<NaiveDate>,
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum SettingsCmd {
    List,
    Set { key: String, value: String },
}

fn parse_customer_status(s: &str) -> Result<CustomerStatus, String> {
    CustomerStatus::parse(s).ok_or_else(|| format!("expected active or inactive, got '{s}'"))
}

/// Also accepts `done` and `complete` as shorthand for completed.
fn parse_installation_status(s: &str) -> Result<InstallationStatus, String> {
    match s.trim().to_lowercase().as_str() {
        "done" | "complete" => Ok(InstallationStatus::Completed),
        other => InstallationStatus::parse(other)
            .ok_or_else(|| format!("expected pending or completed, got '{s}'")),
    }
}
