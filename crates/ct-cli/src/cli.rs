//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use ct_core::EventId;

/// Can tracker.
///
/// Logs cans per person and reports streaks, totals, period comparisons
/// and monthly/yearly recaps.
#[derive(Debug, Parser)]
#[command(name = "ct", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log a can.
    Add {
        /// Who drank it. Normalized to "Name" form.
        person: String,

        /// Flavor (defaults to the first registered flavor).
        #[arg(short, long)]
        flavor: Option<String>,

        /// Date as YYYY-MM-DD (defaults to today).
        #[arg(short, long, value_parser = ct_core::parse_date)]
        date: Option<NaiveDate>,

        /// Time as HH:MM (defaults to now when time tracking is on).
        #[arg(short, long, value_parser = ct_core::parse_time)]
        time: Option<NaiveTime>,

        /// Cost (defaults to the default cost when cost tracking is on).
        #[arg(long, allow_negative_numbers = true)]
        cost: Option<f64>,
    },

    /// Delete an entry by id.
    Delete {
        /// Entry id as shown by `ct list`.
        id: EventId,
    },

    /// Show recent entries, newest first.
    List {
        /// Show every entry instead of the most recent ones.
        #[arg(long)]
        all: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show totals, streaks, period comparison and time of day.
    Stats {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Compare people, most cans first.
    Compare {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show monthly and yearly recaps.
    Recaps {
        /// Only include this person.
        #[arg(short, long)]
        person: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show cans per day.
    Timeline {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage flavors.
    #[command(subcommand)]
    Flavors(FlavorsAction),

    /// Show or change settings.
    #[command(subcommand)]
    Settings(SettingsAction),

    /// Export all entries as CSV.
    Export {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show where data is stored and what it holds.
    Status,

    /// Delete all stored data and return to defaults.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
}

/// Actions for the `flavors` subcommand.
#[derive(Debug, Subcommand)]
pub enum FlavorsAction {
    /// List registered flavors.
    List,
    /// Register a new flavor.
    Add {
        /// Flavor name.
        name: String,
    },
    /// Remove a flavor. Existing entries keep their flavor.
    Remove {
        /// Flavor name.
        name: String,

        /// Confirm removal of a flavor that entries still use.
        #[arg(long)]
        yes: bool,
    },
}

/// Actions for the `settings` subcommand.
#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Show current settings.
    Show {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Turn time-of-day tracking on or off.
    TrackTime {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        enabled: bool,
    },
    /// Turn cost tracking on or off.
    TrackCost {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        enabled: bool,
    },
    /// Set the cost pre-filled into new entries.
    DefaultCost {
        /// Non-negative amount.
        #[arg(allow_negative_numbers = true)]
        cost: f64,
    },
}
