use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{CommandFactory, Parser};
use ct_core::{SettingUpdate, Tracker};
use ct_db::SqliteStore;
use tracing_subscriber::EnvFilter;

use ct_cli::commands::entries::AddOptions;
use ct_cli::commands::{compare, entries, export, flavors, recaps, reset, settings, stats, status, timeline};
use ct_cli::{Cli, Commands, Config, FlavorsAction, SettingsAction};

/// Load config, ensuring the database's parent directory exists.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Ok(config)
}

/// Load config and open the tracker on its database.
fn open_tracker(config_path: Option<&Path>) -> Result<(Tracker<SqliteStore>, Config)> {
    let config = load_config(config_path)?;
    let store = SqliteStore::open(&config.database_path).context("failed to open database")?;
    Ok((Tracker::load(store), config))
}

#[expect(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so `ct export` output stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let config_path = cli.config.as_deref();

    match command {
        Commands::Add {
            person,
            flavor,
            date,
            time,
            cost,
        } => {
            let (mut tracker, _config) = open_tracker(config_path)?;
            let options = AddOptions {
                flavor,
                date,
                time,
                cost,
            };
            entries::add(&mut out, &mut tracker, &person, options)?;
        }
        Commands::Delete { id } => {
            let (mut tracker, _config) = open_tracker(config_path)?;
            entries::delete(&mut out, &mut tracker, id)?;
        }
        Commands::List { all, json } => {
            let (tracker, config) = open_tracker(config_path)?;
            let limit = (!all).then_some(config.recent_limit);
            entries::list(&mut out, &tracker, limit, json)?;
        }
        Commands::Stats { json } => {
            let (tracker, _config) = open_tracker(config_path)?;
            stats::run(&mut out, &tracker, Local::now().date_naive(), json)?;
        }
        Commands::Compare { json } => {
            let (tracker, _config) = open_tracker(config_path)?;
            compare::run(&mut out, &tracker, json)?;
        }
        Commands::Recaps { person, json } => {
            let (tracker, _config) = open_tracker(config_path)?;
            recaps::run(&mut out, &tracker, person.as_deref(), json)?;
        }
        Commands::Timeline { json } => {
            let (tracker, _config) = open_tracker(config_path)?;
            timeline::run(&mut out, &tracker, json)?;
        }
        Commands::Flavors(action) => {
            let (mut tracker, _config) = open_tracker(config_path)?;
            match action {
                FlavorsAction::List => flavors::list(&mut out, &tracker)?,
                FlavorsAction::Add { name } => flavors::add(&mut out, &mut tracker, &name)?,
                FlavorsAction::Remove { name, yes } => {
                    flavors::remove(&mut out, &mut tracker, &name, yes)?;
                }
            }
        }
        Commands::Settings(action) => {
            let (mut tracker, _config) = open_tracker(config_path)?;
            let update = match action {
                SettingsAction::Show { json } => {
                    settings::show(&mut out, &tracker, json)?;
                    None
                }
                SettingsAction::TrackTime { enabled } => Some(SettingUpdate::TrackTime(enabled)),
                SettingsAction::TrackCost { enabled } => Some(SettingUpdate::TrackCost(enabled)),
                SettingsAction::DefaultCost { cost } => Some(SettingUpdate::DefaultCost(cost)),
            };
            if let Some(update) = update {
                settings::update(&mut out, &mut tracker, update)?;
            }
        }
        Commands::Export { output } => {
            let (tracker, _config) = open_tracker(config_path)?;
            // The CSV writer takes its own stdout handle
            drop(out);
            return export::run(&tracker, output.as_deref());
        }
        Commands::Status => {
            let config = load_config(config_path)?;
            status::run(&mut out, &config)?;
        }
        Commands::Reset { yes } => {
            let (mut tracker, _config) = open_tracker(config_path)?;
            reset::run(&mut out, &mut tracker, yes)?;
        }
    }

    out.flush()?;
    Ok(())
}
