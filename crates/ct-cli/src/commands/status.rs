//! Status command: where data lives and what it holds.

use std::io::Write;

use anyhow::{Context, Result};
use ct_core::Tracker;
use ct_core::stats::all_people;
use ct_db::SqliteStore;

use super::util::plural;
use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let store = SqliteStore::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    let keys = store.keys()?;
    let tracker = Tracker::load(store);

    writeln!(writer, "Can tracker status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;
    writeln!(writer, "Entries:  {}", tracker.events().len())?;
    writeln!(writer, "People:   {}", all_people(tracker.events()).len())?;
    writeln!(writer, "Flavors:  {}", tracker.flavors().len())?;

    if keys.is_empty() {
        writeln!(writer, "No data stored yet.")?;
        return Ok(());
    }

    writeln!(writer, "Stored keys:")?;
    for key in keys {
        writeln!(
            writer,
            "- {}: {}, updated {}",
            key.key,
            plural(u64::try_from(key.bytes).unwrap_or(u64::MAX), "byte"),
            key.updated_at
        )?;
    }

    Ok(())
}
