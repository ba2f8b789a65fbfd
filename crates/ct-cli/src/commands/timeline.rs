//! Per-day activity timeline.

use std::io::Write;

use anyhow::Result;
use ct_core::stats::daily_counts;
use ct_core::{KvStore, Tracker};

/// Longest bar drawn for a single day.
const MAX_BAR: usize = 40;

pub fn run<S: KvStore, W: Write>(writer: &mut W, tracker: &Tracker<S>, json: bool) -> Result<()> {
    let days = daily_counts(tracker.events());

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&days)?)?;
        return Ok(());
    }

    if days.is_empty() {
        writeln!(writer, "No cans logged yet.")?;
        return Ok(());
    }

    let width = days
        .iter()
        .map(|d| d.count.to_string().len())
        .max()
        .unwrap_or(1);
    for day in &days {
        writeln!(
            writer,
            "{}  {:>width$}  {}",
            day.date,
            day.count,
            "#".repeat(day.count.min(MAX_BAR))
        )?;
    }
    Ok(())
}
