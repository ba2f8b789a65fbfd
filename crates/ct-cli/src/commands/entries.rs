//! Entry commands: `ct add`, `ct delete` and `ct list`.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use ct_core::{Event, EventId, ExportRow, KvStore, Tracker, stats};

use super::util::format_cost;

/// Explicit values for a new entry. Anything unset keeps the draft default.
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub flavor: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub cost: Option<f64>,
}

/// Logs a can for `person`.
pub fn add<S: KvStore, W: Write>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    person: &str,
    options: AddOptions,
) -> Result<()> {
    let draft = tracker.draft_mut();
    draft.person = person.to_string();
    if let Some(flavor) = options.flavor {
        draft.flavor = flavor;
    }
    if let Some(date) = options.date {
        draft.date = date;
    }
    if options.time.is_some() {
        draft.time = options.time;
    }
    if options.cost.is_some() {
        draft.cost = options.cost;
    }

    let event = tracker.submit_draft().context("failed to log entry")?;
    writeln!(
        writer,
        "Logged #{} {}: {} on {}",
        event.id, event.person, event.flavor, event.date
    )?;
    Ok(())
}

/// Deletes an entry. An unknown id is reported, not treated as an error.
pub fn delete<S: KvStore, W: Write>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    id: EventId,
) -> Result<()> {
    if tracker.delete_event(id) {
        writeln!(writer, "Deleted #{id}")?;
    } else {
        writeln!(writer, "No entry #{id}")?;
    }
    Ok(())
}

/// Lists entries newest first, at most `limit` of them when given.
///
/// A limit of zero means no limit.
pub fn list<S: KvStore, W: Write>(
    writer: &mut W,
    tracker: &Tracker<S>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let events = tracker.events();
    let limit = limit.filter(|&n| n > 0).unwrap_or(events.len());
    let shown = stats::recent(events, limit);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&shown)?)?;
        return Ok(());
    }

    if shown.is_empty() {
        writeln!(writer, "No entries yet.")?;
        return Ok(());
    }

    let id_width = shown
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(1);
    for event in shown {
        writeln!(writer, "{}", format_entry(event, tracker, id_width))?;
    }
    Ok(())
}

fn format_entry<S: KvStore>(event: &Event, tracker: &Tracker<S>, id_width: usize) -> String {
    let settings = tracker.settings();
    let row = ExportRow::from(event);

    let mut line = format!("#{:<id_width$}  {}", event.id.to_string(), row.date);
    if settings.track_time && !row.time.is_empty() {
        line.push(' ');
        line.push_str(&row.time);
    }
    line.push_str("  ");
    line.push_str(&row.person);
    line.push_str("  ");
    line.push_str(&row.flavor);
    if settings.track_cost {
        if let Some(cost) = event.cost {
            line.push_str("  ");
            line.push_str(&format_cost(cost));
        }
    }
    line
}
