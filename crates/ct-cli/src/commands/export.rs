//! Implementation of the `ct export` command.
//!
//! Writes every entry, oldest first, as CSV. The header row is always
//! written, so an empty log still exports a valid file.

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::Path;

use anyhow::{Context, Result};
use ct_core::{EXPORT_HEADER, Event, KvStore, Tracker, export_rows};

/// Writes `events` as CSV, returning the number of data rows.
pub fn write_csv<W: Write>(writer: W, events: &[Event]) -> Result<usize> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(EXPORT_HEADER)?;

    let rows = export_rows(events);
    for row in &rows {
        csv.serialize(row).context("failed to serialize entry")?;
    }
    csv.flush()?;
    Ok(rows.len())
}

/// Exports to `output`, or to stdout when no path is given.
pub fn run<S: KvStore>(tracker: &Tracker<S>, output: Option<&Path>) -> Result<()> {
    let events = tracker.events();
    let written = if let Some(path) = output {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let written = write_csv(BufWriter::new(file), events)?;
        tracing::info!(rows = written, path = %path.display(), "exported entries");
        written
    } else {
        let stdout = stdout();
        write_csv(BufWriter::new(stdout.lock()), events)?
    };
    tracing::debug!(rows = written, "export finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, NaiveTime};
    use ct_core::{EventDraft, MemoryStore};
    use insta::assert_snapshot;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn empty_log_exports_header_only() {
        let mut out = Vec::new();
        let written = write_csv(&mut out, &[]).unwrap();
        assert_eq!(written, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Person,Flavor,Date,Time,Cost,Caffeine (mg)\n"
        );
    }

    #[test]
    fn rows_follow_insertion_order() {
        let mut tracker = Tracker::load(MemoryStore::default());
        tracker
            .add_event(
                EventDraft::new("alice", "Sugar Free", day("2024-02-01"))
                    .with_time(NaiveTime::from_hms_opt(9, 5, 0).unwrap())
                    .with_cost(2.5),
            )
            .unwrap();
        tracker
            .add_event(EventDraft::new("bob", "Original", day("2024-01-01")))
            .unwrap();

        let mut out = Vec::new();
        write_csv(&mut out, tracker.events()).unwrap();
        assert_snapshot!(String::from_utf8(out).unwrap(), @r"
        Person,Flavor,Date,Time,Cost,Caffeine (mg)
        Alice,Sugar Free,2024-02-01,09:05,2.5,80
        Bob,Original,2024-01-01,,,80
        ");
    }

    #[test]
    fn export_to_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cans.csv");
        let mut tracker = Tracker::load(MemoryStore::default());
        tracker
            .add_event(EventDraft::new("alice", "Original", day("2024-01-01")))
            .unwrap();

        run(&tracker, Some(&path)).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.ends_with("Alice,Original,2024-01-01,,,80\n"));
    }
}
