//! Monthly and yearly recaps, combined or for one person.

use std::io::Write;

use anyhow::Result;
use ct_core::period::recaps;
use ct_core::{KvStore, Tracker, normalize_person};

use super::util::{cans, format_caffeine, format_cost};

pub fn run<S: KvStore, W: Write>(
    writer: &mut W,
    tracker: &Tracker<S>,
    person: Option<&str>,
    json: bool,
) -> Result<()> {
    let person = person.map(normalize_person);
    let recaps = recaps(tracker.events(), person.as_deref());

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&recaps)?)?;
        return Ok(());
    }

    match &person {
        Some(person) => writeln!(writer, "{person}'s recaps")?,
        None => writeln!(writer, "Combined recaps")?,
    }
    if recaps.is_empty() {
        writeln!(writer, "No recaps yet.")?;
        return Ok(());
    }

    let labels: Vec<String> = recaps.iter().map(|r| r.period.label()).collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let track_cost = tracker.settings().track_cost;
    for (recap, label) in recaps.iter().zip(&labels) {
        let totals = &recap.totals;
        write!(
            writer,
            "  {label:<width$}  {:<8}  {}",
            cans(totals.count),
            format_caffeine(totals.caffeine_mg)
        )?;
        if track_cost {
            write!(writer, "  {}", format_cost(totals.cost))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use ct_core::{EventDraft, MemoryStore};
    use insta::assert_snapshot;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn tracker() -> Tracker<MemoryStore> {
        let now = day("2024-03-14").and_hms_opt(9, 0, 0).unwrap();
        let mut tracker = Tracker::load_at(MemoryStore::default(), now);
        for (person, date) in [
            ("alice", "2024-03-01"),
            ("alice", "2024-03-20"),
            ("bob", "2024-01-05"),
            ("alice", "2023-12-31"),
        ] {
            tracker
                .add_event(EventDraft::new(person, "Original", day(date)).with_cost(2.0))
                .unwrap();
        }
        tracker
    }

    fn render(tracker: &Tracker<MemoryStore>, person: Option<&str>) -> String {
        let mut out = Vec::new();
        run(&mut out, tracker, person, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn combined_recaps_newest_first() {
        assert_snapshot!(render(&tracker(), None), @r"
        Combined recaps
          March 2024     2 cans    160 mg
          January 2024   1 can     80 mg
          Year 2024      3 cans    240 mg
          December 2023  1 can     80 mg
          Year 2023      1 can     80 mg
        ");
    }

    #[test]
    fn person_filter_is_normalized() {
        let output = render(&tracker(), Some("BOB"));
        assert!(output.starts_with("Bob's recaps\n"));
        assert!(output.contains("January 2024"));
        assert!(!output.contains("March 2024"));
    }

    #[test]
    fn unknown_person_has_no_recaps() {
        assert_eq!(render(&tracker(), Some("zed")), "Zed's recaps\nNo recaps yet.\n");
    }
}
