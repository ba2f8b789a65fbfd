//! Reset command: wipes stored data.

use std::io::Write;

use anyhow::{Context, Result, bail};
use ct_core::{KvStore, Tracker};

pub fn run<S: KvStore, W: Write>(writer: &mut W, tracker: &mut Tracker<S>, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("reset deletes all entries, flavors and settings; pass --yes to confirm");
    }
    tracker.reset().context("failed to reset stored data")?;
    tracing::info!("stored data reset");
    writeln!(writer, "All data deleted. Defaults restored.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use ct_core::{EventDraft, MemoryStore, Snapshot};

    fn tracker() -> Tracker<MemoryStore> {
        let mut tracker = Tracker::load(MemoryStore::default());
        let date: NaiveDate = "2024-01-01".parse().unwrap();
        tracker
            .add_event(EventDraft::new("alice", "Original", date))
            .unwrap();
        tracker
    }

    #[test]
    fn requires_confirmation() {
        let mut tracker = tracker();
        let err = run(&mut Vec::new(), &mut tracker, false).unwrap_err();
        assert!(err.to_string().contains("--yes"));
        assert_eq!(tracker.events().len(), 1);
    }

    #[test]
    fn confirmed_reset_clears_everything() {
        let mut tracker = tracker();
        let mut out = Vec::new();
        run(&mut out, &mut tracker, true).unwrap();

        assert!(tracker.events().is_empty());
        assert_eq!(Snapshot::load(tracker.store()), Snapshot::default());
    }
}
