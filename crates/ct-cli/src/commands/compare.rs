//! Side-by-side comparison of everyone who has logged a can.

use std::io::Write;

use anyhow::Result;
use ct_core::stats::leaderboard;
use ct_core::{KvStore, Tracker};

use super::util::{cans, format_caffeine, format_cost, plural};

pub fn run<S: KvStore, W: Write>(writer: &mut W, tracker: &Tracker<S>, json: bool) -> Result<()> {
    let board = leaderboard(tracker.events(), tracker.settings());

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&board)?)?;
        return Ok(());
    }

    if board.is_empty() {
        writeln!(writer, "No cans logged yet.")?;
        return Ok(());
    }

    let track_cost = tracker.settings().track_cost;
    for (rank, summary) in board.iter().enumerate() {
        let stats = &summary.stats;
        write!(
            writer,
            "{}. {}\n   {}, {} caffeine, streak {}",
            rank + 1,
            summary.person,
            cans(stats.total),
            format_caffeine(stats.caffeine_mg),
            plural(stats.streak, "day"),
        )?;
        if track_cost {
            write!(writer, ", spent {}", format_cost(stats.cost))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
