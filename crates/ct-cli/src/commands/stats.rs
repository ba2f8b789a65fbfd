//! Dashboard command: totals, streaks, period comparison and time of day.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use ct_core::period::{PeriodComparison, period_comparison};
use ct_core::stats::{Dashboard, TimeOfDayCount, dashboard, leaderboard, time_of_day_histogram};
use ct_core::{Event, KvStore, Settings, Tracker};
use serde::Serialize;

use super::util::{format_caffeine, format_cost, plural};

/// Current streak for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonStreak {
    pub person: String,
    pub streak: u32,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    pub streaks: Vec<PersonStreak>,
    pub comparison: PeriodComparison,
    /// Empty when time tracking is off.
    pub time_of_day: Vec<TimeOfDayCount>,
}

pub fn build_report(events: &[Event], settings: &Settings, today: NaiveDate) -> StatsReport {
    let streaks = leaderboard(events, settings)
        .into_iter()
        .map(|summary| PersonStreak {
            person: summary.person,
            streak: summary.stats.streak,
        })
        .collect();
    StatsReport {
        dashboard: dashboard(events, settings),
        streaks,
        comparison: period_comparison(events, today),
        time_of_day: time_of_day_histogram(events, settings),
    }
}

pub fn run<S: KvStore, W: Write>(
    writer: &mut W,
    tracker: &Tracker<S>,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let report = build_report(tracker.events(), tracker.settings(), today);
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_report(&report, tracker.settings()))?;
    }
    Ok(())
}

pub fn format_report(report: &StatsReport, settings: &Settings) -> String {
    let mut output = String::new();
    let dashboard = &report.dashboard;

    if dashboard.total_events == 0 {
        output.push_str("No cans logged yet.\n");
        return output;
    }

    writeln!(output, "Cans:      {}", dashboard.total_events).unwrap();
    writeln!(output, "Caffeine:  {}", format_caffeine(dashboard.caffeine_mg)).unwrap();
    if settings.track_cost {
        writeln!(output, "Spent:     {}", format_cost(dashboard.cost)).unwrap();
    }
    if let Some(leader) = &dashboard.leader {
        writeln!(output, "Leader:    {leader}").unwrap();
    }

    output.push_str("\nStreaks\n");
    let width = report
        .streaks
        .iter()
        .map(|s| s.person.chars().count())
        .max()
        .unwrap_or(0);
    for entry in &report.streaks {
        writeln!(
            output,
            "  {:<width$}  {}",
            entry.person,
            plural(entry.streak, "day")
        )
        .unwrap();
    }

    let c = &report.comparison;
    output.push('\n');
    writeln!(output, "This week   {:<4} (last week {})", c.this_week, c.last_week).unwrap();
    writeln!(output, "This month  {:<4} (last month {})", c.this_month, c.last_month).unwrap();

    // Bands only matter once at least one entry has a time.
    if report.time_of_day.iter().any(|band| band.count > 0) {
        output.push_str("\nTime of day\n");
        for band in &report.time_of_day {
            writeln!(output, "  {:<9}  {}", band.period.as_str(), band.count).unwrap();
        }
    }

    output
}
