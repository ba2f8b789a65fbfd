//! Derived statistics over the event log.
//!
//! Every function here is pure: results depend only on the events, settings
//! and reference date passed in, and are recomputed in full on each call.

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, Timelike};
use serde::Serialize;

use crate::event::Event;
use crate::settings::Settings;

/// Caffeine attributed to every logged can, regardless of flavor.
pub const CAFFEINE_PER_CAN_MG: u64 = 80;

/// Caffeine in milligrams for `count` cans.
pub const fn caffeine_for_count(count: usize) -> u64 {
    count as u64 * CAFFEINE_PER_CAN_MG
}

/// Sums the cost of `events`, counting a missing cost as zero.
///
/// Ignores the cost-tracking toggle; see [`total_cost`] for the gated sum.
pub fn sum_cost<'a>(events: impl IntoIterator<Item = &'a Event>) -> f64 {
    events.into_iter().filter_map(|e| e.cost).sum()
}

/// Sums the cost of `events`, or zero when cost tracking is off.
pub fn total_cost<'a>(events: impl IntoIterator<Item = &'a Event>, settings: &Settings) -> f64 {
    if settings.track_cost {
        sum_cost(events)
    } else {
        0.0
    }
}

/// Number of consecutive calendar days, counted backward from the person's
/// most recent entry, on which the person logged at least one event.
///
/// Several entries on the same date count as one day: the walk is over
/// distinct dates, so a same-day duplicate neither extends nor breaks the
/// streak. The first gap longer than one day ends it.
pub fn streak(person: &str, events: &[Event]) -> u32 {
    let mut dates: Vec<NaiveDate> = events
        .iter()
        .filter(|e| e.person == person)
        .map(|e| e.date)
        .collect();
    if dates.is_empty() {
        return 0;
    }
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();

    let mut streak = 1;
    for pair in dates.windows(2) {
        if (pair[0] - pair[1]).num_days() != 1 {
            break;
        }
        streak += 1;
    }
    streak
}

/// Per-person totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersonStats {
    pub total: usize,
    pub caffeine_mg: u64,
    /// Zero unless cost tracking is on.
    pub cost: f64,
    pub streak: u32,
}

pub fn person_stats(person: &str, events: &[Event], settings: &Settings) -> PersonStats {
    let own: Vec<&Event> = events.iter().filter(|e| e.person == person).collect();
    PersonStats {
        total: own.len(),
        caffeine_mg: caffeine_for_count(own.len()),
        cost: total_cost(own.iter().copied(), settings),
        streak: streak(person, events),
    }
}

/// Distinct people across all events.
///
/// Callers that display people should sort explicitly; [`leaderboard`] does.
pub fn all_people(events: &[Event]) -> Vec<String> {
    let mut seen = HashSet::new();
    events
        .iter()
        .filter(|e| seen.insert(e.person.as_str()))
        .map(|e| e.person.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonSummary {
    pub person: String,
    #[serde(flatten)]
    pub stats: PersonStats,
}

/// Everyone's stats, most events first, ties broken by name.
pub fn leaderboard(events: &[Event], settings: &Settings) -> Vec<PersonSummary> {
    let mut board: Vec<PersonSummary> = all_people(events)
        .into_iter()
        .map(|person| {
            let stats = person_stats(&person, events, settings);
            PersonSummary { person, stats }
        })
        .collect();
    board.sort_by(|a, b| {
        b.stats
            .total
            .cmp(&a.stats.total)
            .then_with(|| a.person.cmp(&b.person))
    });
    board
}

/// Headline numbers for the whole log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_events: usize,
    pub caffeine_mg: u64,
    /// Zero unless cost tracking is on.
    pub cost: f64,
    /// Person with the most events, if anyone has logged one.
    pub leader: Option<String>,
}

pub fn dashboard(events: &[Event], settings: &Settings) -> Dashboard {
    Dashboard {
        total_events: events.len(),
        caffeine_mg: caffeine_for_count(events.len()),
        cost: total_cost(events, settings),
        leader: leaderboard(events, settings)
            .into_iter()
            .next()
            .map(|summary| summary.person),
    }
}

/// Fixed bands of the day, by local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TimeOfDay {
    /// 05:00 to 11:59.
    Morning,
    /// 12:00 to 16:59.
    Afternoon,
    /// 17:00 to 20:59.
    Evening,
    /// 21:00 to 04:59.
    Night,
}

impl TimeOfDay {
    pub const ALL: [Self; 4] = [Self::Morning, Self::Afternoon, Self::Evening, Self::Night];

    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeOfDayCount {
    pub period: TimeOfDay,
    pub count: usize,
}

/// Events per band of the day.
///
/// Empty when time tracking is off. Otherwise all four bands are returned in
/// fixed order, including empty ones; events without a time are skipped.
pub fn time_of_day_histogram(events: &[Event], settings: &Settings) -> Vec<TimeOfDayCount> {
    if !settings.track_time {
        return Vec::new();
    }
    let mut counts = [0_usize; 4];
    for time in events.iter().filter_map(|e| e.time) {
        let band = TimeOfDay::from_hour(time.hour());
        counts[band as usize] += 1;
    }
    TimeOfDay::ALL
        .iter()
        .zip(counts)
        .map(|(&period, count)| TimeOfDayCount { period, count })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Events per date, oldest date first.
pub fn daily_counts(events: &[Event]) -> Vec<DailyCount> {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for event in events {
        *by_date.entry(event.date).or_default() += 1;
    }
    by_date
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

/// The last `limit` events by insertion, newest first.
pub fn recent(events: &[Event], limit: usize) -> Vec<&Event> {
    events.iter().rev().take(limit).collect()
}

/// Whether any event references `flavor`.
pub fn flavor_in_use(events: &[Event], flavor: &str) -> bool {
    events.iter().any(|e| e.flavor == flavor)
}
