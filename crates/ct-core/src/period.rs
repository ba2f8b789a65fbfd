//! Calendar-period statistics: week/month comparison and recaps.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::event::Event;
use crate::stats::CAFFEINE_PER_CAN_MG;

/// Most recent Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// First day of `date`'s month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month before `date`'s month.
pub fn previous_month_start(date: NaiveDate) -> NaiveDate {
    let this_month = month_start(date);
    this_month
        .pred_opt()
        .map_or(this_month, month_start)
}

/// Event counts for the current and previous week and month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodComparison {
    pub this_week: usize,
    pub last_week: usize,
    pub this_month: usize,
    pub last_month: usize,
}

/// Compares activity in the current period against the previous one.
///
/// Weeks start on Sunday regardless of locale. "This" periods count every
/// event dated on or after their start; "last" periods are half-open and end
/// where the current one begins. Only dates are compared.
pub fn period_comparison(events: &[Event], today: NaiveDate) -> PeriodComparison {
    let this_week = week_start(today);
    let last_week = this_week - Duration::days(7);
    let this_month = month_start(today);
    let last_month = previous_month_start(today);

    let mut comparison = PeriodComparison::default();
    for date in events.iter().map(|e| e.date) {
        if date >= this_week {
            comparison.this_week += 1;
        } else if date >= last_week {
            comparison.last_week += 1;
        }
        if date >= this_month {
            comparison.this_month += 1;
        } else if date >= last_month {
            comparison.last_month += 1;
        }
    }
    comparison
}

/// The calendar bucket of a recap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecapPeriod {
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl RecapPeriod {
    /// Sort key: `YYYY-MM` for months, `YYYY` for years.
    pub fn key(&self) -> String {
        match self {
            Self::Month { year, month } => format!("{year}-{month:02}"),
            Self::Year { year } => year.to_string(),
        }
    }

    /// Display label such as "March 2024" or "Year 2024".
    pub fn label(&self) -> String {
        match *self {
            Self::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1).map_or_else(
                || self.key(),
                |first| first.format("%B %Y").to_string(),
            ),
            Self::Year { year } => format!("Year {year}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RecapTotals {
    pub count: usize,
    pub caffeine_mg: u64,
    /// Summed whether or not cost tracking is on.
    pub cost: f64,
}

impl RecapTotals {
    fn record(&mut self, event: &Event) {
        self.count += 1;
        self.caffeine_mg += CAFFEINE_PER_CAN_MG;
        self.cost += event.cost.unwrap_or(0.0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recap {
    pub key: String,
    pub period: RecapPeriod,
    #[serde(flatten)]
    pub totals: RecapTotals,
}

/// Monthly and yearly totals, optionally for a single person.
///
/// Each event counts toward both its month and its year. The combined list
/// is sorted by key descending, so each year's months (newest first) come
/// right before that year's own entry.
pub fn recaps(events: &[Event], person: Option<&str>) -> Vec<Recap> {
    let mut months: BTreeMap<(i32, u32), RecapTotals> = BTreeMap::new();
    let mut years: BTreeMap<i32, RecapTotals> = BTreeMap::new();

    for event in events
        .iter()
        .filter(|e| person.is_none_or(|p| e.person == p))
    {
        let (year, month) = (event.date.year(), event.date.month());
        months.entry((year, month)).or_default().record(event);
        years.entry(year).or_default().record(event);
    }

    let mut recaps: Vec<Recap> = months
        .into_iter()
        .map(|((year, month), totals)| (RecapPeriod::Month { year, month }, totals))
        .chain(
            years
                .into_iter()
                .map(|(year, totals)| (RecapPeriod::Year { year }, totals)),
        )
        .map(|(period, totals)| Recap {
            key: period.key(),
            period,
            totals,
        })
        .collect();
    recaps.sort_by(|a, b| b.key.cmp(&a.key));
    recaps
}
