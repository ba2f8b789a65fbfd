//! Tabular projection of events for export and recent-entry listings.

use serde::Serialize;

use crate::event::Event;
use crate::stats::CAFFEINE_PER_CAN_MG;
use crate::types::{DATE_FORMAT, TIME_FORMAT};

/// Column headers, in the order [`ExportRow`] serializes its fields.
pub const EXPORT_HEADER: [&str; 6] = ["Person", "Flavor", "Date", "Time", "Cost", "Caffeine (mg)"];

/// One row per event, every column rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub person: String,
    pub flavor: String,
    pub date: String,
    /// Empty when the event has no time.
    pub time: String,
    /// Empty when the event has no cost.
    pub cost: String,
    pub caffeine_mg: u64,
}

impl From<&Event> for ExportRow {
    fn from(event: &Event) -> Self {
        Self {
            person: event.person.clone(),
            flavor: event.flavor.clone(),
            date: event.date.format(DATE_FORMAT).to_string(),
            time: event
                .time
                .map(|t| t.format(TIME_FORMAT).to_string())
                .unwrap_or_default(),
            cost: event.cost.map(|c| c.to_string()).unwrap_or_default(),
            caffeine_mg: CAFFEINE_PER_CAN_MG,
        }
    }
}

/// Rows for every event in insertion order.
pub fn export_rows(events: &[Event]) -> Vec<ExportRow> {
    events.iter().map(ExportRow::from).collect()
}
