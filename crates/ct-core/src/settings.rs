//! User-adjustable tracker settings.

use serde::{Deserialize, Serialize};

use crate::types::{ValidationError, validate_cost};

/// Default price of a can, in the user's currency.
pub const DEFAULT_COST: f64 = 2.5;

/// Feature toggles and defaults persisted alongside the event log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Record and report time of day.
    pub track_time: bool,
    /// Record costs and include them in dashboard totals.
    pub track_cost: bool,
    /// Cost pre-filled into new entries.
    pub default_cost: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            track_time: false,
            track_cost: false,
            default_cost: DEFAULT_COST,
        }
    }
}

/// A single-field settings change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingUpdate {
    TrackTime(bool),
    TrackCost(bool),
    DefaultCost(f64),
}

impl SettingUpdate {
    /// Name of the field this update touches, as stored.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::TrackTime(_) => "trackTime",
            Self::TrackCost(_) => "trackCost",
            Self::DefaultCost(_) => "defaultCost",
        }
    }
}

impl Settings {
    /// Merges one field into the record.
    ///
    /// A negative or non-finite default cost is rejected and leaves the
    /// record unchanged.
    pub fn apply(&mut self, update: SettingUpdate) -> Result<(), ValidationError> {
        match update {
            SettingUpdate::TrackTime(on) => self.track_time = on,
            SettingUpdate::TrackCost(on) => self.track_cost = on,
            SettingUpdate::DefaultCost(cost) => self.default_cost = validate_cost(cost)?,
        }
        Ok(())
    }
}
