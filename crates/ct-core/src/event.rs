//! Logged consumption events and the not-yet-submitted entry draft.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::flavor::FlavorRegistry;
use crate::settings::Settings;
use crate::types::EventId;

/// One logged can.
///
/// Events are immutable once stored; the only lifecycle change is deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    /// Normalized display name (see [`normalize_person`](crate::normalize_person)).
    pub person: String,
    /// Flavor label. May no longer be in the registry if the flavor was removed.
    pub flavor: String,
    /// Local civil date, no time zone.
    pub date: NaiveDate,
    /// Optional 24-hour clock time, minute precision.
    #[serde(default, with = "hhmm")]
    pub time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "lenient_cost")]
    pub cost: Option<f64>,
    /// When the event was logged.
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Input for a new event, before normalization and id assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub person: String,
    pub flavor: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub cost: Option<f64>,
}

impl EventDraft {
    /// Creates a draft with no time and no cost.
    pub fn new(person: impl Into<String>, flavor: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            person: person.into(),
            flavor: flavor.into(),
            date,
            time: None,
            cost: None,
        }
    }

    #[must_use]
    pub const fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    #[must_use]
    pub const fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Builds a blank entry the way the entry form starts out.
    ///
    /// Uses the first registered flavor and `now`'s date. The time is `now`
    /// truncated to minutes when time tracking is on, and the cost is the
    /// default cost when cost tracking is on.
    pub fn fresh(settings: &Settings, flavors: &FlavorRegistry, now: NaiveDateTime) -> Self {
        Self {
            person: String::new(),
            flavor: flavors.first().to_string(),
            date: now.date(),
            time: settings
                .track_time
                .then(|| NaiveTime::from_hms_opt(now.hour(), now.minute(), 0))
                .flatten(),
            cost: settings.track_cost.then_some(settings.default_cost),
        }
    }
}

/// Serde adapter storing `Option<NaiveTime>` as `"HH:MM"` or `null`.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    use crate::types::TIME_FORMAT;

    #[expect(
        clippy::ref_option,
        reason = "serialize_with hands the field over by reference"
    )]
    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_some(&t.format(TIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s, TIME_FORMAT)
                .map(Some)
                .map_err(de::Error::custom),
        }
    }
}

/// Accepts numbers and numeric strings; anything else reads as "no cost".
fn lenient_cost<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let cost = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(cost.filter(|c| c.is_finite() && *c >= 0.0))
}
