//! Settings commands.

use std::io::Write;

use anyhow::Result;
use ct_core::{KvStore, SettingUpdate, Tracker};

use super::util::{format_cost, on_off};

pub fn show<S: KvStore, W: Write>(writer: &mut W, tracker: &Tracker<S>, json: bool) -> Result<()> {
    let settings = tracker.settings();
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(settings)?)?;
        return Ok(());
    }
    writeln!(writer, "Track time:    {}", on_off(settings.track_time))?;
    writeln!(writer, "Track cost:    {}", on_off(settings.track_cost))?;
    writeln!(writer, "Default cost:  {}", format_cost(settings.default_cost))?;
    Ok(())
}

pub fn update<S: KvStore, W: Write>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    update: SettingUpdate,
) -> Result<()> {
    tracker.update_setting(update)?;
    match update {
        SettingUpdate::TrackTime(enabled) => {
            writeln!(writer, "Time tracking {}", on_off(enabled))?;
        }
        SettingUpdate::TrackCost(enabled) => {
            writeln!(writer, "Cost tracking {}", on_off(enabled))?;
        }
        SettingUpdate::DefaultCost(cost) => {
            writeln!(writer, "Default cost set to {}", format_cost(cost))?;
        }
    }
    Ok(())
}
