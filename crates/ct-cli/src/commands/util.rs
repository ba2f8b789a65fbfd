//! Shared formatting helpers for CLI commands.

/// Formats an amount of money, e.g. `€2.50`.
pub fn format_cost(amount: f64) -> String {
    format!("€{amount:.2}")
}

/// Formats a count with a unit, pluralizing when needed: `1 day`, `3 days`.
pub fn plural(count: impl Into<u64>, unit: &str) -> String {
    let count = count.into();
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Formats a can count.
pub fn cans(count: usize) -> String {
    plural(u64::try_from(count).unwrap_or(u64::MAX), "can")
}

/// Formats a caffeine total, e.g. `160 mg`.
pub fn format_caffeine(mg: u64) -> String {
    format!("{mg} mg")
}

/// Formats a boolean setting.
pub const fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
