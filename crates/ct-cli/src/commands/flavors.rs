//! Flavor registry commands.

use std::io::Write;

use anyhow::{Result, bail};
use ct_core::{KvStore, Tracker};

use super::util::cans;

pub fn list<S: KvStore, W: Write>(writer: &mut W, tracker: &Tracker<S>) -> Result<()> {
    let events = tracker.events();
    for flavor in tracker.flavors().iter() {
        let used = events.iter().filter(|e| e.flavor == flavor).count();
        if used == 0 {
            writeln!(writer, "{flavor}")?;
        } else {
            writeln!(writer, "{flavor} ({})", cans(used))?;
        }
    }
    Ok(())
}

pub fn add<S: KvStore, W: Write>(writer: &mut W, tracker: &mut Tracker<S>, name: &str) -> Result<()> {
    tracker.add_flavor(name)?;
    writeln!(writer, "Added flavor {}", name.trim())?;
    Ok(())
}

/// Removes a flavor. One still referenced by entries needs `confirmed`.
pub fn remove<S: KvStore, W: Write>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    name: &str,
    confirmed: bool,
) -> Result<()> {
    // The last flavor is refused by the registry itself, whatever the flag.
    if tracker.flavors().len() > 1 && tracker.flavor_in_use(name) && !confirmed {
        bail!("flavor {name:?} is used by existing entries; pass --yes to remove it anyway");
    }
    if tracker.remove_flavor(name)? {
        writeln!(writer, "Removed flavor {name}")?;
    } else {
        writeln!(writer, "No flavor named {name}")?;
    }
    Ok(())
}
