//! Core domain logic for the can tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - The event log, flavor registry and settings, with their invariants
//! - Statistics: streaks, totals, period comparisons and recaps
//! - Persistence: snapshots of tracker state in a key-value backend

mod event;
mod export;
mod flavor;
pub mod period;
pub mod persist;
mod settings;
pub mod stats;
mod store;
mod tracker;
mod types;

pub use event::{Event, EventDraft};
pub use export::{EXPORT_HEADER, ExportRow, export_rows};
pub use flavor::{DEFAULT_FLAVORS, FlavorRegistry};
pub use persist::{KvStore, MemoryStore, PersistenceError, Snapshot};
pub use settings::{DEFAULT_COST, SettingUpdate, Settings};
pub use store::EventStore;
pub use tracker::Tracker;
pub use types::{
    DATE_FORMAT, EventId, InvariantViolation, TIME_FORMAT, TrackerError, ValidationError,
    normalize_person, parse_date, parse_time, validate_cost,
};
