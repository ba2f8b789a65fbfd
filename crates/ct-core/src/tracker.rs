//! The tracker: owned application state plus its persistence backend.

use chrono::{Local, NaiveDateTime, Utc};

use crate::event::{Event, EventDraft};
use crate::flavor::FlavorRegistry;
use crate::persist::{KvStore, PersistenceError, Snapshot};
use crate::settings::{SettingUpdate, Settings};
use crate::stats;
use crate::types::{EventId, TrackerError};

/// Event log, flavor registry and settings, loaded from and saved to a
/// [`KvStore`].
///
/// Every successful mutation writes a full snapshot. A failed write is
/// logged and otherwise ignored: in-memory state stays authoritative for the
/// rest of the session.
#[derive(Debug)]
pub struct Tracker<S: KvStore> {
    store: S,
    state: Snapshot,
    draft: EventDraft,
}

impl<S: KvStore> Tracker<S> {
    /// Loads state from `store`, falling back to defaults for anything absent.
    pub fn load(store: S) -> Self {
        Self::load_at(store, Local::now().naive_local())
    }

    /// Like [`load`](Self::load), with an explicit local time for the draft.
    pub fn load_at(store: S, now: NaiveDateTime) -> Self {
        let state = Snapshot::load(&store);
        let draft = EventDraft::fresh(&state.settings, &state.flavors, now);
        tracing::debug!(
            events = state.events.len(),
            flavors = state.flavors.len(),
            "tracker loaded"
        );
        Self {
            store,
            state,
            draft,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// All events in insertion order.
    pub fn events(&self) -> &[Event] {
        self.state.events.events()
    }

    pub const fn flavors(&self) -> &FlavorRegistry {
        &self.state.flavors
    }

    pub const fn settings(&self) -> &Settings {
        &self.state.settings
    }

    /// The entry being composed.
    pub const fn draft(&self) -> &EventDraft {
        &self.draft
    }

    pub const fn draft_mut(&mut self) -> &mut EventDraft {
        &mut self.draft
    }

    /// Validates and appends an event, then saves.
    pub fn add_event(&mut self, draft: EventDraft) -> Result<Event, TrackerError> {
        let event = self
            .state
            .events
            .add(draft, &self.state.flavors, Utc::now())?;
        tracing::debug!(id = %event.id, person = %event.person, date = %event.date, "event added");
        self.persist();
        Ok(event)
    }

    /// Submits the current draft.
    ///
    /// On success the draft starts over, keeping the person. On failure the
    /// draft is left as it was.
    pub fn submit_draft(&mut self) -> Result<Event, TrackerError> {
        let event = self.add_event(self.draft.clone())?;
        let mut fresh = EventDraft::fresh(
            &self.state.settings,
            &self.state.flavors,
            Local::now().naive_local(),
        );
        fresh.person.clone_from(&event.person);
        self.draft = fresh;
        Ok(event)
    }

    /// Deletes an event by id, returning whether it existed. Always saves.
    pub fn delete_event(&mut self, id: EventId) -> bool {
        let removed = self.state.events.delete(id);
        tracing::debug!(%id, removed, "delete event");
        self.persist();
        removed
    }

    pub fn add_flavor(&mut self, name: &str) -> Result<(), TrackerError> {
        self.state.flavors.add(name)?;
        tracing::debug!(flavor = name.trim(), "flavor added");
        self.persist();
        Ok(())
    }

    /// Whether removing `name` would orphan existing events.
    ///
    /// Callers are expected to confirm with the user before removing a flavor
    /// for which this is true.
    pub fn flavor_in_use(&self, name: &str) -> bool {
        stats::flavor_in_use(self.events(), name)
    }

    /// Removes a flavor, returning whether it was registered.
    ///
    /// Refuses to remove the last flavor. Events keep their flavor string.
    pub fn remove_flavor(&mut self, name: &str) -> Result<bool, TrackerError> {
        let removed = self.state.flavors.remove(name)?;
        if removed && self.draft.flavor == name {
            self.draft.flavor = self.state.flavors.first().to_string();
        }
        tracing::debug!(flavor = name, removed, "remove flavor");
        self.persist();
        Ok(removed)
    }

    /// Changes a single setting and saves.
    ///
    /// A new default cost is copied into the draft; stored events are never
    /// rewritten.
    pub fn update_setting(&mut self, update: SettingUpdate) -> Result<(), TrackerError> {
        self.state.settings.apply(update)?;
        if let SettingUpdate::DefaultCost(cost) = update {
            self.draft.cost = Some(cost);
        }
        tracing::debug!(key = update.key(), "setting updated");
        self.persist();
        Ok(())
    }

    /// Deletes all stored state and returns to first-run defaults.
    ///
    /// Unlike ordinary mutations, a backend failure here is returned.
    pub fn reset(&mut self) -> Result<(), PersistenceError> {
        Snapshot::clear(&mut self.store)?;
        self.state = Snapshot::default();
        self.draft = EventDraft::fresh(
            &self.state.settings,
            &self.state.flavors,
            Local::now().naive_local(),
        );
        tracing::debug!("tracker reset");
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(err) = self.state.save(&mut self.store) {
            tracing::warn!(error = %err, "failed to save tracker state, keeping in-memory changes");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use chrono::NaiveDate;

    use super::*;
    use crate::persist::{ENTRIES_KEY, MemoryStore};
    use crate::stats::{all_people, person_stats};
    use crate::types::{InvariantViolation, ValidationError};

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn tracker() -> Tracker<MemoryStore> {
        let now = day("2024-01-01").and_hms_opt(9, 0, 0).unwrap();
        Tracker::load_at(MemoryStore::default(), now)
    }

    #[derive(Debug)]
    struct Unavailable;

    impl fmt::Display for Unavailable {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("backend unavailable")
        }
    }

    impl std::error::Error for Unavailable {}

    /// Backend that can read nothing and write nothing.
    #[derive(Debug, Default)]
    struct BrokenStore {
        writes: usize,
    }

    impl KvStore for BrokenStore {
        type Error = Unavailable;

        fn get(&self, _key: &str) -> Result<Option<String>, Self::Error> {
            Err(Unavailable)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), Self::Error> {
            self.writes += 1;
            Err(Unavailable)
        }

        fn delete(&mut self, _key: &str) -> Result<(), Self::Error> {
            Err(Unavailable)
        }
    }

    #[test]
    fn first_run_scenario() {
        let mut tracker = tracker();
        assert_eq!(tracker.flavors().len(), 13);
        assert!(tracker.events().is_empty());
        assert!(!tracker.settings().track_cost);

        tracker
            .add_event(EventDraft::new("alice", "Original", day("2024-01-01")))
            .unwrap();

        assert_eq!(all_people(tracker.events()), ["Alice"]);
        let stats = person_stats("Alice", tracker.events(), tracker.settings());
        assert_eq!(stats.total, 1);
        assert_eq!(stats.caffeine_mg, 80);
        assert!(stats.cost.abs() < f64::EPSILON);
    }

    #[test]
    fn mutations_are_persisted() {
        let mut tracker = tracker();
        tracker
            .add_event(EventDraft::new("bob", "Tropical", day("2024-01-02")))
            .unwrap();
        tracker.add_flavor("Peach").unwrap();
        tracker
            .update_setting(SettingUpdate::TrackTime(true))
            .unwrap();

        let reloaded = Tracker::load(tracker.into_store());
        assert_eq!(reloaded.events().len(), 1);
        assert_eq!(reloaded.events()[0].person, "Bob");
        assert!(reloaded.flavors().contains("Peach"));
        assert!(reloaded.settings().track_time);
    }

    #[test]
    fn rejected_mutation_leaves_state_and_store_untouched() {
        let mut tracker = tracker();
        let err = tracker
            .add_event(EventDraft::new("  ", "Original", day("2024-01-02")))
            .unwrap_err();
        assert_eq!(err, TrackerError::Validation(ValidationError::Empty { field: "person" }));
        assert!(tracker.events().is_empty());
        assert!(tracker.store().get(ENTRIES_KEY).unwrap().is_none());
    }

    #[test]
    fn delete_is_idempotent() {
        let mut tracker = tracker();
        let event = tracker
            .add_event(EventDraft::new("bob", "Original", day("2024-01-02")))
            .unwrap();
        assert!(tracker.delete_event(event.id));
        assert!(!tracker.delete_event(event.id));
        assert!(tracker.events().is_empty());
    }

    #[test]
    fn stale_delete_after_reload_spares_newer_entry() {
        let mut tracker = tracker();
        tracker
            .add_event(EventDraft::new("alice", "Original", day("2024-01-02")))
            .unwrap();
        let newest = tracker
            .add_event(EventDraft::new("bob", "Original", day("2024-01-02")))
            .unwrap();
        assert!(tracker.delete_event(newest.id));

        let mut tracker = Tracker::load(tracker.into_store());
        let replacement = tracker
            .add_event(EventDraft::new("cara", "Original", day("2024-01-03")))
            .unwrap();
        assert_ne!(replacement.id, newest.id);

        assert!(!tracker.delete_event(newest.id));
        assert_eq!(tracker.events().len(), 2);
        assert_eq!(tracker.events()[1].person, "Cara");
    }

    #[test]
    fn removing_flavor_keeps_orphaned_events() {
        let mut tracker = tracker();
        tracker
            .add_event(EventDraft::new("bob", "Tropical", day("2024-01-02")))
            .unwrap();
        assert!(tracker.flavor_in_use("Tropical"));

        assert_eq!(tracker.remove_flavor("Tropical"), Ok(true));
        assert!(!tracker.flavors().contains("Tropical"));
        assert_eq!(tracker.events()[0].flavor, "Tropical");
        assert!(tracker.flavor_in_use("Tropical"));
    }

    #[test]
    fn removing_last_flavor_is_refused() {
        let mut tracker = tracker();
        let names: Vec<String> = tracker.flavors().iter().map(String::from).collect();
        for name in &names[1..] {
            tracker.remove_flavor(name).unwrap();
        }
        assert_eq!(tracker.flavors().len(), 1);
        assert_eq!(
            tracker.remove_flavor("Original"),
            Err(TrackerError::Invariant(InvariantViolation::LastFlavor {
                name: "Original".into()
            }))
        );
    }

    #[test]
    fn removing_draft_flavor_resets_draft_selection() {
        let mut tracker = tracker();
        tracker.draft_mut().flavor = "Tropical".into();
        tracker.remove_flavor("Tropical").unwrap();
        assert_eq!(tracker.draft().flavor, "Original");
    }

    #[test]
    fn default_cost_updates_draft_not_events() {
        let mut tracker = tracker();
        tracker
            .update_setting(SettingUpdate::TrackCost(true))
            .unwrap();
        tracker
            .add_event(EventDraft::new("bob", "Original", day("2024-01-02")).with_cost(2.5))
            .unwrap();

        tracker
            .update_setting(SettingUpdate::DefaultCost(4.0))
            .unwrap();
        assert_eq!(tracker.draft().cost, Some(4.0));
        assert_eq!(tracker.events()[0].cost, Some(2.5));

        let err = tracker
            .update_setting(SettingUpdate::DefaultCost(-1.0))
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
        assert!((tracker.settings().default_cost - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn submit_draft_keeps_person() {
        let mut tracker = tracker();
        tracker.draft_mut().person = "  carol".into();
        let event = tracker.submit_draft().unwrap();
        assert_eq!(event.person, "Carol");
        assert_eq!(tracker.draft().person, "Carol");
        assert_eq!(tracker.draft().flavor, "Original");

        tracker.draft_mut().person = String::new();
        assert!(tracker.submit_draft().is_err());
        assert_eq!(tracker.events().len(), 1);
    }

    #[test]
    fn failed_backend_keeps_in_memory_state() {
        let mut tracker = Tracker::load(BrokenStore::default());
        assert_eq!(tracker.flavors().len(), 13);

        tracker
            .add_event(EventDraft::new("dave", "Original", day("2024-01-02")))
            .unwrap();
        assert_eq!(tracker.events().len(), 1);
        assert!(tracker.store().writes > 0);
        assert!(tracker.reset().is_err());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut tracker = tracker();
        tracker.add_flavor("Peach").unwrap();
        tracker
            .add_event(EventDraft::new("erin", "Peach", day("2024-01-02")))
            .unwrap();

        tracker.reset().unwrap();
        assert!(tracker.events().is_empty());
        assert_eq!(tracker.flavors(), &FlavorRegistry::default());
        assert!(tracker.store().is_empty());
    }
}
