//! In-memory, insertion-ordered event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventDraft};
use crate::flavor::FlavorRegistry;
use crate::types::{EventId, ValidationError, normalize_person, validate_cost};

/// The ordered collection of logged events.
///
/// Insertion order is preserved and is not the same as date order: entries
/// can be backdated. The store also remembers the next id to hand out, so an
/// id freed by a deletion is never assigned again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredEvents", into = "StoredEvents")]
pub struct EventStore {
    events: Vec<Event>,
    next_id: EventId,
}

/// On-disk shape of the event log.
///
/// Older blobs are a bare array of events; their counter is recovered from
/// the largest id present.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StoredEvents {
    Counted {
        #[serde(rename = "nextId")]
        next_id: EventId,
        events: Vec<Event>,
    },
    Bare(Vec<Event>),
}

impl From<StoredEvents> for EventStore {
    fn from(stored: StoredEvents) -> Self {
        match stored {
            StoredEvents::Counted { next_id, events } => {
                let mut store = Self::from_events(events);
                store.next_id = store.next_id.max(next_id);
                store
            }
            StoredEvents::Bare(events) => Self::from_events(events),
        }
    }
}

impl From<EventStore> for StoredEvents {
    fn from(store: EventStore) -> Self {
        Self::Counted {
            next_id: store.next_id,
            events: store.events,
        }
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            next_id: EventId::FIRST,
        }
    }
}

impl EventStore {
    /// Builds a store whose counter continues after the largest id present.
    pub fn from_events(events: Vec<Event>) -> Self {
        let next_id = events
            .iter()
            .map(|e| e.id)
            .max()
            .map_or(EventId::FIRST, EventId::next);
        Self { events, next_id }
    }

    /// All events in insertion order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The id the next appended event will receive.
    pub const fn next_id(&self) -> EventId {
        self.next_id
    }

    /// Validates a draft and appends it as a new event.
    ///
    /// The person is normalized here, once. Fails if the normalized person is
    /// empty, the flavor is not registered, or the cost is negative.
    pub fn add(
        &mut self,
        draft: EventDraft,
        flavors: &FlavorRegistry,
        created_at: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        let person = normalize_person(&draft.person);
        if person.is_empty() {
            return Err(ValidationError::Empty { field: "person" });
        }
        if !flavors.contains(&draft.flavor) {
            return Err(ValidationError::UnknownFlavor { name: draft.flavor });
        }
        let cost = draft.cost.map(validate_cost).transpose()?;

        let event = Event {
            id: self.next_id(),
            person,
            flavor: draft.flavor,
            date: draft.date,
            time: draft.time,
            cost,
            created_at,
        };
        self.next_id = event.id.next();
        self.events.push(event.clone());
        Ok(event)
    }

    /// Removes the event with `id`, returning whether one was removed.
    ///
    /// Deleting an unknown id is a no-op.
    pub fn delete(&mut self, id: EventId) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        self.events.len() != before
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn created() -> DateTime<Utc> {
        "2024-01-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn add_normalizes_person_and_assigns_ids() {
        let flavors = FlavorRegistry::default();
        let mut store = EventStore::default();

        let first = store
            .add(
                EventDraft::new("  alice ", "Original", date(2024, 1, 1)),
                &flavors,
                created(),
            )
            .unwrap();
        let second = store
            .add(
                EventDraft::new("BOB", "Tropical", date(2023, 12, 31)),
                &flavors,
                created(),
            )
            .unwrap();

        assert_eq!(first.person, "Alice");
        assert_eq!(second.person, "Bob");
        assert_eq!(first.id, EventId::new(1));
        assert_eq!(second.id, EventId::new(2));
        // Insertion order, not date order.
        assert_eq!(store.events()[0].id, first.id);
        assert_eq!(store.events()[1].id, second.id);
    }

    #[test]
    fn add_rejects_blank_person() {
        let mut store = EventStore::default();
        let err = store
            .add(
                EventDraft::new("   ", "Original", date(2024, 1, 1)),
                &FlavorRegistry::default(),
                created(),
            )
            .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "person" });
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_unknown_flavor_and_negative_cost() {
        let flavors = FlavorRegistry::default();
        let mut store = EventStore::default();

        let err = store
            .add(
                EventDraft::new("alice", "Mango", date(2024, 1, 1)),
                &flavors,
                created(),
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownFlavor { .. }));

        let err = store
            .add(
                EventDraft::new("alice", "Original", date(2024, 1, 1)).with_cost(-2.0),
                &flavors,
                created(),
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCost { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_deleting_newest() {
        let flavors = FlavorRegistry::default();
        let mut store = EventStore::default();
        assert_eq!(store.next_id(), EventId::FIRST);

        let a = store
            .add(EventDraft::new("a", "Original", date(2024, 1, 1)), &flavors, created())
            .unwrap();
        let b = store
            .add(EventDraft::new("b", "Original", date(2024, 1, 1)), &flavors, created())
            .unwrap();
        assert!(store.delete(b.id));

        let c = store
            .add(EventDraft::new("c", "Original", date(2024, 1, 1)), &flavors, created())
            .unwrap();
        assert!(c.id > b.id);

        // A repeated delete of the old id leaves the new entry alone.
        assert!(!store.delete(b.id));
        let ids: Vec<EventId> = store.events().iter().map(|e| e.id).collect();
        assert_eq!(ids, [a.id, c.id]);
    }

    #[test]
    fn counter_survives_serialization() {
        let flavors = FlavorRegistry::default();
        let mut store = EventStore::default();
        for person in ["a", "b"] {
            store
                .add(EventDraft::new(person, "Original", date(2024, 1, 1)), &flavors, created())
                .unwrap();
        }
        assert!(store.delete(EventId::new(2)));

        let json = serde_json::to_string(&store).unwrap();
        assert!(json.starts_with(r#"{"nextId":3,"events":["#));
        let loaded: EventStore = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.next_id(), EventId::new(3));
    }

    #[test]
    fn bare_array_continues_after_largest_id() {
        let json = r#"[
            {"id":1700000000000,"person":"Alice","flavor":"Original","date":"2024-01-01",
             "time":null,"cost":null,"createdAt":"2024-01-01T12:00:00Z"},
            {"id":5,"person":"Bob","flavor":"Original","date":"2024-01-02",
             "time":null,"cost":null,"createdAt":"2024-01-02T12:00:00Z"}
        ]"#;
        let store: EventStore = serde_json::from_str(json).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id(), EventId::new(1_700_000_000_001));
    }

    #[test]
    fn stored_counter_never_lags_behind_events() {
        let json = r#"{"nextId":1,"events":[
            {"id":7,"person":"Alice","flavor":"Original","date":"2024-01-01",
             "time":null,"cost":null,"createdAt":"2024-01-01T12:00:00Z"}
        ]}"#;
        let store: EventStore = serde_json::from_str(json).unwrap();
        assert_eq!(store.next_id(), EventId::new(8));
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let flavors = FlavorRegistry::default();
        let mut store = EventStore::default();
        let event = store
            .add(EventDraft::new("a", "Original", date(2024, 1, 1)), &flavors, created())
            .unwrap();

        assert!(!store.delete(EventId::new(99)));
        assert!(store.delete(event.id));
        assert!(!store.delete(event.id));
        assert!(store.get(event.id).is_none());
    }
}
