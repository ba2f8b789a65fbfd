//! Persistence gateway: snapshots of tracker state in a string key-value store.
//!
//! The backend only stores opaque strings by key. Serialization happens here,
//! one JSON document per well-known key, so the three stores load and fail
//! independently of each other.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::error::Error as StdError;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::flavor::FlavorRegistry;
use crate::settings::Settings;
use crate::store::EventStore;

/// Key holding the event log.
pub const ENTRIES_KEY: &str = "ct-entries";
/// Key holding the flavor registry.
pub const FLAVORS_KEY: &str = "ct-flavors";
/// Key holding the settings record.
pub const SETTINGS_KEY: &str = "ct-settings";

/// A string key-value backend.
pub trait KvStore {
    type Error: StdError + Send + Sync + 'static;

    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Removes `key`. Removing an absent key succeeds.
    fn delete(&mut self, key: &str) -> Result<(), Self::Error>;
}

/// Errors writing tracker state to the backend.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backend rejected the operation.
    #[error("storage backend failed for {key}: {source}")]
    Backend {
        key: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    /// A store could not be encoded.
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A purely in-memory backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KvStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), Self::Error> {
        self.values.remove(key);
        Ok(())
    }
}

/// The full persisted state of a tracker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub events: EventStore,
    pub flavors: FlavorRegistry,
    pub settings: Settings,
}

impl Snapshot {
    /// Loads each store from the backend.
    ///
    /// A missing, unreadable or malformed value yields that store's default;
    /// loading never fails.
    pub fn load<S: KvStore>(store: &S) -> Self {
        Self {
            events: load_key(store, ENTRIES_KEY),
            flavors: load_key(store, FLAVORS_KEY),
            settings: load_key(store, SETTINGS_KEY),
        }
    }

    /// Writes all three stores.
    pub fn save<S: KvStore>(&self, store: &mut S) -> Result<(), PersistenceError> {
        save_key(store, ENTRIES_KEY, &self.events)?;
        save_key(store, FLAVORS_KEY, &self.flavors)?;
        save_key(store, SETTINGS_KEY, &self.settings)?;
        tracing::debug!(events = self.events.len(), "saved snapshot");
        Ok(())
    }

    /// Removes all three keys from the backend.
    pub fn clear<S: KvStore>(store: &mut S) -> Result<(), PersistenceError> {
        for key in [ENTRIES_KEY, FLAVORS_KEY, SETTINGS_KEY] {
            store.delete(key).map_err(|e| backend_error(key, e))?;
        }
        Ok(())
    }
}

fn load_key<S, T>(store: &S, key: &'static str) -> T
where
    S: KvStore,
    T: DeserializeOwned + Default,
{
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!(key, "loaded stored value");
                value
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value is malformed, using defaults");
                T::default()
            }
        },
        Ok(None) => {
            tracing::debug!(key, "nothing stored, using defaults");
            T::default()
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to read stored value, using defaults");
            T::default()
        }
    }
}

fn save_key<S, T>(store: &mut S, key: &'static str, value: &T) -> Result<(), PersistenceError>
where
    S: KvStore,
    T: Serialize,
{
    let encoded =
        serde_json::to_string(value).map_err(|source| PersistenceError::Encode { key, source })?;
    store
        .set(key, &encoded)
        .map_err(|e| backend_error(key, e))
}

fn backend_error<E>(key: &'static str, err: E) -> PersistenceError
where
    E: StdError + Send + Sync + 'static,
{
    PersistenceError::Backend {
        key,
        source: Box::new(err),
    }
}
