//! The registry of selectable flavor labels.

use serde::{Deserialize, Serialize};

use crate::types::{InvariantViolation, ValidationError};

/// Flavors available on first run.
pub const DEFAULT_FLAVORS: [&str; 13] = [
    "Original",
    "Sugar Free",
    "Tropical",
    "Watermelon",
    "Coconut Berry",
    "Red Edition",
    "Blue Edition",
    "Yellow Edition",
    "Orange Edition",
    "Green Edition",
    "Purple Edition",
    "Winter Edition",
    "Other",
];

/// Ordered set of unique, non-empty flavor labels.
///
/// The registry never becomes empty: construction from an empty list fails
/// and removing the last flavor is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FlavorRegistry(Vec<String>);

impl Default for FlavorRegistry {
    fn default() -> Self {
        Self(DEFAULT_FLAVORS.iter().map(ToString::to_string).collect())
    }
}

impl FlavorRegistry {
    /// The first flavor, used as the default selection for new entries.
    pub fn first(&self) -> &str {
        // Invariant: never empty.
        self.0.first().map_or("", String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|f| f == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a flavor.
    ///
    /// The name is trimmed; empty names and exact (case-sensitive) duplicates
    /// are rejected.
    pub fn add(&mut self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "flavor" });
        }
        if self.contains(name) {
            return Err(ValidationError::DuplicateFlavor {
                name: name.to_string(),
            });
        }
        self.0.push(name.to_string());
        Ok(())
    }

    /// Removes a flavor, returning whether it was present.
    ///
    /// Fails whenever the registry holds a single flavor, even if `name` is
    /// not that flavor. Events referencing the flavor are not touched.
    pub fn remove(&mut self, name: &str) -> Result<bool, InvariantViolation> {
        if self.0.len() <= 1 {
            return Err(InvariantViolation::LastFlavor {
                name: name.to_string(),
            });
        }
        let before = self.0.len();
        self.0.retain(|f| f != name);
        Ok(self.0.len() != before)
    }
}

impl TryFrom<Vec<String>> for FlavorRegistry {
    type Error = ValidationError;

    fn try_from(flavors: Vec<String>) -> Result<Self, Self::Error> {
        if flavors.is_empty() {
            return Err(ValidationError::Empty {
                field: "flavor registry",
            });
        }
        let mut registry = Self(Vec::with_capacity(flavors.len()));
        for flavor in &flavors {
            registry.add(flavor)?;
        }
        Ok(registry)
    }
}

impl From<FlavorRegistry> for Vec<String> {
    fn from(registry: FlavorRegistry) -> Self {
        registry.0
    }
}
