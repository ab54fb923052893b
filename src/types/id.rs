// ABOUTME: Phantom-typed numeric identifiers for compile-time type safety.
// ABOUTME: Prevents passing an app ID where a depot ID is expected and vice versa.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use thiserror::Error;

use super::DepotSlot;

/// Marker types for phantom type parameters.
pub enum AppMarker {}
pub enum DepotMarker {}

/// A numeric identifier assigned by the distribution platform.
///
/// The phantom parameter keeps `AppId` and `DepotId` distinct types even
/// though both are plain integers on the wire.
#[must_use = "IDs reference platform resources and should not be ignored"]
pub struct Id<T> {
    value: u32,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub const fn new(value: u32) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub const fn get(&self) -> u32 {
        self.value
    }
}

// Manual impls so that T needs no bounds.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseIdError {
    #[error("identifier cannot be empty")]
    Empty,

    #[error("identifier must be a non-negative integer, got '{0}'")]
    NotANumber(String),
}

impl<T> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError::Empty);
        }
        trimmed
            .parse::<u32>()
            .map(Self::new)
            .map_err(|_| ParseIdError::NotANumber(trimmed.to_string()))
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Accept both `app_id: 480` and `app_id: "480"`.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self::new(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

pub type AppId = Id<AppMarker>;
pub type DepotId = Id<DepotMarker>;

impl Id<AppMarker> {
    /// Depot ID bound to a slot: the app ID plus the slot index.
    ///
    /// Returns `None` if the sum does not fit in a `u32`.
    pub fn depot(&self, slot: DepotSlot) -> Option<DepotId> {
        self.value.checked_add(u32::from(slot.index())).map(DepotId::new)
    }
}
