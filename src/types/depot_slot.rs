// ABOUTME: Depot slot indices and the fixed table of per-slot content paths.
// ABOUTME: Slot N maps to depot ID app_id + N, so slots are validated to 1..=9.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Number of depot slots an app build can configure.
pub const MAX_DEPOT_SLOTS: u8 = 9;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DepotSlotError {
    #[error("depot slot must be between 1 and {MAX_DEPOT_SLOTS}, got {0}")]
    OutOfRange(u32),
}

/// A validated depot slot index in `1..=MAX_DEPOT_SLOTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepotSlot(u8);

impl DepotSlot {
    pub fn new(index: u32) -> Result<Self, DepotSlotError> {
        match u8::try_from(index) {
            Ok(i) if (1..=MAX_DEPOT_SLOTS).contains(&i) => Ok(Self(i)),
            _ => Err(DepotSlotError::OutOfRange(index)),
        }
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    /// All slots in ascending order.
    pub fn all() -> impl Iterator<Item = DepotSlot> {
        (1..=MAX_DEPOT_SLOTS).map(DepotSlot)
    }
}

impl fmt::Display for DepotSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content paths configured per depot slot, relative to the content root.
///
/// Empty or whitespace-only paths are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepotSlots {
    paths: [Option<String>; MAX_DEPOT_SLOTS as usize],
}

impl DepotSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path for `slot`, trimmed. A blank path clears the slot.
    pub fn set(&mut self, slot: DepotSlot, path: impl Into<String>) {
        let path = path.into();
        let trimmed = path.trim();
        self.paths[slot.index() as usize - 1] = if trimmed.is_empty() {
            None
        } else if trimmed.len() == path.len() {
            Some(path)
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn with(mut self, slot: DepotSlot, path: impl Into<String>) -> Self {
        self.set(slot, path);
        self
    }

    pub fn get(&self, slot: DepotSlot) -> Option<&str> {
        self.paths[slot.index() as usize - 1].as_deref()
    }

    /// Configured slots in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (DepotSlot, &str)> {
        DepotSlot::all().filter_map(|slot| self.get(slot).map(|path| (slot, path)))
    }

    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(Option::is_none)
    }

    /// Overlay every configured slot of `other` onto `self`.
    pub fn merge(&mut self, other: &DepotSlots) {
        for (slot, path) in other.iter() {
            self.set(slot, path);
        }
    }
}

impl<'de> Deserialize<'de> for DepotSlots {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: BTreeMap<u32, String> = BTreeMap::deserialize(deserializer)?;
        let mut slots = DepotSlots::new();
        for (index, path) in raw {
            let slot = DepotSlot::new(index).map_err(serde::de::Error::custom)?;
            slots.set(slot, path);
        }
        Ok(slots)
    }
}
