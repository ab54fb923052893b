// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Keeps app IDs, depot IDs, and depot slots from being mixed up.

mod depot_slot;
mod id;

pub use depot_slot::{DepotSlot, DepotSlotError, DepotSlots, MAX_DEPOT_SLOTS};
pub use id::{AppId, DepotId, ParseIdError};
