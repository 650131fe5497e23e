//! Warehouse zone allocation.
//!
//! Each storage request is reduced to a [`ZoneState`] (urgency, fragile,
//! temperature flag). A [`ZonePolicy`] maps that state to exactly one zone,
//! and the zone stores as much of the request as it has room for. Unlike
//! vehicle dispatch, requests may be partially fulfilled; the shortfall is
//! logged per row.
//!
//! A state the policy does not know is an error for that row only: the row
//! is logged with zone `ERROR` and the batch continues.

mod allocator;
mod capacity;
mod config;
mod planner;
mod policy;
mod types;

pub use allocator::{ZoneAllocator, ZoneReport};
pub use capacity::CapacityMap;
pub use config::{ZoneConfig, DEFAULT_ZONE_KEYS};
pub use planner::{ZonePlan, ZonePlanner};
pub use policy::{PolicyError, QTablePolicy, ZonePolicy};
pub use types::{StorageRequest, Urgency, ZoneLogEntry, ZonePlacement, ZoneState};
