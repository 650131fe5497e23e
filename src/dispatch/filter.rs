//! Candidate filtering by sensitivity class.

use super::types::SensitivityClass;
use crate::resource::{PropertyClass, ResourcePool};

/// Returns the pool positions eligible for a shipment, in scan order.
///
/// - `FragileAndTemp`: only [`PropertyClass::Specialised`] vehicles, in pool
///   order. This is the one hard restriction.
/// - `Fragile` / `TempSensitive`: every vehicle, `General` before
///   `Specialised`, pool order within each class (stable sort on the class
///   ordering). Nothing is excluded.
/// - `None`: every vehicle in pool order.
///
/// # Examples
///
/// ```
/// use u_allocate::dispatch::{filter_candidates, SensitivityClass};
/// use u_allocate::resource::{ResourcePool, ResourceTemplate};
///
/// let pool = ResourcePool::initialize(&ResourceTemplate::standard_fleet(), 2);
/// let both = filter_candidates(&pool, SensitivityClass::FragileAndTemp);
/// assert_eq!(both.len(), 6);
/// assert_eq!(pool.vehicles()[both[0]].id(), "SPECIAL_SMALL_001");
/// ```
pub fn filter_candidates(pool: &ResourcePool, class: SensitivityClass) -> Vec<usize> {
    let vehicles = pool.vehicles();
    match class {
        SensitivityClass::FragileAndTemp => vehicles
            .iter()
            .enumerate()
            .filter(|(_, v)| v.property_class() == PropertyClass::Specialised)
            .map(|(pos, _)| pos)
            .collect(),
        SensitivityClass::Fragile | SensitivityClass::TempSensitive => {
            let mut positions: Vec<usize> = (0..vehicles.len()).collect();
            positions.sort_by_key(|&pos| vehicles[pos].property_class());
            positions
        }
        SensitivityClass::None => (0..vehicles.len()).collect(),
    }
}

/// [`filter_candidates`] resolved to vehicle IDs.
pub fn candidate_ids(pool: &ResourcePool, class: SensitivityClass) -> Vec<&str> {
    filter_candidates(pool, class)
        .into_iter()
        .map(|pos| pool.vehicles()[pos].id())
        .collect()
}
