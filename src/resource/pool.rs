//! Resource pool construction and capacity consumption.

use super::types::{ResourceTemplate, Vehicle};
use std::collections::HashMap;

/// Aggregate load figures for a pool.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolUtilization {
    /// Number of vehicles in the pool.
    pub vehicles: usize,
    /// Number of vehicles carrying at least one shipment.
    pub used: usize,
    /// Total mass capacity.
    pub capacity_mass: f64,
    /// Total mass loaded.
    pub loaded_mass: f64,
    /// Total volume capacity.
    pub capacity_volume: f64,
    /// Total volume loaded.
    pub loaded_volume: f64,
}

impl PoolUtilization {
    /// Loaded mass as a fraction of total mass capacity (0 for an empty pool).
    pub fn mass_ratio(&self) -> f64 {
        if self.capacity_mass > 0.0 {
            self.loaded_mass / self.capacity_mass
        } else {
            0.0
        }
    }

    /// Loaded volume as a fraction of total volume capacity.
    pub fn volume_ratio(&self) -> f64 {
        if self.capacity_volume > 0.0 {
            self.loaded_volume / self.capacity_volume
        } else {
            0.0
        }
    }
}

/// A fixed-size set of vehicles owned by one allocation run.
///
/// # Examples
///
/// ```
/// use u_allocate::resource::{ResourcePool, ResourceTemplate};
///
/// let mut pool = ResourcePool::initialize(&ResourceTemplate::standard_fleet(), 2);
/// assert_eq!(pool.len(), 12);
/// assert_eq!(pool.vehicles()[0].id(), "SMALL_001");
/// assert_eq!(pool.vehicles()[1].id(), "SMALL_002");
/// assert_eq!(pool.vehicles()[2].id(), "MEDIUM_001");
///
/// assert!(pool.try_consume("SMALL_001", 300.0, 800.0));
/// assert!(!pool.try_consume("SMALL_001", 300.0, 800.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    vehicles: Vec<Vehicle>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: HashMap<String, usize>,
}

impl ResourcePool {
    /// Builds the pool: `replication` vehicles per template, in template
    /// order.
    ///
    /// IDs are the uppercased type name plus a three-digit ordinal counted
    /// within each template (`SMALL_001`, `SMALL_002`, `MEDIUM_001`, ...).
    /// Type names are expected to be unique after uppercasing; with
    /// duplicates, ID lookups resolve to the first vehicle.
    pub fn initialize(templates: &[ResourceTemplate], replication: usize) -> Self {
        let mut vehicles = Vec::with_capacity(templates.len() * replication);
        for template in templates {
            let tag = template.type_name.to_uppercase();
            for ordinal in 1..=replication {
                vehicles.push(Vehicle::new(format!("{tag}_{ordinal:03}"), template));
            }
        }

        let mut index = HashMap::with_capacity(vehicles.len());
        for (pos, v) in vehicles.iter().enumerate() {
            index.entry(v.id().to_string()).or_insert(pos);
        }

        Self { vehicles, index }
    }

    /// Number of vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Vehicles in pool (insertion) order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Looks up a vehicle by ID.
    pub fn get(&self, id: &str) -> Option<&Vehicle> {
        self.position(id).map(|pos| &self.vehicles[pos])
    }

    /// Pool position of a vehicle ID.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied().or_else(|| {
            // The index is skipped by serde; fall back to a scan after
            // deserialization.
            self.vehicles.iter().position(|v| v.id() == id)
        })
    }

    /// Loads `mass` and `volume` onto the vehicle `id` if both fit.
    ///
    /// Returns `true` and marks the vehicle used on success. Returns
    /// `false` without any mutation when the demand does not fit or the ID
    /// is unknown.
    pub fn try_consume(&mut self, id: &str, mass: f64, volume: f64) -> bool {
        match self.position(id) {
            Some(pos) => self.try_consume_at(pos, mass, volume),
            None => false,
        }
    }

    /// [`try_consume`](Self::try_consume) by pool position.
    pub fn try_consume_at(&mut self, pos: usize, mass: f64, volume: f64) -> bool {
        self.vehicles
            .get_mut(pos)
            .is_some_and(|v| v.try_load(mass, volume))
    }

    /// Aggregate load figures.
    pub fn utilization(&self) -> PoolUtilization {
        self.vehicles.iter().fold(
            PoolUtilization {
                vehicles: self.vehicles.len(),
                used: 0,
                capacity_mass: 0.0,
                loaded_mass: 0.0,
                capacity_volume: 0.0,
                loaded_volume: 0.0,
            },
            |mut acc, v| {
                acc.used += usize::from(v.is_used());
                acc.capacity_mass += v.capacity_mass();
                acc.loaded_mass += v.loaded_mass();
                acc.capacity_volume += v.capacity_volume();
                acc.loaded_volume += v.loaded_volume();
                acc
            },
        )
    }
}
