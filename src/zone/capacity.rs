//! Remaining zone capacity.

use std::collections::BTreeMap;
use tracing::warn;

/// Remaining integer capacity per zone, owned by one allocation run.
///
/// # Examples
///
/// ```
/// use u_allocate::zone::CapacityMap;
///
/// let mut cap = CapacityMap::from_used([("A1", 60)], 100);
/// assert_eq!(cap.available("A1"), 40);
///
/// assert_eq!(cap.store("A1", 70), (40, 30));
/// assert_eq!(cap.available("A1"), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapacityMap {
    zones: BTreeMap<String, u64>,
}

impl CapacityMap {
    /// Builds the map from per-zone used counts: `available = max − used`,
    /// clamped to `[0, max_per_cell]`.
    ///
    /// A used count above `max_per_cell` leaves the zone at 0; a negative
    /// one leaves it at `max_per_cell`. Both are logged.
    pub fn from_used<I, K>(used: I, max_per_cell: u64) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        let zones = used
            .into_iter()
            .map(|(zone, used)| {
                let zone = zone.into();
                let available = match u64::try_from(used) {
                    Ok(used) => {
                        if used > max_per_cell {
                            warn!(zone = %zone, used, max_per_cell, "used count exceeds zone maximum");
                        }
                        max_per_cell.saturating_sub(used)
                    }
                    Err(_) => {
                        warn!(zone = %zone, used, "negative used count");
                        max_per_cell
                    }
                };
                (zone, available)
            })
            .collect();
        Self { zones }
    }

    /// Builds the map from available counts directly.
    pub fn from_available<I, K>(available: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        Self {
            zones: available.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Remaining units in `zone`; 0 for unknown zones.
    pub fn available(&self, zone: &str) -> u64 {
        self.zones.get(zone).copied().unwrap_or(0)
    }

    /// Stores up to `demand` units in `zone`.
    ///
    /// Returns `(stored, remaining_unallocated)` with
    /// `stored = min(available, demand)`. The zone keeps what is left;
    /// an unknown zone is recorded with 0 remaining.
    pub fn store(&mut self, zone: &str, demand: u64) -> (u64, u64) {
        let available = self.available(zone);
        let stored = available.min(demand);
        self.zones.insert(zone.to_string(), available - stored);
        (stored, demand - stored)
    }

    /// Total remaining units across all zones.
    pub fn total_available(&self) -> u64 {
        self.zones.values().sum()
    }

    /// Zones and remaining units, ordered by zone key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.zones.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
