//! Zone allocation configuration.

use std::collections::HashSet;

/// The reference warehouse layout: three aisles by three levels.
pub const DEFAULT_ZONE_KEYS: [&str; 9] = ["A1", "B1", "C1", "A2", "B2", "C2", "A3", "B3", "C3"];

/// Configuration for zone allocation.
///
/// # Examples
///
/// ```
/// use u_allocate::zone::ZoneConfig;
///
/// let config = ZoneConfig::default().with_max_per_cell(250);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.used_column("B2"), "B2_used");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneConfig {
    /// Zones whose used counts are read from the batch.
    pub zone_keys: Vec<String>,

    /// Capacity of an empty zone.
    pub max_per_cell: u64,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            zone_keys: DEFAULT_ZONE_KEYS.iter().map(|z| z.to_string()).collect(),
            max_per_cell: 100,
        }
    }
}

impl ZoneConfig {
    pub fn with_zone_keys(mut self, keys: Vec<String>) -> Self {
        self.zone_keys = keys;
        self
    }

    pub fn with_max_per_cell(mut self, max: u64) -> Self {
        self.max_per_cell = max;
        self
    }

    /// Name of the batch column carrying the used count for `zone`.
    pub fn used_column(&self, zone: &str) -> String {
        format!("{zone}_used")
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.zone_keys.is_empty() {
            return Err("at least one zone key is required".into());
        }
        let mut seen = HashSet::new();
        for key in &self.zone_keys {
            if key.trim().is_empty() {
                return Err("zone keys must not be empty".into());
            }
            if !seen.insert(key.as_str()) {
                return Err(format!("duplicate zone key '{key}'"));
            }
        }
        Ok(())
    }
}
