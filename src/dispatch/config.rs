//! Dispatch configuration.

use crate::resource::ResourceTemplate;
use std::collections::HashSet;

/// Configuration for a dispatch run: the fleet catalog and how many
/// vehicles of each type are available.
///
/// # Examples
///
/// ```
/// use u_allocate::dispatch::DispatchConfig;
/// use u_allocate::resource::{PropertyClass, ResourceTemplate};
///
/// let config = DispatchConfig::default()
///     .with_replication(3)
///     .with_template(ResourceTemplate::new("Cargo_Bike", PropertyClass::General, 80.0, 200.0));
/// assert!(config.validate().is_ok());
/// assert_eq!(config.fleet_size(), 21);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchConfig {
    /// Vehicle types, in pool order.
    pub templates: Vec<ResourceTemplate>,

    /// Vehicles per template.
    pub replication: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            templates: ResourceTemplate::standard_fleet(),
            replication: 2,
        }
    }
}

impl DispatchConfig {
    /// Replaces the whole catalog.
    pub fn with_templates(mut self, templates: Vec<ResourceTemplate>) -> Self {
        self.templates = templates;
        self
    }

    /// Appends one vehicle type to the catalog.
    pub fn with_template(mut self, template: ResourceTemplate) -> Self {
        self.templates.push(template);
        self
    }

    pub fn with_replication(mut self, n: usize) -> Self {
        self.replication = n;
        self
    }

    /// Total number of vehicles the pool will hold.
    pub fn fleet_size(&self) -> usize {
        self.templates.len() * self.replication
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.templates.is_empty() {
            return Err("at least one vehicle template is required".into());
        }
        if self.replication == 0 {
            return Err("replication must be at least 1".into());
        }
        let mut tags = HashSet::new();
        for t in &self.templates {
            if t.type_name.trim().is_empty() {
                return Err("template type_name must not be empty".into());
            }
            if !tags.insert(t.type_name.to_uppercase()) {
                return Err(format!("duplicate vehicle type '{}'", t.type_name));
            }
            if !(t.capacity_mass.is_finite() && t.capacity_mass >= 0.0) {
                return Err(format!(
                    "capacity_mass of '{}' must be finite and non-negative, got {}",
                    t.type_name, t.capacity_mass
                ));
            }
            if !(t.capacity_volume.is_finite() && t.capacity_volume >= 0.0) {
                return Err(format!(
                    "capacity_volume of '{}' must be finite and non-negative, got {}",
                    t.type_name, t.capacity_volume
                ));
            }
        }
        Ok(())
    }
}
