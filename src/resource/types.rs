//! Resource templates and vehicles.

use std::fmt;

/// Handling class of a vehicle.
///
/// Ordered `General < Specialised`; the candidate filter relies on this
/// ordering when it prefers one class over the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyClass {
    /// Ordinary cargo space.
    General,
    /// Equipped for fragile or temperature-controlled loads.
    Specialised,
}

impl fmt::Display for PropertyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyClass::General => write!(f, "General"),
            PropertyClass::Specialised => write!(f, "Specialised"),
        }
    }
}

/// A vehicle type in the fleet catalog.
///
/// # Examples
///
/// ```
/// use u_allocate::resource::{PropertyClass, ResourceTemplate};
///
/// let t = ResourceTemplate::new("Small", PropertyClass::General, 500.0, 1500.0);
/// assert_eq!(t.type_name, "Small");
/// assert_eq!(ResourceTemplate::standard_fleet().len(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceTemplate {
    /// Type name; its uppercased form prefixes vehicle IDs.
    pub type_name: String,
    /// Handling class of every vehicle of this type.
    pub property_class: PropertyClass,
    /// Mass capacity (kg).
    pub capacity_mass: f64,
    /// Volume capacity (L).
    pub capacity_volume: f64,
}

impl ResourceTemplate {
    pub fn new(
        type_name: impl Into<String>,
        property_class: PropertyClass,
        capacity_mass: f64,
        capacity_volume: f64,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            property_class,
            capacity_mass,
            capacity_volume,
        }
    }

    /// The reference fleet: three general and three specialised sizes.
    pub fn standard_fleet() -> Vec<ResourceTemplate> {
        use PropertyClass::{General, Specialised};
        vec![
            Self::new("Small", General, 500.0, 1500.0),
            Self::new("Medium", General, 1000.0, 3000.0),
            Self::new("Large", General, 2000.0, 6000.0),
            Self::new("Special_Small", Specialised, 500.0, 1500.0),
            Self::new("Special_Medium", Specialised, 1000.0, 3000.0),
            Self::new("Special_Large", Specialised, 2000.0, 6000.0),
        ]
    }
}

/// A single vehicle with its remaining capacity.
///
/// Fields are read-only from outside the pool, so
/// `0 <= remaining <= capacity` holds on both dimensions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    id: String,
    type_name: String,
    property_class: PropertyClass,
    capacity_mass: f64,
    capacity_volume: f64,
    remaining_mass: f64,
    remaining_volume: f64,
    used: bool,
}

impl Vehicle {
    /// Creates an unused vehicle at full capacity.
    pub fn new(id: impl Into<String>, template: &ResourceTemplate) -> Self {
        Self {
            id: id.into(),
            type_name: template.type_name.clone(),
            property_class: template.property_class,
            capacity_mass: template.capacity_mass,
            capacity_volume: template.capacity_volume,
            remaining_mass: template.capacity_mass,
            remaining_volume: template.capacity_volume,
            used: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn property_class(&self) -> PropertyClass {
        self.property_class
    }

    pub fn capacity_mass(&self) -> f64 {
        self.capacity_mass
    }

    pub fn capacity_volume(&self) -> f64 {
        self.capacity_volume
    }

    pub fn remaining_mass(&self) -> f64 {
        self.remaining_mass
    }

    pub fn remaining_volume(&self) -> f64 {
        self.remaining_volume
    }

    /// Whether at least one shipment has been loaded.
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Mass consumed so far.
    pub fn loaded_mass(&self) -> f64 {
        self.capacity_mass - self.remaining_mass
    }

    /// Volume consumed so far.
    pub fn loaded_volume(&self) -> f64 {
        self.capacity_volume - self.remaining_volume
    }

    /// Whether the remaining capacity covers both dimensions.
    ///
    /// Negative or NaN demands never fit.
    pub fn fits(&self, mass: f64, volume: f64) -> bool {
        mass >= 0.0
            && volume >= 0.0
            && self.remaining_mass >= mass
            && self.remaining_volume >= volume
    }

    /// Check-and-decrement. No mutation when the demand does not fit.
    pub(crate) fn try_load(&mut self, mass: f64, volume: f64) -> bool {
        if !self.fits(mass, volume) {
            return false;
        }
        self.remaining_mass -= mass;
        self.remaining_volume -= volume;
        self.used = true;
        true
    }
}
