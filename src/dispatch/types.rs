//! Shipments, sensitivity classes and assignment records.

use std::fmt;

/// Handling sensitivity of a shipment, derived from its two flags.
///
/// Drives candidate filtering: see [`filter_candidates`](super::filter_candidates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensitivityClass {
    None,
    Fragile,
    TempSensitive,
    FragileAndTemp,
}

impl SensitivityClass {
    /// Classifies a shipment from its fragility and temperature flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_allocate::dispatch::SensitivityClass;
    ///
    /// assert_eq!(SensitivityClass::classify(true, true), SensitivityClass::FragileAndTemp);
    /// assert_eq!(SensitivityClass::classify(false, true).tag(), "T");
    /// assert!(!SensitivityClass::classify(false, false).is_sensitive());
    /// ```
    pub fn classify(fragile: bool, temp_sensitive: bool) -> Self {
        match (fragile, temp_sensitive) {
            (true, true) => SensitivityClass::FragileAndTemp,
            (true, false) => SensitivityClass::Fragile,
            (false, true) => SensitivityClass::TempSensitive,
            (false, false) => SensitivityClass::None,
        }
    }

    /// Whether the shipment needs any special handling.
    pub fn is_sensitive(self) -> bool {
        self != SensitivityClass::None
    }

    /// Short load-type tag: `N`, `F`, `T` or `TF`.
    pub fn tag(self) -> &'static str {
        match self {
            SensitivityClass::None => "N",
            SensitivityClass::Fragile => "F",
            SensitivityClass::TempSensitive => "T",
            SensitivityClass::FragileAndTemp => "TF",
        }
    }
}

impl fmt::Display for SensitivityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A shipment order waiting for a vehicle.
///
/// # Examples
///
/// ```
/// use u_allocate::dispatch::{SensitivityClass, Shipment};
///
/// let s = Shipment::new("P-1", 120.0, 300.0)
///     .with_priority(7.5)
///     .with_cluster(2)
///     .with_fragile(true);
/// assert_eq!(s.sensitivity(), SensitivityClass::Fragile);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shipment {
    /// Caller-side identifier.
    pub id: String,
    /// Total mass (kg).
    pub mass: f64,
    /// Total volume (L).
    pub volume: f64,
    /// Priority score; higher is dispatched earlier within a cluster.
    pub priority_score: f64,
    /// Cluster label; lower clusters are dispatched first.
    pub cluster_id: i64,
    pub fragile: bool,
    pub temp_sensitive: bool,
}

impl Shipment {
    /// Creates a non-sensitive shipment with score 0 in cluster 0.
    pub fn new(id: impl Into<String>, mass: f64, volume: f64) -> Self {
        Self {
            id: id.into(),
            mass,
            volume,
            priority_score: 0.0,
            cluster_id: 0,
            fragile: false,
            temp_sensitive: false,
        }
    }

    pub fn with_priority(mut self, score: f64) -> Self {
        self.priority_score = score;
        self
    }

    pub fn with_cluster(mut self, cluster_id: i64) -> Self {
        self.cluster_id = cluster_id;
        self
    }

    pub fn with_fragile(mut self, fragile: bool) -> Self {
        self.fragile = fragile;
        self
    }

    pub fn with_temp_sensitive(mut self, temp_sensitive: bool) -> Self {
        self.temp_sensitive = temp_sensitive;
        self
    }

    pub fn sensitivity(&self) -> SensitivityClass {
        SensitivityClass::classify(self.fragile, self.temp_sensitive)
    }

    /// Why the shipment cannot be matched at all, if anything.
    pub(crate) fn defect(&self) -> Option<&'static str> {
        if !(self.mass.is_finite() && self.mass >= 0.0) {
            Some("mass must be a finite non-negative number")
        } else if !(self.volume.is_finite() && self.volume >= 0.0) {
            Some("volume must be a finite non-negative number")
        } else if !self.priority_score.is_finite() {
            Some("priority score must be finite")
        } else {
            None
        }
    }
}

/// Outcome of matching one shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignmentStatus {
    Assigned,
    NotAssigned,
}

impl AssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "Assigned",
            AssignmentStatus::NotAssigned => "Not_Assigned",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The audit record for one shipment. Written once, never updated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignmentRecord {
    pub demand_id: String,
    pub sensitivity: SensitivityClass,
    pub status: AssignmentStatus,
    pub assigned_resource_id: Option<String>,
    /// Set when the shipment itself was unusable (e.g. negative mass).
    pub error: Option<String>,
}

impl AssignmentRecord {
    pub(crate) fn assigned(shipment: &Shipment, vehicle_id: &str) -> Self {
        Self {
            demand_id: shipment.id.clone(),
            sensitivity: shipment.sensitivity(),
            status: AssignmentStatus::Assigned,
            assigned_resource_id: Some(vehicle_id.to_string()),
            error: None,
        }
    }

    pub(crate) fn not_assigned(shipment: &Shipment, error: Option<&str>) -> Self {
        Self {
            demand_id: shipment.id.clone(),
            sensitivity: shipment.sensitivity(),
            status: AssignmentStatus::NotAssigned,
            assigned_resource_id: None,
            error: error.map(str::to_string),
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.status == AssignmentStatus::Assigned
    }
}

/// Model inputs describing one shipment, as seen by the external scorer
/// and clustering collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipmentFeatures {
    pub fragility_tag: f64,
    pub temp_tag: f64,
    pub total_weight: f64,
    pub total_volume: f64,
    pub expiry_duration_months: f64,
    pub dispatch_duration_days: f64,
}

/// Produces a priority score for a shipment. Higher is more urgent.
///
/// Implemented by a pre-trained model in production; any
/// `Fn(&ShipmentFeatures) -> f64` closure also works.
pub trait PriorityScorer: Send + Sync {
    fn score(&self, features: &ShipmentFeatures) -> f64;
}

impl<F> PriorityScorer for F
where
    F: Fn(&ShipmentFeatures) -> f64 + Send + Sync,
{
    fn score(&self, features: &ShipmentFeatures) -> f64 {
        self(features)
    }
}

/// Assigns a shipment to a delivery cluster.
///
/// Receives the already computed priority score alongside the features.
pub trait ClusterAssigner: Send + Sync {
    fn assign(&self, features: &ShipmentFeatures, priority_score: f64) -> i64;
}

impl<F> ClusterAssigner for F
where
    F: Fn(&ShipmentFeatures, f64) -> i64 + Send + Sync,
{
    fn assign(&self, features: &ShipmentFeatures, priority_score: f64) -> i64 {
        self(features, priority_score)
    }
}
