//! Storage requests, policy states and allocation log entries.

use super::policy::PolicyError;
use std::fmt;

/// Urgency label of a storage request.
///
/// Labels outside `Low`/`Medium`/`High` are kept verbatim in
/// [`Urgency::Other`]; whether they mean anything is up to the policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Urgency {
    Low,
    Medium,
    High,
    Other(String),
}

impl Urgency {
    /// Parses a label. Matching is exact after trimming whitespace.
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Low" => Urgency::Low,
            "Medium" => Urgency::Medium,
            "High" => Urgency::High,
            other => Urgency::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
            Urgency::Other(label) => label,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The compact state a zone policy is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneState {
    pub urgency: Urgency,
    pub fragile: bool,
    pub temp_sensitive: bool,
}

impl ZoneState {
    pub fn new(urgency: Urgency, fragile: bool, temp_sensitive: bool) -> Self {
        Self {
            urgency,
            fragile,
            temp_sensitive,
        }
    }
}

impl fmt::Display for ZoneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.urgency,
            u8::from(self.fragile),
            u8::from(self.temp_sensitive)
        )
    }
}

/// A request to store `capacity_required` units somewhere in the warehouse.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageRequest {
    pub urgency: Urgency,
    pub fragile: bool,
    pub temp_sensitive: bool,
    pub capacity_required: u64,
}

impl StorageRequest {
    pub fn new(urgency: Urgency, capacity_required: u64) -> Self {
        Self {
            urgency,
            fragile: false,
            temp_sensitive: false,
            capacity_required,
        }
    }

    pub fn with_fragile(mut self, fragile: bool) -> Self {
        self.fragile = fragile;
        self
    }

    pub fn with_temp_sensitive(mut self, temp_sensitive: bool) -> Self {
        self.temp_sensitive = temp_sensitive;
        self
    }

    /// The policy state for this request.
    pub fn state(&self) -> ZoneState {
        ZoneState::new(self.urgency.clone(), self.fragile, self.temp_sensitive)
    }
}

/// Where a request went and how much of it fit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZonePlacement {
    pub zone: String,
    pub stored: u64,
    pub remaining_unallocated: u64,
}

/// One row of the allocation log.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneLogEntry {
    pub request: StorageRequest,
    pub outcome: Result<ZonePlacement, PolicyError>,
}

impl ZoneLogEntry {
    /// Zone label for the log; `"ERROR"` when the policy lookup failed.
    pub fn assigned_zone(&self) -> &str {
        match &self.outcome {
            Ok(p) => &p.zone,
            Err(_) => "ERROR",
        }
    }

    /// Units stored; 0 on error.
    pub fn stored(&self) -> u64 {
        self.outcome.as_ref().map_or(0, |p| p.stored)
    }

    /// Units left over; the full request on error.
    pub fn remaining_unallocated(&self) -> u64 {
        match &self.outcome {
            Ok(p) => p.remaining_unallocated,
            Err(_) => self.request.capacity_required,
        }
    }

    pub fn error(&self) -> Option<&PolicyError> {
        self.outcome.as_ref().err()
    }

    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }
}
