//! Vehicle dispatch.
//!
//! Matches shipments to delivery vehicles, all-or-nothing per shipment:
//!
//! 1. **Classify**: fragility and temperature flags give a
//!    [`SensitivityClass`].
//! 2. **Rank**: cluster ascending, then priority score descending, stable
//!    on full ties ([`priority_order`]).
//! 3. **Filter**: doubly sensitive loads may only use specialised vehicles;
//!    singly sensitive loads see every vehicle, general ones first
//!    ([`filter_candidates`]).
//! 4. **Match**: the first candidate with enough remaining mass and volume
//!    takes the shipment ([`GreedyMatcher`]).
//!
//! [`DispatchRunner`] wraps this around a fresh pool per run and
//! [`DispatchPlanner`] adds tabular ingestion and output, calling the
//! external [`PriorityScorer`] and [`ClusterAssigner`].

mod config;
mod filter;
mod matcher;
mod planner;
mod ranking;
mod runner;
mod types;

pub use config::DispatchConfig;
pub use filter::{candidate_ids, filter_candidates};
pub use matcher::GreedyMatcher;
pub use planner::{
    DispatchPlanner, DispatchReport, PreparedBatch, OUTPUT_COLUMNS, REQUIRED_COLUMNS,
};
pub use ranking::{dispatch_engine, priority_order, priority_order_of, ByCluster, ByPriorityScore};
pub use runner::{DispatchOutcome, DispatchRunner};
pub use types::{
    AssignmentRecord, AssignmentStatus, ClusterAssigner, PriorityScorer, SensitivityClass,
    Shipment, ShipmentFeatures,
};
