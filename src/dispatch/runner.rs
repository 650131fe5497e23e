//! Dispatch run orchestration.

use super::config::DispatchConfig;
use super::matcher::GreedyMatcher;
use super::types::{AssignmentRecord, Shipment};
use crate::error::AllocError;
use crate::resource::ResourcePool;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

/// Result of a dispatch run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchOutcome {
    /// One record per shipment, in input order.
    pub records: Vec<AssignmentRecord>,

    /// The pool after matching.
    pub pool: ResourcePool,
}

impl DispatchOutcome {
    pub fn assigned_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_assigned()).count()
    }

    pub fn unassigned_count(&self) -> usize {
        self.records.len() - self.assigned_count()
    }
}

/// Executes dispatch runs, each against a freshly built pool.
pub struct DispatchRunner;

impl DispatchRunner {
    /// Validates the batch, builds the pool and matches every shipment.
    ///
    /// # Errors
    ///
    /// - [`AllocError::InvalidConfig`] if `config` fails validation.
    /// - [`AllocError::Value`] if a shipment has a negative or non-finite
    ///   mass or volume, or a non-finite priority score.
    ///
    /// Both are reported before any pool exists.
    pub fn run(shipments: &[Shipment], config: &DispatchConfig) -> Result<DispatchOutcome, AllocError> {
        config.validate().map_err(AllocError::InvalidConfig)?;
        validate_shipments(shipments)?;

        let mut pool = ResourcePool::initialize(&config.templates, config.replication);
        info!(
            vehicles = pool.len(),
            shipments = shipments.len(),
            "dispatch run started"
        );

        let records = GreedyMatcher::assign(&mut pool, shipments);
        let outcome = DispatchOutcome { records, pool };

        info!(
            assigned = outcome.assigned_count(),
            unassigned = outcome.unassigned_count(),
            vehicles_used = outcome.pool.utilization().used,
            "dispatch run finished"
        );
        Ok(outcome)
    }

    /// Runs independent batches. Each batch gets its own pool; results are
    /// in batch order.
    ///
    /// With the `parallel` feature the batches run on the rayon thread pool.
    pub fn run_many(
        batches: &[Vec<Shipment>],
        config: &DispatchConfig,
    ) -> Vec<Result<DispatchOutcome, AllocError>> {
        #[cfg(feature = "parallel")]
        {
            batches
                .par_iter()
                .map(|batch| Self::run(batch, config))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            batches
                .iter()
                .map(|batch| Self::run(batch, config))
                .collect()
        }
    }
}

fn validate_shipments(shipments: &[Shipment]) -> Result<(), AllocError> {
    for (row, s) in shipments.iter().enumerate() {
        if !(s.mass.is_finite() && s.mass >= 0.0) {
            return Err(AllocError::value(row, "mass", s.mass));
        }
        if !(s.volume.is_finite() && s.volume >= 0.0) {
            return Err(AllocError::value(row, "volume", s.volume));
        }
        if !s.priority_score.is_finite() {
            return Err(AllocError::value(row, "priority_score", s.priority_score));
        }
    }
    Ok(())
}
