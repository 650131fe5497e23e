//! Dispatch ranking: cluster ascending, then priority score descending.

use super::types::Shipment;
use crate::ranking::{RankKey, RankingRule, RuleEngine};

/// Lower cluster labels are dispatched first.
pub struct ByCluster;

impl RankingRule<Shipment, ()> for ByCluster {
    fn name(&self) -> &str {
        "ByCluster"
    }

    fn key(&self, shipment: &Shipment, _ctx: &()) -> RankKey {
        RankKey::Int(shipment.cluster_id)
    }
}

/// Higher priority scores are dispatched first.
pub struct ByPriorityScore;

impl RankingRule<Shipment, ()> for ByPriorityScore {
    fn name(&self) -> &str {
        "ByPriorityScore"
    }

    fn key(&self, shipment: &Shipment, _ctx: &()) -> RankKey {
        RankKey::Float(-shipment.priority_score)
    }
}

/// The two-rule engine used by the greedy matcher. Comparison is exact.
pub fn dispatch_engine() -> RuleEngine<Shipment, ()> {
    RuleEngine::new()
        .with_rule(ByCluster)
        .with_rule(ByPriorityScore)
}

/// Processing order for a batch, as indices into `shipments`.
///
/// Shipments equal on both keys keep their input order.
pub fn priority_order(shipments: &[Shipment]) -> Vec<usize> {
    dispatch_engine().sort_indices(shipments, &())
}

/// [`priority_order`] restricted to the shipments at `indices`.
pub fn priority_order_of(shipments: &[Shipment], indices: Vec<usize>) -> Vec<usize> {
    dispatch_engine().sort_subset(shipments, indices, &())
}
