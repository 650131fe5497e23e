//! Single-pass greedy matching of shipments to vehicles.

use super::filter::filter_candidates;
use super::ranking::priority_order_of;
use super::types::{AssignmentRecord, Shipment};
use crate::resource::ResourcePool;
use tracing::{debug, warn};

/// Greedy first-fit matcher.
///
/// Shipments are visited in [`priority_order`](super::priority_order).
/// For each one the filtered candidate list is scanned left to right and
/// the first vehicle with enough remaining mass *and* volume takes the
/// whole shipment. There is no
/// backtracking and no splitting, so the result is not globally optimal: an
/// early shipment may take capacity a later one needed more.
///
/// # Examples
///
/// ```
/// use u_allocate::dispatch::{GreedyMatcher, Shipment};
/// use u_allocate::resource::{PropertyClass, ResourcePool, ResourceTemplate};
///
/// let mut pool = ResourcePool::initialize(
///     &[ResourceTemplate::new("Small", PropertyClass::General, 500.0, 1500.0)],
///     1,
/// );
/// let batch = vec![
///     Shipment::new("B", 300.0, 800.0).with_priority(5.0),
///     Shipment::new("A", 300.0, 800.0).with_priority(9.0),
/// ];
/// let records = GreedyMatcher::assign(&mut pool, &batch);
///
/// assert!(!records[0].is_assigned());
/// assert_eq!(records[1].assigned_resource_id.as_deref(), Some("SMALL_001"));
/// ```
pub struct GreedyMatcher;

impl GreedyMatcher {
    /// Matches a batch against `pool`, mutating it in place.
    ///
    /// Returns one record per shipment, parallel to the input order.
    /// Shipments with unusable figures (negative, NaN or infinite) are
    /// recorded as not assigned with an error and never touch the pool.
    pub fn assign(pool: &mut ResourcePool, shipments: &[Shipment]) -> Vec<AssignmentRecord> {
        let mut records: Vec<Option<AssignmentRecord>> = vec![None; shipments.len()];

        // Unusable shipments are recorded up front and kept out of the ranking.
        let mut usable = Vec::with_capacity(shipments.len());
        for (idx, shipment) in shipments.iter().enumerate() {
            if shipment.defect().is_none() {
                usable.push(idx);
            } else {
                records[idx] = Some(Self::assign_one(pool, shipment));
            }
        }

        for idx in priority_order_of(shipments, usable) {
            records[idx] = Some(Self::assign_one(pool, &shipments[idx]));
        }

        records.into_iter().flatten().collect()
    }

    /// Matches a single shipment. Exposed for callers that drive their own
    /// ordering.
    pub fn assign_one(pool: &mut ResourcePool, shipment: &Shipment) -> AssignmentRecord {
        if let Some(defect) = shipment.defect() {
            warn!(shipment = %shipment.id, defect, "shipment rejected");
            return AssignmentRecord::not_assigned(shipment, Some(defect));
        }

        let class = shipment.sensitivity();
        for pos in filter_candidates(pool, class) {
            if pool.try_consume_at(pos, shipment.mass, shipment.volume) {
                let vehicle = &pool.vehicles()[pos];
                debug!(
                    shipment = %shipment.id,
                    vehicle = vehicle.id(),
                    load_type = class.tag(),
                    "assigned"
                );
                return AssignmentRecord::assigned(shipment, vehicle.id());
            }
        }

        warn!(
            shipment = %shipment.id,
            load_type = class.tag(),
            mass = shipment.mass,
            volume = shipment.volume,
            "no vehicle with sufficient capacity"
        );
        AssignmentRecord::not_assigned(shipment, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{AssignmentStatus, SensitivityClass};
    use crate::resource::{PropertyClass, ResourceTemplate};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn single(class: PropertyClass, mass: f64, volume: f64) -> ResourceTemplate {
        let name = match class {
            PropertyClass::General => "Van",
            PropertyClass::Specialised => "Reefer",
        };
        ResourceTemplate::new(name, class, mass, volume)
    }

    #[test]
    fn test_end_to_end_two_units_one_vehicle() {
        let mut pool = ResourcePool::initialize(
            &[ResourceTemplate::new("Small", PropertyClass::General, 500.0, 1500.0)],
            1,
        );
        let batch = vec![
            Shipment::new("A", 300.0, 800.0).with_priority(9.0),
            Shipment::new("B", 300.0, 800.0).with_priority(5.0),
        ];

        let records = GreedyMatcher::assign(&mut pool, &batch);

        assert_eq!(records[0].status, AssignmentStatus::Assigned);
        assert_eq!(records[0].assigned_resource_id.as_deref(), Some("SMALL_001"));
        assert_eq!(records[1].status, AssignmentStatus::NotAssigned);
        assert!(records[1].assigned_resource_id.is_none());
        assert!(records[1].error.is_none());

        let v = pool.get("SMALL_001").unwrap();
        assert_eq!(v.remaining_mass(), 200.0);
        assert_eq!(v.remaining_volume(), 700.0);
    }

    #[test]
    fn test_records_parallel_to_input_order() {
        let mut pool = ResourcePool::initialize(&ResourceTemplate::standard_fleet(), 2);
        let batch = vec![
            Shipment::new("late", 10.0, 10.0).with_cluster(3),
            Shipment::new("early", 10.0, 10.0).with_cluster(0),
        ];
        let records = GreedyMatcher::assign(&mut pool, &batch);
        assert_eq!(records[0].demand_id, "late");
        assert_eq!(records[1].demand_id, "early");
        // "early" is processed first and takes the first vehicle.
        assert_eq!(records[1].assigned_resource_id.as_deref(), Some("SMALL_001"));
        assert_eq!(records[0].assigned_resource_id.as_deref(), Some("SMALL_001"));
    }

    #[test]
    fn test_first_fit_skips_full_vehicles() {
        let mut pool = ResourcePool::initialize(&ResourceTemplate::standard_fleet(), 2);
        let batch = vec![
            Shipment::new("big", 800.0, 100.0).with_priority(2.0),
            Shipment::new("small", 450.0, 100.0).with_priority(1.0),
        ];
        let records = GreedyMatcher::assign(&mut pool, &batch);
        assert_eq!(records[0].assigned_resource_id.as_deref(), Some("MEDIUM_001"));
        assert_eq!(records[1].assigned_resource_id.as_deref(), Some("SMALL_001"));
    }

    #[test]
    fn test_volume_alone_can_reject() {
        let mut pool = ResourcePool::initialize(&[single(PropertyClass::General, 500.0, 100.0)], 1);
        let records = GreedyMatcher::assign(&mut pool, &[Shipment::new("s", 1.0, 101.0)]);
        assert!(!records[0].is_assigned());
        assert!(!pool.vehicles()[0].is_used());
    }

    #[test]
    fn test_doubly_sensitive_never_on_general() {
        let mut pool = ResourcePool::initialize(
            &[
                single(PropertyClass::General, 1000.0, 1000.0),
                single(PropertyClass::Specialised, 100.0, 100.0),
            ],
            1,
        );
        let batch = vec![Shipment::new("tf", 200.0, 50.0)
            .with_fragile(true)
            .with_temp_sensitive(true)];

        let records = GreedyMatcher::assign(&mut pool, &batch);

        assert_eq!(records[0].sensitivity, SensitivityClass::FragileAndTemp);
        assert_eq!(records[0].status, AssignmentStatus::NotAssigned);
        assert!(!pool.get("VAN_001").unwrap().is_used());
    }

    #[test]
    fn test_single_sensitive_falls_back_to_specialised() {
        let mut pool = ResourcePool::initialize(
            &[
                single(PropertyClass::Specialised, 1000.0, 1000.0),
                single(PropertyClass::General, 100.0, 100.0),
            ],
            1,
        );
        let batch = vec![
            Shipment::new("f1", 80.0, 10.0).with_fragile(true).with_priority(2.0),
            Shipment::new("f2", 80.0, 10.0).with_fragile(true).with_priority(1.0),
        ];
        let records = GreedyMatcher::assign(&mut pool, &batch);
        assert_eq!(records[0].assigned_resource_id.as_deref(), Some("VAN_001"));
        assert_eq!(records[1].assigned_resource_id.as_deref(), Some("REEFER_001"));
    }

    #[test]
    fn test_oversized_shipment_does_not_abort_batch() {
        let mut pool = ResourcePool::initialize(&ResourceTemplate::standard_fleet(), 2);
        let batch = vec![
            Shipment::new("huge", 5000.0, 10.0).with_priority(10.0),
            Shipment::new("ok", 10.0, 10.0).with_priority(1.0),
        ];
        let records = GreedyMatcher::assign(&mut pool, &batch);
        assert!(!records[0].is_assigned());
        assert!(records[1].is_assigned());
    }

    #[test]
    fn test_defective_shipment_recorded_with_error() {
        let mut pool = ResourcePool::initialize(&ResourceTemplate::standard_fleet(), 1);
        let before = pool.clone();
        let records = GreedyMatcher::assign(&mut pool, &[Shipment::new("neg", -5.0, 1.0)]);
        assert!(!records[0].is_assigned());
        assert!(records[0].error.is_some());
        assert_eq!(pool, before);
    }

    #[test]
    fn test_nan_scores_do_not_reorder_valid_shipments() {
        // Twenty unit-capacity vans: processing order decides the IDs.
        let mut batch = Vec::new();
        for i in 0..40 {
            let score = if i % 2 == 0 { f64::NAN } else { f64::from(i) };
            batch.push(Shipment::new(format!("s{i}"), 1.0, 1.0).with_priority(score));
        }
        let mut pool = ResourcePool::initialize(
            &[ResourceTemplate::new("Van", PropertyClass::General, 1.0, 1.0)],
            20,
        );
        let records = GreedyMatcher::assign(&mut pool, &batch);

        for (i, record) in records.iter().enumerate() {
            if i % 2 == 0 {
                assert!(!record.is_assigned());
                assert!(record.error.is_some());
            } else {
                // Highest score (39) gets VAN_001, next (37) VAN_002, ...
                let expected = format!("VAN_{:03}", (39 - i) / 2 + 1);
                assert_eq!(record.assigned_resource_id.as_deref(), Some(expected.as_str()));
            }
        }
    }

    #[test]
    fn test_empty_batch_and_empty_pool() {
        let mut pool = ResourcePool::initialize(&ResourceTemplate::standard_fleet(), 0);
        assert!(GreedyMatcher::assign(&mut pool, &[]).is_empty());
        let records = GreedyMatcher::assign(&mut pool, &[Shipment::new("a", 0.0, 0.0)]);
        assert!(!records[0].is_assigned());
    }

    #[test]
    fn test_deterministic_rerun() {
        let batch: Vec<Shipment> = (0..30)
            .map(|i| {
                Shipment::new(format!("s{i}"), f64::from(i * 37 % 400), f64::from(i * 91 % 1200))
                    .with_cluster(i64::from(i % 3))
                    .with_priority(f64::from(i % 4))
                    .with_fragile(i % 5 == 0)
                    .with_temp_sensitive(i % 7 == 0)
            })
            .collect();

        let run = || {
            let mut pool = ResourcePool::initialize(&ResourceTemplate::standard_fleet(), 2);
            let records = GreedyMatcher::assign(&mut pool, &batch);
            (records, pool)
        };
        assert_eq!(run(), run());
    }

    fn shipment_strategy() -> impl Strategy<Value = Shipment> {
        (0u32..1200, 0u32..3000, 0i64..3, 0u8..5, any::<bool>(), any::<bool>()).prop_map(
            |(m, v, c, p, f, t)| {
                Shipment::new(format!("{m}-{v}"), f64::from(m), f64::from(v))
                    .with_cluster(c)
                    .with_priority(f64::from(p))
                    .with_fragile(f)
                    .with_temp_sensitive(t)
            },
        )
    }

    proptest! {
        #[test]
        fn prop_capacity_and_conservation(
            batch in prop::collection::vec(shipment_strategy(), 0..60)
        ) {
            let mut pool = ResourcePool::initialize(&ResourceTemplate::standard_fleet(), 2);
            let records = GreedyMatcher::assign(&mut pool, &batch);
            prop_assert_eq!(records.len(), batch.len());

            let mut routed: HashMap<&str, (f64, f64)> = HashMap::new();
            for (record, shipment) in records.iter().zip(&batch) {
                prop_assert_eq!(&record.demand_id, &shipment.id);
                if let Some(id) = record.assigned_resource_id.as_deref() {
                    let entry = routed.entry(id).or_insert((0.0, 0.0));
                    entry.0 += shipment.mass;
                    entry.1 += shipment.volume;

                    let vehicle = pool.get(id).unwrap();
                    if shipment.sensitivity() == SensitivityClass::FragileAndTemp {
                        prop_assert_eq!(vehicle.property_class(), PropertyClass::Specialised);
                    }
                }
            }

            for v in pool.vehicles() {
                prop_assert!(v.remaining_mass() >= 0.0);
                prop_assert!(v.remaining_mass() <= v.capacity_mass());
                prop_assert!(v.remaining_volume() >= 0.0);
                prop_assert!(v.remaining_volume() <= v.capacity_volume());

                let (mass, volume) = routed.get(v.id()).copied().unwrap_or((0.0, 0.0));
                prop_assert_eq!(mass, v.loaded_mass());
                prop_assert_eq!(volume, v.loaded_volume());
                prop_assert_eq!(v.is_used(), routed.contains_key(v.id()));
            }
        }
    }
}
