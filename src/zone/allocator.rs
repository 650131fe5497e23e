//! Policy-driven zone allocation with partial fulfillment.

use super::capacity::CapacityMap;
use super::policy::ZonePolicy;
use super::types::{StorageRequest, ZoneLogEntry, ZonePlacement};
use tracing::{debug, info, warn};

/// Result of a zone allocation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneReport {
    /// One entry per request, in input order.
    pub entries: Vec<ZoneLogEntry>,

    /// Remaining capacity after the run.
    pub capacity: CapacityMap,

    /// Units stored across all requests.
    pub stored_total: u64,

    /// Units that found no room, including those of failed rows.
    pub shortfall_total: u64,

    /// Number of rows whose policy lookup failed.
    pub errors: usize,
}

/// Allocates storage requests to zones chosen by a policy.
///
/// Requests are processed in input order. For each one the policy picks a
/// zone from the request's state; the zone then takes as much as it has
/// room for and the rest is reported as unallocated. A failed lookup is
/// logged and recorded for that row only.
///
/// # Examples
///
/// ```
/// use u_allocate::zone::{CapacityMap, QTablePolicy, StorageRequest, Urgency, ZoneAllocator, ZoneState};
///
/// let policy = QTablePolicy::new(vec!["A1".into()])
///     .with_state(ZoneState::new(Urgency::High, false, false), vec![1.0]);
/// let capacity = CapacityMap::from_available([("A1", 40)]);
/// let requests = vec![
///     StorageRequest::new(Urgency::High, 70),
///     StorageRequest::new(Urgency::parse("Critical"), 10),
/// ];
///
/// let report = ZoneAllocator::run(&requests, &policy, capacity);
/// assert_eq!(report.entries[0].stored(), 40);
/// assert_eq!(report.entries[0].remaining_unallocated(), 30);
/// assert_eq!(report.entries[1].assigned_zone(), "ERROR");
/// assert_eq!(report.capacity.available("A1"), 0);
/// ```
pub struct ZoneAllocator;

impl ZoneAllocator {
    /// Runs a batch against an owned capacity map and returns the report.
    pub fn run<P: ZonePolicy + ?Sized>(
        requests: &[StorageRequest],
        policy: &P,
        mut capacity: CapacityMap,
    ) -> ZoneReport {
        info!(
            requests = requests.len(),
            zones = capacity.len(),
            available = capacity.total_available(),
            "zone allocation started"
        );

        let entries = Self::allocate(requests, policy, &mut capacity);

        let stored_total: u64 = entries.iter().map(ZoneLogEntry::stored).sum();
        let shortfall_total: u64 = entries.iter().map(ZoneLogEntry::remaining_unallocated).sum();
        let errors = entries.iter().filter(|e| e.is_error()).count();

        info!(
            stored = stored_total,
            shortfall = shortfall_total,
            errors,
            "zone allocation finished"
        );

        ZoneReport {
            entries,
            capacity,
            stored_total,
            shortfall_total,
            errors,
        }
    }

    /// Allocates every request, mutating `capacity` in place.
    pub fn allocate<P: ZonePolicy + ?Sized>(
        requests: &[StorageRequest],
        policy: &P,
        capacity: &mut CapacityMap,
    ) -> Vec<ZoneLogEntry> {
        requests
            .iter()
            .enumerate()
            .map(|(row, request)| Self::allocate_one(row, request, policy, capacity))
            .collect()
    }

    fn allocate_one<P: ZonePolicy + ?Sized>(
        row: usize,
        request: &StorageRequest,
        policy: &P,
        capacity: &mut CapacityMap,
    ) -> ZoneLogEntry {
        let state = request.state();
        let outcome = policy.best_zone(&state).map(|zone| {
            let (stored, remaining_unallocated) = capacity.store(&zone, request.capacity_required);
            debug!(row, zone = %zone, stored, remaining_unallocated, "zone allocated");
            ZonePlacement {
                zone,
                stored,
                remaining_unallocated,
            }
        });

        if let Err(e) = &outcome {
            warn!(row, state = %state, error = %e, "zone allocation error");
        }

        ZoneLogEntry {
            request: request.clone(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::{PolicyError, QTablePolicy, Urgency, ZoneState};

    fn policy() -> QTablePolicy {
        let mut p = QTablePolicy::new(vec!["A1".into(), "B1".into(), "C1".into()]);
        for (u, f, t, q) in [
            (Urgency::High, false, false, vec![1.0, 0.0, 0.0]),
            (Urgency::Medium, false, false, vec![0.0, 1.0, 0.0]),
            (Urgency::Low, false, false, vec![0.0, 0.0, 1.0]),
            (Urgency::High, true, false, vec![0.0, 1.0, 0.0]),
        ] {
            p.insert(ZoneState::new(u, f, t), q);
        }
        p
    }

    fn capacity() -> CapacityMap {
        CapacityMap::from_available([("A1", 40), ("B1", 100), ("C1", 5)])
    }

    #[test]
    fn test_partial_fulfillment() {
        let report = ZoneAllocator::run(&[StorageRequest::new(Urgency::High, 70)], &policy(), capacity());
        let entry = &report.entries[0];
        assert_eq!(entry.assigned_zone(), "A1");
        assert_eq!(entry.stored(), 40);
        assert_eq!(entry.remaining_unallocated(), 30);
        assert_eq!(report.capacity.available("A1"), 0);
    }

    #[test]
    fn test_input_order_and_sequential_depletion() {
        let requests = vec![
            StorageRequest::new(Urgency::Low, 3),
            StorageRequest::new(Urgency::Low, 3),
            StorageRequest::new(Urgency::Medium, 60),
            StorageRequest::new(Urgency::High, 10).with_fragile(true),
        ];
        let report = ZoneAllocator::run(&requests, &policy(), capacity());

        let summary: Vec<(&str, u64, u64)> = report
            .entries
            .iter()
            .map(|e| (e.assigned_zone(), e.stored(), e.remaining_unallocated()))
            .collect();
        assert_eq!(
            summary,
            vec![("C1", 3, 0), ("C1", 2, 1), ("B1", 60, 0), ("B1", 10, 0)]
        );
        assert_eq!(report.capacity.available("C1"), 0);
        assert_eq!(report.capacity.available("B1"), 30);
        assert_eq!(report.stored_total, 75);
        assert_eq!(report.shortfall_total, 1);
    }

    #[test]
    fn test_unrecognized_state_is_row_error() {
        let requests = vec![
            StorageRequest::new(Urgency::High, 10),
            StorageRequest::new(Urgency::parse("Critical"), 25),
            StorageRequest::new(Urgency::Medium, 10),
        ];
        let report = ZoneAllocator::run(&requests, &policy(), capacity());

        assert_eq!(report.entries.len(), 3);
        let failed = &report.entries[1];
        assert_eq!(failed.assigned_zone(), "ERROR");
        assert_eq!(failed.stored(), 0);
        assert_eq!(failed.remaining_unallocated(), 25);
        assert!(matches!(failed.error(), Some(PolicyError::UnknownState(_))));

        assert_eq!(report.entries[0].stored(), 10);
        assert_eq!(report.entries[2].stored(), 10);
        assert_eq!(report.errors, 1);
        assert_eq!(report.shortfall_total, 25);
    }

    #[test]
    fn test_error_row_does_not_touch_capacity() {
        let before = capacity();
        let report = ZoneAllocator::run(
            &[StorageRequest::new(Urgency::Low, 1).with_temp_sensitive(true)],
            &policy(),
            before.clone(),
        );
        assert_eq!(report.capacity, before);
    }

    #[test]
    fn test_policy_zone_missing_from_map() {
        let to_unknown = |_: &ZoneState| -> Result<String, PolicyError> { Ok("Z9".into()) };
        let report = ZoneAllocator::run(&[StorageRequest::new(Urgency::High, 8)], &to_unknown, capacity());
        assert_eq!(report.entries[0].assigned_zone(), "Z9");
        assert_eq!(report.entries[0].stored(), 0);
        assert_eq!(report.entries[0].remaining_unallocated(), 8);
    }

    #[test]
    fn test_zero_demand() {
        let report = ZoneAllocator::run(&[StorageRequest::new(Urgency::High, 0)], &policy(), capacity());
        assert_eq!(report.entries[0].stored(), 0);
        assert_eq!(report.entries[0].remaining_unallocated(), 0);
        assert_eq!(report.capacity.available("A1"), 40);
    }

    #[test]
    fn test_conservation_across_batch() {
        let requests: Vec<StorageRequest> = (0..20)
            .map(|i| {
                let urgency = match i % 3 {
                    0 => Urgency::Low,
                    1 => Urgency::Medium,
                    _ => Urgency::High,
                };
                StorageRequest::new(urgency, i * 7)
            })
            .collect();
        let start = capacity();
        let report = ZoneAllocator::run(&requests, &policy(), start.clone());

        let demanded: u64 = requests.iter().map(|r| r.capacity_required).sum();
        assert_eq!(report.stored_total + report.shortfall_total, demanded);
        assert_eq!(
            start.total_available() - report.capacity.total_available(),
            report.stored_total
        );
    }
}
