//! Table-in, table-out zone allocation.

use super::allocator::{ZoneAllocator, ZoneReport};
use super::capacity::CapacityMap;
use super::config::ZoneConfig;
use super::policy::ZonePolicy;
use super::types::{StorageRequest, Urgency};
use crate::error::AllocError;
use crate::table::{Cell, Table};
use tracing::info;

pub const URGENCY: &str = "urgency";
pub const FRAGILE: &str = "fragile";
pub const TEMP: &str = "temp";
pub const CAPACITY_REQUIRED: &str = "capacity_required";

/// Columns every zone batch must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [URGENCY, FRAGILE, TEMP, CAPACITY_REQUIRED];

/// Columns of the output table, in order.
pub const OUTPUT_COLUMNS: [&str; 8] = [
    URGENCY,
    FRAGILE,
    TEMP,
    CAPACITY_REQUIRED,
    "Assigned_Zone",
    "Stored",
    "Remaining_Unallocated",
    "error",
];

/// Planned zone allocation: typed report plus the rendered log table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZonePlan {
    pub report: ZoneReport,
    pub table: Table,
}

/// Plans zone allocation for a batch given as a table.
///
/// The starting capacity comes from the first row's `<zone>_used` columns
/// (absent columns count as 0 used).
pub struct ZonePlanner;

impl ZonePlanner {
    /// Validates the batch, derives the capacity map and allocates.
    ///
    /// # Errors
    ///
    /// Batch-level problems ([`AllocError::EmptyBatch`],
    /// [`AllocError::MalformedRow`], [`AllocError::Schema`],
    /// [`AllocError::Value`], [`AllocError::InvalidConfig`]) reject the whole
    /// batch before any capacity is touched. Policy failures do not: they
    /// become `ERROR` rows.
    pub fn plan<P: ZonePolicy + ?Sized>(
        table: &Table,
        config: &ZoneConfig,
        policy: &P,
    ) -> Result<ZonePlan, AllocError> {
        config.validate().map_err(AllocError::InvalidConfig)?;
        let requests = Self::parse_requests(table)?;
        let capacity = Self::initial_capacity(table, config)?;
        info!(rows = requests.len(), "zone batch received");

        let report = ZoneAllocator::run(&requests, policy, capacity);
        let table = Self::render(&report);
        Ok(ZonePlan { report, table })
    }

    /// Parses and validates every request row.
    pub fn parse_requests(table: &Table) -> Result<Vec<StorageRequest>, AllocError> {
        table.validate_shape()?;
        let cols = table.require_columns(&REQUIRED_COLUMNS)?;

        (0..table.len())
            .map(|row| -> Result<StorageRequest, AllocError> {
                let urgency_cell = table.cell(row, cols[0]);
                let urgency = urgency_cell
                    .as_text()
                    .map(|label| Urgency::parse(&label))
                    .ok_or_else(|| AllocError::value(row, URGENCY, urgency_cell))?;

                let demand_cell = table.cell(row, cols[3]);
                let capacity_required = demand_cell
                    .as_i64()
                    .and_then(|v| u64::try_from(v).ok())
                    .ok_or_else(|| AllocError::value(row, CAPACITY_REQUIRED, demand_cell))?;

                Ok(StorageRequest::new(urgency, capacity_required)
                    .with_fragile(table.flag(row, cols[1])?)
                    .with_temp_sensitive(table.flag(row, cols[2])?))
            })
            .collect()
    }

    /// Starting capacity from the first row's used counts.
    ///
    /// Used counts must be integers; out-of-range counts are clamped by
    /// [`CapacityMap::from_used`].
    pub fn initial_capacity(table: &Table, config: &ZoneConfig) -> Result<CapacityMap, AllocError> {
        let mut used = Vec::with_capacity(config.zone_keys.len());
        for zone in &config.zone_keys {
            let column = config.used_column(zone);
            let count = match table.column_index(&column) {
                None => 0,
                Some(col) => {
                    let cell = table.cell(0, col);
                    cell.as_i64()
                        .ok_or_else(|| AllocError::value(0, &column, cell))?
                }
            };
            used.push((zone.clone(), count));
        }
        Ok(CapacityMap::from_used(used, config.max_per_cell))
    }

    fn render(report: &ZoneReport) -> Table {
        let data = report
            .entries
            .iter()
            .map(|e| {
                vec![
                    Cell::from(e.request.urgency.as_str()),
                    Cell::Int(i64::from(e.request.fragile)),
                    Cell::Int(i64::from(e.request.temp_sensitive)),
                    Cell::from(e.request.capacity_required as i64),
                    Cell::from(e.assigned_zone()),
                    Cell::from(e.stored() as i64),
                    Cell::from(e.remaining_unallocated() as i64),
                    Cell::from(e.error().map(|err| err.to_string())),
                ]
            })
            .collect();

        Table::new(OUTPUT_COLUMNS.iter().map(|c| c.to_string()).collect(), data)
    }
}
