//! Table-in, table-out dispatch planning.
//!
//! Validates a tabular batch, runs the external scorer and cluster
//! assigner, matches shipments to a fresh pool and renders the result as a
//! table. Every batch-level check runs before the pool is built.

use super::config::DispatchConfig;
use super::runner::{DispatchOutcome, DispatchRunner};
use super::types::{ClusterAssigner, PriorityScorer, Shipment, ShipmentFeatures};
use crate::error::AllocError;
use crate::table::{Cell, Table};
use tracing::info;

pub const FRAGILITY_TAG: &str = "Fragility_Tag";
pub const TEMP_TAG: &str = "Temp_Tag";
pub const TOTAL_WEIGHT: &str = "Total_Weight";
pub const TOTAL_VOLUME: &str = "Total_Volume";
pub const EXPIRY_DURATION_MONTHS: &str = "Expiry_Duration_Months";
pub const DISPATCH_DURATION_DAYS: &str = "Dispatch_Duration_Days";
pub const PRODUCT_ID: &str = "Product_ID";

/// Columns every dispatch batch must carry, all numeric.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    FRAGILITY_TAG,
    TEMP_TAG,
    TOTAL_WEIGHT,
    TOTAL_VOLUME,
    EXPIRY_DURATION_MONTHS,
    DISPATCH_DURATION_DAYS,
];

/// Columns of the output table, in order.
pub const OUTPUT_COLUMNS: [&str; 11] = [
    PRODUCT_ID,
    "Product_Name",
    "Product_Category",
    "Quantity_Dispatched",
    TOTAL_WEIGHT,
    TOTAL_VOLUME,
    "ML_Priority_Score",
    "Cluster",
    "Load_Type",
    "Assignment_Status",
    "Assigned_Vehicle_ID",
];

/// A validated, scored and clustered batch, ready for matching.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBatch {
    pub shipments: Vec<Shipment>,
    pub features: Vec<ShipmentFeatures>,
}

/// Planned dispatch: typed outcome plus the rendered output table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchReport {
    pub outcome: DispatchOutcome,
    pub table: Table,
}

/// Plans a dispatch batch given as a table.
///
/// # Examples
///
/// ```
/// use u_allocate::dispatch::{DispatchConfig, DispatchPlanner, ShipmentFeatures};
/// use u_allocate::table::{Cell, Table};
///
/// let columns = ["Product_ID", "Fragility_Tag", "Temp_Tag", "Total_Weight",
///                "Total_Volume", "Expiry_Duration_Months", "Dispatch_Duration_Days"];
/// let table = Table::new(
///     columns.iter().map(|c| c.to_string()).collect(),
///     vec![vec![Cell::from("P-1"), Cell::Int(0), Cell::Int(1), Cell::Float(120.0),
///               Cell::Float(300.0), Cell::Int(12), Cell::Int(3)]],
/// );
///
/// let scorer = |f: &ShipmentFeatures| 10.0 - f.dispatch_duration_days;
/// let clusters = |_: &ShipmentFeatures, _score: f64| 0_i64;
/// let report = DispatchPlanner::plan(&table, &DispatchConfig::default(), &scorer, &clusters).unwrap();
///
/// assert_eq!(report.table.data[0][8], Cell::from("T"));
/// assert_eq!(report.table.data[0][10], Cell::from("SMALL_001"));
/// ```
pub struct DispatchPlanner;

impl DispatchPlanner {
    /// Validates, scores, clusters and matches a batch.
    ///
    /// # Errors
    ///
    /// [`AllocError::EmptyBatch`], [`AllocError::MalformedRow`],
    /// [`AllocError::Schema`], [`AllocError::Value`] or
    /// [`AllocError::InvalidConfig`]; the batch is rejected as a whole.
    pub fn plan<S, A>(
        table: &Table,
        config: &DispatchConfig,
        scorer: &S,
        assigner: &A,
    ) -> Result<DispatchReport, AllocError>
    where
        S: PriorityScorer + ?Sized,
        A: ClusterAssigner + ?Sized,
    {
        config.validate().map_err(AllocError::InvalidConfig)?;
        let prepared = Self::prepare(table, scorer, assigner)?;
        let outcome = DispatchRunner::run(&prepared.shipments, config)?;
        let table = Self::render(table, &prepared, &outcome);
        Ok(DispatchReport { outcome, table })
    }

    /// Validation, scoring and clustering without matching.
    pub fn prepare<S, A>(table: &Table, scorer: &S, assigner: &A) -> Result<PreparedBatch, AllocError>
    where
        S: PriorityScorer + ?Sized,
        A: ClusterAssigner + ?Sized,
    {
        table.validate_shape()?;
        let cols = table.require_columns(&REQUIRED_COLUMNS)?;
        info!(rows = table.len(), "dispatch batch received");

        let mut features = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let f = ShipmentFeatures {
                fragility_tag: table.number(row, cols[0])?,
                temp_tag: table.number(row, cols[1])?,
                total_weight: table.number(row, cols[2])?,
                total_volume: table.number(row, cols[3])?,
                expiry_duration_months: table.number(row, cols[4])?,
                dispatch_duration_days: table.number(row, cols[5])?,
            };
            if f.total_weight < 0.0 {
                return Err(AllocError::value(row, TOTAL_WEIGHT, f.total_weight));
            }
            if f.total_volume < 0.0 {
                return Err(AllocError::value(row, TOTAL_VOLUME, f.total_volume));
            }
            features.push(f);
        }

        let mut shipments = Vec::with_capacity(features.len());
        for (row, f) in features.iter().enumerate() {
            let score = scorer.score(f);
            if !score.is_finite() {
                return Err(AllocError::value(row, "ML_Priority_Score", score));
            }
            let cluster = assigner.assign(f, score);
            let id = table
                .cell_by_name(row, PRODUCT_ID)
                .as_text()
                .unwrap_or_else(|| row.to_string());

            shipments.push(
                Shipment::new(id, f.total_weight, f.total_volume)
                    .with_priority(score)
                    .with_cluster(cluster)
                    .with_fragile(f.fragility_tag != 0.0)
                    .with_temp_sensitive(f.temp_tag != 0.0),
            );
        }

        Ok(PreparedBatch {
            shipments,
            features,
        })
    }

    fn render(input: &Table, prepared: &PreparedBatch, outcome: &DispatchOutcome) -> Table {
        let passthrough = |row: usize, name: &str| input.cell_by_name(row, name).clone();

        let data = prepared
            .shipments
            .iter()
            .zip(&outcome.records)
            .enumerate()
            .map(|(row, (s, r))| {
                vec![
                    passthrough(row, PRODUCT_ID),
                    passthrough(row, "Product_Name"),
                    passthrough(row, "Product_Category"),
                    passthrough(row, "Quantity_Dispatched"),
                    Cell::Float(s.mass),
                    Cell::Float(s.volume),
                    Cell::Float(s.priority_score),
                    Cell::Int(s.cluster_id),
                    Cell::from(r.sensitivity.tag()),
                    Cell::from(r.status.as_str()),
                    Cell::from(r.assigned_resource_id.clone()),
                ]
            })
            .collect();

        Table::new(OUTPUT_COLUMNS.iter().map(|c| c.to_string()).collect(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::AssignmentStatus;

    fn columns() -> Vec<String> {
        [
            "Product_ID",
            "Product_Name",
            "Fragility_Tag",
            "Temp_Tag",
            "Total_Weight",
            "Total_Volume",
            "Expiry_Duration_Months",
            "Dispatch_Duration_Days",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect()
    }

    fn row(id: &str, fragile: i64, temp: i64, weight: f64, volume: f64, days: i64) -> Vec<Cell> {
        vec![
            Cell::from(id),
            Cell::from(format!("{id} name")),
            Cell::Int(fragile),
            Cell::Int(temp),
            Cell::Float(weight),
            Cell::Float(volume),
            Cell::Int(6),
            Cell::Int(days),
        ]
    }

    // Urgency falls with the dispatch window; everything in one cluster.
    fn scorer(f: &ShipmentFeatures) -> f64 {
        10.0 - f.dispatch_duration_days
    }

    fn one_cluster(_: &ShipmentFeatures, _: f64) -> i64 {
        0
    }

    // Set RUST_LOG=u_allocate=debug to see the allocation log.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_plan_end_to_end() {
        init_tracing();
        let table = Table::new(
            columns(),
            vec![
                row("B", 0, 0, 300.0, 800.0, 5),
                row("A", 0, 0, 300.0, 800.0, 1),
                row("C", 1, 1, 100.0, 100.0, 3),
            ],
        );
        let config = DispatchConfig::default().with_templates(vec![
            crate::resource::ResourceTemplate::new(
                "Small",
                crate::resource::PropertyClass::General,
                500.0,
                1500.0,
            ),
        ]);
        let config = config.with_replication(1);

        let report = DispatchPlanner::plan(&table, &config, &scorer, &one_cluster).unwrap();

        let statuses: Vec<AssignmentStatus> =
            report.outcome.records.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                AssignmentStatus::NotAssigned,
                AssignmentStatus::Assigned,
                AssignmentStatus::NotAssigned,
            ]
        );

        assert_eq!(report.table.columns.len(), OUTPUT_COLUMNS.len());
        let a = &report.table.data[1];
        assert_eq!(a[0], Cell::from("A"));
        assert_eq!(a[1], Cell::from("A name"));
        assert_eq!(a[2], Cell::Null);
        assert_eq!(a[6], Cell::Float(9.0));
        assert_eq!(a[8], Cell::from("N"));
        assert_eq!(a[9], Cell::from("Assigned"));
        assert_eq!(a[10], Cell::from("SMALL_001"));

        let c = &report.table.data[2];
        assert_eq!(c[8], Cell::from("TF"));
        assert_eq!(c[9], Cell::from("Not_Assigned"));
        assert_eq!(c[10], Cell::Null);
    }

    #[test]
    fn test_missing_columns_rejected() {
        let mut cols = columns();
        cols.retain(|c| c != "Temp_Tag" && c != "Total_Volume");
        let table = Table::new(cols, vec![vec![Cell::Null; 6]]);
        let err = DispatchPlanner::plan(&table, &DispatchConfig::default(), &scorer, &one_cluster)
            .unwrap_err();
        assert_eq!(
            err,
            AllocError::Schema {
                missing: vec!["Temp_Tag".into(), "Total_Volume".into()]
            }
        );
    }

    #[test]
    fn test_non_numeric_rejects_whole_batch() {
        let mut bad = row("X", 0, 0, 1.0, 1.0, 1);
        bad[4] = Cell::from("heavy");
        let table = Table::new(columns(), vec![row("A", 0, 0, 1.0, 1.0, 1), bad]);
        let err = DispatchPlanner::plan(&table, &DispatchConfig::default(), &scorer, &one_cluster)
            .unwrap_err();
        assert_eq!(
            err,
            AllocError::Value {
                row: 1,
                column: "Total_Weight".into(),
                value: "heavy".into()
            }
        );
    }

    #[test]
    fn test_null_cell_is_value_error() {
        let mut bad = row("X", 0, 0, 1.0, 1.0, 1);
        bad[7] = Cell::Null;
        let table = Table::new(columns(), vec![bad]);
        assert!(matches!(
            DispatchPlanner::plan(&table, &DispatchConfig::default(), &scorer, &one_cluster),
            Err(AllocError::Value { .. })
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let table = Table::new(columns(), vec![row("X", 0, 0, -3.0, 1.0, 1)]);
        assert!(matches!(
            DispatchPlanner::plan(&table, &DispatchConfig::default(), &scorer, &one_cluster),
            Err(AllocError::Value { .. })
        ));
    }

    #[test]
    fn test_empty_and_malformed() {
        let empty = Table::new(columns(), vec![]);
        assert_eq!(
            DispatchPlanner::plan(&empty, &DispatchConfig::default(), &scorer, &one_cluster),
            Err(AllocError::EmptyBatch)
        );

        let mut short = row("A", 0, 0, 1.0, 1.0, 1);
        short.pop();
        let malformed = Table::new(columns(), vec![short]);
        assert!(matches!(
            DispatchPlanner::plan(&malformed, &DispatchConfig::default(), &scorer, &one_cluster),
            Err(AllocError::MalformedRow { row: 0, .. })
        ));
    }

    #[test]
    fn test_non_finite_score_rejected() {
        let table = Table::new(columns(), vec![row("A", 0, 0, 1.0, 1.0, 1)]);
        let nan_scorer = |_: &ShipmentFeatures| f64::NAN;
        assert!(matches!(
            DispatchPlanner::plan(&table, &DispatchConfig::default(), &nan_scorer, &one_cluster),
            Err(AllocError::Value { .. })
        ));
    }

    #[test]
    fn test_cluster_drives_order() {
        let table = Table::new(
            columns(),
            vec![
                row("urgent_far", 0, 0, 400.0, 100.0, 0),
                row("relaxed_near", 0, 0, 400.0, 100.0, 9),
            ],
        );
        // Long dispatch windows form cluster 0 and go first.
        let by_window =
            |f: &ShipmentFeatures, _: f64| if f.dispatch_duration_days > 5.0 { 0_i64 } else { 1 };
        let config = DispatchConfig::default().with_replication(1);
        let report = DispatchPlanner::plan(&table, &config, &scorer, &by_window).unwrap();
        assert_eq!(
            report.outcome.records[1].assigned_resource_id.as_deref(),
            Some("SMALL_001")
        );
        assert_eq!(
            report.outcome.records[0].assigned_resource_id.as_deref(),
            Some("MEDIUM_001")
        );
    }

    #[test]
    fn test_prepare_flags_and_ids() {
        let mut r = row("A", 2, 0, 1.0, 1.0, 1);
        r[0] = Cell::Null;
        let table = Table::new(columns(), vec![r]);
        let prepared = DispatchPlanner::prepare(&table, &scorer, &one_cluster).unwrap();
        assert_eq!(prepared.shipments[0].id, "0");
        assert!(prepared.shipments[0].fragile);
        assert!(!prepared.shipments[0].temp_sensitive);
        assert_eq!(prepared.features[0].fragility_tag, 2.0);
    }
}
