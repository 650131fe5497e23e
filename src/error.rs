//! Error taxonomy.
//!
//! Batch-level failures ([`AllocError`]) are raised before any pool or
//! capacity map is built, so a rejected batch never leaves partial state
//! behind. Running out of capacity is not an error: it shows up as
//! `NotAssigned` or a non-zero shortfall in the results.

use thiserror::Error;

/// A batch-level failure. The whole batch is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocError {
    /// The batch has no columns or no rows.
    #[error("batch must have non-empty 'columns' and 'data'")]
    EmptyBatch,

    /// A row does not have one cell per column.
    #[error("row {row} malformed: expected {expected} cells, found {found}")]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Required columns are missing from the batch.
    #[error("missing columns: {missing:?}")]
    Schema { missing: Vec<String> },

    /// A cell failed numeric coercion or violates a value constraint.
    #[error("invalid value {value:?} in column '{column}' at row {row}")]
    Value {
        row: usize,
        column: String,
        value: String,
    },

    /// The allocation configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AllocError {
    pub(crate) fn value(row: usize, column: &str, value: impl ToString) -> Self {
        AllocError::Value {
            row,
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}
