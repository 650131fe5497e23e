//! Column-list / row-list tabular batches.
//!
//! Batches enter and leave the engine in the shape
//! `{ "columns": [...], "data": [[...], ...] }`. [`Table`] holds that shape
//! with loosely typed [`Cell`]s; the planners turn it into strongly typed
//! records through the strict coercions here and reject the whole batch on
//! the first bad cell.

use crate::error::AllocError;
use std::fmt;

/// A single loosely typed cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Numeric view of the cell.
    ///
    /// Integers, floats, booleans (as 0/1) and numeric text are accepted.
    /// Null, non-numeric text and non-finite floats yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Cell::Null => return None,
            Cell::Bool(b) => f64::from(u8::from(*b)),
            Cell::Int(i) => *i as f64,
            Cell::Float(f) => *f,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    /// Integer view of the cell. Floats must be integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Text(s) if s.trim().parse::<i64>().is_ok() => s.trim().parse().ok(),
            other => {
                let v = other.as_f64()?;
                (v.fract() == 0.0 && v.abs() < i64::MAX as f64).then_some(v as i64)
            }
        }
    }

    /// Flag view of the cell: any non-zero number is `true`.
    pub fn as_flag(&self) -> Option<bool> {
        self.as_f64().map(|v| v != 0.0)
    }

    /// Text view of the cell. Null yields `None`; other scalars are rendered.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "null"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Cell::Bool(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Null, Into::into)
    }
}

/// A tabular batch: column names plus rows of cells.
///
/// # Examples
///
/// ```
/// use u_allocate::table::{Cell, Table};
///
/// let table = Table::new(
///     vec!["id".into(), "mass".into()],
///     vec![vec![Cell::from("a"), Cell::from(12.5)]],
/// );
/// assert_eq!(table.column_index("mass"), Some(1));
/// assert!(table.validate_shape().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Rows; each row holds one cell per column.
    pub data: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, data: Vec<Vec<Cell>>) -> Self {
        Self { columns, data }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Checks that the batch is non-empty and rectangular.
    pub fn validate_shape(&self) -> Result<(), AllocError> {
        if self.columns.is_empty() || self.data.is_empty() {
            return Err(AllocError::EmptyBatch);
        }
        for (row, cells) in self.data.iter().enumerate() {
            if cells.len() != self.columns.len() {
                return Err(AllocError::MalformedRow {
                    row,
                    expected: self.columns.len(),
                    found: cells.len(),
                });
            }
        }
        Ok(())
    }

    /// Resolves required columns to their indices.
    ///
    /// Every missing column is reported at once.
    pub fn require_columns(&self, names: &[&str]) -> Result<Vec<usize>, AllocError> {
        let mut indices = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column_index(name) {
                Some(i) => indices.push(i),
                None => missing.push((*name).to_string()),
            }
        }
        if missing.is_empty() {
            Ok(indices)
        } else {
            Err(AllocError::Schema { missing })
        }
    }

    /// Cell at `(row, col)`, or [`Cell::Null`] when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        static NULL: Cell = Cell::Null;
        self.data.get(row).and_then(|r| r.get(col)).unwrap_or(&NULL)
    }

    /// Cell by column name, or [`Cell::Null`] when the column is absent.
    pub fn cell_by_name(&self, row: usize, name: &str) -> &Cell {
        static NULL: Cell = Cell::Null;
        match self.column_index(name) {
            Some(col) => self.cell(row, col),
            None => &NULL,
        }
    }

    /// Strict numeric read used by the batch planners.
    pub(crate) fn number(&self, row: usize, col: usize) -> Result<f64, AllocError> {
        let cell = self.cell(row, col);
        cell.as_f64()
            .ok_or_else(|| AllocError::value(row, &self.columns[col], cell))
    }

    /// Strict flag read used by the batch planners.
    pub(crate) fn flag(&self, row: usize, col: usize) -> Result<bool, AllocError> {
        let cell = self.cell(row, col);
        cell.as_flag()
            .ok_or_else(|| AllocError::value(row, &self.columns[col], cell))
    }
}
