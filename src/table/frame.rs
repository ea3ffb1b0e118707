//! In-memory table structure for neuroprep.
//!
//! This module provides the [`Table`] type that preprocessing operations work
//! on: a set of named columns over a fixed row count, where each column is
//! either numeric (with NaN as the missing-value sentinel) or categorical
//! (subject class labels, acquisition site identifiers).

use crate::core::error::{NeuroprepError, Result};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single named column of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Numeric measurements; `f64::NAN` marks a missing entry
    Numeric(Vec<f64>),
    /// Categorical labels; an empty string marks a missing entry
    Categorical(Vec<String>),
}

impl Column {
    /// Number of rows in the column
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    /// Check whether the column has zero rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether the column holds numeric data
    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }
}

/// An inclusive, label-addressed span of columns.
///
/// Both boundaries are column names resolved against the table's current
/// column order at call time; the range covers every column between and
/// including them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRange {
    /// Label of the first column in the range
    pub start: String,
    /// Label of the last column in the range
    pub end: String,
}

impl ColumnRange {
    /// Create a range from boundary labels
    pub fn new<S: Into<String>, E: Into<String>>(start: S, end: E) -> Self {
        ColumnRange {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Tabular dataset: rows are subjects, columns are named features plus
/// class/site metadata columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Vec<String>,
    index: HashMap<String, usize>,
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    /// Create a table from an ordered list of named columns.
    ///
    /// All columns must have the same length and names must be unique.
    pub fn from_columns(columns: Vec<(String, Column)>) -> Result<Self> {
        let mut table = Table {
            names: Vec::new(),
            index: HashMap::new(),
            columns: Vec::new(),
            num_rows: 0,
        };
        for (name, column) in columns {
            table.push_column(name, column)?;
        }
        Ok(table)
    }

    /// Append a column, validating its length against existing columns
    pub fn push_column(&mut self, name: String, column: Column) -> Result<()> {
        if self.index.contains_key(&name) {
            return Err(NeuroprepError::invalid_parameter(
                "column",
                name,
                "duplicate column name",
            ));
        }
        if !self.columns.is_empty() && column.len() != self.num_rows {
            return Err(NeuroprepError::dimension_mismatch(
                format!("{} rows", self.num_rows),
                format!("{} rows in column '{}'", column.len(), name),
            ));
        }
        self.num_rows = column.len();
        self.index.insert(name.clone(), self.columns.len());
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Number of rows (subjects)
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in table order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Check whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Resolve a column label to its position
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| NeuroprepError::invalid_column(name))
    }

    /// Borrow a column by label
    pub fn column(&self, name: &str) -> Result<&Column> {
        let idx = self.column_index(name)?;
        Ok(&self.columns[idx])
    }

    /// Borrow a numeric column's values by label
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(values),
            Column::Categorical(_) => Err(NeuroprepError::type_mismatch(name)),
        }
    }

    /// Mutably borrow a numeric column's values by label
    pub fn numeric_mut(&mut self, name: &str) -> Result<&mut [f64]> {
        let idx = self.column_index(name)?;
        match &mut self.columns[idx] {
            Column::Numeric(values) => Ok(values),
            Column::Categorical(_) => Err(NeuroprepError::type_mismatch(name)),
        }
    }

    /// Render every cell of a column as a label string.
    ///
    /// Categorical cells are returned as-is; numeric cells are rendered
    /// without a trailing `.0` for whole numbers so that a class column of
    /// `0.0`/`1.0` yields labels `"0"`/`"1"`.
    pub fn labels(&self, name: &str) -> Result<Vec<String>> {
        match self.column(name)? {
            Column::Categorical(values) => Ok(values.clone()),
            Column::Numeric(values) => Ok(values.iter().map(|&v| format_label(v)).collect()),
        }
    }

    /// Distinct labels of a column in first-encountered order
    pub fn distinct_labels(&self, name: &str) -> Result<Vec<String>> {
        let labels = self.labels(name)?;
        let mut seen = Vec::new();
        for label in labels {
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        Ok(seen)
    }

    /// Boolean row mask marking rows whose rendered label equals `label`
    pub fn label_mask(&self, name: &str, label: &str) -> Result<Vec<bool>> {
        let labels = self.labels(name)?;
        Ok(labels.iter().map(|l| l == label).collect())
    }

    /// Resolve an inclusive column range to the ordered positions it spans
    pub fn range_indices(&self, range: &ColumnRange) -> Result<Vec<usize>> {
        let start = self.column_index(&range.start)?;
        let end = self.column_index(&range.end)?;
        if start > end {
            return Err(NeuroprepError::invalid_parameter(
                "feature_range",
                format!("{}..={}", range.start, range.end),
                "start column comes after end column",
            ));
        }
        Ok((start..=end).collect())
    }

    /// Extract the numeric columns of a range into a row-major matrix.
    ///
    /// Fails with a type mismatch if any column in the range is categorical.
    pub fn feature_matrix(&self, range: &ColumnRange) -> Result<Array2<f64>> {
        let indices = self.range_indices(range)?;
        let mut matrix = Array2::<f64>::zeros((self.num_rows, indices.len()));
        for (j, &col_idx) in indices.iter().enumerate() {
            let values = match &self.columns[col_idx] {
                Column::Numeric(values) => values,
                Column::Categorical(_) => {
                    return Err(NeuroprepError::type_mismatch(&self.names[col_idx]))
                }
            };
            for (i, &value) in values.iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }
        Ok(matrix)
    }

    /// Write a matrix back over the columns of a range.
    ///
    /// The matrix shape must match `(num_rows, range width)`; columns outside
    /// the range are untouched.
    pub fn set_feature_matrix(&mut self, range: &ColumnRange, matrix: ArrayView2<f64>) -> Result<()> {
        let indices = self.range_indices(range)?;
        if matrix.nrows() != self.num_rows || matrix.ncols() != indices.len() {
            return Err(NeuroprepError::dimension_mismatch(
                format!("({}, {})", self.num_rows, indices.len()),
                format!("({}, {})", matrix.nrows(), matrix.ncols()),
            ));
        }
        for (j, &col_idx) in indices.iter().enumerate() {
            let name = self.names[col_idx].clone();
            match &mut self.columns[col_idx] {
                Column::Numeric(values) => {
                    for (i, value) in values.iter_mut().enumerate() {
                        *value = matrix[[i, j]];
                    }
                }
                Column::Categorical(_) => return Err(NeuroprepError::type_mismatch(name)),
            }
        }
        Ok(())
    }
}

/// Render a numeric cell as a grouping label.
///
/// Whole numbers drop the fractional part (`1.0` renders as `"1"`), NaN
/// renders as `"NaN"`.
pub(crate) fn format_label(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_finite() && value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
