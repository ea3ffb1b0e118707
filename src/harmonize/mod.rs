//! Covariate-aware site harmonization seam.
//!
//! Batch-effect correction (ComBat and friends) is a statistical procedure
//! this crate deliberately does not implement. It is modeled as an external
//! collaborator behind the [`CovariateHarmonizer`] trait with a fixed call
//! contract: feature matrix in, covariate table and column designations
//! alongside, same-shape corrected matrix out. [`harmonize_table`] does the
//! bookkeeping of extracting the ranges from a [`Table`] and writing the
//! corrected values back.

use crate::core::error::{NeuroprepError, Result};
use crate::table::{ColumnRange, Table};
use ndarray::{Array2, ArrayView2};

/// External covariate-adjusted batch-correction routine.
///
/// Implementors remove site/batch effects from `data` while preserving the
/// variables of interest listed in the discrete and continuous covariate
/// designations. The returned matrix must have the same shape as `data`.
pub trait CovariateHarmonizer {
    /// Correct a feature matrix for batch effects.
    ///
    /// * `data` - feature matrix, rows aligned with `covariates`
    /// * `covariates` - covariate sub-table (batch column plus demographics)
    /// * `batch_column` - covariate column naming the batch/site per row
    /// * `discrete_columns` - categorical covariates to preserve
    /// * `continuous_columns` - continuous covariates to preserve
    fn harmonize(
        &self,
        data: ArrayView2<f64>,
        covariates: &Table,
        batch_column: &str,
        discrete_columns: &[&str],
        continuous_columns: &[&str],
    ) -> Result<Array2<f64>>;
}

/// Harmonize a table's feature range in place through an external routine.
///
/// Extracts the feature matrix and the covariate columns, hands both to the
/// collaborator, validates that the corrected matrix kept its shape, and
/// writes it back over the feature range. Columns outside the feature range
/// are untouched.
pub fn harmonize_table<H: CovariateHarmonizer>(
    table: &mut Table,
    feature_range: &ColumnRange,
    covariate_range: &ColumnRange,
    batch_column: &str,
    discrete_columns: &[&str],
    continuous_columns: &[&str],
    harmonizer: &H,
) -> Result<()> {
    let data = table.feature_matrix(feature_range)?;
    let covariates = extract_covariates(table, covariate_range)?;
    covariates.column_index(batch_column)?;
    for column in discrete_columns.iter().chain(continuous_columns) {
        covariates.column_index(column)?;
    }

    log::info!(
        "harmonizing {} features across batches in '{}'",
        data.ncols(),
        batch_column
    );
    let corrected = harmonizer.harmonize(
        data.view(),
        &covariates,
        batch_column,
        discrete_columns,
        continuous_columns,
    )?;
    if corrected.dim() != data.dim() {
        return Err(NeuroprepError::dimension_mismatch(
            format!("({}, {})", data.nrows(), data.ncols()),
            format!("({}, {})", corrected.nrows(), corrected.ncols()),
        ));
    }
    table.set_feature_matrix(feature_range, corrected.view())
}

/// Copy the covariate columns into a standalone sub-table
fn extract_covariates(table: &Table, range: &ColumnRange) -> Result<Table> {
    let indices = table.range_indices(range)?;
    let mut columns = Vec::with_capacity(indices.len());
    for idx in indices {
        let name = table.column_names()[idx].clone();
        let column = table.column(&name)?.clone();
        columns.push((name, column));
    }
    Table::from_columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    /// Shifts every feature to a zero mean per batch; enough structure to
    /// exercise the seam without any real statistics.
    struct BatchCentering;

    impl CovariateHarmonizer for BatchCentering {
        fn harmonize(
            &self,
            data: ArrayView2<f64>,
            covariates: &Table,
            batch_column: &str,
            _discrete_columns: &[&str],
            _continuous_columns: &[&str],
        ) -> Result<Array2<f64>> {
            let mut corrected = data.to_owned();
            for batch in covariates.distinct_labels(batch_column)? {
                let mask = covariates.label_mask(batch_column, &batch)?;
                for j in 0..corrected.ncols() {
                    let rows: Vec<usize> =
                        mask.iter().enumerate().filter(|(_, &m)| m).map(|(i, _)| i).collect();
                    let mean =
                        rows.iter().map(|&i| corrected[[i, j]]).sum::<f64>() / rows.len() as f64;
                    for &i in &rows {
                        corrected[[i, j]] -= mean;
                    }
                }
            }
            Ok(corrected)
        }
    }

    /// Misbehaving collaborator that drops a column.
    struct ShapeBreaker;

    impl CovariateHarmonizer for ShapeBreaker {
        fn harmonize(
            &self,
            data: ArrayView2<f64>,
            _covariates: &Table,
            _batch_column: &str,
            _discrete_columns: &[&str],
            _continuous_columns: &[&str],
        ) -> Result<Array2<f64>> {
            Ok(Array2::zeros((data.nrows(), data.ncols().saturating_sub(1))))
        }
    }

    fn cohort() -> Table {
        Table::from_columns(vec![
            (
                "site".to_string(),
                Column::Categorical(vec![
                    "A".to_string(),
                    "A".to_string(),
                    "B".to_string(),
                    "B".to_string(),
                ]),
            ),
            ("age".to_string(), Column::Numeric(vec![30.0, 40.0, 35.0, 45.0])),
            ("dx".to_string(), Column::Numeric(vec![0.0, 1.0, 0.0, 1.0])),
            ("vol".to_string(), Column::Numeric(vec![10.0, 12.0, 100.0, 102.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_harmonize_table_writes_back() {
        let mut table = cohort();
        harmonize_table(
            &mut table,
            &ColumnRange::new("vol", "vol"),
            &ColumnRange::new("site", "dx"),
            "site",
            &["dx"],
            &["age"],
            &BatchCentering,
        )
        .unwrap();

        // each site is centered independently
        assert_eq!(table.numeric("vol").unwrap(), &[-1.0, 1.0, -1.0, 1.0]);
        // covariates untouched
        assert_eq!(table.numeric("age").unwrap(), &[30.0, 40.0, 35.0, 45.0]);
    }

    #[test]
    fn test_shape_changing_collaborator_rejected() {
        let mut table = cohort();
        let result = harmonize_table(
            &mut table,
            &ColumnRange::new("vol", "vol"),
            &ColumnRange::new("site", "dx"),
            "site",
            &[],
            &[],
            &ShapeBreaker,
        );
        assert!(matches!(
            result,
            Err(NeuroprepError::DimensionMismatch { .. })
        ));
        // failed harmonization leaves the table unchanged
        assert_eq!(table.numeric("vol").unwrap(), &[10.0, 12.0, 100.0, 102.0]);
    }

    #[test]
    fn test_unknown_batch_column_rejected() {
        let mut table = cohort();
        let result = harmonize_table(
            &mut table,
            &ColumnRange::new("vol", "vol"),
            &ColumnRange::new("site", "dx"),
            "scanner",
            &[],
            &[],
            &BatchCentering,
        );
        assert!(matches!(result, Err(NeuroprepError::InvalidColumn { .. })));
    }

    #[test]
    fn test_covariate_columns_must_be_inside_range() {
        let mut table = cohort();
        // "vol" is outside the covariate range site..=dx
        let result = harmonize_table(
            &mut table,
            &ColumnRange::new("vol", "vol"),
            &ColumnRange::new("site", "dx"),
            "site",
            &["vol"],
            &[],
            &BatchCentering,
        );
        assert!(matches!(result, Err(NeuroprepError::InvalidColumn { .. })));
    }
}
