//! Column-wise standardization.
//!
//! Zero-mean, unit-variance scaling of a feature matrix ahead of model
//! training. Non-finite values are ignored when fitting so an incompletely
//! imputed matrix does not poison the statistics.

use crate::core::error::{NeuroprepError, Result};
use crate::table::{ColumnRange, Table};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Per-column standardization parameters learned by [`StandardScaler::fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParams {
    /// Column means
    pub means: Vec<f64>,
    /// Column standard deviations (population)
    pub stds: Vec<f64>,
}

/// Zero-mean, unit-variance column scaler.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    fitted: Option<ScalingParams>,
}

impl StandardScaler {
    /// Create an unfitted scaler
    pub fn new() -> Self {
        StandardScaler { fitted: None }
    }

    /// Check whether the scaler has been fitted
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Get the fitted parameters
    pub fn params(&self) -> Option<&ScalingParams> {
        self.fitted.as_ref()
    }

    /// Learn per-column mean and standard deviation
    pub fn fit(&mut self, matrix: ArrayView2<f64>) -> Result<()> {
        if matrix.nrows() == 0 {
            return Err(NeuroprepError::EmptyTable);
        }
        let mut means = Vec::with_capacity(matrix.ncols());
        let mut stds = Vec::with_capacity(matrix.ncols());
        for column in matrix.columns() {
            let valid: Vec<f64> = column.iter().copied().filter(|v| v.is_finite()).collect();
            if valid.is_empty() {
                means.push(0.0);
                stds.push(0.0);
                continue;
            }
            let mean = valid.iter().sum::<f64>() / valid.len() as f64;
            let var =
                valid.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / valid.len() as f64;
            means.push(mean);
            stds.push(var.sqrt());
        }
        self.fitted = Some(ScalingParams { means, stds });
        Ok(())
    }

    /// Standardize a matrix with the fitted parameters.
    ///
    /// Zero-variance columns map to 0.0 rather than dividing by zero.
    pub fn transform(&self, matrix: ArrayView2<f64>) -> Result<Array2<f64>> {
        let params = self
            .fitted
            .as_ref()
            .ok_or_else(|| NeuroprepError::internal("Scaler not fitted. Call fit() first."))?;
        if matrix.ncols() != params.means.len() {
            return Err(NeuroprepError::dimension_mismatch(
                format!("{} columns", params.means.len()),
                format!("{} columns", matrix.ncols()),
            ));
        }
        let mut scaled = matrix.to_owned();
        for (j, mut column) in scaled.columns_mut().into_iter().enumerate() {
            let mean = params.means[j];
            let std = params.stds[j];
            for value in column.iter_mut() {
                *value = if std != 0.0 { (*value - mean) / std } else { 0.0 };
            }
        }
        Ok(scaled)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, matrix: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.fit(matrix)?;
        self.transform(matrix)
    }
}

/// Standardize a table's feature range in place.
pub fn scale_range(table: &mut Table, range: &ColumnRange) -> Result<()> {
    log::info!("scaling data");
    let matrix = table.feature_matrix(range)?;
    let scaled = StandardScaler::new().fit_transform(matrix.view())?;
    table.set_feature_matrix(range, scaled.view())
}
