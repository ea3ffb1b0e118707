//! Stratified train/test splitting.
//!
//! Splits a feature matrix and its label vector while preserving the class
//! proportions in both partitions, so an imbalanced cohort does not end up
//! with a test set missing the minority class entirely.

use crate::core::error::{NeuroprepError, Result};
use ndarray::{Array2, ArrayView2, Axis};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Result of a stratified split.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    /// Training feature rows
    pub x_train: Array2<f64>,
    /// Test feature rows
    pub x_test: Array2<f64>,
    /// Training labels
    pub y_train: Vec<String>,
    /// Test labels
    pub y_test: Vec<String>,
}

/// Stratified train/test splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StratifiedSplitter {
    /// Fraction of each class routed to the test partition; must be in (0, 1)
    pub test_fraction: f64,
    /// Seed for the shuffle; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for StratifiedSplitter {
    fn default() -> Self {
        StratifiedSplitter {
            test_fraction: 0.1,
            seed: None,
        }
    }
}

impl StratifiedSplitter {
    /// Create a splitter with the given test fraction
    pub fn new(test_fraction: f64) -> Self {
        StratifiedSplitter {
            test_fraction,
            seed: None,
        }
    }

    /// Set the shuffle seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Split features and labels, stratified by label.
    ///
    /// Each class contributes `round(test_fraction * class_count)` rows to
    /// the test partition, drawn after a per-class shuffle. Every input row
    /// lands in exactly one partition.
    pub fn split(&self, features: ArrayView2<f64>, labels: &[String]) -> Result<TrainTestSplit> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(NeuroprepError::invalid_parameter(
                "test_fraction",
                self.test_fraction.to_string(),
                "must be in (0, 1)",
            ));
        }
        if labels.len() != features.nrows() {
            return Err(NeuroprepError::dimension_mismatch(
                format!("{} feature rows", features.nrows()),
                format!("{} labels", labels.len()),
            ));
        }
        if features.nrows() == 0 {
            return Err(NeuroprepError::EmptyTable);
        }

        log::info!("splitting data");
        let mut rng = match self.seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        };

        let mut train_indices = Vec::new();
        let mut test_indices = Vec::new();
        for pool in class_pools(labels) {
            let mut indices = pool;
            // Fisher-Yates shuffle within the class pool
            for i in (1..indices.len()).rev() {
                let j = rng.gen_range(0..=i);
                indices.swap(i, j);
            }
            let num_test = (self.test_fraction * indices.len() as f64).round() as usize;
            test_indices.extend_from_slice(&indices[..num_test]);
            train_indices.extend_from_slice(&indices[num_test..]);
        }

        Ok(TrainTestSplit {
            x_train: features.select(Axis(0), &train_indices),
            x_test: features.select(Axis(0), &test_indices),
            y_train: train_indices.iter().map(|&i| labels[i].clone()).collect(),
            y_test: test_indices.iter().map(|&i| labels[i].clone()).collect(),
        })
    }
}

/// Row-index pools per class, in first-encountered label order.
pub(crate) fn class_pools(labels: &[String]) -> Vec<Vec<usize>> {
    let mut order: Vec<&String> = Vec::new();
    let mut pools: Vec<Vec<usize>> = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        match order.iter().position(|l| *l == label) {
            Some(pos) => pools[pos].push(i),
            None => {
                order.push(label);
                pools.push(vec![i]);
            }
        }
    }
    pools
}
