//! Synthetic minority oversampling (SMOTE).
//!
//! Balances class counts by synthesizing new minority samples on the line
//! segments between a class member and one of its nearest same-class
//! neighbors, rather than duplicating rows outright.

use crate::core::error::{NeuroprepError, Result};
use crate::preprocessing::split::class_pools;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// SMOTE oversampler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoteOversampler {
    /// Number of same-class nearest neighbors considered per synthetic sample
    pub k_neighbors: usize,
    /// Seed for sample selection and interpolation; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for SmoteOversampler {
    fn default() -> Self {
        SmoteOversampler {
            k_neighbors: 5,
            seed: None,
        }
    }
}

impl SmoteOversampler {
    /// Create an oversampler with the given neighbor count
    pub fn new(k_neighbors: usize) -> Self {
        SmoteOversampler {
            k_neighbors,
            seed: None,
        }
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Oversample every class up to the majority count.
    ///
    /// Returns the original rows followed by the synthetic rows, with labels
    /// aligned. A class with a single member has no neighbors to interpolate
    /// with and falls back to duplication.
    pub fn resample(
        &self,
        features: ArrayView2<f64>,
        labels: &[String],
    ) -> Result<(Array2<f64>, Vec<String>)> {
        if self.k_neighbors == 0 {
            return Err(NeuroprepError::invalid_parameter(
                "k_neighbors",
                "0",
                "must be at least 1",
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

        log::info!("oversampling data");
        let mut rng = match self.seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        };

        let pools = class_pools(labels);
        let majority = pools.iter().map(|p| p.len()).max().unwrap_or(0);

        let mut synthetic_rows: Vec<Vec<f64>> = Vec::new();
        let mut synthetic_labels: Vec<String> = Vec::new();
        for pool in &pools {
            let label = labels[pool[0]].clone();
            for _ in pool.len()..majority {
                let row = self.synthesize(&features, pool, &mut rng);
                synthetic_rows.push(row);
                synthetic_labels.push(label.clone());
            }
        }

        let num_out = features.nrows() + synthetic_rows.len();
        let mut out = Array2::<f64>::zeros((num_out, features.ncols()));
        for (i, row) in features.axis_iter(Axis(0)).enumerate() {
            out.row_mut(i).assign(&row);
        }
        for (i, row) in synthetic_rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                out[[features.nrows() + i, j]] = value;
            }
        }

        let mut out_labels = labels.to_vec();
        out_labels.extend(synthetic_labels);
        Ok((out, out_labels))
    }

    /// Build one synthetic row for a class pool
    fn synthesize(
        &self,
        features: &ArrayView2<f64>,
        pool: &[usize],
        rng: &mut rand::rngs::StdRng,
    ) -> Vec<f64> {
        let base_idx = pool[rng.gen_range(0..pool.len())];
        let base = features.row(base_idx);
        if pool.len() == 1 {
            return base.to_vec();
        }

        // Distances to the other class members, nearest first
        let mut neighbors: Vec<(f64, usize)> = pool
            .iter()
            .filter(|&&idx| idx != base_idx)
            .map(|&idx| (euclidean_distance(&base, &features.row(idx)), idx))
            .collect();
        neighbors.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        let k = self.k_neighbors.min(neighbors.len());
        let (_, neighbor_idx) = neighbors[rng.gen_range(0..k)];

        let neighbor = features.row(neighbor_idx);
        let gap: f64 = rng.gen();
        base.iter()
            .zip(neighbor.iter())
            .map(|(&b, &n)| b + gap * (n - b))
            .collect()
    }
}

/// Euclidean distance between two feature rows
fn euclidean_distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
