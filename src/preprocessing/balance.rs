//! Class balance analysis.
//!
//! Reports the minority class and its numeric disparity against the majority
//! class, which is what a caller inspects to decide whether oversampling is
//! warranted before training.

use crate::core::error::{NeuroprepError, Result};
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// Class balance report for a labeled table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBalance {
    /// Label with the fewest samples
    pub minority_label: String,
    /// Sample count of the minority label
    pub minority_count: usize,
    /// Label with the most samples
    pub majority_label: String,
    /// Sample count of the majority label
    pub majority_count: usize,
    /// `majority_count - minority_count`; zero iff all counts are equal
    pub disparity: usize,
}

impl ClassBalance {
    /// Check whether all classes have equal sample counts
    pub fn is_balanced(&self) -> bool {
        self.disparity == 0
    }
}

/// Count class labels and report the minority class and disparity.
///
/// Labels are enumerated in first-encountered row order; when several labels
/// tie for the minimum (or maximum) count, the first-encountered one wins.
/// That choice is deterministic for a given row ordering but callers should
/// not rely on it across reorderings of the input.
///
/// With a single class the minority and majority coincide and the disparity
/// is zero.
pub fn class_balance(table: &Table, class_column: &str) -> Result<ClassBalance> {
    table.column_index(class_column)?;
    if table.num_rows() == 0 {
        return Err(NeuroprepError::EmptyTable);
    }

    let labels = table.labels(class_column)?;
    let distinct = table.distinct_labels(class_column)?;
    let counts: Vec<usize> = distinct
        .iter()
        .map(|class| labels.iter().filter(|l| *l == class).count())
        .collect();

    // Strict comparisons keep the first-encountered label on ties.
    let mut minority = 0usize;
    let mut majority = 0usize;
    for (i, &count) in counts.iter().enumerate() {
        if count < counts[minority] {
            minority = i;
        }
        if count > counts[majority] {
            majority = i;
        }
    }

    let report = ClassBalance {
        minority_label: distinct[minority].clone(),
        minority_count: counts[minority],
        majority_label: distinct[majority].clone(),
        majority_count: counts[majority],
        disparity: counts[majority] - counts[minority],
    };
    log::debug!(
        "class balance: minority '{}' ({}), majority '{}' ({}), disparity {}",
        report.minority_label,
        report.minority_count,
        report.majority_label,
        report.majority_count,
        report.disparity
    );
    Ok(report)
}
