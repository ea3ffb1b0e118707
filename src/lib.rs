//! # neuroprep
//!
//! Tabular-data preprocessing utilities for multi-site neuroimaging
//! datasets: class- and site-stratified mean imputation, minority-class
//! analysis, covariate-aware harmonization plumbing, and the
//! standardize/split/oversample steps that prepare a feature matrix for
//! model training.
//!
//! ## Quick Start
//!
//! ```rust
//! use neuroprep::{class_balance, Column, ColumnRange, GroupMeanImputer, Table};
//!
//! # fn main() -> neuroprep::Result<()> {
//! let mut table = Table::from_columns(vec![
//!     (
//!         "site".to_string(),
//!         Column::Categorical(vec!["A".into(), "A".into(), "B".into(), "B".into()]),
//!     ),
//!     ("dx".to_string(), Column::Numeric(vec![0.0, 0.0, 1.0, 1.0])),
//!     (
//!         "thickness".to_string(),
//!         Column::Numeric(vec![2.5, f64::NAN, 3.1, 2.9]),
//!     ),
//! ])?;
//!
//! // Fill missing values with (site, class) group means
//! let imputer = GroupMeanImputer::new("dx", "site", ColumnRange::new("thickness", "thickness"));
//! imputer.fill(&mut table)?;
//! assert_eq!(table.numeric("thickness")?[1], 2.5);
//!
//! // Decide whether oversampling is warranted
//! let balance = class_balance(&table, "dx")?;
//! assert!(balance.is_balanced());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: error taxonomy shared across the crate
//! - [`table`]: in-memory table abstraction and CSV loading
//! - [`preprocessing`]: imputation, class balance, scaling, splitting,
//!   oversampling
//! - [`harmonize`]: trait seam for external ComBat-style batch correction
//!
//! All operations are synchronous, single-threaded, in-memory
//! transformations; in-place mutation is expressed through `&mut Table`
//! borrows so the ownership contract is visible at the call site.

#![warn(missing_docs)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module
pub mod core;

// Table management module
pub mod table;

// Preprocessing operations module
pub mod preprocessing;

// Harmonization seam module
pub mod harmonize;

// Re-export core functionality for convenience
pub use crate::core::error::{NeuroprepError, Result};

// Re-export table functionality
pub use table::{Column, ColumnRange, CsvConfig, CsvLoader, Table};

// Re-export preprocessing functionality
pub use preprocessing::{
    class_balance, scale_range, ClassBalance, GroupMeanImputer, ScalingParams, SmoteOversampler,
    StandardScaler, StratifiedSplitter, TrainTestSplit,
};

// Re-export harmonization functionality
pub use harmonize::{harmonize_table, CovariateHarmonizer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_compose() {
        let table = Table::from_columns(vec![(
            "dx".to_string(),
            Column::Numeric(vec![0.0, 0.0, 1.0]),
        )])
        .unwrap();
        let balance = class_balance(&table, "dx").unwrap();
        assert_eq!(balance.minority_label, "1");
        assert_eq!(balance.disparity, 1);
    }

    #[test]
    fn test_error_reexport() {
        let err = NeuroprepError::invalid_column("missing");
        assert_eq!(err.category(), "invalid_column");
    }
}
