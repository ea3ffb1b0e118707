//! Preprocessing operations for neuroprep.
//!
//! The operations mirror a typical multi-site workflow: fill missing values
//! with (site, class) group means, check the class balance, standardize the
//! feature matrix, split it stratified by class, and oversample the minority
//! class when the disparity warrants it.

pub mod balance;
pub mod impute;
pub mod oversample;
pub mod scale;
pub mod split;

pub use balance::{class_balance, ClassBalance};
pub use impute::GroupMeanImputer;
pub use oversample::SmoteOversampler;
pub use scale::{scale_range, ScalingParams, StandardScaler};
pub use split::{StratifiedSplitter, TrainTestSplit};
