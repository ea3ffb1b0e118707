//! Table management module for neuroprep.
//!
//! Provides the in-memory [`Table`] abstraction that preprocessing
//! operations consume (named columns, label-addressed ranges, row masks,
//! a NaN missing-value sentinel) and a CSV loader for getting cohort
//! sheets in and out of it.

pub mod frame;
pub mod loader;

pub use frame::{Column, ColumnRange, Table};
pub use loader::{CsvConfig, CsvLoader};
