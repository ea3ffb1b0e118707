//! Core infrastructure for neuroprep.
//!
//! Holds the error taxonomy shared by every module in the crate.

pub mod error;

pub use error::{NeuroprepError, Result};
