//! Error handling and error types for neuroprep.
//!
//! This module provides the crate-wide error enum and `Result` alias used by
//! every preprocessing operation. All errors are raised synchronously to the
//! immediate caller; there is no retry or recovery logic in this crate.

use std::io;
use thiserror::Error;

/// Main error type for the neuroprep library.
///
/// Covers every failure condition that can occur while loading tables,
/// imputing missing values, analyzing class balance, or applying the
/// feature-matrix transformations.
#[derive(Error, Debug)]
pub enum NeuroprepError {
    /// A referenced column label does not exist in the table
    #[error("Invalid column: no column named '{name}'")]
    InvalidColumn { name: String },

    /// An operation was handed a table with zero rows
    #[error("Empty table: operation requires at least one row")]
    EmptyTable,

    /// A column holds categorical data where numeric data was required
    #[error("Type mismatch: column '{column}' is not numeric")]
    TypeMismatch { column: String },

    /// Matrix or label-vector shape differs from what the table expects
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        #[from]
        source: io::Error,
    },

    /// CSV parsing errors
    #[error("CSV parsing error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Internal library errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Results using NeuroprepError
pub type Result<T> = std::result::Result<T, NeuroprepError>;

/// Utility functions for error handling
impl NeuroprepError {
    /// Create an invalid column error
    pub fn invalid_column<S: Into<String>>(name: S) -> Self {
        NeuroprepError::InvalidColumn { name: name.into() }
    }

    /// Create a type mismatch error
    pub fn type_mismatch<S: Into<String>>(column: S) -> Self {
        NeuroprepError::TypeMismatch {
            column: column.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        NeuroprepError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        NeuroprepError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        NeuroprepError::Internal {
            message: message.into(),
        }
    }

    /// Get error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            NeuroprepError::InvalidColumn { .. } => "invalid_column",
            NeuroprepError::EmptyTable => "empty_table",
            NeuroprepError::TypeMismatch { .. } => "type_mismatch",
            NeuroprepError::DimensionMismatch { .. } => "dimension_mismatch",
            NeuroprepError::InvalidParameter { .. } => "invalid_parameter",
            NeuroprepError::IO { .. } => "io",
            NeuroprepError::Csv { .. } => "csv",
            NeuroprepError::Json { .. } => "json",
            NeuroprepError::Internal { .. } => "internal",
        }
    }
}
