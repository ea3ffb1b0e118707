//! CSV loading and saving for neuroprep tables.
//!
//! Multi-site cohorts are exchanged as plain CSV sheets with a header row.
//! The loader infers each column's type: a column where every non-missing
//! entry parses as a number becomes numeric, anything else stays
//! categorical. Empty fields and the conventional NA spellings are treated
//! as missing.

use crate::core::error::Result;
use crate::table::frame::{Column, Table};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// CSV reading configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvConfig {
    /// Field delimiter
    pub delimiter: u8,
    /// Trim whitespace from fields
    pub trim: bool,
    /// Field spellings treated as missing values
    pub missing_tokens: Vec<String>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        CsvConfig {
            delimiter: b',',
            trim: true,
            missing_tokens: vec![
                "".to_string(),
                "NA".to_string(),
                "NaN".to_string(),
                "nan".to_string(),
            ],
        }
    }
}

/// CSV table loader
#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    config: CsvConfig,
}

impl CsvLoader {
    /// Create a loader with the given configuration
    pub fn new(config: CsvConfig) -> Self {
        CsvLoader { config }
    }

    /// Load a table from a headered CSV file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.config.delimiter)
            .trim(if self.config.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_path(path.as_ref())?;

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

        for record in reader.records() {
            let record = record?;
            for (col, field) in record.iter().enumerate() {
                if col < cells.len() {
                    cells[col].push(field.to_string());
                }
            }
        }

        log::info!(
            "loaded {} rows x {} columns from CSV",
            cells.first().map_or(0, |c| c.len()),
            headers.len()
        );

        let mut columns = Vec::with_capacity(headers.len());
        for (name, raw) in headers.into_iter().zip(cells) {
            columns.push((name, self.infer_column(raw)));
        }
        Table::from_columns(columns)
    }

    /// Write a table to a CSV file with a header row
    pub fn save<P: AsRef<Path>>(&self, table: &Table, path: P) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.config.delimiter)
            .from_path(path.as_ref())?;

        writer.write_record(table.column_names())?;
        for row in 0..table.num_rows() {
            let mut record = Vec::with_capacity(table.num_columns());
            for name in table.column_names() {
                let field = match table.column(name)? {
                    Column::Numeric(values) => {
                        let v = values[row];
                        if v.is_nan() {
                            String::new()
                        } else {
                            format!("{}", v)
                        }
                    }
                    Column::Categorical(values) => values[row].clone(),
                };
                record.push(field);
            }
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn is_missing(&self, field: &str) -> bool {
        self.config.missing_tokens.iter().any(|t| t == field)
    }

    /// Decide between a numeric and a categorical column for raw fields
    fn infer_column(&self, raw: Vec<String>) -> Column {
        let numeric = raw
            .iter()
            .all(|field| self.is_missing(field) || field.parse::<f64>().is_ok());
        if numeric {
            Column::Numeric(
                raw.iter()
                    .map(|field| {
                        if self.is_missing(field) {
                            f64::NAN
                        } else {
                            // all() above guarantees this parses
                            field.parse::<f64>().unwrap_or(f64::NAN)
                        }
                    })
                    .collect(),
            )
        } else {
            Column::Categorical(
                raw.into_iter()
                    .map(|field| if self.is_missing(&field) { String::new() } else { field })
                    .collect(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_numeric_with_missing() {
        let loader = CsvLoader::default();
        let column = loader.infer_column(vec![
            "1.5".to_string(),
            "NA".to_string(),
            "-2".to_string(),
            "".to_string(),
        ]);
        match column {
            Column::Numeric(values) => {
                assert_eq!(values[0], 1.5);
                assert!(values[1].is_nan());
                assert_eq!(values[2], -2.0);
                assert!(values[3].is_nan());
            }
            Column::Categorical(_) => panic!("expected numeric column"),
        }
    }

    #[test]
    fn test_infer_categorical() {
        let loader = CsvLoader::default();
        let column = loader.infer_column(vec![
            "SITE_A".to_string(),
            "SITE_B".to_string(),
            "NA".to_string(),
        ]);
        match column {
            Column::Categorical(values) => {
                assert_eq!(values[0], "SITE_A");
                assert_eq!(values[2], "");
            }
            Column::Numeric(_) => panic!("expected categorical column"),
        }
    }
}
