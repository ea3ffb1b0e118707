//! Class- and site-stratified mean imputation.
//!
//! Multi-site cohorts routinely arrive with scattered missing measurements.
//! Imputing each gap with the mean of its own (site, class) group preserves
//! both the diagnostic signal and the site-specific measurement offsets that
//! downstream harmonization expects to see.

use crate::core::error::{NeuroprepError, Result};
use crate::table::{ColumnRange, Table};
use serde::{Deserialize, Serialize};

/// Configuration for [`GroupMeanImputer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMeanImputer {
    /// Column holding the categorical class label per subject
    pub class_column: String,
    /// Column holding the acquisition site identifier per subject
    pub site_column: String,
    /// Inclusive span of numeric feature columns to fill
    pub feature_range: ColumnRange,
}

impl GroupMeanImputer {
    /// Create an imputer for the given metadata columns and feature range
    pub fn new<C, S>(class_column: C, site_column: S, feature_range: ColumnRange) -> Self
    where
        C: Into<String>,
        S: Into<String>,
    {
        GroupMeanImputer {
            class_column: class_column.into(),
            site_column: site_column.into(),
            feature_range,
        }
    }

    /// Fill missing feature values with their (site, class) group means.
    ///
    /// For every combination of site and class label, each feature column in
    /// the range has its missing entries replaced by the mean of the group's
    /// non-missing entries. A group where a column is entirely missing keeps
    /// NaN in those cells: the undefined mean propagates rather than being
    /// imputed from a larger population, which would silently change the
    /// group semantics.
    ///
    /// The table is mutated in place; columns outside the feature range and
    /// previously non-missing cells are untouched. Calling `fill` twice
    /// yields the same table as calling it once.
    ///
    /// All referenced columns are validated before any mutation, so a failed
    /// call leaves the table unchanged.
    pub fn fill(&self, table: &mut Table) -> Result<()> {
        // Validate everything up front to avoid partial writes.
        table.column_index(&self.class_column)?;
        table.column_index(&self.site_column)?;
        let feature_indices = table.range_indices(&self.feature_range)?;
        if table.num_rows() == 0 {
            return Err(NeuroprepError::EmptyTable);
        }
        let feature_names: Vec<String> = feature_indices
            .iter()
            .map(|&idx| table.column_names()[idx].clone())
            .collect();
        for name in &feature_names {
            table.numeric(name)?;
        }

        let classes = table.distinct_labels(&self.class_column)?;
        let sites = table.distinct_labels(&self.site_column)?;
        log::info!(
            "found {} classes across {} sites",
            classes.len(),
            sites.len()
        );
        log::info!("filling missing data with class means");

        for site in &sites {
            let site_mask = table.label_mask(&self.site_column, site)?;
            for class in &classes {
                let class_mask = table.label_mask(&self.class_column, class)?;
                let group_mask: Vec<bool> = site_mask
                    .iter()
                    .zip(class_mask.iter())
                    .map(|(&s, &c)| s && c)
                    .collect();
                if !group_mask.iter().any(|&m| m) {
                    continue;
                }
                for name in &feature_names {
                    fill_group_column(table.numeric_mut(name)?, &group_mask);
                }
            }
        }
        Ok(())
    }
}

/// Replace missing entries inside the mask with the group mean.
///
/// The mean is taken over the non-missing masked entries; with none
/// available it is NaN and the cells stay NaN.
fn fill_group_column(values: &mut [f64], group_mask: &[bool]) {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (value, &in_group) in values.iter().zip(group_mask) {
        if in_group && !value.is_nan() {
            sum += value;
            count += 1;
        }
    }
    let mean = if count > 0 { sum / count as f64 } else { f64::NAN };
    for (value, &in_group) in values.iter_mut().zip(group_mask) {
        if in_group && value.is_nan() {
            *value = mean;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use approx::assert_relative_eq;

    fn cohort(site: Vec<&str>, dx: Vec<f64>, features: Vec<(&str, Vec<f64>)>) -> Table {
        let mut columns = vec![
            (
                "site".to_string(),
                Column::Categorical(site.into_iter().map(String::from).collect()),
            ),
            ("dx".to_string(), Column::Numeric(dx)),
        ];
        for (name, values) in features {
            columns.push((name.to_string(), Column::Numeric(values)));
        }
        Table::from_columns(columns).unwrap()
    }

    fn imputer(start: &str, end: &str) -> GroupMeanImputer {
        GroupMeanImputer::new("dx", "site", ColumnRange::new(start, end))
    }

    #[test]
    fn test_fill_with_group_mean() {
        // site A, class 0 has values [2.0, NaN] for the feature
        let mut table = cohort(
            vec!["A", "A"],
            vec![0.0, 0.0],
            vec![("vol", vec![2.0, f64::NAN])],
        );
        imputer("vol", "vol").fill(&mut table).unwrap();
        assert_eq!(table.numeric("vol").unwrap(), &[2.0, 2.0]);
    }

    #[test]
    fn test_groups_do_not_cross_contaminate() {
        // two sites, one class; each site averages only its own rows
        let mut table = cohort(
            vec!["A", "A", "B", "B"],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![("vol", vec![1.0, f64::NAN, 9.0, f64::NAN])],
        );
        imputer("vol", "vol").fill(&mut table).unwrap();
        let vol = table.numeric("vol").unwrap();
        assert_relative_eq!(vol[1], 1.0);
        assert_relative_eq!(vol[3], 9.0);
    }

    #[test]
    fn test_singleton_groups_are_noops() {
        // every (site, class) pair holds exactly one row, so no cell changes
        let mut table = cohort(
            vec!["A", "A", "B", "B"],
            vec![0.0, 1.0, 0.0, 1.0],
            vec![("vol", vec![1.0, f64::NAN, f64::NAN, 4.0])],
        );
        imputer("vol", "vol").fill(&mut table).unwrap();
        let vol = table.numeric("vol").unwrap();
        assert_eq!(vol[0], 1.0);
        assert!(vol[1].is_nan());
        assert!(vol[2].is_nan());
        assert_eq!(vol[3], 4.0);
    }

    #[test]
    fn test_all_missing_group_stays_nan() {
        let mut table = cohort(
            vec!["A", "A", "B"],
            vec![0.0, 0.0, 0.0],
            vec![("vol", vec![f64::NAN, f64::NAN, 3.0])],
        );
        imputer("vol", "vol").fill(&mut table).unwrap();
        let vol = table.numeric("vol").unwrap();
        assert!(vol[0].is_nan());
        assert!(vol[1].is_nan());
        assert_eq!(vol[2], 3.0);
    }

    #[test]
    fn test_non_missing_cells_unchanged() {
        let mut table = cohort(
            vec!["A", "A", "A"],
            vec![0.0, 0.0, 0.0],
            vec![("vol", vec![1.0, 2.0, f64::NAN])],
        );
        imputer("vol", "vol").fill(&mut table).unwrap();
        let vol = table.numeric("vol").unwrap();
        assert_eq!(vol[0], 1.0);
        assert_eq!(vol[1], 2.0);
        assert_relative_eq!(vol[2], 1.5);
    }

    #[test]
    fn test_multiple_feature_columns_and_untouched_outside_range() {
        let mut table = cohort(
            vec!["A", "A"],
            vec![0.0, 0.0],
            vec![
                ("vol_l", vec![2.0, f64::NAN]),
                ("vol_r", vec![f64::NAN, 6.0]),
                ("age", vec![f64::NAN, 40.0]),
            ],
        );
        imputer("vol_l", "vol_r").fill(&mut table).unwrap();
        assert_eq!(table.numeric("vol_l").unwrap()[1], 2.0);
        assert_eq!(table.numeric("vol_r").unwrap()[0], 6.0);
        // age sits outside the feature range
        assert!(table.numeric("age").unwrap()[0].is_nan());
    }

    #[test]
    fn test_idempotence() {
        let mut table = cohort(
            vec!["A", "A", "B", "B"],
            vec![0.0, 0.0, 1.0, 1.0],
            vec![("vol", vec![2.0, f64::NAN, f64::NAN, 4.0])],
        );
        let imp = imputer("vol", "vol");
        imp.fill(&mut table).unwrap();
        let once = table.clone();
        imp.fill(&mut table).unwrap();
        assert_eq!(table, once);
    }

    #[test]
    fn test_invalid_columns_rejected_before_mutation() {
        let mut table = cohort(
            vec!["A", "A"],
            vec![0.0, 0.0],
            vec![("vol", vec![2.0, f64::NAN])],
        );
        let original = table.clone();

        let bad_class = GroupMeanImputer::new("diagnosis", "site", ColumnRange::new("vol", "vol"));
        assert!(matches!(
            bad_class.fill(&mut table),
            Err(NeuroprepError::InvalidColumn { .. })
        ));

        let bad_range = GroupMeanImputer::new("dx", "site", ColumnRange::new("vol", "volume_r"));
        assert!(matches!(
            bad_range.fill(&mut table),
            Err(NeuroprepError::InvalidColumn { .. })
        ));

        assert_eq!(table, original);
    }

    #[test]
    fn test_empty_table_rejected() {
        let mut table = cohort(vec![], vec![], vec![("vol", vec![])]);
        assert!(matches!(
            imputer("vol", "vol").fill(&mut table),
            Err(NeuroprepError::EmptyTable)
        ));
    }

    #[test]
    fn test_categorical_feature_column_rejected() {
        let mut table = Table::from_columns(vec![
            (
                "site".to_string(),
                Column::Categorical(vec!["A".to_string()]),
            ),
            ("dx".to_string(), Column::Numeric(vec![0.0])),
            (
                "sex".to_string(),
                Column::Categorical(vec!["F".to_string()]),
            ),
        ])
        .unwrap();
        let imp = GroupMeanImputer::new("dx", "site", ColumnRange::new("sex", "sex"));
        assert!(matches!(
            imp.fill(&mut table),
            Err(NeuroprepError::TypeMismatch { .. })
        ));
    }
}
