//! Per-column distribution summaries of a single dataset

use driftlens_core::{
    CategoricalStats, Column, ColumnKind, Config, CoreError, FeatureProfile, FeatureStats,
    NumericStats, Result, TabularDataset,
};

use crate::statistics;

/// Builds one [`FeatureProfile`] per column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profiler {
    histogram_bins: usize,
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Profiler {
    /// Profiler using the configured histogram resolution
    pub fn new(config: &Config) -> Self {
        Self::with_bins(config.histogram_bins)
    }

    /// Profiler with an explicit bin count (at least one bin is always used)
    pub fn with_bins(histogram_bins: usize) -> Self {
        Self {
            histogram_bins: histogram_bins.max(1),
        }
    }

    pub fn histogram_bins(&self) -> usize {
        self.histogram_bins
    }

    /// Profile every column of a dataset, in column order
    pub fn profile(&self, dataset: &TabularDataset) -> Result<Vec<FeatureProfile>> {
        dataset.validate()?;

        let profiles = dataset
            .columns
            .iter()
            .map(|column| self.profile_column(column))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            dataset = dataset.name.as_deref().unwrap_or("<unnamed>"),
            columns = profiles.len(),
            "profiled dataset"
        );

        Ok(profiles)
    }

    /// Profile a single column according to its declared kind
    pub fn profile_column(&self, column: &Column) -> Result<FeatureProfile> {
        let stats = match column.kind {
            ColumnKind::Numeric => FeatureStats::Numeric(self.numeric_stats(column)?),
            ColumnKind::Categorical => FeatureStats::Categorical(CategoricalStats {
                counts: column.category_counts(),
            }),
        };

        Ok(FeatureProfile {
            feature_name: column.name.clone(),
            feature_type: column.kind,
            stats,
        })
    }

    fn numeric_stats(&self, column: &Column) -> Result<NumericStats> {
        let values = column.numeric_values()?;
        let insufficient = || CoreError::insufficient(&column.name, 2, values.len());

        // Sample std needs two values; min, max and mean follow the same rule.
        let std = statistics::sample_std(&values).ok_or_else(insufficient)?;
        let mean = statistics::mean(&values).ok_or_else(insufficient)?;
        let (min, max) = statistics::min_max(&values).ok_or_else(insufficient)?;
        let histogram = statistics::equal_width_histogram(&values, self.histogram_bins)
            .ok_or_else(insufficient)?;

        Ok(NumericStats {
            min,
            max,
            mean,
            std,
            histogram,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftlens_core::Value;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn test_numeric_profile() {
        let dataset = TabularDataset::from_columns(vec![Column::numeric(
            "age",
            vec![Some(10.0), Some(20.0), None, Some(30.0), Some(40.0), Some(50.0)],
        )]);

        let profiles = Profiler::default().profile(&dataset).unwrap();
        assert_eq!(profiles.len(), 1);

        let profile = &profiles[0];
        assert_eq!(profile.feature_name, "age");
        assert_eq!(profile.feature_type, ColumnKind::Numeric);

        let stats = profile.numeric().unwrap();
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 50.0);
        assert_eq!(stats.mean, 30.0);
        assert!((stats.std - 250.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.histogram.bin_count(), 6);
        assert_eq!(stats.histogram.total(), 5);
        assert_eq!(stats.histogram.counts, vec![1, 1, 0, 1, 1, 1]);
    }

    #[test]
    fn test_categorical_profile() {
        let dataset = TabularDataset::from_columns(vec![Column::categorical(
            "color",
            vec![Some("red"), Some("blue"), None, Some("red")],
        )]);

        let profiles = Profiler::default().profile(&dataset).unwrap();
        let stats = profiles[0].categorical().unwrap();

        let expected = BTreeMap::from([("blue".to_string(), 1), ("red".to_string(), 2)]);
        assert_eq!(stats.counts, expected);
    }

    #[test]
    fn test_profiles_follow_column_order() {
        let dataset = TabularDataset::from_columns(vec![
            Column::categorical("zeta", vec![Some("a")]),
            Column::numeric("alpha", vec![Some(1.0), Some(2.0)]),
        ]);

        let profiles = Profiler::default().profile(&dataset).unwrap();
        let names: Vec<&str> = profiles.iter().map(|p| p.feature_name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_single_value_is_insufficient() {
        let dataset = TabularDataset::from_columns(vec![Column::numeric(
            "income",
            vec![Some(1.0), None, Some(f64::NAN)],
        )]);

        let err = Profiler::default().profile(&dataset).unwrap_err();
        assert_eq!(err, CoreError::insufficient("income", 2, 1));
    }

    #[test]
    fn test_empty_numeric_is_insufficient() {
        let dataset = TabularDataset::from_columns(vec![Column::numeric("income", vec![None, None])]);

        let err = Profiler::default().profile(&dataset).unwrap_err();
        assert_eq!(err, CoreError::insufficient("income", 2, 0));
    }

    #[test]
    fn test_empty_categorical_has_no_counts() {
        let dataset = TabularDataset::from_columns(vec![Column::new(
            "color",
            ColumnKind::Categorical,
            vec![None, None],
        )]);

        let profiles = Profiler::default().profile(&dataset).unwrap();
        assert!(profiles[0].categorical().unwrap().counts.is_empty());
    }

    #[test]
    fn test_text_in_numeric_column() {
        let dataset = TabularDataset::from_columns(vec![Column::new(
            "age",
            ColumnKind::Numeric,
            vec![Some(Value::from(1.0)), Some(Value::from("old"))],
        )]);

        let err = Profiler::default().profile(&dataset).unwrap_err();
        assert!(matches!(err, CoreError::KindMismatch { .. }));
    }

    #[test]
    fn test_infinities_are_nulls() {
        let dataset = TabularDataset::from_columns(vec![Column::numeric(
            "income",
            vec![Some(1.0), Some(f64::INFINITY), Some(3.0), Some(f64::NEG_INFINITY)],
        )]);

        let profiles = Profiler::default().profile(&dataset).unwrap();
        let stats = profiles[0].numeric().unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.mean, 2.0);
        assert!(stats.std.is_finite());
        assert_eq!(stats.histogram.total(), 2);
        assert!(stats.histogram.bin_edges.iter().all(|e| e.is_finite()));
    }

    #[test]
    fn test_default_follows_config() {
        assert_eq!(Profiler::default().histogram_bins(), Config::default().histogram_bins);
        assert_eq!(Profiler::default(), Profiler::new(&Config::default()));
    }

    #[test]
    fn test_configured_bins() {
        let config = Config {
            histogram_bins: 2,
            ..Config::default()
        };
        let dataset =
            TabularDataset::from_columns(vec![Column::numeric("x", vec![Some(0.0), Some(1.0), Some(2.0)])]);

        let profiles = Profiler::new(&config).profile(&dataset).unwrap();
        let histogram = &profiles[0].numeric().unwrap().histogram;
        assert_eq!(histogram.bin_edges, vec![0.0, 1.0, 2.0]);
        assert_eq!(histogram.counts, vec![1, 2]);
    }
}
