//! Drift detection engine for comparing a baseline dataset against a current one
//!
//! This module implements the core drift detection logic: schema drift
//! (columns that appeared or disappeared) plus per-feature distribution
//! drift on the columns both datasets share.

use driftlens_core::{
    Column, ColumnKind, Config, CoreError, DriftMetric, DriftThresholds, MetricName, Result,
    TabularDataset,
};

use crate::statistics;

/// Compares two datasets column by column
#[derive(Debug, Clone, PartialEq)]
pub struct DriftDetector {
    thresholds: DriftThresholds,
    ks_exact_limit: usize,
}

impl Default for DriftDetector {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl DriftDetector {
    /// Create a detector with explicit thresholds
    pub fn new(thresholds: DriftThresholds, ks_exact_limit: usize) -> Self {
        Self {
            thresholds,
            ks_exact_limit,
        }
    }

    /// Create a detector from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.thresholds.clone(), config.ks_exact_limit)
    }

    pub fn thresholds(&self) -> &DriftThresholds {
        &self.thresholds
    }

    /// Detect drift between a baseline and a current dataset
    ///
    /// This detects three kinds of drift:
    /// - Missing columns: in baseline but not in current (high)
    /// - New columns: in current but not in baseline (medium)
    /// - Distribution drift on shared columns, typed by the baseline column's kind
    ///
    /// Metrics come out in a fixed order: missing columns, new columns, then
    /// shared columns in baseline order.
    pub fn detect(
        &self,
        baseline: &TabularDataset,
        current: &TabularDataset,
    ) -> Result<Vec<DriftMetric>> {
        baseline.validate()?;
        current.validate()?;

        let shared: Vec<(&Column, &Column)> = baseline
            .columns
            .iter()
            .filter_map(|b| current.find_column(&b.name).map(|c| (b, c)))
            .collect();

        if shared.is_empty() {
            return Err(CoreError::UnmatchedBaseline {
                baseline_columns: owned_names(baseline),
                current_columns: owned_names(current),
            });
        }

        let mut metrics = Vec::new();

        for column in &baseline.columns {
            if current.find_column(&column.name).is_none() {
                tracing::warn!(feature = %column.name, "column missing from current dataset");
                metrics.push(DriftMetric::missing_column(&column.name));
            }
        }

        for column in &current.columns {
            if baseline.find_column(&column.name).is_none() {
                tracing::warn!(feature = %column.name, "new column in current dataset");
                metrics.push(DriftMetric::new_column(&column.name));
            }
        }

        for (base_col, cur_col) in shared {
            match base_col.kind {
                ColumnKind::Numeric => metrics.extend(self.numeric_drift(base_col, cur_col)?),
                ColumnKind::Categorical => metrics.push(self.categorical_drift(base_col, cur_col)?),
            }
        }

        for metric in &metrics {
            tracing::debug!(
                feature = %metric.feature_name,
                metric = %metric.metric_name,
                value = ?metric.value,
                severity = %metric.severity,
                "drift metric"
            );
        }

        Ok(metrics)
    }

    /// KS p-value and mean shift for a numeric feature
    fn numeric_drift(&self, baseline: &Column, current: &Column) -> Result<[DriftMetric; 2]> {
        let base_values = non_empty(baseline, baseline.numeric_values()?)?;
        let cur_values = non_empty(current, as_numeric(baseline.kind, current)?)?;

        let ks = statistics::ks_two_sample(&base_values, &cur_values, self.ks_exact_limit)
            .ok_or_else(|| CoreError::insufficient(&baseline.name, 1, 0))?;

        let base_mean = statistics::mean(&base_values).unwrap_or_default();
        let cur_mean = statistics::mean(&cur_values).unwrap_or_default();
        // Means on opposite ends of the f64 range can differ by more than f64::MAX
        let shift = (base_mean - cur_mean).abs().min(f64::MAX);

        let name = &baseline.name;
        Ok([
            DriftMetric::new(
                name,
                MetricName::KsPValue,
                Some(ks.p_value),
                self.thresholds.ks_p_value.classify_below(ks.p_value),
            ),
            DriftMetric::new(
                name,
                MetricName::MeanShift,
                Some(shift),
                self.thresholds.mean_shift.classify_above(shift),
            ),
        ])
    }

    /// Jensen-Shannon divergence for a categorical feature
    fn categorical_drift(&self, baseline: &Column, current: &Column) -> Result<DriftMetric> {
        let base_counts = baseline.category_counts();
        let cur_counts = current.category_counts();

        for (column, counts) in [(baseline, &base_counts), (current, &cur_counts)] {
            if counts.is_empty() {
                return Err(CoreError::insufficient(&column.name, 1, 0));
            }
        }

        let divergence = statistics::js_divergence(&base_counts, &cur_counts)
            .ok_or_else(|| CoreError::insufficient(&baseline.name, 1, 0))?;

        Ok(DriftMetric::new(
            &baseline.name,
            MetricName::JsDivergence,
            Some(divergence),
            self.thresholds.js_divergence.classify_above(divergence),
        ))
    }
}

/// Interpret the current column under the kind the baseline declares
fn as_numeric(expected: ColumnKind, column: &Column) -> Result<Vec<f64>> {
    column.numeric_values().map_err(|err| match err {
        CoreError::KindMismatch { column, found, .. } => CoreError::KindMismatch {
            column,
            expected,
            found,
        },
        other => other,
    })
}

fn non_empty(column: &Column, values: Vec<f64>) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(CoreError::insufficient(&column.name, 1, 0));
    }
    Ok(values)
}

fn owned_names(dataset: &TabularDataset) -> Vec<String> {
    dataset.columns.iter().map(|c| c.name.clone()).collect()
}
