//! Drift metrics and severities
//!
//! Metric names are part of the output contract and are serialized as
//! stable snake_case strings. Never rename them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// Drift severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Severity {
    /// No meaningful drift
    Low,

    /// Drift worth watching
    Medium,

    /// Drift that should block use of the dataset
    High,
}

impl Severity {
    /// Stable lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Whether this severity counts as detected drift
    pub fn is_drift(&self) -> bool {
        *self != Self::Low
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(CoreError::invalid_severity(other)),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Kind of drift measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    /// Column present in the baseline but absent from the current dataset
    MissingColumn,

    /// Column present only in the current dataset
    NewColumn,

    /// Two-sample Kolmogorov-Smirnov p-value (lower means stronger drift)
    KsPValue,

    /// Absolute difference of sample means
    MeanShift,

    /// Base-2 Jensen-Shannon divergence of category frequencies
    JsDivergence,
}

impl MetricName {
    /// Stable snake_case identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingColumn => "missing_column",
            Self::NewColumn => "new_column",
            Self::KsPValue => "ks_p_value",
            Self::MeanShift => "mean_shift",
            Self::JsDivergence => "js_divergence",
        }
    }

    /// Whether the metric describes a schema change rather than a distribution change
    pub fn is_schema_drift(&self) -> bool {
        matches!(self, Self::MissingColumn | Self::NewColumn)
    }
}

impl std::fmt::Display for MetricName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One drift measurement for one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftMetric {
    /// Column the metric refers to
    pub feature_name: String,

    /// What was measured
    pub metric_name: MetricName,

    /// Measured value (absent for schema drift)
    pub value: Option<f64>,

    /// Severity bucket
    pub severity: Severity,

    /// Always equal to `severity != low`
    pub drift_detected: bool,
}

impl DriftMetric {
    /// Create a metric; `drift_detected` is derived from the severity
    pub fn new(
        feature_name: impl Into<String>,
        metric_name: MetricName,
        value: Option<f64>,
        severity: Severity,
    ) -> Self {
        Self {
            feature_name: feature_name.into(),
            metric_name,
            value,
            severity,
            drift_detected: severity.is_drift(),
        }
    }

    /// Schema drift entry for a column the current dataset lost
    pub fn missing_column(feature_name: impl Into<String>) -> Self {
        Self::new(feature_name, MetricName::MissingColumn, None, Severity::High)
    }

    /// Schema drift entry for a column the current dataset gained
    pub fn new_column(feature_name: impl Into<String>) -> Self {
        Self::new(feature_name, MetricName::NewColumn, None, Severity::Medium)
    }

    /// Check the `drift_detected == (severity != low)` invariant
    ///
    /// Metrics built by the detector always pass; this guards metrics that
    /// re-enter the core from serialized form.
    pub fn validate(&self) -> Result<()> {
        if self.drift_detected != self.severity.is_drift() {
            return Err(CoreError::invalid_severity(format!(
                "metric '{}' on '{}' has severity '{}' but drift_detected={}",
                self.metric_name, self.feature_name, self.severity, self.drift_detected
            )));
        }
        Ok(())
    }
}
