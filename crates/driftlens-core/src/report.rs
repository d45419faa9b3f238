//! Analysis report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::dataset::TabularDataset;
use crate::health::{Explanation, HealthAssessment};
use crate::metric::{DriftMetric, Severity};
use crate::profile::{FeatureProfile, FeatureStats};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Identity of one input dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Dataset name, if the loader supplied one
    pub name: Option<String>,

    /// Number of rows
    pub rows: usize,

    /// Number of columns analyzed
    pub columns: usize,

    /// Hex SHA-256 of the dataset contents
    pub fingerprint: String,
}

impl DatasetSummary {
    /// Summarize a dataset
    pub fn of(dataset: &TabularDataset) -> Self {
        Self {
            name: dataset.name.clone(),
            rows: dataset.row_count(),
            columns: dataset.columns.len(),
            fingerprint: dataset.fingerprint(),
        }
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of drift metrics
    pub total_metrics: usize,

    /// Number of high-severity metrics
    pub high: usize,

    /// Number of medium-severity metrics
    pub medium: usize,

    /// Number of low-severity metrics
    pub low: usize,

    /// Sorted names of features with at least one detected drift
    pub drifted_features: Vec<String>,
}

impl ReportSummary {
    /// Tally a list of drift metrics
    pub fn from_metrics(metrics: &[DriftMetric]) -> Self {
        let count = |severity: Severity| metrics.iter().filter(|m| m.severity == severity).count();

        let drifted_features: BTreeSet<&str> = metrics
            .iter()
            .filter(|m| m.drift_detected)
            .map(|m| m.feature_name.as_str())
            .collect();

        Self {
            total_metrics: metrics.len(),
            high: count(Severity::High),
            medium: count(Severity::Medium),
            low: count(Severity::Low),
            drifted_features: drifted_features.into_iter().map(str::to_string).collect(),
        }
    }
}

/// Profiles of both input datasets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfilePair {
    pub baseline: Vec<FeatureProfile>,
    pub current: Vec<FeatureProfile>,
}

/// Full analysis report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Baseline dataset identity
    pub baseline: DatasetSummary,

    /// Current dataset identity
    pub current: DatasetSummary,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Per-feature profiles of both datasets
    pub profiles: ProfilePair,

    /// All drift metrics, in detector order
    pub drift: Vec<DriftMetric>,

    /// Aggregate health
    pub health: HealthAssessment,

    /// Natural-language explanation
    pub explanation: Explanation,
}

impl AnalysisReport {
    /// Assemble a report stamped with the current time
    pub fn new(
        baseline: &TabularDataset,
        current: &TabularDataset,
        profiles: ProfilePair,
        drift: Vec<DriftMetric>,
        health: HealthAssessment,
        explanation: Explanation,
    ) -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            baseline: DatasetSummary::of(baseline),
            current: DatasetSummary::of(current),
            summary: ReportSummary::from_metrics(&drift),
            profiles,
            drift,
            health,
            explanation,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }

    /// Render the report as markdown
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Data Drift Report\n\n");
        md.push_str(&format!("**Version:** {}\n\n", self.version));
        md.push_str(&format!("**Timestamp:** {}\n\n", self.timestamp));

        md.push_str("## Datasets\n\n");
        md.push_str("| | name | rows | columns | fingerprint |\n");
        md.push_str("|---|---|---|---|---|\n");
        for (label, summary) in [("baseline", &self.baseline), ("current", &self.current)] {
            md.push_str(&format!(
                "| {} | {} | {} | {} | `{}` |\n",
                label,
                summary.name.as_deref().unwrap_or("-"),
                summary.rows,
                summary.columns,
                &summary.fingerprint[..summary.fingerprint.len().min(12)],
            ));
        }
        md.push('\n');

        md.push_str("## Health\n\n");
        md.push_str(&format!(
            "**Score:** {} ({})\n\n",
            self.health.score, self.health.status
        ));
        md.push_str(&format!(
            "**Recommendation:** {}\n\n",
            self.explanation.recommendation
        ));
        md.push_str(&format!("{}\n\n", self.explanation.explanation_text));

        md.push_str("## Summary\n\n");
        md.push_str(&format!("- Total metrics: {}\n", self.summary.total_metrics));
        md.push_str(&format!("- High: {}\n", self.summary.high));
        md.push_str(&format!("- Medium: {}\n", self.summary.medium));
        md.push_str(&format!("- Low: {}\n", self.summary.low));
        md.push('\n');

        if self.drift.is_empty() {
            md.push_str("✅ **No drift metrics produced.**\n");
        } else {
            md.push_str("## Drift Metrics\n\n");
            md.push_str("| feature | metric | value | severity | drift |\n");
            md.push_str("|---|---|---|---|---|\n");
            for metric in &self.drift {
                let severity_emoji = match metric.severity {
                    Severity::High => "❌",
                    Severity::Medium => "⚠️",
                    Severity::Low => "✅",
                };
                let value = metric
                    .value
                    .map(|v| format!("{:.4}", v))
                    .unwrap_or_else(|| "-".to_string());
                md.push_str(&format!(
                    "| {} | {} | {} | {} {} | {} |\n",
                    metric.feature_name,
                    metric.metric_name,
                    value,
                    severity_emoji,
                    metric.severity,
                    if metric.drift_detected { "yes" } else { "no" },
                ));
            }
            md.push('\n');
        }

        if !self.profiles.current.is_empty() {
            md.push_str("## Current Profile\n\n");
            for profile in &self.profiles.current {
                match &profile.stats {
                    FeatureStats::Numeric(stats) => md.push_str(&format!(
                        "- **{}** (numeric): min {:.4}, max {:.4}, mean {:.4}, std {:.4}\n",
                        profile.feature_name, stats.min, stats.max, stats.mean, stats.std
                    )),
                    FeatureStats::Categorical(stats) => md.push_str(&format!(
                        "- **{}** (categorical): {} categories\n",
                        profile.feature_name,
                        stats.counts.len()
                    )),
                }
            }
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use crate::health::{HealthStatus, Recommendation};
    use crate::metric::MetricName;
    use pretty_assertions::assert_eq;

    fn sample_report() -> AnalysisReport {
        let baseline = TabularDataset::from_columns(vec![Column::numeric("age", vec![Some(1.0), Some(2.0)])])
            .with_name("baseline");
        let current = TabularDataset::from_columns(vec![Column::numeric("age", vec![Some(5.0), Some(6.0)])]);

        let drift = vec![
            DriftMetric::new("age", MetricName::KsPValue, Some(0.33), Severity::Low),
            DriftMetric::new("age", MetricName::MeanShift, Some(4.0), Severity::High),
            DriftMetric::new_column("zip"),
        ];

        AnalysisReport::new(
            &baseline,
            &current,
            ProfilePair::default(),
            drift,
            HealthAssessment { score: 78, status: HealthStatus::Monitor },
            Explanation {
                explanation_text: "Overall data health score is 78 (monitor).".to_string(),
                recommendation: Recommendation::MonitorClosely,
            },
        )
    }

    #[test]
    fn summary_counts() {
        let report = sample_report();
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.total_metrics, 3);
        assert_eq!(report.summary.high, 1);
        assert_eq!(report.summary.medium, 1);
        assert_eq!(report.summary.low, 1);
        assert_eq!(report.summary.drifted_features, vec!["age", "zip"]);
        assert_eq!(report.baseline.name.as_deref(), Some("baseline"));
        assert_eq!(report.baseline.rows, 2);
        assert_ne!(report.baseline.fingerprint, report.current.fingerprint);
    }

    #[test]
    fn report_serialization() {
        let report = sample_report();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"drift\""));
        assert!(json.contains("\"Monitor closely\""));

        let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.summary, report.summary);
    }

    #[test]
    fn markdown_rendering() {
        let md = sample_report().to_markdown();
        assert!(md.starts_with("# Data Drift Report"));
        assert!(md.contains("**Score:** 78 (monitor)"));
        assert!(md.contains("| age | mean_shift | 4.0000 | ❌ high | yes |"));
        assert!(md.contains("| zip | new_column | - | ⚠️ medium | yes |"));
    }
}
