//! driftlens core
//!
//! Data model shared by the analysis engine and its callers: the tabular
//! dataset contract, profiles, drift metrics, health records, errors,
//! configuration and the versioned report.
//! Metric names and report fields are part of the public output; never rename them.

pub mod config;
pub mod dataset;
pub mod error;
pub mod health;
pub mod metric;
pub mod profile;
pub mod report;

pub use config::{ColumnRules, Config, ConfigError, DriftThresholds, ScoringConfig, SeverityThreshold};
pub use dataset::{Column, ColumnKind, TabularDataset, Value};
pub use error::{CoreError, Result};
pub use health::{Explanation, HealthAssessment, HealthStatus, Recommendation};
pub use metric::{DriftMetric, MetricName, Severity};
pub use profile::{CategoricalStats, FeatureProfile, FeatureStats, Histogram, NumericStats};
pub use report::{AnalysisReport, DatasetSummary, ProfilePair, ReportSummary, ReportVersion};
