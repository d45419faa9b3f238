//! Per-feature statistical profiles

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dataset::ColumnKind;

/// Equal-width histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `N + 1` ascending bin edges
    pub bin_edges: Vec<f64>,

    /// `N` bin counts
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Number of bins
    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    /// Total number of values counted
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Summary statistics of a numeric feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation (N - 1 denominator)
    pub std: f64,
    pub histogram: Histogram,
}

/// Frequency table of a categorical feature
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub counts: BTreeMap<String, u64>,
}

/// Statistics payload, shaped by the feature type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureStats {
    Numeric(NumericStats),
    Categorical(CategoricalStats),
}

/// Profile of one column of one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProfile {
    pub feature_name: String,
    pub feature_type: ColumnKind,
    pub stats: FeatureStats,
}

impl FeatureProfile {
    /// Numeric statistics, if this is a numeric profile
    pub fn numeric(&self) -> Option<&NumericStats> {
        match &self.stats {
            FeatureStats::Numeric(stats) => Some(stats),
            FeatureStats::Categorical(_) => None,
        }
    }

    /// Category counts, if this is a categorical profile
    pub fn categorical(&self) -> Option<&CategoricalStats> {
        match &self.stats {
            FeatureStats::Categorical(stats) => Some(stats),
            FeatureStats::Numeric(_) => None,
        }
    }
}
