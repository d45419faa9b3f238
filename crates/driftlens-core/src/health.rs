//! Health assessment and explanation records

use serde::{Deserialize, Serialize};

/// Coarse health status derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Drift severe enough that the model should be retrained
    RetrainingSuggested,

    /// Noticeable drift, keep an eye on it
    Monitor,

    /// No drift worth acting on
    Safe,
}

impl HealthStatus {
    /// Stable snake_case identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RetrainingSuggested => "retraining_suggested",
            Self::Monitor => "monitor",
            Self::Safe => "safe",
        }
    }

    /// Recommendation attached to this status
    pub fn recommendation(&self) -> Recommendation {
        match self {
            Self::RetrainingSuggested => Recommendation::RetrainingSuggested,
            Self::Monitor => Recommendation::MonitorClosely,
            Self::Safe => Recommendation::SafeToUse,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate health of the current dataset relative to the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthAssessment {
    /// Score in `[0, 100]`
    pub score: u32,

    /// Status derived from the score
    pub status: HealthStatus,
}

/// Discrete recommendation a caller can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Safe to use")]
    SafeToUse,

    #[serde(rename = "Monitor closely")]
    MonitorClosely,

    #[serde(rename = "Retraining suggested")]
    RetrainingSuggested,
}

impl Recommendation {
    /// Human-readable text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SafeToUse => "Safe to use",
            Self::MonitorClosely => "Monitor closely",
            Self::RetrainingSuggested => "Retraining suggested",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Natural-language summary of a drift analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub explanation_text: String,
    pub recommendation: Recommendation,
}
