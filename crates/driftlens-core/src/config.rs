//! Configuration schema (driftlens.toml)
//!
//! Every field has a default, so an empty file is a valid configuration and
//! reproduces the stock thresholds and scoring weights.

use serde::{Deserialize, Serialize};
use crate::metric::Severity;

/// Pair of cut-offs splitting a metric into low / medium / high
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Boundary between low and medium
    pub medium: f64,

    /// Boundary between medium and high
    pub high: f64,
}

impl SeverityThreshold {
    /// Create a threshold pair
    pub const fn new(medium: f64, high: f64) -> Self {
        Self { medium, high }
    }

    /// Classify a metric where larger values mean more drift
    ///
    /// `value > high` is high, `value > medium` is medium, anything else is low.
    pub fn classify_above(&self, value: f64) -> Severity {
        if value > self.high {
            Severity::High
        } else if value > self.medium {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Classify a metric where smaller values mean more drift (p-values)
    ///
    /// `value < high` is high, `value < medium` is medium, anything else is low.
    pub fn classify_below(&self, value: f64) -> Severity {
        if value < self.high {
            Severity::High
        } else if value < self.medium {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// Severity cut-offs for each feature drift metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftThresholds {
    /// KS p-value (reversed direction)
    pub ks_p_value: SeverityThreshold,

    /// Absolute mean difference
    pub mean_shift: SeverityThreshold,

    /// Jensen-Shannon divergence
    pub js_divergence: SeverityThreshold,
}

impl Default for DriftThresholds {
    fn default() -> Self {
        Self {
            ks_p_value: SeverityThreshold::new(0.1, 0.05),
            mean_shift: SeverityThreshold::new(0.1, 0.3),
            js_divergence: SeverityThreshold::new(0.05, 0.15),
        }
    }
}

/// Penalties and status boundaries of the health score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points deducted per high-severity metric
    pub high_penalty: u32,

    /// Points deducted per medium-severity metric
    pub medium_penalty: u32,

    /// Lowest score still considered safe
    pub safe_min: u32,

    /// Lowest score still considered worth monitoring rather than retraining
    pub monitor_min: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_penalty: 15,
            medium_penalty: 7,
            safe_min: 80,
            monitor_min: 50,
        }
    }
}

/// Column selection rules
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnRules {
    /// Columns excluded from analysis (glob patterns)
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl ColumnRules {
    /// Check if a column should be left out of the analysis
    pub fn is_ignored(&self, column: &str) -> bool {
        self.ignore.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, column)
            } else {
                pattern == column
            }
        })
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of equal-width histogram bins in numeric profiles
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Largest sample size for which the exact KS p-value is computed
    #[serde(default = "default_ks_exact_limit")]
    pub ks_exact_limit: usize,

    /// Severity thresholds
    #[serde(default)]
    pub thresholds: DriftThresholds,

    /// Health scoring weights
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Column selection
    #[serde(default)]
    pub columns: ColumnRules,
}

fn default_histogram_bins() -> usize {
    6
}

fn default_ks_exact_limit() -> usize {
    10_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            histogram_bins: default_histogram_bins(),
            ks_exact_limit: default_ks_exact_limit(),
            thresholds: DriftThresholds::default(),
            scoring: ScoringConfig::default(),
            columns: ColumnRules::default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Reject settings that would break ordering or range invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.histogram_bins == 0 {
            return Err(ConfigError::Invalid("histogram_bins must be at least 1".to_string()));
        }

        let t = &self.thresholds;
        for (name, threshold) in [("mean_shift", &t.mean_shift), ("js_divergence", &t.js_divergence)] {
            if threshold.medium > threshold.high {
                return Err(ConfigError::Invalid(format!(
                    "thresholds.{}: medium ({}) must not exceed high ({})",
                    name, threshold.medium, threshold.high
                )));
            }
        }

        if t.ks_p_value.high > t.ks_p_value.medium {
            return Err(ConfigError::Invalid(format!(
                "thresholds.ks_p_value: high ({}) must not exceed medium ({})",
                t.ks_p_value.high, t.ks_p_value.medium
            )));
        }

        let s = &self.scoring;
        if s.safe_min > 100 {
            return Err(ConfigError::Invalid(format!(
                "scoring.safe_min ({}) must be at most 100",
                s.safe_min
            )));
        }
        if s.monitor_min > s.safe_min {
            return Err(ConfigError::Invalid(format!(
                "scoring.monitor_min ({}) must not exceed safe_min ({})",
                s.monitor_min, s.safe_min
            )));
        }

        Ok(())
    }
}

/// Simple glob matching (supports a single * wildcard)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = &pattern[star_pos + 1..];

        text.len() >= prefix.len() + suffix.len()
            && text.starts_with(prefix)
            && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.histogram_bins, 6);
        assert_eq!(config.ks_exact_limit, 10_000);
        assert_eq!(config.scoring.high_penalty, 15);
        assert_eq!(config.scoring.medium_penalty, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = Config::from_toml(
            r#"
            histogram_bins = 10

            [thresholds.mean_shift]
            medium = 1.0
            high = 5.0

            [columns]
            ignore = ["*_id"]
            "#,
        )
        .unwrap();

        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.thresholds.mean_shift, SeverityThreshold::new(1.0, 5.0));
        assert_eq!(config.thresholds.js_divergence, SeverityThreshold::new(0.05, 0.15));
        assert!(config.columns.is_ignored("user_id"));
        assert!(!config.columns.is_ignored("age"));
    }

    #[test]
    fn classify_magnitude() {
        let t = SeverityThreshold::new(0.1, 0.3);
        assert_eq!(t.classify_above(0.05), Severity::Low);
        assert_eq!(t.classify_above(0.1), Severity::Low);
        assert_eq!(t.classify_above(0.2), Severity::Medium);
        assert_eq!(t.classify_above(0.3), Severity::Medium);
        assert_eq!(t.classify_above(0.31), Severity::High);
    }

    #[test]
    fn classify_p_value() {
        let t = SeverityThreshold::new(0.1, 0.05);
        assert_eq!(t.classify_below(0.01), Severity::High);
        assert_eq!(t.classify_below(0.05), Severity::Medium);
        assert_eq!(t.classify_below(0.07), Severity::Medium);
        assert_eq!(t.classify_below(0.1), Severity::Low);
        assert_eq!(t.classify_below(1.0), Severity::Low);
    }

    #[test]
    fn invalid_configs_rejected() {
        assert!(matches!(
            Config::from_toml("histogram_bins = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("[scoring]\nsafe_min = 40\nmonitor_min = 60"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("[thresholds.ks_p_value]\nmedium = 0.01\nhigh = 0.05"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("histogram_bins = \"six\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn glob_matching() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("raw_*", "raw_amount"));
        assert!(glob_match("*_id", "user_id"));
        assert!(!glob_match("raw_*", "amount"));
        assert!(!glob_match("a*a", "a"));
    }
}
