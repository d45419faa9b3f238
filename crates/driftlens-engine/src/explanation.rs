//! Natural-language explanation of a drift analysis

use std::collections::BTreeSet;

use driftlens_core::{DriftMetric, Explanation, HealthAssessment, Result, Severity};

/// Renders drift metrics and a health assessment as a short paragraph
///
/// Output is deterministic: feature names are deduplicated and sorted, so
/// identical inputs always produce byte-identical text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplanationGenerator;

impl ExplanationGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Build the explanation
    pub fn explain(&self, metrics: &[DriftMetric], health: &HealthAssessment) -> Result<Explanation> {
        for metric in metrics {
            metric.validate()?;
        }

        let high = features_with(metrics, Severity::High);
        let medium = features_with(metrics, Severity::Medium);
        let recommendation = health.status.recommendation();

        let mut sentences = Vec::with_capacity(4);
        if !high.is_empty() {
            sentences.push(format!(
                "Significant drift detected in features: {}.",
                join(&high)
            ));
        }
        if !medium.is_empty() {
            sentences.push(format!(
                "Moderate drift observed in features: {}.",
                join(&medium)
            ));
        }
        sentences.push(format!(
            "Overall data health score is {} ({}).",
            health.score, health.status
        ));
        sentences.push(format!("Recommendation: {}.", recommendation));

        Ok(Explanation {
            explanation_text: sentences.join(" "),
            recommendation,
        })
    }
}

fn features_with(metrics: &[DriftMetric], severity: Severity) -> BTreeSet<&str> {
    metrics
        .iter()
        .filter(|m| m.severity == severity)
        .map(|m| m.feature_name.as_str())
        .collect()
}

fn join(features: &BTreeSet<&str>) -> String {
    features.iter().copied().collect::<Vec<_>>().join(", ")
}
