//! Aggregate health score over a set of drift metrics

use driftlens_core::{DriftMetric, HealthAssessment, HealthStatus, Result, ScoringConfig, Severity};

/// Turns drift metrics into a 0-100 score and a status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthScorer {
    scoring: ScoringConfig,
}

impl HealthScorer {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self { scoring }
    }

    /// Score a list of metrics
    ///
    /// Every high metric costs `high_penalty` points and every medium metric
    /// `medium_penalty` points, counted per metric rather than per feature.
    /// The score never drops below zero.
    pub fn score(&self, metrics: &[DriftMetric]) -> Result<HealthAssessment> {
        for metric in metrics {
            metric.validate()?;
        }

        let high_count = metrics.iter().filter(|m| m.severity == Severity::High).count() as u64;
        let medium_count = metrics.iter().filter(|m| m.severity == Severity::Medium).count() as u64;

        let penalty = high_count
            .saturating_mul(u64::from(self.scoring.high_penalty))
            .saturating_add(medium_count.saturating_mul(u64::from(self.scoring.medium_penalty)));
        let score = 100u64.saturating_sub(penalty) as u32;
        let status = self.status_for(score);

        tracing::debug!(high_count, medium_count, score, status = %status, "scored drift metrics");

        Ok(HealthAssessment { score, status })
    }

    /// Map a score onto a status using the configured boundaries
    pub fn status_for(&self, score: u32) -> HealthStatus {
        if score >= self.scoring.safe_min {
            HealthStatus::Safe
        } else if score >= self.scoring.monitor_min {
            HealthStatus::Monitor
        } else {
            HealthStatus::RetrainingSuggested
        }
    }
}
