//! End-to-end analysis pipeline
//!
//! Runs profile, detect, score and explain in that order and assembles the
//! result into an [`AnalysisReport`].

use driftlens_core::{
    AnalysisReport, Config, DriftMetric, Explanation, FeatureProfile, HealthAssessment,
    ProfilePair, Result, TabularDataset,
};

use crate::{DriftDetector, ExplanationGenerator, HealthScorer, Profiler};

/// Configured pipeline over the four analysis components
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: Config,
    profiler: Profiler,
    detector: DriftDetector,
    scorer: HealthScorer,
    explainer: ExplanationGenerator,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Self {
            profiler: Profiler::new(&config),
            detector: DriftDetector::from_config(&config),
            scorer: HealthScorer::new(config.scoring.clone()),
            explainer: ExplanationGenerator::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Drop the columns the configuration ignores
    pub fn prepare(&self, dataset: &TabularDataset) -> TabularDataset {
        let rules = &self.config.columns;
        if rules.ignore.is_empty() {
            return dataset.clone();
        }

        let prepared = dataset.without_columns(|name| rules.is_ignored(name));
        let dropped = dataset.columns.len() - prepared.columns.len();
        if dropped > 0 {
            tracing::debug!(dropped, "ignored columns by configuration");
        }
        prepared
    }

    /// Profile one dataset
    pub fn profile(&self, dataset: &TabularDataset) -> Result<Vec<FeatureProfile>> {
        self.profiler.profile(&self.prepare(dataset))
    }

    /// Detect drift between two datasets
    pub fn detect(&self, baseline: &TabularDataset, current: &TabularDataset) -> Result<Vec<DriftMetric>> {
        self.detector
            .detect(&self.prepare(baseline), &self.prepare(current))
    }

    /// Score drift metrics
    pub fn score(&self, metrics: &[DriftMetric]) -> Result<HealthAssessment> {
        self.scorer.score(metrics)
    }

    /// Explain drift metrics under a health assessment
    pub fn explain(&self, metrics: &[DriftMetric], health: &HealthAssessment) -> Result<Explanation> {
        self.explainer.explain(metrics, health)
    }

    /// Run the full pipeline
    pub fn analyze(&self, baseline: &TabularDataset, current: &TabularDataset) -> Result<AnalysisReport> {
        let baseline = self.prepare(baseline);
        let current = self.prepare(current);

        tracing::info!(
            baseline_columns = baseline.columns.len(),
            current_columns = current.columns.len(),
            "starting drift analysis"
        );

        let profiles = ProfilePair {
            baseline: self.profiler.profile(&baseline)?,
            current: self.profiler.profile(&current)?,
        };

        let drift = self.detector.detect(&baseline, &current)?;
        let health = self.scorer.score(&drift)?;
        let explanation = self.explainer.explain(&drift, &health)?;

        tracing::info!(
            metrics = drift.len(),
            score = health.score,
            status = %health.status,
            "drift analysis complete"
        );

        Ok(AnalysisReport::new(
            &baseline,
            &current,
            profiles,
            drift,
            health,
            explanation,
        ))
    }
}
