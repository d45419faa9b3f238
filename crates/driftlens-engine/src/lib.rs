//! DriftLens engine - Core analysis logic
//!
//! This crate implements the analysis components of DriftLens:
//! - Dataset profiling
//! - Drift detection (schema, KS, mean shift, Jensen-Shannon)
//! - Health scoring
//! - Explanation generation

pub mod analyzer;
pub mod drift_detector;
pub mod explanation;
pub mod health_scorer;
pub mod profiler;
pub mod statistics;

pub use analyzer::Analyzer;
pub use drift_detector::DriftDetector;
pub use explanation::ExplanationGenerator;
pub use health_scorer::HealthScorer;
pub use profiler::Profiler;
pub use statistics::KsResult;
