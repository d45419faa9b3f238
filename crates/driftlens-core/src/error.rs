//! Error types raised by the analysis core
//!
//! Every failure is typed and surfaced immediately; nothing is retried and
//! no partial result is returned alongside an error.

use crate::dataset::ColumnKind;

/// Convenience result alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors produced by profiling, drift detection, scoring and explanation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// A column does not have enough non-null values for the requested statistic
    #[error("Insufficient data in column '{column}': {required} non-null values required, {found} found")]
    InsufficientData {
        column: String,
        required: usize,
        found: usize,
    },

    /// Baseline and current datasets share no columns at all
    #[error("Baseline and current datasets share no columns (baseline: [{}], current: [{}])", .baseline_columns.join(", "), .current_columns.join(", "))]
    UnmatchedBaseline {
        baseline_columns: Vec<String>,
        current_columns: Vec<String>,
    },

    /// A drift metric carries a severity the core does not know about
    #[error("Invalid severity input: {value}")]
    InvalidSeverityInput { value: String },

    /// A value does not fit the kind of the column it belongs to
    #[error("Column '{column}' is {expected} but holds a {found} value")]
    KindMismatch {
        column: String,
        expected: ColumnKind,
        found: &'static str,
    },

    /// The same column name appears twice in one dataset
    #[error("Duplicate column '{column}'")]
    DuplicateColumn { column: String },
}

impl CoreError {
    /// Shorthand for [`CoreError::InsufficientData`]
    pub fn insufficient(column: impl Into<String>, required: usize, found: usize) -> Self {
        Self::InsufficientData {
            column: column.into(),
            required,
            found,
        }
    }

    /// Shorthand for [`CoreError::InvalidSeverityInput`]
    pub fn invalid_severity(value: impl Into<String>) -> Self {
        Self::InvalidSeverityInput { value: value.into() }
    }
}
