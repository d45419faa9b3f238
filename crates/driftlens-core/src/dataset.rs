//! Tabular dataset contract
//!
//! Datasets arrive fully loaded from an external loader. Each column carries
//! an explicit [`ColumnKind`]; the core never inspects values to decide
//! whether a column is numeric.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};

use crate::error::{CoreError, Result};

/// Declared kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Real-valued feature
    Numeric,

    /// Discrete feature compared by category frequencies
    Categorical,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Categorical => write!(f, "categorical"),
        }
    }
}

/// A single non-null cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Floating point number (NaN and infinities are treated as null)
    Number(f64),

    /// Boolean flag
    Bool(bool),

    /// Free text or category label
    Text(String),
}

impl Value {
    /// Name of the value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
        }
    }

    /// Canonical category label for this value
    pub fn category_key(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// NaN and infinities count as nulls
    fn is_missing(&self) -> bool {
        matches!(self, Self::Number(n) if !n.is_finite())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A named column with a declared kind and nullable values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Declared kind, assigned by the loader
    pub kind: ColumnKind,

    /// Ordered values; `None` is a null cell
    pub values: Vec<Option<Value>>,
}

impl Column {
    /// Create a column from raw values
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<Option<Value>>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Create a numeric column
    pub fn numeric(name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let values = values.into_iter().map(|v| v.map(Value::Number)).collect();
        Self::new(name, ColumnKind::Numeric, values)
    }

    /// Create a categorical column
    pub fn categorical<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.map(|s| Value::Text(s.into())))
            .collect();
        Self::new(name, ColumnKind::Categorical, values)
    }

    /// Number of cells, nulls included
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no cells
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over non-null values (non-finite numbers are skipped)
    pub fn non_null(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().flatten().filter(|v| !v.is_missing())
    }

    /// Number of non-null values
    pub fn non_null_count(&self) -> usize {
        self.non_null().count()
    }

    /// Non-null values as floats, in column order
    ///
    /// Fails with [`CoreError::KindMismatch`] if any non-null value is not a number.
    pub fn numeric_values(&self) -> Result<Vec<f64>> {
        self.non_null()
            .map(|value| match value {
                Value::Number(n) => Ok(*n),
                other => Err(CoreError::KindMismatch {
                    column: self.name.clone(),
                    expected: ColumnKind::Numeric,
                    found: other.type_name(),
                }),
            })
            .collect()
    }

    /// Occurrence count per distinct non-null value
    pub fn category_counts(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for value in self.non_null() {
            *counts.entry(value.category_key()).or_insert(0) += 1;
        }
        counts
    }
}

/// An ordered collection of columns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabularDataset {
    /// Optional dataset name (for reports)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ordered list of columns
    pub columns: Vec<Column>,
}

impl TabularDataset {
    /// Create a dataset from columns
    pub fn from_columns(columns: Vec<Column>) -> Self {
        Self { name: None, columns }
    }

    /// Set the dataset name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows (length of the longest column)
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Column::len).max().unwrap_or(0)
    }

    /// Reject datasets that declare the same column twice
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(CoreError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Copy of the dataset without the columns matching `skip`
    pub fn without_columns(&self, skip: impl Fn(&str) -> bool) -> Self {
        Self {
            name: self.name.clone(),
            columns: self
                .columns
                .iter()
                .filter(|c| !skip(&c.name))
                .cloned()
                .collect(),
        }
    }

    /// Hex SHA-256 over column names, kinds and values
    ///
    /// Each value is tagged by variant and text is length-prefixed, so
    /// `Text("1")` and `Number(1.0)` differ and cells cannot bleed across
    /// column boundaries. The dataset name is not part of the fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for column in &self.columns {
            hasher.update(column.name.as_bytes());
            hasher.update([0u8]);
            hasher.update(column.kind.to_string().as_bytes());
            hasher.update([0u8]);
            for value in &column.values {
                match value {
                    None => hasher.update([0u8]),
                    Some(Value::Number(n)) => {
                        hasher.update([1u8]);
                        hasher.update(n.to_bits().to_le_bytes());
                    }
                    Some(Value::Bool(b)) => hasher.update([2u8, u8::from(*b)]),
                    Some(Value::Text(s)) => {
                        hasher.update([3u8]);
                        hasher.update((s.len() as u64).to_le_bytes());
                        hasher.update(s.as_bytes());
                    }
                }
            }
            hasher.update([0xffu8]);
        }
        hex::encode(hasher.finalize())
    }
}
