//! Dataset and metric loading for the CLI
//!
//! This is the only place where column kinds are decided. JSON files carry
//! explicit kinds; CSV columns are classified from their cells.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use driftlens_core::{Column, ColumnKind, DriftMetric, TabularDataset, Value};

/// Load a dataset from a `.json` or `.csv` file
///
/// Columns listed in `categorical` are forced to be categorical (CSV only).
/// Unnamed datasets are named after the file stem.
pub fn load_dataset(path: &Path, categorical: &[String]) -> Result<TabularDataset> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open dataset {}", path.display()))?;

    let dataset = match extension.as_deref() {
        Some("json") => read_json(file),
        Some("csv") => read_csv(file, categorical),
        _ => {
            return Err(anyhow::anyhow!(
                "Unsupported dataset format: {} (expected .csv or .json)",
                path.display()
            ))
        }
    }
    .with_context(|| format!("Failed to load dataset {}", path.display()))?;

    let dataset = match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if dataset.name.is_none() => dataset.with_name(stem),
        _ => dataset,
    };

    tracing::debug!(
        path = %path.display(),
        rows = dataset.row_count(),
        columns = dataset.columns.len(),
        "loaded dataset"
    );

    Ok(dataset)
}

/// Read a serialized `TabularDataset`
pub fn read_json<R: Read>(reader: R) -> Result<TabularDataset> {
    let dataset: TabularDataset = serde_json::from_reader(reader)?;
    Ok(dataset)
}

/// Read a CSV file with a header row
///
/// Empty cells are nulls. A column is numeric when every non-empty cell
/// parses as a float, unless it is listed in `categorical`; non-finite
/// cells of a numeric column become nulls.
pub fn read_csv<R: Read>(reader: R, categorical: &[String]) -> Result<TabularDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for record in reader.records() {
        let record = record?;
        for (i, field) in record.iter().enumerate() {
            cells[i].push(if field.is_empty() {
                None
            } else {
                Some(field.to_string())
            });
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| {
            let forced = categorical.iter().any(|c| c == &name);
            classify_column(name, values, forced)
        })
        .collect();

    Ok(TabularDataset::from_columns(columns))
}

fn classify_column(name: String, values: Vec<Option<String>>, force_categorical: bool) -> Column {
    let parsed: Option<Vec<Option<f64>>> = if force_categorical {
        None
    } else {
        values
            .iter()
            .map(|cell| match cell {
                None => Some(None),
                // "nan" and "inf" parse but are stored as nulls
                Some(text) => text.parse::<f64>().ok().map(|n| n.is_finite().then_some(n)),
            })
            .collect()
    };

    match parsed {
        Some(numbers) => Column::numeric(name, numbers),
        None => Column::new(
            name,
            ColumnKind::Categorical,
            values.into_iter().map(|v| v.map(Value::Text)).collect(),
        ),
    }
}

/// Load drift metrics from a JSON file
///
/// Accepts either a bare metric array (`driftlens drift` output) or a full
/// analysis report, in which case its `drift` field is used.
pub fn load_metrics(path: &Path) -> Result<Vec<DriftMetric>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metrics {}", path.display()))?;
    parse_metrics(&contents).with_context(|| format!("Failed to parse metrics {}", path.display()))
}

pub fn parse_metrics(json: &str) -> Result<Vec<DriftMetric>> {
    let mut value: serde_json::Value = serde_json::from_str(json)?;
    if let Some(drift) = value.get_mut("drift") {
        value = drift.take();
    }
    let metrics: Vec<DriftMetric> = serde_json::from_value(value)?;
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftlens_core::{MetricName, Severity};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_csv_classification() {
        let csv = "age,color,zip\n10,red,10001\n20,,10002\n,blue,10003\n";
        let dataset = read_csv(csv.as_bytes(), &["zip".to_string()]).unwrap();

        assert_eq!(dataset.column_names(), vec!["age", "color", "zip"]);
        assert_eq!(dataset.row_count(), 3);

        let age = dataset.find_column("age").unwrap();
        assert_eq!(age.kind, ColumnKind::Numeric);
        assert_eq!(
            age.values,
            vec![Some(Value::Number(10.0)), Some(Value::Number(20.0)), None]
        );

        let color = dataset.find_column("color").unwrap();
        assert_eq!(color.kind, ColumnKind::Categorical);
        assert_eq!(color.non_null_count(), 2);

        let zip = dataset.find_column("zip").unwrap();
        assert_eq!(zip.kind, ColumnKind::Categorical);
        assert_eq!(zip.values[0], Some(Value::Text("10001".to_string())));
    }

    #[test]
    fn test_csv_mixed_column_is_categorical() {
        let csv = "score\n1.5\nhigh\n3\n";
        let dataset = read_csv(csv.as_bytes(), &[]).unwrap();
        assert_eq!(dataset.columns[0].kind, ColumnKind::Categorical);
    }

    #[test]
    fn test_csv_non_finite_cells_are_nulls() {
        let csv = "x\n1\ninf\n-infinity\nNaN\n";
        let dataset = read_csv(csv.as_bytes(), &[]).unwrap();

        let x = &dataset.columns[0];
        assert_eq!(x.kind, ColumnKind::Numeric);
        assert_eq!(x.values, vec![Some(Value::Number(1.0)), None, None, None]);
        assert_eq!(x.non_null_count(), 1);
    }

    #[test]
    fn test_csv_ragged_rows_rejected() {
        let csv = "a,b\n1,2\n3\n";
        assert!(read_csv(csv.as_bytes(), &[]).is_err());
    }

    #[test]
    fn test_json_dataset() {
        let json = r#"{
            "name": "train",
            "columns": [
                {"name": "age", "kind": "numeric", "values": [10, null, 30]},
                {"name": "color", "kind": "categorical", "values": ["red", "blue", null]}
            ]
        }"#;

        let dataset = read_json(json.as_bytes()).unwrap();
        assert_eq!(dataset.name.as_deref(), Some("train"));
        assert_eq!(dataset.columns[0].kind, ColumnKind::Numeric);
        assert_eq!(dataset.columns[1].non_null_count(), 2);
    }

    #[test]
    fn test_parse_metric_array() {
        let json = r#"[
            {"feature_name": "age", "metric_name": "mean_shift", "value": 0.5, "severity": "high", "drift_detected": true},
            {"feature_name": "zip", "metric_name": "new_column", "value": null, "severity": "medium", "drift_detected": true}
        ]"#;

        let metrics = parse_metrics(json).unwrap();
        assert_eq!(
            metrics,
            vec![
                DriftMetric::new("age", MetricName::MeanShift, Some(0.5), Severity::High),
                DriftMetric::new_column("zip"),
            ]
        );
    }

    #[test]
    fn test_parse_metrics_from_report() {
        let json = r#"{"version": {"major": 1, "minor": 0}, "drift": [
            {"feature_name": "zip", "metric_name": "missing_column", "value": null, "severity": "high", "drift_detected": true}
        ]}"#;

        let metrics = parse_metrics(json).unwrap();
        assert_eq!(metrics, vec![DriftMetric::missing_column("zip")]);
    }

    #[test]
    fn test_unknown_severity_rejected() {
        let json = r#"[{"feature_name": "age", "metric_name": "mean_shift", "value": 0.5, "severity": "critical", "drift_detected": true}]"#;

        let err = parse_metrics(json).unwrap_err();
        assert!(err.to_string().contains("Invalid severity input"));
    }
}
