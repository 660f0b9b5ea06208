//! Record datasets loaded from JSON.
//!
//! A dataset is a JSON array of objects. This module derives the category
//! values of a column (with occurrence counts and chip colours) and applies a
//! [`FilterMap`] to the records.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::types::{CategoryValue, FilterMap, FilterValue};

/// A single record: field name to JSON value.
pub type Record = Map<String, Value>;

/// Errors that can occur while loading or querying a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not valid JSON.
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// The top-level JSON value is not an array.
    #[error("dataset must be a JSON array of objects")]
    NotAnArray,

    /// An element of the array is not an object.
    #[error("record {0} is not a JSON object")]
    InvalidRecord(usize),

    /// No record has the requested column.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// An in-memory set of records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    columns: Vec<String>,
}

impl Dataset {
    /// Build a dataset from records.
    pub fn new(records: Vec<Record>) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for record in &records {
            for key in record.keys() {
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
        }
        Self { records, columns }
    }

    /// Load a dataset from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            columns = dataset.columns.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Parse a dataset from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        let Value::Array(items) = value else {
            return Err(DatasetError::NotAnArray);
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                _ => Err(DatasetError::InvalidRecord(index)),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(records))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Field names in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Check whether any record has this field.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Distinct values of a column with their counts.
    ///
    /// Null and missing fields are skipped. Values are ordered by count,
    /// most frequent first, then alphabetically; colours are assigned from
    /// `palette` in that order, wrapping around.
    pub fn category_values(&self, column: &str, palette: &[String]) -> Result<Vec<CategoryValue>> {
        if !self.has_column(column) {
            return Err(DatasetError::UnknownColumn(column.to_string()));
        }

        let mut counts: HashMap<String, u64> = HashMap::new();
        for text in self
            .records
            .iter()
            .filter_map(|record| record.get(column).and_then(field_text))
        {
            *counts.entry(text).or_insert(0) += 1;
        }

        let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let values: Vec<CategoryValue> = entries
            .into_iter()
            .enumerate()
            .map(|(index, (value, count))| {
                let color = if palette.is_empty() {
                    String::new()
                } else {
                    palette[index % palette.len()].clone()
                };
                CategoryValue::new(value, count, color)
            })
            .collect();

        debug!(column, distinct = values.len(), "Computed category values");
        Ok(values)
    }

    /// Records that pass every filter.
    pub fn apply(&self, filters: &FilterMap<FilterValue>) -> Vec<&Record> {
        for (column, filter) in filters {
            trace!(
                column = %column,
                method = ?filter.method(),
                active = filter.is_active(),
                "Applying filter"
            );
        }

        self.records
            .iter()
            .filter(|record| {
                filters
                    .iter()
                    .all(|(column, filter)| matches_filter(record.get(column), filter))
            })
            .collect()
    }
}

/// Render a field as the text used for category matching and display.
///
/// Returns `None` for null.
pub fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn field_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Check a single field against a filter.
///
/// Inactive filters (empty text, empty category set) always match.
pub fn matches_filter(field: Option<&Value>, filter: &FilterValue) -> bool {
    if !filter.is_active() {
        return true;
    }

    match filter {
        FilterValue::Text(needle) => field
            .and_then(field_text)
            .is_some_and(|text| text.to_lowercase().contains(&needle.to_lowercase())),
        FilterValue::Number(expected) => field
            .and_then(field_number)
            .is_some_and(|n| n == *expected),
        FilterValue::Range((low, high)) => field
            .and_then(field_number)
            .is_some_and(|n| n >= *low && n <= *high),
        FilterValue::Categories(values) => field
            .and_then(field_text)
            .is_some_and(|text| values.iter().any(|v| v.value == text)),
    }
}
