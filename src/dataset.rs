//! Schema-less row-sets returned by the analysis backend
//!
//! Every response may carry a different column layout; columns are inferred
//! per response rather than declared. This module owns the scalar coercion
//! helpers the chart builder relies on (text, number, date) and the
//! display-column filtering that hides configured free-text columns.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single row: column name to scalar JSON value
pub type Row = serde_json::Map<String, Value>;

/// The most recent raw row-set returned by the backend
///
/// Replaced wholesale on every successful response that carries data,
/// never merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDataset {
    rows: Vec<Row>,
}

impl RawDataset {
    /// Create a dataset from backend rows
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Returns all rows in response order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names inferred from the first row, minus the excluded set
    ///
    /// Columns are not declared by a schema; the first row is taken as
    /// representative. Excluded columns never reach a display path.
    pub fn display_columns(&self, excluded: &[String]) -> Vec<String> {
        match self.rows.first() {
            Some(row) => row
                .keys()
                .filter(|name| !excluded.iter().any(|e| e == *name))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Coerce a row cell to display text
///
/// Strings pass through; numbers and booleans are formatted. Null and
/// missing columns yield `None`.
pub fn cell_text(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerce a row cell to a float
///
/// Numbers convert directly; numeric strings are parsed. Anything else
/// yields `None`.
pub fn cell_number(row: &Row, column: &str) -> Option<f64> {
    match row.get(column)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Coerce a row cell to a date
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, and RFC 3339 strings.
pub fn cell_date(row: &Row, column: &str) -> Option<NaiveDateTime> {
    let text = match row.get(column)? {
        Value::String(s) => s.as_str(),
        _ => return None,
    };
    parse_date(text)
}

/// Parse a date-like string into a naive timestamp
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    None
}
