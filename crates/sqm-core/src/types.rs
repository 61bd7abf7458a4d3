//! Core types for sqm-core.
//!
//! This module defines the tabular data shared across the pipeline: the
//! normalised [`Dataset`] produced by a table source, its [`Row`]s, and the
//! [`CellValue`] scalar that every cell carries.

use std::collections::BTreeMap;

/// A single spreadsheet cell, normalised across the value shapes the sheet
/// API can return.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// The column exists in the header but this row left it blank.
    Empty,
}

impl CellValue {
    /// Build a cell from raw text. Blank (whitespace-only) text becomes
    /// [`CellValue::Empty`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    /// Convert a JSON cell as returned by the Sheets `values` endpoint.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Empty),
            serde_json::Value::String(s) => CellValue::text(s.as_str()),
            serde_json::Value::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
            other => CellValue::text(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric interpretation of the cell. Text is trimmed and parsed as a
    /// decimal; anything that does not parse (or is NaN) yields `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            _ => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s.trim()),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Empty => Ok(()),
        }
    }
}

/// Normalise a header cell: trimmed and lowercased.
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One record of the ticket log. Keys are normalised column names.
///
/// [`Row::get`] distinguishes a column that is absent from the row (`None`)
/// from one that is present but blank (`Some(CellValue::Empty)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell, normalising the column name.
    pub fn insert(&mut self, column: &str, value: CellValue) {
        self.cells.insert(normalize_column(column), value);
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// The cell value if the column is present and non-empty.
    pub fn value(&self, column: &str) -> Option<&CellValue> {
        self.get(column).filter(|v| !v.is_empty())
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(CellValue::as_number)
    }

    /// Trimmed, uppercased text of a column; used for case-insensitive
    /// comparisons.
    pub fn folded(&self, column: &str) -> Option<String> {
        self.value(column).map(|v| v.to_string().trim().to_uppercase())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

impl<K: AsRef<str>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k.as_ref(), v);
        }
        row
    }
}

/// An ordered sequence of rows sharing the header of the sheet they came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from an already-normalised header and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let columns = columns.iter().map(|c| normalize_column(c)).collect();
        Self { columns, rows }
    }

    /// Build a dataset from a raw header row and raw record rows.
    ///
    /// Header names are normalised. Columns with an empty name are dropped and
    /// a duplicated header keeps its first occurrence. Cells missing from the
    /// end of a short record become [`CellValue::Empty`].
    pub fn from_records(header: &[String], records: Vec<Vec<CellValue>>) -> Self {
        let mut columns: Vec<String> = Vec::with_capacity(header.len());
        // (position in the raw record, normalised name)
        let mut keep: Vec<(usize, String)> = Vec::with_capacity(header.len());
        for (idx, raw) in header.iter().enumerate() {
            let name = normalize_column(raw);
            if name.is_empty() {
                continue;
            }
            if columns.contains(&name) {
                tracing::warn!(column = %name, "duplicate header ignored");
                continue;
            }
            columns.push(name.clone());
            keep.push((idx, name));
        }

        let rows = records
            .into_iter()
            .map(|mut record| {
                let mut row = Row::new();
                for (idx, name) in &keep {
                    let cell = record
                        .get_mut(*idx)
                        .map(|c| std::mem::replace(c, CellValue::Empty))
                        .unwrap_or(CellValue::Empty);
                    row.cells.insert(name.clone(), cell);
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// A sheet with no header row carries no schema at all.
    pub fn is_blank(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Same header, different rows.
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
