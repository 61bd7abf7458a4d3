//! Row filter engine.
//!
//! Criteria are declarative predicates over a single column and compose by
//! logical AND. Filtering is a pure function of its inputs; the only error
//! is a criterion naming a column the dataset header does not have.

use crate::error::{BotError, Result};
use crate::types::{normalize_column, Dataset, Row};

/// A predicate over one normalised column.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCriterion {
    /// Trimmed, case-insensitive equality.
    Equals { column: String, value: String },
    /// Numeric `value < threshold`. A value that does not parse as a number
    /// never matches.
    LessThan { column: String, threshold: f64 },
    /// Trimmed, case-insensitive membership in a set of values.
    OneOf { column: String, values: Vec<String> },
}

impl FilterCriterion {
    pub fn equals(column: &str, value: impl Into<String>) -> Self {
        FilterCriterion::Equals {
            column: normalize_column(column),
            value: value.into(),
        }
    }

    pub fn less_than(column: &str, threshold: f64) -> Self {
        FilterCriterion::LessThan {
            column: normalize_column(column),
            threshold,
        }
    }

    pub fn one_of<I, S>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterCriterion::OneOf {
            column: normalize_column(column),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            FilterCriterion::Equals { column, .. }
            | FilterCriterion::LessThan { column, .. }
            | FilterCriterion::OneOf { column, .. } => column,
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        match self {
            FilterCriterion::Equals { column, value } => {
                row.folded(column).unwrap_or_default() == fold(value)
            }
            FilterCriterion::LessThan { column, threshold } => {
                row.number(column).is_some_and(|n| n < *threshold)
            }
            FilterCriterion::OneOf { column, values } => {
                let actual = row.folded(column).unwrap_or_default();
                values.iter().any(|v| fold(v) == actual)
            }
        }
    }
}

fn fold(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Fail with [`BotError::Schema`] naming the first column the header lacks.
///
/// A blank dataset (no header at all) has no schema and always passes.
pub fn require_columns<'a>(
    dataset: &Dataset,
    columns: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    if dataset.is_blank() {
        return Ok(());
    }
    for column in columns {
        if !dataset.has_column(column) {
            return Err(BotError::schema(column));
        }
    }
    Ok(())
}

/// Keep the rows for which every criterion holds, in their original order.
pub fn filter(dataset: &Dataset, criteria: &[FilterCriterion]) -> Result<Dataset> {
    require_columns(dataset, criteria.iter().map(FilterCriterion::column))?;
    let rows = dataset
        .rows()
        .iter()
        .filter(|row| criteria.iter().all(|c| c.matches(row)))
        .cloned()
        .collect();
    Ok(dataset.with_rows(rows))
}

/// Sort ascending by a numeric column. The sort is stable; rows whose value
/// does not parse go last, in their original order.
pub fn sort_by_numeric(dataset: &Dataset, column: &str) -> Result<Dataset> {
    require_columns(dataset, [column])?;
    let mut rows = dataset.rows().to_vec();
    rows.sort_by(|a, b| match (a.number(column), b.number(column)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    Ok(dataset.with_rows(rows))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
