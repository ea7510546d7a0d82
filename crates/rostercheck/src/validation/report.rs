//! Validation report types.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::SchemaKind;

/// A cell that failed its field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based row number counting the header as row 1.
    pub row_number: usize,
    /// Field whose rule failed.
    pub field: String,
    /// Message naming the field, the value and the expected shape.
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row_number, self.message)
    }
}

/// A column with more distinct values than its limit allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateError {
    /// Field that exceeded its limit.
    pub field: String,
    /// Distinct non-blank values observed.
    pub observed: usize,
    /// Maximum allowed.
    pub limit: usize,
    /// Human-readable message.
    pub message: String,
}

impl AggregateError {
    /// Create an error for `field` having `observed` distinct values.
    pub fn new(field: impl Into<String>, observed: usize, limit: usize) -> Self {
        let field = field.into();
        let message = format!(
            "{} has {} unique values (expected at most {})",
            field, observed, limit
        );
        Self {
            field,
            observed,
            limit,
            message,
        }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of validating every data row of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Schema the table was validated against.
    pub kind: SchemaKind,
    /// Per-cell failures, by row then schema field order.
    pub row_errors: Vec<RowError>,
    /// Cardinality failures, after all row errors.
    pub aggregate_errors: Vec<AggregateError>,
    /// Distinct value counts for tracked fields.
    #[serde(default)]
    pub cardinality: IndexMap<String, usize>,
    /// Data rows that were validated.
    pub rows_checked: usize,
    /// Data rows skipped because every cell was blank.
    pub rows_skipped: usize,
}

impl ValidationReport {
    /// An empty report for `kind`.
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            row_errors: Vec::new(),
            aggregate_errors: Vec::new(),
            cardinality: IndexMap::new(),
            rows_checked: 0,
            rows_skipped: 0,
        }
    }

    /// True when there are neither row nor aggregate errors.
    pub fn is_valid(&self) -> bool {
        self.row_errors.is_empty() && self.aggregate_errors.is_empty()
    }

    /// Total number of problems.
    pub fn error_count(&self) -> usize {
        self.row_errors.len() + self.aggregate_errors.len()
    }

    /// All problems as display lines: row errors first, then aggregates.
    pub fn messages(&self) -> Vec<String> {
        self.row_errors
            .iter()
            .map(ToString::to_string)
            .chain(self.aggregate_errors.iter().map(ToString::to_string))
            .collect()
    }

    /// Row numbers that have at least one error, ascending.
    pub fn rows_with_errors(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.row_errors.iter().map(|e| e.row_number).collect();
        rows.dedup();
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_order() {
        let mut report = ValidationReport::new(SchemaKind::Student);
        report.row_errors.push(RowError {
            row_number: 2,
            field: "gender".into(),
            message: "Invalid gender: \"M\" (expected Male or Female)".into(),
        });
        report.aggregate_errors.push(AggregateError::new("ethnicity", 11, 10));

        assert!(!report.is_valid());
        assert_eq!(report.error_count(), 2);
        assert_eq!(
            report.messages(),
            vec![
                "Row 2: Invalid gender: \"M\" (expected Male or Female)".to_string(),
                "ethnicity has 11 unique values (expected at most 10)".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_report_is_valid() {
        let report = ValidationReport::new(SchemaKind::Session);
        assert!(report.is_valid());
        assert!(report.messages().is_empty());
    }
}
