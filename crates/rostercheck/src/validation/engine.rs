//! Row validation engine.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::report::{AggregateError, RowError, ValidationReport};
use crate::error::{Result, RosterError};
use crate::input::{CellValue, Table};
use crate::schema::{Schema, ValidationPolicy};

/// Applies a schema's field rules to every data row of a table.
pub struct RowValidator<'a> {
    schema: &'a Schema,
    policy: ValidationPolicy,
}

impl<'a> RowValidator<'a> {
    /// Create a validator for `schema` under `policy`.
    pub fn new(schema: &'a Schema, policy: ValidationPolicy) -> Self {
        Self { schema, policy }
    }

    /// Validate every data row.
    ///
    /// Cells are matched to fields by the table's own header order, so a file
    /// whose columns are reordered relative to the schema still validates.
    /// Rows in which every cell is blank are skipped. Fails with
    /// [`RosterError::EmptyData`] when the table has no data rows.
    ///
    /// Header conformance is not checked here; a field absent from the header
    /// reads as blank in every row.
    pub fn validate(&self, table: &Table) -> Result<ValidationReport> {
        if table.len() <= 1 {
            return Err(RosterError::EmptyData(format!(
                "{} table has no data rows",
                self.schema.kind
            )));
        }

        let header = table.header();
        let positions: Vec<Option<usize>> = self
            .schema
            .fields
            .iter()
            .map(|f| header.iter().position(|h| h == f.name))
            .collect();

        let mut tracked: IndexMap<&str, (usize, HashSet<String>)> = self
            .schema
            .fields
            .iter()
            .filter_map(|f| f.cardinality_limit.map(|limit| (f.name, (limit, HashSet::new()))))
            .collect();

        let missing = CellValue::Missing;
        let mut report = ValidationReport::new(self.schema.kind);

        for (idx, row) in table.data_rows() {
            if row.iter().all(CellValue::is_blank) {
                report.rows_skipped += 1;
                continue;
            }
            report.rows_checked += 1;
            let row_number = idx + 1;

            for (field, position) in self.schema.fields.iter().zip(&positions) {
                let value = position
                    .map(|col| table.cell(idx, col))
                    .unwrap_or(&missing);

                if let Err(message) = field.check(value, &self.policy) {
                    report.row_errors.push(RowError {
                        row_number,
                        field: field.name.to_string(),
                        message,
                    });
                }

                if let Some((_, seen)) = tracked.get_mut(field.name) {
                    if !value.is_blank() {
                        seen.insert(value.as_text().trim().to_string());
                    }
                }
            }
        }

        for (field, (limit, seen)) in tracked {
            let observed = seen.len();
            report.cardinality.insert(field.to_string(), observed);
            if observed > limit {
                report
                    .aggregate_errors
                    .push(AggregateError::new(field, observed, limit));
            }
        }

        tracing::debug!(
            kind = %self.schema.kind,
            checked = report.rows_checked,
            skipped = report.rows_skipped,
            row_errors = report.row_errors.len(),
            aggregate_errors = report.aggregate_errors.len(),
            "validated rows"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FlagPolicy;

    fn session_table(rows: &[Vec<&str>]) -> Table {
        Table::from_strings(
            &["student_id", "session_topic", "session_date", "session_duration", "tutor_id"],
            rows,
        )
    }

    #[test]
    fn test_invalid_calendar_date() {
        let schema = Schema::session();
        let table = session_table(&[vec!["123", "Math", "2024-02-30", "45", "T1"]]);
        let report = RowValidator::new(&schema, ValidationPolicy::default())
            .validate(&table)
            .unwrap();

        assert_eq!(report.row_errors.len(), 1);
        assert_eq!(report.row_errors[0].row_number, 2);
        assert_eq!(report.row_errors[0].field, "session_date");
        assert!(report.row_errors[0].message.contains("2024-02-30"));
        assert!(report.aggregate_errors.is_empty());
    }

    #[test]
    fn test_header_only_is_empty_data() {
        let schema = Schema::session();
        let table = session_table(&[]);
        let err = RowValidator::new(&schema, ValidationPolicy::default())
            .validate(&table)
            .unwrap_err();
        assert!(matches!(err, RosterError::EmptyData(_)));
    }

    #[test]
    fn test_blank_rows_are_skipped_but_counted_in_numbering() {
        let schema = Schema::session();
        let mut table = session_table(&[
            vec!["123", "math", "2024-01-10", "30", "T1"],
            vec!["", "", "", "", ""],
            vec!["abc", "math", "2024-01-10", "30", "T1"],
        ]);
        table.rows.push(vec![CellValue::Null, CellValue::Missing]);

        let report = RowValidator::new(&schema, ValidationPolicy::default())
            .validate(&table)
            .unwrap();

        assert_eq!(report.rows_checked, 2);
        assert_eq!(report.rows_skipped, 2);
        assert_eq!(report.row_errors.len(), 1);
        assert_eq!(report.row_errors[0].row_number, 4);
    }

    #[test]
    fn test_reordered_columns_and_short_rows() {
        let schema = Schema::session();
        let table = Table::from_strings(
            &["tutor_id", "session_duration", "session_date", "session_topic", "student_id"],
            &[vec!["T9", "60", "2024-03-01", "ELA", "42"], vec!["T9", "60"]],
        );
        let report = RowValidator::new(&schema, ValidationPolicy::default())
            .validate(&table)
            .unwrap();

        let fields: Vec<&str> = report.row_errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["student_id", "session_topic", "session_date"]);
        assert!(report.row_errors.iter().all(|e| e.row_number == 3));
    }

    #[test]
    fn test_errors_follow_schema_order_within_row() {
        let schema = Schema::session();
        let table = session_table(&[
            vec!["x", "art", "bad", "-1", ""],
            vec!["1", "math", "2024-01-01", "10", "T"],
            vec!["2", "math", "2024-01-01", "0", "T"],
        ]);
        let report = RowValidator::new(&schema, ValidationPolicy::default())
            .validate(&table)
            .unwrap();

        let rows: Vec<(usize, &str)> = report
            .row_errors
            .iter()
            .map(|e| (e.row_number, e.field.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (2, "student_id"),
                (2, "session_topic"),
                (2, "session_date"),
                (2, "session_duration"),
                (2, "tutor_id"),
                (4, "session_duration"),
            ]
        );
        assert_eq!(report.rows_with_errors(), vec![2, 4]);
    }

    #[test]
    fn test_policy_changes_outcome() {
        let schema = Schema::student();
        let header = schema.field_names();
        let row = vec![
            "1234567890", "1234567", "D", "123456", "S", "5", "female", "Asian", "yes", "no",
            "0", "1", "9000", "700", "700", "700", "700", "700", "basic", "basic", "true",
            "false",
        ];
        let table = Table::from_strings(&header, &[row]);

        let strict = RowValidator::new(&schema, ValidationPolicy::strict())
            .validate(&table)
            .unwrap();
        // gender, six flags and one score
        assert_eq!(strict.row_errors.len(), 8);

        let lenient_flags = ValidationPolicy::default().with_flags(FlagPolicy::Lenient);
        let report = RowValidator::new(&schema, lenient_flags).validate(&table).unwrap();
        assert_eq!(report.row_errors.len(), 1);
        assert_eq!(report.row_errors[0].field, "ela_state_score_two_years_ago");

        let report = RowValidator::new(&schema, ValidationPolicy::lenient())
            .validate(&table)
            .unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn test_cardinality_ignores_blanks() {
        let schema = Schema::student();
        let header = schema.field_names();
        let mut rows = Vec::new();
        for level in ["a", "b", "c", "d", "e", "f", "g", ""] {
            let mut row = vec![
                "1234567890", "1234567", "D", "123456", "S", "5", "Male", "Asian", "TRUE",
                "FALSE", "FALSE", "FALSE", "700", "700", "700", "700", "700", "700", "x", "x",
                "FALSE", "FALSE",
            ];
            row[18] = level;
            rows.push(row);
        }
        let table = Table::from_strings(&header, &rows);
        let report = RowValidator::new(&schema, ValidationPolicy::default())
            .validate(&table)
            .unwrap();

        assert!(report.row_errors.is_empty());
        assert_eq!(report.cardinality["performance_level_prior_year"], 7);
        assert_eq!(report.cardinality["ethnicity"], 1);
        assert_eq!(report.aggregate_errors.len(), 1);
        assert_eq!(report.aggregate_errors[0].field, "performance_level_prior_year");
        assert_eq!(report.aggregate_errors[0].observed, 7);
        assert_eq!(report.aggregate_errors[0].limit, 6);
    }
}
