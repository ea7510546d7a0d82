//! Year-over-year state score gains for ELA and math.

use crate::input::{CellValue, Table};

/// Subjects with three years of state scores in the student schema.
pub const GAIN_SUBJECTS: [&str; 2] = ["ela", "math"];

/// Append `<subject>_value_added` and `<subject>_raw_gain` for each subject.
///
/// With scores two years ago (`s2`), one year ago (`s1`) and this year
/// (`s0`), value added is `(s0 - s1) - (s1 - s2)`, the change in yearly
/// growth, and the raw gain is `s0 - s2`. A cell is [`CellValue::Null`] when
/// any of its three scores is blank or not a number, and every cell of a
/// subject is null when one of its score columns is absent.
pub fn attach_score_gains(students: &Table) -> Table {
    let mut table = students.clone();
    let Some(header) = table.rows.first_mut() else {
        return table;
    };
    let width = header.len();
    for subject in GAIN_SUBJECTS {
        header.push(CellValue::text(format!("{}_value_added", subject)));
        header.push(CellValue::text(format!("{}_raw_gain", subject)));
    }

    let columns: Vec<Option<[usize; 3]>> = GAIN_SUBJECTS
        .iter()
        .map(|subject| score_columns(students, subject))
        .collect();

    for (idx, row) in table.rows.iter_mut().enumerate().skip(1) {
        row.resize(width, CellValue::Missing);
        for cols in &columns {
            let scores = cols.and_then(|[two, one, current]| {
                Some((
                    score(students.cell(idx, two))?,
                    score(students.cell(idx, one))?,
                    score(students.cell(idx, current))?,
                ))
            });
            match scores {
                Some((two, one, current)) => {
                    row.push(CellValue::Number((current - one) - (one - two)));
                    row.push(CellValue::Number(current - two));
                }
                None => {
                    row.push(CellValue::Null);
                    row.push(CellValue::Null);
                }
            }
        }
    }

    tracing::debug!(rows = table.data_row_count(), "attached score gains");
    table
}

/// Columns of the two-years-ago, one-year-ago and current scores.
fn score_columns(table: &Table, subject: &str) -> Option<[usize; 3]> {
    let find = |when: &str| table.column_index(&format!("{}_state_score_{}", subject, when));
    match (find("two_years_ago"), find("one_year_ago"), find("current_year")) {
        (Some(two), Some(one), Some(current)) => Some([two, one, current]),
        _ => {
            tracing::debug!(subject, "score columns absent, gains left blank");
            None
        }
    }
}

fn score(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) => Some(*n),
        other => other.as_text().trim().parse::<f64>().ok(),
    }
    .filter(|n| n.is_finite())
}
