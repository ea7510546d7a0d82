//! Tutoring dosage: total session hours per student and how they spread
//! against a full-dosage target.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::merge::left_join;
use crate::error::{Result, RosterError};
use crate::input::{CellValue, Table};

/// Column appended by [`attach_hours`].
pub const TOTAL_HOURS_COLUMN: &str = "total_hours";

/// Default hours of tutoring that count as full dosage.
pub const FULL_DOSAGE_HOURS: f64 = 60.0;

/// Distribution of per-student hours relative to a target.
///
/// Band percentages are shares of all students, so the five bands sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosageMetrics {
    pub total_students: usize,
    pub target_hours: f64,
    pub mean_hours: f64,
    pub median_hours: f64,
    pub q25: f64,
    pub q75: f64,
    pub iqr: f64,
    /// Below 25% of the target.
    pub pct_below_25: f64,
    pub pct_25_50: f64,
    pub pct_50_75: f64,
    pub pct_75_99: f64,
    /// At or above the target.
    pub pct_full_dosage: f64,
    /// 0 when every student has the same hours, approaching 1 as hours
    /// concentrate on fewer students.
    pub gini: f64,
}

/// Sum `session_duration` (minutes) per `student_id`, in hours.
///
/// Students appear in first-seen order. Rows with a blank id are skipped, and
/// durations that are blank, unparseable or negative contribute nothing.
pub fn tutoring_hours(sessions: &Table) -> Result<IndexMap<String, f64>> {
    let id_col = require_column(sessions, "sessions", "student_id")?;
    let duration_col = require_column(sessions, "sessions", "session_duration")?;

    let mut hours: IndexMap<String, f64> = IndexMap::new();
    let mut unparsed = 0usize;
    for (idx, row) in sessions.data_rows() {
        if row.iter().all(CellValue::is_blank) {
            continue;
        }
        let id = sessions.cell(idx, id_col);
        if id.is_blank() {
            continue;
        }
        let minutes = match sessions.cell(idx, duration_col) {
            CellValue::Number(n) => Some(*n),
            other => other.as_text().trim().parse::<f64>().ok(),
        }
        .filter(|m| m.is_finite() && *m >= 0.0);

        let entry = hours.entry(id.as_text().trim().to_string()).or_insert(0.0);
        match minutes {
            Some(m) => *entry += m / 60.0,
            None => unparsed += 1,
        }
    }

    if unparsed > 0 {
        tracing::warn!(rows = unparsed, "session durations could not be read as minutes");
    }
    Ok(hours)
}

/// Append a `total_hours` column to the student table.
///
/// Students without sessions get `0`. Implemented as a left join so every
/// student row is kept and sessions for unknown students are dropped.
pub fn attach_hours(students: &Table, hours: &IndexMap<String, f64>) -> Result<Table> {
    require_column(students, "students", "student_id")?;

    let mut rows = Vec::with_capacity(hours.len() + 1);
    rows.push(vec![CellValue::text("student_id"), CellValue::text(TOTAL_HOURS_COLUMN)]);
    for (id, total) in hours {
        rows.push(vec![CellValue::text(id), CellValue::Number(round2(*total))]);
    }

    let mut merged = left_join(students, &Table::new(rows), "student_id")?;
    let col = merged
        .column_index(TOTAL_HOURS_COLUMN)
        .ok_or_else(|| RosterError::MissingColumn {
            table: "merged",
            column: TOTAL_HOURS_COLUMN.to_string(),
        })?;
    for row in merged.rows.iter_mut().skip(1) {
        if row.len() <= col {
            row.resize(col + 1, CellValue::Missing);
        }
        if row[col].is_blank() {
            row[col] = CellValue::Number(0.0);
        }
    }
    Ok(merged)
}

/// The `total_hours` value of every student row, skipping unreadable cells.
pub fn student_hours(table: &Table) -> Result<Vec<f64>> {
    let col = require_column(table, "students", TOTAL_HOURS_COLUMN)?;
    Ok(table
        .data_rows()
        .filter_map(|(idx, _)| match table.cell(idx, col) {
            CellValue::Number(n) => Some(*n),
            other => other.as_text().trim().parse::<f64>().ok(),
        })
        .filter(|h| h.is_finite())
        .collect())
}

/// Summarize per-student hours against `target_hours`.
///
/// Returns `None` when there are no students. Quartiles interpolate linearly
/// between the closest ranks.
pub fn dosage_metrics(hours: &[f64], target_hours: f64) -> Option<DosageMetrics> {
    if hours.is_empty() {
        return None;
    }
    let mut sorted = hours.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let total: f64 = sorted.iter().sum();
    let share = |lo: f64, hi: f64| {
        let count = sorted.iter().filter(|h| **h >= lo && **h < hi).count();
        count as f64 / n * 100.0
    };

    let q25 = quantile(&sorted, 0.25);
    let q75 = quantile(&sorted, 0.75);
    let gini = if total == 0.0 {
        0.0
    } else {
        let ranked: f64 = sorted
            .iter()
            .enumerate()
            .map(|(i, h)| (i + 1) as f64 * h)
            .sum();
        2.0 * ranked / (n * total) - (n + 1.0) / n
    };

    Some(DosageMetrics {
        total_students: sorted.len(),
        target_hours,
        mean_hours: total / n,
        median_hours: quantile(&sorted, 0.5),
        q25,
        q75,
        iqr: q75 - q25,
        pct_below_25: share(f64::NEG_INFINITY, target_hours * 0.25),
        pct_25_50: share(target_hours * 0.25, target_hours * 0.5),
        pct_50_75: share(target_hours * 0.5, target_hours * 0.75),
        pct_75_99: share(target_hours * 0.75, target_hours),
        pct_full_dosage: share(target_hours, f64::INFINITY),
        gini,
    })
}

/// Quantile of ascending, non-empty data by linear interpolation.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

fn require_column(table: &Table, name: &'static str, column: &str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| RosterError::MissingColumn {
            table: name,
            column: column.to_string(),
        })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
