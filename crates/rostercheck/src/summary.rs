//! Dataset summaries: row totals, per-column completion and district counts.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, RosterError};
use crate::input::{CellValue, Table};
use crate::schema::SchemaKind;

/// How completely one column is filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnCompletion {
    /// Data rows whose cell is not blank.
    pub non_empty_cells: usize,
    /// Share of data rows that are filled, 0..=100, two decimals.
    pub percent_complete: f64,
}

/// Summary of one table.
///
/// Serializes with `total_rows` and `column_completion` always present;
/// `uuid` and `districtCounts` appear only when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    pub total_rows: usize,
    pub column_completion: IndexMap<String, ColumnCompletion>,
    #[serde(
        rename = "districtCounts",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub district_counts: Option<IndexMap<String, usize>>,
}

/// Summarize `table` as a dataset of the given kind.
///
/// Completion is reported for every header column in header order. District
/// counts are only produced for student tables that carry a `district_id`
/// column.
pub fn summarize(table: &Table, kind: SchemaKind) -> SummaryRecord {
    let total_rows = table.data_row_count();
    let header = table.header();

    let mut column_completion = IndexMap::with_capacity(header.len());
    for (col, name) in header.iter().enumerate() {
        let non_empty_cells = table
            .data_rows()
            .filter(|(idx, _)| !table.cell(*idx, col).is_blank())
            .count();
        column_completion
            .entry(name.clone())
            .or_insert(ColumnCompletion {
                non_empty_cells,
                percent_complete: percent(non_empty_cells, total_rows),
            });
    }

    let district_counts = match kind {
        SchemaKind::Student => table
            .column_index("district_id")
            .map(|col| count_values(table, col)),
        SchemaKind::Session => None,
    };

    SummaryRecord {
        uuid: None,
        total_rows,
        column_completion,
        district_counts,
    }
}

impl SummaryRecord {
    /// Attach a freshly generated v4 identifier.
    pub fn with_uuid(mut self) -> Self {
        self.uuid = Some(Uuid::new_v4());
        self
    }

    /// Write the summary to `path` as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| RosterError::io(parent, e))?;
            }
        }

        let file = File::create(path).map_err(|e| RosterError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        // Dropping a BufWriter discards flush errors.
        writer.flush().map_err(|e| RosterError::io(path, e))?;

        tracing::info!(path = %path.display(), "summary written");
        Ok(())
    }
}

fn count_values(table: &Table, col: usize) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for (idx, _) in table.data_rows() {
        let value: &CellValue = table.cell(idx, col);
        if value.is_blank() {
            continue;
        }
        *counts.entry(value.as_text().trim().to_string()).or_insert(0) += 1;
    }
    counts
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
