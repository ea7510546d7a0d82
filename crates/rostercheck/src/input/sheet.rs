//! Spreadsheet ingestion: first sheet of a workbook as a [`Table`].

use super::source::{CellValue, Table};
use crate::error::{Result, RosterError};

/// Normalize rows read from a sheet.
///
/// Text cells are trimmed, numbers stay numbers, and rows in which every
/// cell is blank are dropped (sheet exports often carry trailing empty rows).
pub fn table_from_sheet_rows(rows: Vec<Vec<CellValue>>) -> Result<Table> {
    let rows: Vec<Vec<CellValue>> = rows
        .into_iter()
        .filter(|row| !row.iter().all(CellValue::is_blank))
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    CellValue::Text(s) => CellValue::text(s),
                    other => other,
                })
                .collect()
        })
        .collect();

    if rows.is_empty() {
        return Err(RosterError::EmptyInput("First sheet has no rows".to_string()));
    }
    Ok(Table::new(rows))
}

/// Read the first sheet of a workbook (xlsx, xlsm, xlsb, xls or ods).
#[cfg(feature = "spreadsheet")]
pub fn parse_spreadsheet(bytes: &[u8]) -> Result<Table> {
    use std::io::Cursor;

    use calamine::{Data, Reader, open_workbook_auto_from_rs};

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| RosterError::Spreadsheet(e.to_string()))?;

    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| RosterError::EmptyInput("Workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| RosterError::Spreadsheet(e.to_string()))?;

    let rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => CellValue::Null,
                    Data::String(s) => CellValue::Text(s.clone()),
                    Data::Int(i) => CellValue::Number(*i as f64),
                    Data::Float(f) => CellValue::Number(*f),
                    Data::Bool(b) => CellValue::Bool(*b),
                    other => CellValue::Text(other.to_string()),
                })
                .collect()
        })
        .collect();

    tracing::debug!(sheet = %first, "read first worksheet");
    table_from_sheet_rows(rows)
}

/// Spreadsheet support was compiled out.
#[cfg(not(feature = "spreadsheet"))]
pub fn parse_spreadsheet(_bytes: &[u8]) -> Result<Table> {
    Err(RosterError::UnsupportedFormat(
        "spreadsheet support not enabled. Rebuild with --features spreadsheet".to_string(),
    ))
}
