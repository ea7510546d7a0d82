//! Left outer join of two tables on a shared key column.

use std::collections::HashMap;

use crate::error::{Result, RosterError};
use crate::input::{CellValue, Table};

/// Join `right` onto `left` by the value of `key`.
///
/// Every left data row yields exactly one output row; right rows without a
/// matching left key are dropped. The output header is the left header
/// followed by the right-only fields. Where a right row matches, its values
/// overwrite the left values for every right field; otherwise the right-only
/// cells are [`CellValue::Missing`].
///
/// Keys are compared as trimmed text and blank keys never match. When the
/// right table repeats a key, the last occurrence wins.
pub fn left_join(left: &Table, right: &Table, key: &str) -> Result<Table> {
    let left_header = left.header();
    let right_header = right.header();

    let left_key = left_header
        .iter()
        .position(|h| h == key)
        .ok_or_else(|| RosterError::MissingColumn {
            table: "left",
            column: key.to_string(),
        })?;
    let right_key = right_header
        .iter()
        .position(|h| h == key)
        .ok_or_else(|| RosterError::MissingColumn {
            table: "right",
            column: key.to_string(),
        })?;

    let mut header = left_header.clone();
    // Output position for each right column.
    let mut right_targets = Vec::with_capacity(right_header.len());
    for name in &right_header {
        match header.iter().position(|h| h == name) {
            Some(pos) => right_targets.push(pos),
            None => {
                header.push(name.clone());
                right_targets.push(header.len() - 1);
            }
        }
    }

    let mut lookup: HashMap<String, usize> = HashMap::new();
    let mut duplicates = 0usize;
    for (idx, _) in right.data_rows() {
        let value = right.cell(idx, right_key);
        if value.is_blank() {
            continue;
        }
        if lookup.insert(value.as_text().trim().to_string(), idx).is_some() {
            duplicates += 1;
        }
    }

    let width = header.len();
    let mut rows = Vec::with_capacity(left.len());
    rows.push(header.iter().map(CellValue::text).collect());

    let mut matched = 0usize;
    for (idx, _) in left.data_rows() {
        let mut row: Vec<CellValue> = (0..width)
            .map(|col| {
                if col < left_header.len() {
                    left.cell(idx, col).clone()
                } else {
                    CellValue::Missing
                }
            })
            .collect();

        let key_value = left.cell(idx, left_key);
        if !key_value.is_blank() {
            if let Some(&right_idx) = lookup.get(key_value.as_text().trim()) {
                matched += 1;
                for (col, &target) in right_targets.iter().enumerate() {
                    row[target] = right.cell(right_idx, col).clone();
                }
            }
        }
        rows.push(row);
    }

    tracing::debug!(
        key,
        left_rows = left.data_row_count(),
        right_rows = right.data_row_count(),
        matched,
        duplicate_right_keys = duplicates,
        "left join complete"
    );

    Ok(Table::new(rows))
}
