//! JSON record-array ingestion.

use serde_json::Value;

use super::source::{CellValue, Table};
use crate::error::{Result, RosterError};

/// Parse a JSON array of flat objects.
///
/// The first record's keys, in insertion order, become the header. Every
/// later record is projected onto those keys; keys it lacks become
/// [`CellValue::Missing`] and keys the first record lacks are dropped.
pub fn parse_records(bytes: &[u8]) -> Result<Table> {
    let value: Value = serde_json::from_slice(bytes)?;
    let records = match value {
        Value::Array(items) => items,
        other => {
            return Err(RosterError::Parse {
                row: 0,
                message: format!("expected a JSON array of records, found {}", json_kind(&other)),
            });
        }
    };
    table_from_records(&records)
}

/// Project already-decoded records onto a table.
pub fn table_from_records(records: &[Value]) -> Result<Table> {
    let first = records
        .first()
        .ok_or_else(|| RosterError::EmptyInput("Record array has no records".to_string()))?;

    let keys: Vec<String> = as_object(first, 0)?.keys().cloned().collect();

    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(keys.iter().map(CellValue::text).collect());

    for (idx, record) in records.iter().enumerate() {
        let object = as_object(record, idx)?;
        let row = keys
            .iter()
            .map(|key| object.get(key).map(cell_from_json).unwrap_or(CellValue::Missing))
            .collect();
        rows.push(row);
    }

    Ok(Table::new(rows))
}

fn as_object(value: &Value, idx: usize) -> Result<&serde_json::Map<String, Value>> {
    value.as_object().ok_or_else(|| RosterError::Parse {
        row: idx + 1,
        message: format!("record {} is {}, expected an object", idx + 1, json_kind(value)),
    })
}

fn cell_from_json(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(*b),
        Value::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::text(n.to_string())),
        Value::String(s) => CellValue::text(s),
        nested => CellValue::Text(nested.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
