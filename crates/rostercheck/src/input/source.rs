//! Data source abstraction and metadata.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

/// Declared kind of an input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Line-oriented delimited text (CSV and friends).
    Delimited,
    /// Spreadsheet workbook; only the first sheet is read.
    Spreadsheet,
    /// JSON array of flat objects.
    Records,
}

impl SourceKind {
    /// Infer the source kind from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "tsv" | "txt" => Ok(SourceKind::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceKind::Spreadsheet),
            "json" => Ok(SourceKind::Records),
            "" => Err(RosterError::UnsupportedFormat(format!(
                "'{}' has no file extension",
                path.display()
            ))),
            other => Err(RosterError::UnsupportedFormat(format!(
                ".{} (expected csv, xlsx, xls, ods or json)",
                other
            ))),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Delimited => write!(f, "delimited"),
            SourceKind::Spreadsheet => write!(f, "spreadsheet"),
            SourceKind::Records => write!(f, "records"),
        }
    }
}

/// Metadata about a loaded source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// How the file was decoded.
    pub kind: SourceKind,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of header columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(path: PathBuf, hash: String, size_bytes: u64, kind: SourceKind, table: &Table) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            kind,
            row_count: table.data_row_count(),
            column_count: table.column_count(),
            loaded_at: Utc::now(),
        }
    }
}

/// A single cell as delivered by the source format.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// String content.
    Text(String),
    /// Numeric content (spreadsheet numbers, JSON numbers).
    Number(f64),
    /// Boolean content (spreadsheet or JSON booleans).
    Bool(bool),
    /// An explicit null.
    Null,
    /// No cell at all: a short row or an absent record key.
    Missing,
}

impl CellValue {
    /// Build a text cell, trimming surrounding whitespace.
    pub fn text(value: impl AsRef<str>) -> Self {
        CellValue::Text(value.as_ref().trim().to_string())
    }

    /// Render the cell the way validators see it.
    ///
    /// Integral numbers drop the fractional part (`700.0` renders as `700`),
    /// booleans render as spreadsheet display text and null/missing cells as
    /// the empty string.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::Null | CellValue::Missing => String::new(),
        }
    }

    /// True for null, missing, and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Null | CellValue::Missing => true,
            CellValue::Number(_) | CellValue::Bool(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

static MISSING: CellValue = CellValue::Missing;

/// A normalized rectangular-ish table. Row 0 is the header row.
///
/// Rows may be shorter than the header; absent trailing cells read as
/// [`CellValue::Missing`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// All rows, header first.
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create a table from raw rows (row 0 is the header).
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build a table from a header and string data rows.
    pub fn from_strings<S: AsRef<str>>(header: &[S], data: &[Vec<S>]) -> Self {
        let mut rows = Vec::with_capacity(data.len() + 1);
        rows.push(header.iter().map(CellValue::text).collect());
        for row in data {
            rows.push(row.iter().map(CellValue::text).collect());
        }
        Self { rows }
    }

    /// Total rows including the header.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there is not even a header row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header field names, trimmed.
    pub fn header(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|r| r.iter().map(|c| c.as_text().trim().to_string()).collect())
            .unwrap_or_default()
    }

    /// Number of header columns.
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Number of rows after the header.
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Data rows paired with their table index (header is index 0).
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[CellValue])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, row)| (idx, row.as_slice()))
    }

    /// Position of the first header cell equal to `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header().iter().position(|h| h == name)
    }

    /// Get a cell, reading past the end of a short row as missing.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&MISSING)
    }

    /// Every row rendered as text, short rows padded with empty cells to
    /// the header width. Rows longer than the header keep their extra cells.
    pub fn padded_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        let width = self.column_count();
        self.rows.iter().map(move |row| {
            (0..width.max(row.len()))
                .map(|i| row.get(i).map(CellValue::as_text).unwrap_or_default())
                .collect()
        })
    }

    /// Render as naive delimited text, one line per row.
    ///
    /// This is the inverse of the naive delimited parser: cells containing
    /// the delimiter are written as is and will not survive re-ingestion.
    pub fn to_delimited(&self, delimiter: char) -> String {
        let separator = delimiter.to_string();
        let mut out = String::new();
        for cells in self.padded_rows() {
            out.push_str(&cells.join(&separator));
            out.push('\n');
        }
        out
    }
}
