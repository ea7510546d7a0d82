//! Reading source files from disk and dispatching to the right decoder.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::parser::{Parser, ParserConfig};
use super::records::parse_records;
use super::sheet::parse_spreadsheet;
use super::source::{SourceKind, SourceMetadata, Table};
use crate::error::{Result, RosterError};

/// Read size between progress reports.
const CHUNK_SIZE: usize = 64 * 1024;

/// Decode in-memory bytes of a known kind.
pub fn load_bytes(bytes: &[u8], kind: SourceKind, config: &ParserConfig) -> Result<Table> {
    match kind {
        SourceKind::Delimited => Parser::with_config(config.clone()).parse_bytes(bytes),
        SourceKind::Spreadsheet => parse_spreadsheet(bytes),
        SourceKind::Records => parse_records(bytes),
    }
}

/// Load a file, inferring its kind from the extension.
///
/// Delimited files go through [`ParserConfig::for_path`], so a `.tsv` file
/// is split on tabs unless another delimiter was configured.
///
/// `progress` receives the percentage of bytes read so far (0 to 100); the
/// last call is always 100, including for empty files.
pub fn load_file(
    path: impl AsRef<Path>,
    config: &ParserConfig,
    mut progress: impl FnMut(u8),
) -> Result<(Table, SourceMetadata)> {
    let path = path.as_ref();
    let kind = SourceKind::from_path(path)?;

    let mut file = File::open(path).map_err(|e| RosterError::io(path, e))?;
    let size_bytes = file.metadata().map_err(|e| RosterError::io(path, e))?.len();

    let mut contents = Vec::with_capacity(size_bytes as usize);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut hasher = Sha256::new();
    progress(0);
    loop {
        let n = file.read(&mut chunk).map_err(|e| RosterError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&chunk[..n]);
        contents.extend_from_slice(&chunk[..n]);
        if size_bytes > 0 {
            let pct = (contents.len() as u64 * 100 / size_bytes).min(100) as u8;
            if pct < 100 {
                progress(pct);
            }
        }
    }
    progress(100);

    let hash = format!("sha256:{:x}", hasher.finalize());
    let table = load_bytes(&contents, kind, &config.for_path(path))?;

    tracing::info!(
        file = %path.display(),
        %kind,
        rows = table.data_row_count(),
        columns = table.column_count(),
        "loaded source"
    );

    let metadata = SourceMetadata::new(path.to_path_buf(), hash, size_bytes, kind, &table);
    Ok((table, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(suffix: &str, content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_load_csv_reports_progress() {
        let file = create_test_file(".csv", b"student_id,tutor_id\n1,T1\n2,T2\n");
        let mut seen = Vec::new();
        let (table, meta) = load_file(file.path(), &ParserConfig::default(), |p| seen.push(p)).unwrap();

        assert_eq!(table.data_row_count(), 2);
        assert_eq!(meta.kind, SourceKind::Delimited);
        assert_eq!(meta.row_count, 2);
        assert_eq!(meta.column_count, 2);
        assert!(meta.hash.starts_with("sha256:"));
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_load_tsv_splits_on_tabs() {
        let file = create_test_file(".tsv", b"student_id\ttutor_id\n1\tT1\n2\tT2\n");
        let (table, meta) = load_file(file.path(), &ParserConfig::default(), |_| {}).unwrap();

        assert_eq!(meta.kind, SourceKind::Delimited);
        assert_eq!(table.header(), vec!["student_id", "tutor_id"]);
        assert_eq!(table.cell(2, 1).as_text(), "T2");
    }

    #[test]
    fn test_load_json_records() {
        let file = create_test_file(".json", br#"[{"a": "1"}, {"a": "2"}]"#);
        let (table, meta) = load_file(file.path(), &ParserConfig::default(), |_| {}).unwrap();

        assert_eq!(meta.kind, SourceKind::Records);
        assert_eq!(table.data_row_count(), 2);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = create_test_file(".pdf", b"%PDF");
        let err = load_file(file.path(), &ParserConfig::default(), |_| {}).unwrap_err();
        assert!(matches!(err, RosterError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_file("/nonexistent/roster.csv", &ParserConfig::default(), |_| {}).unwrap_err();
        assert!(matches!(err, RosterError::Io { .. }));
    }
}
