//! Delimited-text parser with optional delimiter detection.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::source::{CellValue, Table};
use crate::error::{Result, RosterError};

/// Candidates for delimiter sniffing.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Lines sampled by [`detect_delimiter`].
const SAMPLE_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Honour quoted cells via the csv reader instead of a plain split.
    pub quoting: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: Some(b','),
            quoting: false,
        }
    }
}

impl ParserConfig {
    /// Settings to use for a file at `path`.
    ///
    /// A `.tsv` file read with the default comma delimiter is split on tabs
    /// instead. An explicit non-comma delimiter or auto-detection is kept.
    pub fn for_path(&self, path: &Path) -> ParserConfig {
        let is_tsv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));

        if is_tsv && self.delimiter == Some(b',') {
            ParserConfig {
                delimiter: Some(b'\t'),
                ..self.clone()
            }
        } else {
            self.clone()
        }
    }
}

/// Parses delimited text into a [`Table`].
///
/// The default mode is a plain split: lines on newline, cells on the
/// delimiter. Delimiters embedded in quoted cells are not recognised in that
/// mode; enable [`ParserConfig::quoting`] when the input needs it.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse delimited text.
    pub fn parse_str(&self, text: &str) -> Result<Table> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(text.as_bytes())?,
        };

        let table = if self.config.quoting {
            parse_quoted(text.as_bytes(), delimiter)?
        } else {
            parse_naive(text, delimiter as char)
        };

        if table.is_empty() {
            return Err(RosterError::EmptyInput("No rows found".to_string()));
        }

        tracing::debug!(
            rows = table.len(),
            delimiter = %(delimiter as char).escape_default(),
            quoting = self.config.quoting,
            "parsed delimited text"
        );
        Ok(table)
    }

    /// Parse raw bytes, which must be UTF-8 (a leading BOM is ignored).
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let text = std::str::from_utf8(bytes).map_err(|e| RosterError::Parse {
            row: line_of_offset(bytes, e.valid_up_to()),
            message: format!("invalid UTF-8: {}", e),
        })?;
        self.parse_str(text.trim_start_matches('\u{feff}'))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Split lines and cells, dropping lines that are blank after trimming.
fn parse_naive(text: &str, delimiter: char) -> Table {
    let rows = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(delimiter).map(CellValue::text).collect())
        .collect();
    Table::new(rows)
}

/// Quote-aware parsing through the csv reader, with the same trimming and
/// blank-row rules as the plain split.
fn parse_quoted(bytes: &[u8], delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(CellValue::text).collect());
    }
    Ok(Table::new(rows))
}

fn line_of_offset(bytes: &[u8], offset: usize) -> usize {
    bytes[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Guess the delimiter from the first non-blank lines.
///
/// A candidate seen the same number of times on every sampled line beats one
/// whose count varies. Ties go to the higher count, then to tab. Falls back to
/// comma when no candidate appears at all.
pub fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let sample: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SAMPLE_LINES)
        .collect();

    if sample.is_empty() {
        return Err(RosterError::EmptyInput("No lines to sniff".to_string()));
    }

    let best = DELIMITERS
        .iter()
        .filter_map(|&delimiter| {
            let counts: Vec<usize> = sample
                .iter()
                .map(|line| unquoted_count(line, delimiter as char))
                .collect();
            let fewest = *counts.iter().min()?;
            let most = *counts.iter().max()?;
            (most > 0).then_some(((fewest == most, fewest, most, delimiter == b'\t'), delimiter))
        })
        .max_by_key(|(rank, _)| *rank)
        .map(|(_, delimiter)| delimiter);

    Ok(best.unwrap_or(b','))
}

/// Occurrences of `delimiter` outside double quotes.
fn unquoted_count(line: &str, delimiter: char) -> usize {
    line.chars()
        .scan(false, |quoted, ch| {
            if ch == '"' {
                *quoted = !*quoted;
            }
            Some(!*quoted && ch == delimiter)
        })
        .filter(|&hit| hit)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter(b"a,b,c\n1,2,3\n4,5,6").unwrap(), b',');
        assert_eq!(detect_delimiter(b"a\tb\tc\n1\t2\t3").unwrap(), b'\t');
        assert_eq!(detect_delimiter(b"a|b\n\"x|y\"|z\n").unwrap(), b'|');
        assert_eq!(detect_delimiter(b"single\ncolumn\n").unwrap(), b',');
    }

    #[test]
    fn test_steady_delimiter_beats_frequent_one() {
        // Commas vary from line to line; semicolons do not.
        let data = b"name;note\nAl;a,b,c\nBo;d\n";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let parser = Parser::new();
        let table = parser
            .parse_str(" name , age \r\nAlice, 30\n\n   \nBob,25\n")
            .unwrap();

        assert_eq!(table.header(), vec!["name", "age"]);
        assert_eq!(table.data_row_count(), 2);
        assert_eq!(table.cell(1, 1), &CellValue::text("30"));
        assert_eq!(table.cell(2, 0), &CellValue::text("Bob"));
    }

    #[test]
    fn test_naive_split_ignores_quotes() {
        let parser = Parser::new();
        let table = parser.parse_str("a,b\n\"x,y\",z\n").unwrap();

        // The quoted comma splits the cell: a documented limitation.
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn test_quoting_mode_keeps_embedded_delimiters() {
        let parser = Parser::with_config(ParserConfig {
            delimiter: Some(b','),
            quoting: true,
        });
        let table = parser.parse_str("a,b\n\"x,y\", z \n,\n").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 0), &CellValue::text("x,y"));
        assert_eq!(table.cell(1, 1), &CellValue::text("z"));
    }

    #[test]
    fn test_auto_detect_in_parser() {
        let parser = Parser::with_config(ParserConfig {
            delimiter: None,
            quoting: false,
        });
        let table = parser.parse_str("a;b;c\n1;2;3\n").unwrap();
        assert_eq!(table.header(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_input() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_str("\n  \n"),
            Err(RosterError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_tsv_path_defaults_to_tab() {
        let config = ParserConfig::default();
        assert_eq!(config.for_path(Path::new("sessions.tsv")).delimiter, Some(b'\t'));
        assert_eq!(config.for_path(Path::new("SESSIONS.TSV")).delimiter, Some(b'\t'));
        assert_eq!(config.for_path(Path::new("sessions.csv")).delimiter, Some(b','));
        assert_eq!(config.for_path(Path::new("sessions.txt")).delimiter, Some(b','));

        let semicolon = ParserConfig {
            delimiter: Some(b';'),
            quoting: true,
        };
        assert_eq!(semicolon.for_path(Path::new("sessions.tsv")), semicolon);

        let sniff = ParserConfig {
            delimiter: None,
            quoting: false,
        };
        assert_eq!(sniff.for_path(Path::new("sessions.tsv")).delimiter, None);
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let parser = Parser::new();
        let err = parser.parse_bytes(b"a,b\n1,\xff\n").unwrap_err();
        assert!(matches!(err, RosterError::Parse { row: 2, .. }));
    }
}
