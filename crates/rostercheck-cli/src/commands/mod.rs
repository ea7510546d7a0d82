//! CLI command implementations.

pub mod dosage;
pub mod merge;
pub mod summarize;
pub mod validate;

use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;
use rostercheck::input::load_file;
use rostercheck::{ParserConfig, Table};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Load a table with the given parser settings, logging read progress.
fn load(path: &Path, parser: &ParserConfig) -> Result<Table, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    let (table, source) = load_file(path, parser, |pct| {
        tracing::trace!(file = %path.display(), pct, "reading");
    })?;
    tracing::debug!(file = %source.file, hash = %source.hash, "loaded");
    Ok(table)
}

/// Write a table as CSV to `output`, or to stdout when no path is given.
fn write_table(table: &Table, output: Option<&PathBuf>) -> CommandResult {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };

    // Rows longer than the header keep their extra cells.
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(sink);
    for record in table.padded_rows() {
        writer.write_record(&record)?;
    }
    writer.flush()?;

    if let Some(path) = output {
        eprintln!(
            "{} {} rows to {}",
            "Wrote".green().bold(),
            table.data_row_count(),
            path.display().to_string().white()
        );
    }
    Ok(())
}
