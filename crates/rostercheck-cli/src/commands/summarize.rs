//! Summarize command - row totals and column completion as JSON.

use std::path::PathBuf;

use colored::Colorize;
use rostercheck::{SchemaKind, summarize};

use super::load;
use crate::cli::ParserArgs;

pub fn run(
    file: PathBuf,
    kind: SchemaKind,
    output: Option<PathBuf>,
    uuid: bool,
    parser: ParserArgs,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = load(&file, &parser.config()?)?;

    let mut summary = summarize(&table, kind);
    if uuid {
        summary = summary.with_uuid();
    }

    match output {
        Some(path) => {
            summary.save(&path)?;
            eprintln!(
                "{} {} ({} rows)",
                "Summary written to".green().bold(),
                path.display().to_string().white(),
                summary.total_rows
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}
