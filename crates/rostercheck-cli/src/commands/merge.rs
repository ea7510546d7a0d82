//! Merge command - left-join two tables on a key column.

use std::path::PathBuf;

use rostercheck::transform::left_join;

use super::{load, write_table};
use crate::cli::ParserArgs;

pub fn run(
    left: PathBuf,
    right: PathBuf,
    key: String,
    output: Option<PathBuf>,
    parser: ParserArgs,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = parser.config()?;
    let left_table = load(&left, &parser)?;
    let right_table = load(&right, &parser)?;

    let merged = left_join(&left_table, &right_table, &key)?;
    write_table(&merged, output.as_ref())
}
