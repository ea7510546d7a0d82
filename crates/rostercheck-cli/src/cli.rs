//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use rostercheck::{ParserConfig, SchemaKind};
use std::path::PathBuf;

/// rostercheck: validate student rosters and tutoring-session logs
#[derive(Parser)]
#[command(name = "rostercheck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a file against the student or session schema
    Validate {
        /// Path to the data file (CSV/TSV, XLSX/ODS, JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Schema to validate against (student or session)
        #[arg(short, long)]
        kind: SchemaKind,

        /// Accept true/false/1/0/yes/no in any case for flags and gender
        #[arg(long)]
        lenient_flags: bool,

        /// Accept state scores from 0 to 10000 instead of 650 to 800
        #[arg(long)]
        wide_scores: bool,

        #[command(flatten)]
        parser: ParserArgs,

        /// JSON configuration file; flags given here override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize row counts and column completion
    Summarize {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Schema the file follows (student or session)
        #[arg(short, long)]
        kind: SchemaKind,

        /// Write the summary here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Attach a random UUID to the summary
        #[arg(long)]
        uuid: bool,

        #[command(flatten)]
        parser: ParserArgs,
    },

    /// Left-join two tables on a key column
    Merge {
        /// Table whose rows are all kept
        #[arg(value_name = "LEFT")]
        left: PathBuf,

        /// Table joined onto the left one
        #[arg(value_name = "RIGHT")]
        right: PathBuf,

        /// Key column present in both tables
        #[arg(long, default_value = "student_id")]
        key: String,

        /// Output CSV path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        parser: ParserArgs,
    },

    /// Add total tutoring hours to a student table
    Dosage {
        /// Student table
        #[arg(value_name = "STUDENTS")]
        students: PathBuf,

        /// Session table
        #[arg(value_name = "SESSIONS")]
        sessions: PathBuf,

        /// Output CSV path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hours that count as full dosage
        #[arg(long, default_value_t = rostercheck::transform::FULL_DOSAGE_HOURS)]
        target_hours: f64,

        /// Also add ELA and math score gain columns
        #[arg(long)]
        gains: bool,

        #[command(flatten)]
        parser: ParserArgs,
    },
}

/// Delimited-text options shared by every subcommand that reads files.
#[derive(Args, Debug, Clone, Default)]
pub struct ParserArgs {
    /// Field delimiter for delimited text (default: comma, tab for .tsv)
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Honour quoted cells in delimited text
    #[arg(long)]
    pub quoted: bool,
}

impl ParserArgs {
    /// Apply these options on top of `base`.
    pub fn apply(&self, mut base: ParserConfig) -> Result<ParserConfig, String> {
        if let Some(c) = self.delimiter {
            if !c.is_ascii() {
                return Err(format!("Delimiter must be a single ASCII character, got '{}'", c));
            }
            base.delimiter = Some(c as u8);
        }
        if self.quoted {
            base.quoting = true;
        }
        Ok(base)
    }

    /// These options on top of the default parser settings.
    pub fn config(&self) -> Result<ParserConfig, String> {
        self.apply(ParserConfig::default())
    }
}
