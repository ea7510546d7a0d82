//! Validate command - check a file against a schema.

use std::path::PathBuf;

use colored::Colorize;
use rostercheck::{
    CheckerConfig, FlagPolicy, RosterCheck, RosterError, SchemaKind, ScoreRange,
};

use crate::cli::ParserArgs;

/// Command-line settings that take precedence over the config file.
pub struct Overrides {
    pub lenient_flags: bool,
    pub wide_scores: bool,
    pub parser: ParserArgs,
    pub config: Option<PathBuf>,
}

impl Overrides {
    fn apply(self) -> Result<CheckerConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => CheckerConfig::load(path)?,
            None => CheckerConfig::default(),
        };

        if self.lenient_flags {
            config.policy.flags = FlagPolicy::Lenient;
        }
        if self.wide_scores {
            config.policy.scores = ScoreRange::Wide;
        }
        config.parser = self.parser.apply(config.parser)?;
        Ok(config)
    }
}

pub fn run(
    file: PathBuf,
    kind: SchemaKind,
    overrides: Overrides,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let checker = RosterCheck::with_config(overrides.apply()?);
    if !json_output {
        println!(
            "{} {} {}",
            "Validating".cyan().bold(),
            file.display().to_string().white(),
            format!("as {}", kind).dimmed()
        );
    }

    let outcome = match checker.check_file(&file, kind, |pct| {
        tracing::trace!(pct, "reading");
    }) {
        Ok(outcome) => outcome,
        Err(RosterError::MissingHeaders { kind, missing }) if !json_output => {
            println!("{}", format!("Missing {} headers:", kind).red().bold());
            for name in &missing {
                println!("  {} {}", "✗".red(), name);
            }
            return Err(format!("{} required headers missing", missing.len()).into());
        }
        Err(e) => return Err(e.into()),
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        let report = &outcome.report;

        if verbose {
            if let Some(source) = &outcome.source {
                println!(
                    "  {} rows, {} columns, {}",
                    source.row_count, source.column_count, source.hash
                );
            }
            for name in &outcome.ignored_columns {
                println!("  {} {}", "Ignoring column".dimmed(), name);
            }
        }

        for error in &report.row_errors {
            println!("{} {}", format!("Row {}:", error.row_number).yellow(), error.message);
        }
        for error in &report.aggregate_errors {
            println!("{} {}", "Aggregate:".magenta(), error.message);
        }

        println!();
        println!(
            "Checked {} rows ({} blank skipped)",
            report.rows_checked.to_string().white().bold(),
            report.rows_skipped
        );
        if report.is_valid() {
            println!("{}", "✓ No problems found".green().bold());
        } else {
            println!(
                "{} {} row errors in {} rows, {} aggregate errors",
                "✗".red().bold(),
                report.row_errors.len().to_string().red(),
                report.rows_with_errors().len(),
                report.aggregate_errors.len().to_string().red()
            );
        }
    }

    if outcome.is_valid() {
        Ok(())
    } else {
        Err(format!("{} problems found", outcome.report.error_count()).into())
    }
}
