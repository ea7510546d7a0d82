//! Dosage command - add total tutoring hours to each student.

use std::path::PathBuf;

use colored::Colorize;
use rostercheck::transform::{
    DosageMetrics, attach_hours, attach_score_gains, dosage_metrics, student_hours,
    tutoring_hours,
};

use super::{load, write_table};
use crate::cli::ParserArgs;

/// Output settings for the dosage command.
pub struct DosageOptions {
    pub output: Option<PathBuf>,
    pub target_hours: f64,
    pub gains: bool,
}

pub fn run(
    students: PathBuf,
    sessions: PathBuf,
    options: DosageOptions,
    parser: ParserArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !(options.target_hours.is_finite() && options.target_hours > 0.0) {
        return Err(format!("Target hours must be positive, got {}", options.target_hours).into());
    }

    let parser = parser.config()?;
    let student_table = load(&students, &parser)?;
    let session_table = load(&sessions, &parser)?;

    let hours = tutoring_hours(&session_table)?;
    if verbose {
        let total: f64 = hours.values().sum();
        eprintln!(
            "{} {:.2} hours across {} students",
            "Sessions:".cyan().bold(),
            total,
            hours.len()
        );
    }

    let mut table = attach_hours(&student_table, &hours)?;
    match dosage_metrics(&student_hours(&table)?, options.target_hours) {
        Some(metrics) => print_metrics(&metrics),
        None => eprintln!("{}", "No students to summarize".yellow()),
    }

    if options.gains {
        table = attach_score_gains(&table);
    }
    write_table(&table, options.output.as_ref())
}

/// Dosage distribution on stderr, keeping stdout for the CSV.
fn print_metrics(metrics: &DosageMetrics) {
    eprintln!(
        "{} {} students, target {} hours",
        "Dosage:".cyan().bold(),
        metrics.total_students,
        metrics.target_hours
    );
    eprintln!(
        "  mean {:.2}, median {:.2}, IQR {:.2} ({:.2} to {:.2}), Gini {:.3}",
        metrics.mean_hours,
        metrics.median_hours,
        metrics.iqr,
        metrics.q25,
        metrics.q75,
        metrics.gini
    );
    eprintln!(
        "  <25%: {:.1}%  25-50%: {:.1}%  50-75%: {:.1}%  75-99%: {:.1}%  {} {:.1}%",
        metrics.pct_below_25,
        metrics.pct_25_50,
        metrics.pct_50_75,
        metrics.pct_75_99,
        "full:".green(),
        metrics.pct_full_dosage
    );
}
