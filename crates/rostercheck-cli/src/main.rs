//! rostercheck CLI - conformance checks for student and session tables.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            file,
            kind,
            lenient_flags,
            wide_scores,
            parser,
            config,
            json,
        } => commands::validate::run(
            file,
            kind,
            commands::validate::Overrides {
                lenient_flags,
                wide_scores,
                parser,
                config,
            },
            json,
            cli.verbose,
        ),

        Commands::Summarize {
            file,
            kind,
            output,
            uuid,
            parser,
        } => commands::summarize::run(file, kind, output, uuid, parser, cli.verbose),

        Commands::Merge {
            left,
            right,
            key,
            output,
            parser,
        } => commands::merge::run(left, right, key, output, parser, cli.verbose),

        Commands::Dosage {
            students,
            sessions,
            output,
            target_hours,
            gains,
            parser,
        } => commands::dosage::run(
            students,
            sessions,
            commands::dosage::DosageOptions {
                output,
                target_hours,
                gains,
            },
            parser,
            cli.verbose,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `--verbose` selects debug.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
