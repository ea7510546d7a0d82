//! Main RosterCheck struct and public API.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::input::{ParserConfig, SourceMetadata, Table, load_file};
use crate::schema::{Schema, SchemaKind, ValidationPolicy};
use crate::summary::{SummaryRecord, summarize};
use crate::validation::{HeaderCheck, RowValidator, ValidationReport, check_headers};

/// Configuration for a check run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// How delimited text is split.
    pub parser: ParserConfig,
    /// Flag and score matching.
    pub policy: ValidationPolicy,
    /// Attach a fresh UUID to every summary.
    pub summary_uuid: bool,
}

impl CheckerConfig {
    /// Load a configuration from a JSON file. Absent keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| RosterError::io(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            RosterError::Config(format!("Failed to parse '{}': {}", path.display(), e))
        })
    }
}

/// Everything produced by checking one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Where the table came from, when it was loaded from a file.
    pub source: Option<SourceMetadata>,
    /// Header columns that are neither required nor optional.
    pub ignored_columns: Vec<String>,
    /// Row and aggregate findings.
    pub report: ValidationReport,
    /// Completion summary.
    pub summary: SummaryRecord,
}

impl CheckOutcome {
    /// True when neither row nor aggregate errors were found.
    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }
}

/// Checks student and session tables against their schemas.
#[derive(Debug, Clone, Default)]
pub struct RosterCheck {
    config: CheckerConfig,
}

impl RosterCheck {
    /// Create a checker with the default (strict) configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a checker with a custom configuration.
    pub fn with_config(config: CheckerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check an in-memory table.
    ///
    /// Missing required headers abort the check with
    /// [`RosterError::MissingHeaders`]; otherwise every row is validated and
    /// the table summarized.
    pub fn check_table(&self, table: &Table, kind: SchemaKind) -> Result<CheckOutcome> {
        let schema = Schema::for_kind(kind);

        let ignored_columns = match check_headers(table, &schema) {
            HeaderCheck::Ok { ignored } => ignored,
            HeaderCheck::Missing { missing } => {
                return Err(RosterError::MissingHeaders { kind, missing });
            }
        };
        if !ignored_columns.is_empty() {
            tracing::info!(%kind, columns = ?ignored_columns, "ignoring unknown columns");
        }

        let report = RowValidator::new(&schema, self.config.policy).validate(table)?;

        let mut summary = summarize(table, kind);
        if self.config.summary_uuid {
            summary = summary.with_uuid();
        }

        Ok(CheckOutcome {
            source: None,
            ignored_columns,
            report,
            summary,
        })
    }

    /// Load a file and check it.
    ///
    /// `progress` receives the read percentage as the file is loaded.
    pub fn check_file(
        &self,
        path: impl AsRef<Path>,
        kind: SchemaKind,
        progress: impl FnMut(u8),
    ) -> Result<CheckOutcome> {
        let (table, source) = load_file(path, &self.config.parser, progress)?;
        let mut outcome = self.check_table(&table, kind)?;
        outcome.source = Some(source);
        Ok(outcome)
    }
}
