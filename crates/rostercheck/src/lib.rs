//! rostercheck: conformance checks for student rosters and tutoring-session logs.
//!
//! Tables are loaded from delimited text, the first sheet of a workbook, or a
//! JSON array of flat records, then checked against one of two fixed schemas.
//! Structural problems (missing headers, no data rows) are errors; bad cell
//! values and over-varied categorical columns are collected in a
//! [`ValidationReport`].
//!
//! # Example
//!
//! ```no_run
//! use rostercheck::{RosterCheck, SchemaKind};
//!
//! let checker = RosterCheck::new();
//! let outcome = checker.check_file("sessions.csv", SchemaKind::Session, |_| {}).unwrap();
//!
//! for message in outcome.report.messages() {
//!     println!("{}", message);
//! }
//! println!("Rows: {}", outcome.summary.total_rows);
//! ```

pub mod error;
pub mod input;
pub mod schema;
pub mod summary;
pub mod transform;
pub mod validation;

mod checker;

pub use crate::checker::{CheckOutcome, CheckerConfig, RosterCheck};
pub use error::{Result, RosterError};
pub use input::{CellValue, ParserConfig, SourceKind, SourceMetadata, Table};
pub use schema::{FlagPolicy, Schema, SchemaKind, ScoreRange, ValidationPolicy};
pub use summary::{ColumnCompletion, SummaryRecord, summarize};
pub use validation::{AggregateError, HeaderCheck, RowError, ValidationReport};
