//! Header conformance and row validation.

mod engine;
mod headers;
mod report;

pub use engine::RowValidator;
pub use headers::{HeaderCheck, check_headers};
pub use report::{AggregateError, RowError, ValidationReport};
