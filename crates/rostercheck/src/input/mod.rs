//! Input parsing and data source handling.

mod loader;
mod parser;
mod records;
mod sheet;
mod source;

pub use loader::{load_bytes, load_file};
pub use parser::{Parser, ParserConfig, detect_delimiter};
pub use records::{parse_records, table_from_records};
pub use sheet::{parse_spreadsheet, table_from_sheet_rows};
pub use source::{CellValue, SourceKind, SourceMetadata, Table};
