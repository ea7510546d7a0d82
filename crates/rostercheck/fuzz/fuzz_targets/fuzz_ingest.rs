//! Fuzz target for ingestion.
//!
//! Every decoder must return a table or an error for arbitrary bytes,
//! never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rostercheck::input::load_bytes;
use rostercheck::{ParserConfig, SourceKind};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let configs = [
        ParserConfig::default(),
        ParserConfig { delimiter: None, quoting: false },
        ParserConfig { delimiter: Some(b'\t'), quoting: true },
    ];
    for config in &configs {
        let _ = load_bytes(data, SourceKind::Delimited, config);
    }
    let _ = load_bytes(data, SourceKind::Records, &ParserConfig::default());
    let _ = load_bytes(data, SourceKind::Spreadsheet, &ParserConfig::default());
});
