//! Fuzz target for row validation of arbitrary delimited input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rostercheck::{RosterCheck, SchemaKind, input::Parser};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(table) = Parser::new().parse_bytes(data) else {
        return;
    };
    let checker = RosterCheck::new();
    for kind in [SchemaKind::Student, SchemaKind::Session] {
        let _ = checker.check_table(&table, kind);
    }
});
