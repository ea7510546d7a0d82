//! Header conformance: does the header row carry every required field?

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::input::Table;
use crate::schema::Schema;

/// Result of comparing a header row with a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HeaderCheck {
    /// Every required field is present.
    Ok {
        /// Columns that are neither required nor optional; they are not
        /// validated.
        ignored: Vec<String>,
    },
    /// Required fields absent from the header, in schema declaration order.
    Missing { missing: Vec<String> },
}

impl HeaderCheck {
    /// True when no required field is missing.
    pub fn is_ok(&self) -> bool {
        matches!(self, HeaderCheck::Ok { .. })
    }
}

/// Compare the header row of `table` with `schema`.
///
/// Names are matched exactly after trimming. Extra columns never fail the
/// check.
pub fn check_headers(table: &Table, schema: &Schema) -> HeaderCheck {
    let header = table.header();
    let present: HashSet<&str> = header.iter().map(String::as_str).collect();

    let missing: Vec<String> = schema
        .fields
        .iter()
        .filter(|f| !present.contains(f.name))
        .map(|f| f.name.to_string())
        .collect();

    if !missing.is_empty() {
        tracing::debug!(kind = %schema.kind, ?missing, "required headers missing");
        return HeaderCheck::Missing { missing };
    }

    let mut seen = HashSet::new();
    let ignored = header
        .iter()
        .filter(|h| !h.is_empty() && !schema.is_known(h))
        .filter(|h| seen.insert(h.as_str()))
        .cloned()
        .collect();

    HeaderCheck::Ok { ignored }
}
