//! Field definitions and the rules that check a single cell.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::policy::{FlagPolicy, LENIENT_FLAG_VALUES, ValidationPolicy};
use crate::input::CellValue;

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").unwrap());

/// The check applied to every cell of a field.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Text must match a regular expression.
    Pattern {
        regex: Regex,
        expected: &'static str,
    },
    /// Integer within an inclusive range.
    IntegerRange { min: i64, max: i64 },
    /// Membership in a fixed set.
    OneOf {
        values: &'static [&'static str],
        case_insensitive: bool,
    },
    /// Boolean flag, matched per [`FlagPolicy`].
    Flag,
    /// Gender, matched per [`FlagPolicy`].
    Gender,
    /// State score, range per [`ScoreRange`](super::ScoreRange).
    Score,
    /// `YYYY-MM-DD` naming a real calendar day.
    CalendarDate,
    /// Number strictly greater than zero.
    PositiveNumber,
    /// Anything but blank.
    NonEmpty,
    /// No constraint.
    Any,
}

impl FieldRule {
    /// Check one cell, returning the expected-shape description on failure.
    pub fn check(&self, value: &CellValue, policy: &ValidationPolicy) -> Result<(), String> {
        let text = value.as_text();
        let text = text.trim();

        let ok = match self {
            FieldRule::Pattern { regex, .. } => regex.is_match(text),
            FieldRule::IntegerRange { min, max } => in_integer_range(text, *min, *max),
            FieldRule::OneOf {
                values,
                case_insensitive,
            } => values.iter().any(|v| {
                if *case_insensitive {
                    v.eq_ignore_ascii_case(text)
                } else {
                    *v == text
                }
            }),
            FieldRule::Flag => match policy.flags {
                FlagPolicy::Strict => text == "TRUE" || text == "FALSE",
                FlagPolicy::Lenient => is_lenient_flag(text),
            },
            FieldRule::Gender => match policy.flags {
                FlagPolicy::Strict => text == "Male" || text == "Female",
                FlagPolicy::Lenient => is_lenient_flag(text),
            },
            FieldRule::Score => {
                let (min, max) = policy.scores.bounds();
                in_integer_range(text, min, max)
            }
            FieldRule::CalendarDate => is_calendar_date(text),
            FieldRule::PositiveNumber => text
                .parse::<f64>()
                .map(|n| n.is_finite() && n > 0.0)
                .unwrap_or(false),
            FieldRule::NonEmpty => !text.is_empty(),
            FieldRule::Any => true,
        };

        if ok { Ok(()) } else { Err(self.expected(policy)) }
    }

    /// Human-readable description of what the rule accepts.
    pub fn expected(&self, policy: &ValidationPolicy) -> String {
        match self {
            FieldRule::Pattern { expected, .. } => expected.to_string(),
            FieldRule::IntegerRange { min, max } => {
                format!("an integer between {} and {}", min, max)
            }
            FieldRule::OneOf {
                values,
                case_insensitive,
            } => format!(
                "one of {}{}",
                values.join(", "),
                if *case_insensitive { " (any case)" } else { "" }
            ),
            FieldRule::Flag => match policy.flags {
                FlagPolicy::Strict => "TRUE or FALSE".to_string(),
                FlagPolicy::Lenient => format!("one of {} (any case)", LENIENT_FLAG_VALUES.join(", ")),
            },
            FieldRule::Gender => match policy.flags {
                FlagPolicy::Strict => "Male or Female".to_string(),
                FlagPolicy::Lenient => format!("one of {} (any case)", LENIENT_FLAG_VALUES.join(", ")),
            },
            FieldRule::Score => {
                let (min, max) = policy.scores.bounds();
                format!("an integer between {} and {}", min, max)
            }
            FieldRule::CalendarDate => "a real calendar date in YYYY-MM-DD format".to_string(),
            FieldRule::PositiveNumber => "a positive number".to_string(),
            FieldRule::NonEmpty => "a non-empty value".to_string(),
            FieldRule::Any => "any value".to_string(),
        }
    }
}

fn is_lenient_flag(text: &str) -> bool {
    LENIENT_FLAG_VALUES.iter().any(|v| v.eq_ignore_ascii_case(text))
}

/// Integral value within `[min, max]`. `"8"` and `"8.0"` both count as 8.
fn in_integer_range(text: &str, min: i64, max: i64) -> bool {
    if text.is_empty() {
        return false;
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 => n >= min as f64 && n <= max as f64,
        _ => false,
    }
}

/// `YYYY-MM-DD` whose components survive a round trip through a real date.
fn is_calendar_date(text: &str) -> bool {
    let Some(caps) = ISO_DATE.captures(text) else {
        return false;
    };
    let (Ok(year), Ok(month), Ok(day)) = (
        caps[1].parse::<i32>(),
        caps[2].parse::<u32>(),
        caps[3].parse::<u32>(),
    ) else {
        return false;
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.year() == year && date.month() == month && date.day() == day)
        .unwrap_or(false)
}

/// A named field of a schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Exact, case-sensitive header name.
    pub name: &'static str,
    /// Per-cell rule.
    pub rule: FieldRule,
    /// Maximum number of distinct values before an aggregate error.
    pub cardinality_limit: Option<usize>,
}

impl FieldSpec {
    /// Create a field with a rule and no cardinality tracking.
    pub fn new(name: &'static str, rule: FieldRule) -> Self {
        Self {
            name,
            rule,
            cardinality_limit: None,
        }
    }

    /// Track distinct values and flag more than `limit`.
    pub fn with_cardinality_limit(mut self, limit: usize) -> Self {
        self.cardinality_limit = Some(limit);
        self
    }

    /// Check one cell, producing a message that names the field and value.
    pub fn check(&self, value: &CellValue, policy: &ValidationPolicy) -> Result<(), String> {
        self.rule.check(value, policy).map_err(|expected| {
            format!(
                "Invalid {}: \"{}\" (expected {})",
                self.name,
                value.as_text().trim(),
                expected
            )
        })
    }
}
