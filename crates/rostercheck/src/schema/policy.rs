//! Matching policies for the fields whose accepted values are contested.
//!
//! Boolean flags, gender and state scores have two plausible readings. Callers
//! pick one explicitly through [`ValidationPolicy`]; the default is the strict
//! reading.

use serde::{Deserialize, Serialize};

/// How boolean flag columns and `gender` are matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagPolicy {
    /// Flags must be exactly `TRUE` or `FALSE`; gender exactly `Male` or `Female`.
    #[default]
    Strict,
    /// Flags and gender accept `true`, `false`, `1`, `0`, `yes`, `no`, `male`
    /// or `female` in any case.
    Lenient,
}

/// Accepted range for the six state score columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRange {
    /// Integers in 650..=800.
    #[default]
    Narrow,
    /// Integers in 0..=10000.
    Wide,
}

impl ScoreRange {
    /// Inclusive bounds for this range.
    pub fn bounds(&self) -> (i64, i64) {
        match self {
            ScoreRange::Narrow => (650, 800),
            ScoreRange::Wide => (0, 10_000),
        }
    }
}

/// Values accepted by the lenient flag policy, compared case-insensitively.
pub const LENIENT_FLAG_VALUES: &[&str] = &["true", "false", "1", "0", "yes", "no", "male", "female"];

/// Policy choices applied to a validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Flag and gender matching.
    pub flags: FlagPolicy,
    /// Score column range.
    pub scores: ScoreRange,
}

impl ValidationPolicy {
    /// Strict flags and narrow scores.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Lenient flags and wide scores.
    pub fn lenient() -> Self {
        Self {
            flags: FlagPolicy::Lenient,
            scores: ScoreRange::Wide,
        }
    }

    /// Set the flag policy.
    pub fn with_flags(mut self, flags: FlagPolicy) -> Self {
        self.flags = flags;
        self
    }

    /// Set the score range.
    pub fn with_scores(mut self, scores: ScoreRange) -> Self {
        self.scores = scores;
        self
    }
}
