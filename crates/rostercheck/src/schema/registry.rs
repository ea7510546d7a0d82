//! The two fixed record schemas: student and session.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::field::{FieldRule, FieldSpec};

// ASCII digits only; `\d` would also admit other Unicode decimal digits.
static TEN_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static SEVEN_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{7}$").unwrap());
static SIX_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").unwrap());
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Boolean flag columns of the student schema.
pub const STUDENT_FLAG_FIELDS: &[&str] = &[
    "ell",
    "iep",
    "gifted_flag",
    "homeless_flag",
    "disability",
    "economic_disadvantage",
];

/// State score columns of the student schema.
pub const STUDENT_SCORE_FIELDS: &[&str] = &[
    "ela_state_score_two_years_ago",
    "ela_state_score_one_year_ago",
    "ela_state_score_current_year",
    "math_state_score_two_years_ago",
    "math_state_score_one_year_ago",
    "math_state_score_current_year",
];

/// Which of the two record schemas a table claims to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// One row per student with demographics and state scores.
    Student,
    /// One row per tutoring session.
    Session,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Student => write!(f, "student"),
            SchemaKind::Session => write!(f, "session"),
        }
    }
}

impl FromStr for SchemaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" | "students" => Ok(SchemaKind::Student),
            "session" | "sessions" | "provider" => Ok(SchemaKind::Session),
            _ => Err(format!("Unknown schema: {}. Use student or session.", s)),
        }
    }
}

/// An ordered set of required fields plus recognised optional columns.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Which schema this is.
    pub kind: SchemaKind,
    /// Required fields in declaration order.
    pub fields: Vec<FieldSpec>,
    /// Columns that are understood but not required.
    pub optional: Vec<&'static str>,
}

impl Schema {
    /// Build the schema for a kind.
    pub fn for_kind(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::Student => Self::student(),
            SchemaKind::Session => Self::session(),
        }
    }

    /// The student schema.
    pub fn student() -> Self {
        let mut fields = vec![
            FieldSpec::new(
                "student_id",
                FieldRule::Pattern {
                    regex: TEN_DIGITS.clone(),
                    expected: "exactly 10 digits",
                },
            ),
            FieldSpec::new(
                "district_id",
                FieldRule::Pattern {
                    regex: SEVEN_DIGITS.clone(),
                    expected: "exactly 7 digits",
                },
            ),
            FieldSpec::new("district_name", FieldRule::Any),
            FieldSpec::new(
                "school_id",
                FieldRule::Pattern {
                    regex: SIX_DIGITS.clone(),
                    expected: "exactly 6 digits",
                },
            ),
            FieldSpec::new("school_name", FieldRule::Any),
            FieldSpec::new("current_grade_level", FieldRule::IntegerRange { min: 0, max: 12 }),
            FieldSpec::new("gender", FieldRule::Gender),
            FieldSpec::new("ethnicity", FieldRule::Any).with_cardinality_limit(10),
        ];
        fields.extend(
            ["ell", "iep", "gifted_flag", "homeless_flag"]
                .into_iter()
                .map(|name| FieldSpec::new(name, FieldRule::Flag)),
        );
        fields.extend(
            STUDENT_SCORE_FIELDS
                .iter()
                .map(|&name| FieldSpec::new(name, FieldRule::Score)),
        );
        fields.extend([
            FieldSpec::new("performance_level_prior_year", FieldRule::Any).with_cardinality_limit(6),
            FieldSpec::new("performance_level_current_year", FieldRule::Any).with_cardinality_limit(6),
            FieldSpec::new("disability", FieldRule::Flag),
            FieldSpec::new("economic_disadvantage", FieldRule::Flag),
        ]);

        Self {
            kind: SchemaKind::Student,
            fields,
            optional: vec!["performance_level_two_years_ago"],
        }
    }

    /// The tutoring session schema.
    pub fn session() -> Self {
        Self {
            kind: SchemaKind::Session,
            fields: vec![
                FieldSpec::new(
                    "student_id",
                    FieldRule::Pattern {
                        regex: DIGITS.clone(),
                        expected: "one or more digits",
                    },
                ),
                FieldSpec::new(
                    "session_topic",
                    FieldRule::OneOf {
                        values: &["math", "ela"],
                        case_insensitive: true,
                    },
                ),
                FieldSpec::new("session_date", FieldRule::CalendarDate),
                FieldSpec::new("session_duration", FieldRule::PositiveNumber),
                FieldSpec::new("tutor_id", FieldRule::NonEmpty),
            ],
            optional: vec!["session_ratio"],
        }
    }

    /// Required field names in declaration order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Look up a required field.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// True for required and optional columns alike.
    pub fn is_known(&self, name: &str) -> bool {
        self.get(name).is_some() || self.optional.iter().any(|o| *o == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::CellValue;
    use crate::schema::ValidationPolicy;

    #[test]
    fn test_student_field_order() {
        let schema = Schema::student();
        let names = schema.field_names();

        assert_eq!(names.len(), 22);
        assert_eq!(names[0], "student_id");
        assert_eq!(names[7], "ethnicity");
        assert_eq!(names[8], "ell");
        assert_eq!(names[12], "ela_state_score_two_years_ago");
        assert_eq!(names[18], "performance_level_prior_year");
        assert_eq!(names[21], "economic_disadvantage");
        for flag in STUDENT_FLAG_FIELDS {
            assert!(matches!(schema.get(flag).unwrap().rule, FieldRule::Flag));
        }
    }

    #[test]
    fn test_cardinality_limits() {
        let schema = Schema::student();
        assert_eq!(schema.get("ethnicity").unwrap().cardinality_limit, Some(10));
        assert_eq!(
            schema.get("performance_level_prior_year").unwrap().cardinality_limit,
            Some(6)
        );
        assert_eq!(schema.get("gender").unwrap().cardinality_limit, None);
    }

    #[test]
    fn test_session_schema() {
        let schema = Schema::session();
        assert_eq!(
            schema.field_names(),
            vec!["student_id", "session_topic", "session_date", "session_duration", "tutor_id"]
        );
        assert!(schema.is_known("session_ratio"));
        assert!(!schema.is_known("notes"));
    }

    #[test]
    fn test_id_patterns_reject_non_ascii_digits() {
        let policy = ValidationPolicy::default();
        let student = Schema::student();
        let session = Schema::session();

        let id = student.get("student_id").unwrap();
        assert!(id.check(&CellValue::text("1234567890"), &policy).is_ok());
        assert!(id.check(&CellValue::text("١٢٣٤٥٦٧٨٩٠"), &policy).is_err());
        assert!(
            student
                .get("district_id")
                .unwrap()
                .check(&CellValue::text("١٢٣٤٥٦٧"), &policy)
                .is_err()
        );
        assert!(
            student
                .get("school_id")
                .unwrap()
                .check(&CellValue::text("１２３４５６"), &policy)
                .is_err()
        );

        let session_id = session.get("student_id").unwrap();
        assert!(session_id.check(&CellValue::text("123"), &policy).is_ok());
        assert!(session_id.check(&CellValue::text("١٢٣"), &policy).is_err());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Student".parse::<SchemaKind>().unwrap(), SchemaKind::Student);
        assert_eq!("sessions".parse::<SchemaKind>().unwrap(), SchemaKind::Session);
        assert!("tutor".parse::<SchemaKind>().is_err());
    }
}
