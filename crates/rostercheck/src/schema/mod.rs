//! Schema registry: the student and session record schemas.

mod field;
mod policy;
mod registry;

pub use field::{FieldRule, FieldSpec};
pub use policy::{FlagPolicy, LENIENT_FLAG_VALUES, ScoreRange, ValidationPolicy};
pub use registry::{STUDENT_FLAG_FIELDS, STUDENT_SCORE_FIELDS, Schema, SchemaKind};
