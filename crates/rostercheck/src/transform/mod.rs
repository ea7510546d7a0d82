//! Cross-table operations: joins, per-student aggregation and score gains.

mod dosage;
mod gains;
mod merge;

pub use dosage::{
    DosageMetrics, FULL_DOSAGE_HOURS, TOTAL_HOURS_COLUMN, attach_hours, dosage_metrics,
    student_hours, tutoring_hours,
};
pub use gains::{GAIN_SUBJECTS, attach_score_gains};
pub use merge::left_join;
