pub mod loaders;
pub mod probe;
pub mod roster;
pub mod row;
pub mod rubric;

pub use loaders::load_rubric_config;
pub use probe::{EvaluationOutcome, ProjectProbe, Verdict};
pub use roster::{RosterEntry, SubmissionRecord};
pub use row::{Cell, StudentRow};
pub use rubric::{Check, RubricConfig, RubricRule};
