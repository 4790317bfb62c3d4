pub mod batch_query;
pub mod identity_resolver;
pub mod result_sink;
pub mod rubric_evaluator;
pub mod submission_merger;
pub mod username_extractor;

pub use batch_query::{BatchQuery, ProjectSnapshot};
pub use identity_resolver::{IdentityLookup, IdentityResolver};
pub use result_sink::{JsonSheetWriter, ResultSink, SheetTable};
pub use rubric_evaluator::RubricEvaluator;
pub use submission_merger::SubmissionMerger;
pub use username_extractor::UsernameExtractor;
