pub mod repo_check_flow;
pub mod student_ctx;

pub use repo_check_flow::{CheckResult, RepoCheckFlow};
pub use student_ctx::StudentCtx;
