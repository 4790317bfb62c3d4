//! # Repo Rubric Check
//!
//! 核对学习管理平台的学生与代码托管平台的账号，并按评分规则检查每个学生仓库中的文件。
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 与外部平台交互，`LmsApi` / `GitHubApi` 为接口
//!
//! ### ② 业务能力层（Services）
//! - `UsernameExtractor` - 从提交中提取用户名
//! - `IdentityResolver` - 确认账号并取得规范拼写
//! - `BatchQuery` - 构建与解析聚合查询
//! - `RubricEvaluator` - 按规则评分
//! - `SubmissionMerger` - 合并花名册与提交记录
//! - `ResultSink` - 写结果表
//!
//! ### ③ 流程层（Workflow）
//! - `RepoCheckFlow` - 一个学生的完整检查流程
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 整批调度与统计
//! - `orchestrator/student_processor` - 单个学生的错误隔离
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod secrets;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Check, RubricConfig, RubricRule, StudentRow};
pub use orchestrator::{run_batch, run_pipeline, App, BatchStats};
pub use secrets::{EnvSecretStore, MapSecretStore, SecretStore};
pub use workflow::{CheckResult, RepoCheckFlow, StudentCtx};
