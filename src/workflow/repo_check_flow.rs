//! 仓库检查流程 - 流程层
//!
//! 核心职责：定义"一个学生"的完整检查流程
//!
//! 流程顺序：
//! 1. 确认账号，取得规范用户名
//! 2. 一次聚合查询探测所有候选仓库与文件
//! 3. 评分，得到主仓库 / 备选仓库结果

use crate::clients::GitHubApi;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{EvaluationOutcome, StudentRow};
use crate::services::{BatchQuery, IdentityLookup, IdentityResolver, RubricEvaluator};
use crate::workflow::student_ctx::StudentCtx;
use tracing::{debug, info, warn};

pub const NOTE_USER_NOT_FOUND: &str = "GitHub user not found";
pub const NOTE_REPO_NOT_FOUND: &str = "Repository not found";

/// 单个学生的检查结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// 账号存在并完成了评分
    Checked {
        canonical: String,
        outcome: EvaluationOutcome,
    },
    /// 平台确认账号不存在
    UserNotFound,
    /// 账号查询失败
    LookupFailed(String),
}

impl CheckResult {
    /// 写入输出行
    pub fn apply_to(self, row: &mut StudentRow) {
        match self {
            CheckResult::Checked { canonical, outcome } => {
                if !outcome.primary.exists {
                    row.add_note(NOTE_REPO_NOT_FOUND);
                }
                row.canonical_handle = Some(canonical);
                row.outcome = Some(outcome);
            }
            CheckResult::UserNotFound => row.add_note(NOTE_USER_NOT_FOUND),
            CheckResult::LookupFailed(reason) => {
                row.add_note(format!("GitHub lookup failed: {}", reason))
            }
        }
    }
}

/// 仓库检查流程
///
/// - 不持有任何资源，只借用客户端与配置
/// - 只处理单个学生，不出现 Vec<StudentRow>
pub struct RepoCheckFlow<'a, G> {
    github: &'a G,
    config: &'a Config,
    file_paths: Vec<String>,
}

impl<'a, G: GitHubApi> RepoCheckFlow<'a, G> {
    pub fn new(github: &'a G, config: &'a Config) -> Self {
        Self {
            github,
            config,
            file_paths: config.rubric.file_paths(),
        }
    }

    pub async fn run(&self, ctx: &StudentCtx) -> Result<CheckResult, AppError> {
        // ========== 步骤 1: 确认账号 ==========
        let canonical = match IdentityResolver::new(self.github).resolve(&ctx.handle).await {
            IdentityLookup::Found(login) => login,
            IdentityLookup::NotFound => {
                warn!("{} ⚠️ 账号不存在", ctx);
                return Ok(CheckResult::UserNotFound);
            }
            IdentityLookup::Failed(reason) => {
                warn!("{} ⚠️ 账号查询失败: {}", ctx, reason);
                return Ok(CheckResult::LookupFailed(reason));
            }
        };

        // ========== 步骤 2: 聚合查询 ==========
        let query = BatchQuery::build(&canonical, &self.config.rubric.repo_names, &self.file_paths);
        debug!(
            "{} 聚合查询: {} 个仓库 × {} 个文件",
            ctx,
            query.repos().len(),
            query.files().len()
        );

        let response = self.github.run_query(query.text(), query.variables()).await?;
        let snapshots = query.decode(&response)?;

        // ========== 步骤 3: 评分 ==========
        let outcome = RubricEvaluator::new(&self.config.rubric).evaluate(&snapshots);

        if outcome.primary.exists {
            info!(
                "{} ✓ 找到仓库 {}{}",
                ctx,
                outcome.primary.name,
                outcome
                    .alternative
                    .as_ref()
                    .map(|a| format!("（另有 {}）", a.name))
                    .unwrap_or_default()
            );
        } else {
            info!("{} 未找到任何候选仓库", ctx);
        }

        Ok(CheckResult::Checked { canonical, outcome })
    }
}
