//! 批量处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责凭据、客户端与整批学生的调度。
//!
//! ## 核心功能
//!
//! 1. **凭据检查**：在任何网络请求之前读取两个令牌
//! 2. **数据准备**：读取花名册与两份作业提交，合并为输出行
//! 3. **顺序处理**：逐个学生执行检查，学生之间固定等待
//! 4. **错误隔离**：单个学生出错只写入该行备注，不中断整批
//! 5. **全局统计**：汇总所有学生的处理结果

use crate::clients::{CanvasClient, GitHubApi, GitHubClient, LmsApi};
use crate::config::Config;
use crate::error::AppError;
use crate::models::row::header;
use crate::models::{load_rubric_config, StudentRow};
use crate::orchestrator::student_processor::{process_student, StudentStatus};
use crate::secrets::{require_secret, SecretStore};
use crate::services::{JsonSheetWriter, ResultSink, SubmissionMerger, UsernameExtractor};
use crate::utils::logging;
use crate::workflow::{RepoCheckFlow, StudentCtx};
use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub checked: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// 应用主结构
pub struct App<S> {
    config: Config,
    secrets: S,
}

impl<S: SecretStore> App<S> {
    /// 初始化应用
    pub async fn initialize(mut config: Config, secrets: S) -> Result<Self> {
        logging::log_startup(&config);

        if let Some(path) = config.rubric_file.clone() {
            info!("📁 正在加载评分规则: {}", path);
            config.rubric = load_rubric_config(Path::new(&path)).await?;
        }

        Ok(Self { config, secrets })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<BatchStats> {
        // 两个令牌都在第一次网络请求之前读取
        let lms_token = require_secret(&self.secrets, &self.config.lms_token_secret)?;
        let github_token = require_secret(&self.secrets, &self.config.github_token_secret)?;

        let lms = CanvasClient::new(&self.config, lms_token)?;
        let github = GitHubClient::new(&self.config, github_token)?;
        let mut sink = JsonSheetWriter::new(&self.config.output_file);

        let stats = run_pipeline(&self.config, &lms, &github, &mut sink).await?;

        logging::print_final_stats(&stats, &self.config.output_file);
        Ok(stats)
    }
}

/// 完整流程：读取数据 → 合并 → 逐个检查
///
/// 花名册、提交记录与结果表的错误会终止整批；单个学生的错误不会。
pub async fn run_pipeline<L, G, K>(
    config: &Config,
    lms: &L,
    github: &G,
    sink: &mut K,
) -> Result<BatchStats, AppError>
where
    L: LmsApi,
    G: GitHubApi,
    K: ResultSink,
{
    let extractor = UsernameExtractor::from_config(config)?;

    info!("📋 正在读取课程 {} 的花名册...", config.course_id);
    let roster = lms.fetch_roster(&config.course_id).await?;

    let primary = lms
        .fetch_submissions(&config.course_id, &config.primary_assignment_id)
        .await?;
    let fallback = if config.fallback_assignment_id.is_empty() {
        Vec::new()
    } else {
        lms.fetch_submissions(&config.course_id, &config.fallback_assignment_id)
            .await?
    };

    let mut rows = SubmissionMerger::new(&extractor).merge(&roster, &primary, &fallback);
    logging::log_roster_loaded(
        rows.len(),
        rows.iter().filter(|r| !r.raw_handle.is_empty()).count(),
    );

    sink.replace_rows(
        header(&config.rubric),
        rows.iter().map(|r| r.cells(&config.rubric)).collect(),
    )?;

    run_batch(config, github, &mut rows, sink).await
}

/// 顺序检查所有有用户名的行
///
/// 相邻两次检查之间等待 `request_delay_ms`，以免触发平台限流；跳过的行不等待。
pub async fn run_batch<G, K>(
    config: &Config,
    github: &G,
    rows: &mut [StudentRow],
    sink: &mut K,
) -> Result<BatchStats, AppError>
where
    G: GitHubApi,
    K: ResultSink,
{
    let flow = RepoCheckFlow::new(github, config);
    let delay = Duration::from_millis(config.request_delay_ms);
    let total = rows.len();
    let mut stats = BatchStats {
        total,
        ..Default::default()
    };
    let mut checked_any = false;

    for (index, row) in rows.iter_mut().enumerate() {
        if row.raw_handle.is_empty() {
            info!("[学生 {}/{} {}] 没有用户名，跳过", index + 1, total, row.name);
            stats.skipped += 1;
            continue;
        }

        if checked_any && !delay.is_zero() {
            sleep(delay).await;
        }
        checked_any = true;

        let ctx = StudentCtx::new(index + 1, total, row.name.clone(), row.raw_handle.clone());

        match process_student(&flow, &ctx, row).await {
            StudentStatus::Checked => stats.checked += 1,
            StudentStatus::Failed => stats.failed += 1,
        }

        sink.update_row(index, row.cells(&config.rubric))?;
    }

    if stats.failed > 0 {
        warn!("⚠️ {} 个学生检查失败，详见表格备注", stats.failed);
    }

    Ok(stats)
}
