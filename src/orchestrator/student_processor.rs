//! 单个学生处理器 - 编排层
//!
//! 执行一个学生的检查流程并把结果写回该行；任何错误都只影响这一行。

use crate::clients::GitHubApi;
use crate::models::StudentRow;
use crate::utils::logging::truncate_text;
use crate::workflow::{RepoCheckFlow, StudentCtx};
use tracing::{error, info};

/// 单个学生的处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentStatus {
    /// 流程正常结束（包括账号或仓库不存在）
    Checked,
    /// 流程出错，错误已写入备注
    Failed,
}

/// 处理单个学生
///
/// # 参数
/// - `flow`: 检查流程（复用）
/// - `ctx`: 上下文（用于日志）
/// - `row`: 要写回的输出行
pub async fn process_student<G: GitHubApi>(
    flow: &RepoCheckFlow<'_, G>,
    ctx: &StudentCtx,
    row: &mut StudentRow,
) -> StudentStatus {
    info!("{} 🔍 开始检查", ctx);

    match flow.run(ctx).await {
        Ok(result) => {
            result.apply_to(row);
            StudentStatus::Checked
        }
        Err(e) => {
            error!("{} ❌ 检查失败: {}", ctx, truncate_text(&e.to_string(), 200));
            row.add_note(format!("Error: {}", e));
            StudentStatus::Failed
        }
    }
}
