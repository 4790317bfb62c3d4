//! 外部平台客户端
//!
//! `LmsApi` / `GitHubApi` 是流程层依赖的接口，生产实现走 HTTP，测试中可替换为内存实现。

pub mod canvas_client;
pub mod github_client;

pub use canvas_client::CanvasClient;
pub use github_client::GitHubClient;

use crate::error::RemoteError;
use crate::models::{RosterEntry, SubmissionRecord};
use serde_json::Value;

/// 学习管理平台接口
#[allow(async_fn_in_trait)]
pub trait LmsApi {
    /// 获取课程的学生名单
    async fn fetch_roster(&self, course_id: &str) -> Result<Vec<RosterEntry>, RemoteError>;

    /// 获取某个作业的全部提交记录
    async fn fetch_submissions(
        &self,
        course_id: &str,
        assignment_id: &str,
    ) -> Result<Vec<SubmissionRecord>, RemoteError>;
}

/// 代码托管平台接口
#[allow(async_fn_in_trait)]
pub trait GitHubApi {
    /// 查询账号，返回平台保存的规范拼写；账号不存在（404）时返回 `Ok(None)`
    async fn lookup_user(&self, handle: &str) -> Result<Option<String>, RemoteError>;

    /// 执行一次聚合查询，返回完整的响应 JSON
    async fn run_query(&self, query: &str, variables: Value) -> Result<Value, RemoteError>;
}
