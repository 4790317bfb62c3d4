use serde::{Deserialize, Serialize};

/// 花名册条目（来自学习管理平台）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: u64,
    pub name: String,
}

/// 作业提交记录
///
/// 每个 (学生, 作业) 一条；字段均可能缺失。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub user_id: u64,
    #[serde(default)]
    pub workflow_state: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}
