//! 输出行与列定义
//!
//! 每个花名册条目恰好一行，按花名册顺序输出。

use crate::models::probe::EvaluationOutcome;
use crate::models::rubric::RubricConfig;
use serde::Serialize;

pub const STATUS_NOT_SUBMITTED: &str = "Not Submitted";
pub const STATUS_SUBMITTED: &str = "Submitted";
pub const NOTE_NO_SUBMISSION: &str = "No submission found";

/// 检查项之前的固定列
const LEADING_COLUMNS: [&str; 9] = [
    "Student Name",
    "Student ID",
    "GitHub Username",
    "Submission Status",
    "Submission URL",
    "Repo Found",
    "Repo URL",
    "Alt Repo Found",
    "Alt Repo URL",
];

/// 检查项之后的固定列
const TRAILING_COLUMNS: [&str; 2] = ["Submitted At", "Notes"];

/// 单元格
///
/// 布尔值保持为布尔，由表格层决定显示为 "Yes"/"No"。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Flag(bool),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Flag(b)
    }
}

/// 一个学生的输出行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentRow {
    pub name: String,
    pub id: u64,
    /// 从提交中提取的候选用户名（可能为空）
    pub raw_handle: String,
    /// 平台确认后的规范用户名
    pub canonical_handle: Option<String>,
    pub status: String,
    pub submission_url: String,
    /// RFC 3339，缺失时为空
    pub submitted_at: String,
    pub outcome: Option<EvaluationOutcome>,
    pub notes: String,
}

impl StudentRow {
    /// 显示用的用户名：优先规范拼写
    pub fn display_handle(&self) -> &str {
        self.canonical_handle.as_deref().unwrap_or(&self.raw_handle)
    }

    /// 追加备注
    pub fn add_note(&mut self, note: impl AsRef<str>) {
        if !self.notes.is_empty() {
            self.notes.push_str("; ");
        }
        self.notes.push_str(note.as_ref());
    }

    /// 按列顺序展开为单元格
    pub fn cells(&self, rubric: &RubricConfig) -> Vec<Cell> {
        let primary = self.outcome.as_ref().map(|o| &o.primary);
        let alternative = self.outcome.as_ref().and_then(|o| o.alternative.as_ref());

        let mut cells: Vec<Cell> = vec![
            self.name.as_str().into(),
            Cell::Text(self.id.to_string()),
            self.display_handle().into(),
            self.status.as_str().into(),
            self.submission_url.as_str().into(),
            primary.map(|p| p.exists).unwrap_or(false).into(),
            primary.map(|p| p.url.as_str()).unwrap_or("").into(),
            alternative.map(|a| a.exists).unwrap_or(false).into(),
            alternative.map(|a| a.url.as_str()).unwrap_or("").into(),
        ];

        for check in rubric.checks() {
            cells.push(primary.map(|p| p.verdict(&check.label)).unwrap_or(false).into());
        }

        cells.push(self.submitted_at.as_str().into());
        cells.push(self.notes.as_str().into());
        cells
    }
}

/// 表头
pub fn header(rubric: &RubricConfig) -> Vec<String> {
    LEADING_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(rubric.checks().map(|c| c.label.clone()))
        .chain(TRAILING_COLUMNS.iter().map(|c| c.to_string()))
        .collect()
}
