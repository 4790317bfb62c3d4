//! 仓库探测结果

use serde::Serialize;

/// 单条检查的判定
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub label: String,
    pub passed: bool,
}

/// 单个候选仓库的探测结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectProbe {
    /// 探测的仓库名
    pub name: String,
    pub exists: bool,
    pub url: String,
    /// 按检查顺序排列的判定
    pub verdicts: Vec<Verdict>,
}

impl ProjectProbe {
    /// 未找到的仓库
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 按列名查找判定，未知列名视为未通过
    pub fn verdict(&self, label: &str) -> bool {
        self.verdicts
            .iter()
            .find(|v| v.label == label)
            .map(|v| v.passed)
            .unwrap_or(false)
    }
}

/// 一个学生的评分结果
///
/// `primary` 总是存在（可能是未找到）；`alternative` 只保留最后一个额外命中的仓库。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationOutcome {
    pub primary: ProjectProbe,
    pub alternative: Option<ProjectProbe>,
}

impl EvaluationOutcome {
    pub fn not_found(primary_name: impl Into<String>) -> Self {
        Self {
            primary: ProjectProbe::missing(primary_name),
            alternative: None,
        }
    }
}
