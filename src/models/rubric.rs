//! 评分规则模型
//!
//! 规则是静态配置，不从数据推导。

use serde::{Deserialize, Serialize};

/// 单条规则的判定方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RubricRule {
    /// 文件存在即通过
    FileExists { path: String },
    /// 文件存在且内容包含 needle（不区分大小写）
    CodeSearch { file: String, needle: String },
}

impl RubricRule {
    /// 规则需要读取的文件路径
    pub fn path(&self) -> &str {
        match self {
            RubricRule::FileExists { path } => path,
            RubricRule::CodeSearch { file, .. } => file,
        }
    }
}

/// 一条带列名的检查项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// 结果列名
    pub label: String,
    /// 人类可读的说明
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub rule: RubricRule,
}

impl Check {
    pub fn file_exists(label: &str, description: &str, path: &str) -> Self {
        Self {
            label: label.to_string(),
            description: description.to_string(),
            rule: RubricRule::FileExists {
                path: path.to_string(),
            },
        }
    }

    pub fn code_search(label: &str, description: &str, file: &str, needle: &str) -> Self {
        Self {
            label: label.to_string(),
            description: description.to_string(),
            rule: RubricRule::CodeSearch {
                file: file.to_string(),
                needle: needle.to_string(),
            },
        }
    }
}

/// 评分配置
///
/// - `repo_names`: 候选仓库名，第一个为主名称，其余为其他拼写
/// - `basic_checks`: 与评分规则无关的固定检查
/// - `rubric`: 评分规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricConfig {
    pub repo_names: Vec<String>,
    #[serde(default)]
    pub basic_checks: Vec<Check>,
    #[serde(default)]
    pub rubric: Vec<Check>,
}

impl RubricConfig {
    /// 按顺序返回所有检查项（基础检查在前）
    pub fn checks(&self) -> impl Iterator<Item = &Check> {
        self.basic_checks.iter().chain(self.rubric.iter())
    }

    /// 需要抓取的文件路径列表
    ///
    /// 与检查项一一对应，不去重。
    pub fn file_paths(&self) -> Vec<String> {
        self.checks().map(|c| c.rule.path().to_string()).collect()
    }
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self {
            repo_names: vec![
                "wdd130".to_string(),
                "wdd-130".to_string(),
                "wdd130-site".to_string(),
            ],
            basic_checks: vec![
                Check::file_exists("Has index.html", "Home page exists", "index.html"),
                Check::file_exists("Has styles.css", "Stylesheet exists", "styles/styles.css"),
                Check::code_search(
                    "Has Viewport Meta",
                    "Home page declares a viewport",
                    "index.html",
                    "name=\"viewport\"",
                ),
                Check::code_search(
                    "Links Stylesheet",
                    "Home page links a stylesheet",
                    "index.html",
                    "<link",
                ),
            ],
            rubric: vec![
                Check::file_exists("Has About Page", "about.html exists", "about.html"),
                Check::file_exists("Has Contact Page", "contact.html exists", "contact.html"),
                Check::code_search("Has Nav", "Home page has a <nav>", "index.html", "<nav"),
                Check::code_search("Has Footer", "Home page has a <footer>", "index.html", "<footer"),
                Check::code_search(
                    "Uses Flexbox",
                    "Stylesheet uses flex layout",
                    "styles/styles.css",
                    "display: flex",
                ),
                Check::code_search(
                    "Uses space-evenly",
                    "Stylesheet distributes items with space-evenly",
                    "styles/styles.css",
                    "space-evenly",
                ),
            ],
        }
    }
}
