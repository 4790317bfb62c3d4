//! 聚合查询构建与解析
//!
//! 一次请求同时探测 N 个候选仓库与每个仓库中的 M 个文件。
//! `repo<i>` / `file<j>` 别名只在构建与解析时出现，业务层按仓库名与文件路径访问。

use crate::error::QueryError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt::Write;

/// 仓库槽位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlot {
    pub alias: String,
    pub name: String,
}

/// 文件槽位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSlot {
    pub alias: String,
    pub path: String,
}

/// 抓取到的文件
///
/// 在快照中出现即表示文件存在；`text` 为空表示不是文本（二进制或目录）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub text: Option<String>,
}

/// 单个仓库的快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSnapshot {
    pub name: String,
    pub url: String,
    files: HashMap<String, FileContent>,
}

impl ProjectSnapshot {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            files: HashMap::new(),
        }
    }

    /// 添加文件（测试与解析共用）
    pub fn with_file(mut self, path: impl Into<String>, text: Option<&str>) -> Self {
        self.files.insert(
            path.into(),
            FileContent {
                text: text.map(str::to_string),
            },
        );
        self
    }

    pub fn file(&self, path: &str) -> Option<&FileContent> {
        self.files.get(path)
    }
}

/// 聚合查询
#[derive(Debug, Clone)]
pub struct BatchQuery {
    owner: String,
    repos: Vec<RepoSlot>,
    files: Vec<FileSlot>,
    /// 路径 → 第一个出现该路径的文件槽位下标
    first_slot: HashMap<String, usize>,
    text: String,
}

impl BatchQuery {
    /// 构建查询，保持仓库与文件的原始顺序
    ///
    /// 重复的文件路径仍会出现在请求中，解析时以第一次出现为准。
    pub fn build(owner: &str, repo_names: &[String], file_paths: &[String]) -> Self {
        let repos: Vec<RepoSlot> = repo_names
            .iter()
            .enumerate()
            .map(|(i, name)| RepoSlot {
                alias: format!("repo{}", i),
                name: name.clone(),
            })
            .collect();

        let files: Vec<FileSlot> = file_paths
            .iter()
            .enumerate()
            .map(|(j, path)| FileSlot {
                alias: format!("file{}", j),
                path: path.clone(),
            })
            .collect();

        let mut first_slot = HashMap::new();
        for (j, slot) in files.iter().enumerate() {
            first_slot.entry(slot.path.clone()).or_insert(j);
        }

        let text = render_query(&repos, &files);

        Self {
            owner: owner.to_string(),
            repos,
            files,
            first_slot,
            text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn variables(&self) -> Value {
        json!({ "owner": self.owner })
    }

    pub fn repos(&self) -> &[RepoSlot] {
        &self.repos
    }

    pub fn files(&self) -> &[FileSlot] {
        &self.files
    }

    /// 解析响应，按候选顺序返回每个仓库的快照（不存在为 `None`）
    pub fn decode(&self, response: &Value) -> Result<Vec<Option<ProjectSnapshot>>, QueryError> {
        let data = match response.get("data") {
            Some(data) if data.is_object() => data,
            _ => {
                let errors = response
                    .get("errors")
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "无".to_string());
                return Err(QueryError::MissingData { errors });
            }
        };

        self.repos
            .iter()
            .map(|slot| match data.get(&slot.alias) {
                None | Some(Value::Null) => Ok(None),
                Some(repo) => self.decode_repo(slot, repo).map(Some),
            })
            .collect()
    }

    fn decode_repo(&self, slot: &RepoSlot, repo: &Value) -> Result<ProjectSnapshot, QueryError> {
        let url = repo
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| QueryError::MalformedSlot {
                alias: slot.alias.clone(),
                reason: "缺少 url".to_string(),
            })?;

        let mut snapshot = ProjectSnapshot::new(&slot.name, url);
        for (path, &j) in &self.first_slot {
            match repo.get(&self.files[j].alias) {
                None | Some(Value::Null) => {}
                Some(object) => {
                    let text = object.get("text").and_then(Value::as_str);
                    snapshot = snapshot.with_file(path.clone(), text);
                }
            }
        }

        Ok(snapshot)
    }
}

fn render_query(repos: &[RepoSlot], files: &[FileSlot]) -> String {
    let mut out = String::from("query($owner: String!) {\n");
    for repo in repos {
        let _ = writeln!(
            out,
            "  {}: repository(owner: $owner, name: {}) {{\n    url",
            repo.alias,
            quote(&repo.name)
        );
        for file in files {
            let _ = writeln!(
                out,
                "    {}: object(expression: {}) {{ ... on Blob {{ text }} }}",
                file.alias,
                quote(&format!("HEAD:{}", file.path))
            );
        }
        out.push_str("  }\n");
    }
    out.push('}');
    out
}

/// GraphQL 字符串字面量（与 JSON 转义规则兼容）
fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}
