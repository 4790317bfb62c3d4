//! 用户名提取服务
//!
//! 从提交的 URL 或正文中解析出候选用户名。

use crate::config::Config;
use crate::error::ConfigError;
use regex::Regex;

const MAX_HANDLE_LEN: usize = 39;

/// 用户名提取器
///
/// 规则按顺序尝试，第一个命中的规则决定结果：
/// 1. `https?://<handle>.<pages-host>`
/// 2. `<repo-host>/<handle>`
///
/// 命中后的片段若清洗后不合法，直接返回空串，不再尝试后续规则。
pub struct UsernameExtractor {
    patterns: Vec<Regex>,
    pages_url: Regex,
}

impl UsernameExtractor {
    pub fn new(pages_host: &str, repo_host: &str) -> Result<Self, ConfigError> {
        let pages = regex::escape(pages_host);
        let repo = regex::escape(repo_host);

        let patterns = vec![
            Regex::new(&format!(r"(?i)https?://([^./\s]+)\.{}", pages))?,
            Regex::new(&format!(r"(?i){}/([^/\s?#]+)", repo))?,
        ];
        let pages_url = Regex::new(&format!(
            r#"(?i)https?://[^\s"'<>/]+\.{}[^\s"'<>]*"#,
            pages
        ))?;

        Ok(Self {
            patterns,
            pages_url,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(&config.pages_host, &config.repo_host)
    }

    /// 提取用户名，失败返回空串
    pub fn extract(&self, text: &str) -> String {
        for pattern in &self.patterns {
            let Some(captured) = pattern.captures(text).and_then(|c| c.get(1)) else {
                continue;
            };

            let captured = captured.as_str();
            if captured.eq_ignore_ascii_case("www") {
                return String::new();
            }

            return sanitize_handle(captured).unwrap_or_default();
        }

        String::new()
    }

    /// 在自由文本中查找第一个 Pages 站点地址
    pub fn find_pages_url<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.pages_url.find(text).map(|m| m.as_str())
    }
}

/// 小写化并去掉 `[a-z0-9-]` 以外的字符，再校验长度与首尾连字符
fn sanitize_handle(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();

    let valid = (1..=MAX_HANDLE_LEN).contains(&cleaned.len())
        && !cleaned.starts_with('-')
        && !cleaned.ends_with('-');

    valid.then_some(cleaned)
}
