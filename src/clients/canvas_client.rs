/// 学习管理平台 API 客户端
///
/// 封装花名册与提交记录的读取，自动跟随分页
use crate::clients::LmsApi;
use crate::config::Config;
use crate::error::RemoteError;
use crate::models::{RosterEntry, SubmissionRecord};
use reqwest::header::LINK;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const PER_PAGE: usize = 100;

/// 学习管理平台客户端
pub struct CanvasClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl CanvasClient {
    /// 创建新的客户端
    pub fn new(config: &Config, token: String) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RemoteError::request_failed(&config.lms_api_base_url, e))?;

        Ok(Self {
            http,
            base_url: config.lms_api_base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// 逐页读取列表接口
    async fn get_paginated<T: DeserializeOwned>(&self, first_url: String) -> Result<Vec<T>, RemoteError> {
        let mut items = Vec::new();
        let mut next = Some(first_url);

        while let Some(url) = next.take() {
            debug!("GET {}", url);

            let resp = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(|e| RemoteError::request_failed(&url, e))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(RemoteError::BadStatus {
                    endpoint: url,
                    status: status.as_u16(),
                    body,
                });
            }

            next = resp
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_page_url);

            let page: Vec<T> = resp
                .json()
                .await
                .map_err(|e| RemoteError::decode_failed(&url, e))?;
            items.extend(page);
        }

        Ok(items)
    }
}

impl LmsApi for CanvasClient {
    async fn fetch_roster(&self, course_id: &str) -> Result<Vec<RosterEntry>, RemoteError> {
        let url = format!(
            "{}/api/v1/courses/{}/users?enrollment_type[]=student&per_page={}",
            self.base_url, course_id, PER_PAGE
        );
        self.get_paginated(url).await
    }

    async fn fetch_submissions(
        &self,
        course_id: &str,
        assignment_id: &str,
    ) -> Result<Vec<SubmissionRecord>, RemoteError> {
        let url = format!(
            "{}/api/v1/courses/{}/assignments/{}/submissions?per_page={}",
            self.base_url, course_id, assignment_id, PER_PAGE
        );
        self.get_paginated(url).await
    }
}

/// 从 `Link` 头中取出 `rel="next"` 的地址
fn next_page_url(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| p.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
