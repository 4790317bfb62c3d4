/// 代码托管平台 API 客户端
///
/// 账号查询走 REST，仓库与文件探测走一次 GraphQL 聚合查询
use crate::clients::GitHubApi;
use crate::config::Config;
use crate::error::RemoteError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "repo-rubric-check";

/// 代码托管平台客户端
pub struct GitHubClient {
    http: reqwest::Client,
    api_base_url: String,
    graphql_url: String,
    token: String,
}

#[derive(Deserialize)]
struct UserResponse {
    login: String,
}

impl GitHubClient {
    /// 创建新的客户端
    pub fn new(config: &Config, token: String) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RemoteError::request_failed(&config.github_api_base_url, e))?;

        Ok(Self {
            http,
            api_base_url: config.github_api_base_url.trim_end_matches('/').to_string(),
            graphql_url: config.github_graphql_url.clone(),
            token,
        })
    }
}

impl GitHubApi for GitHubClient {
    async fn lookup_user(&self, handle: &str) -> Result<Option<String>, RemoteError> {
        let url = format!("{}/users/{}", self.api_base_url, handle);
        debug!("GET {}", url);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| RemoteError::request_failed(&url, e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::BadStatus {
                endpoint: url,
                status: status.as_u16(),
                body,
            });
        }

        let user: UserResponse = resp
            .json()
            .await
            .map_err(|e| RemoteError::decode_failed(&url, e))?;

        Ok(Some(user.login))
    }

    async fn run_query(&self, query: &str, variables: Value) -> Result<Value, RemoteError> {
        debug!("POST {} ({} 字节)", self.graphql_url, query.len());

        let resp = self
            .http
            .post(&self.graphql_url)
            .bearer_auth(&self.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| RemoteError::request_failed(&self.graphql_url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::BadStatus {
                endpoint: self.graphql_url.clone(),
                status: status.as_u16(),
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| RemoteError::decode_failed(&self.graphql_url, e))
    }
}
