//! 账号确认服务
//!
//! 只负责"这个用户名是否真实存在、规范拼写是什么"，从不向调用方抛错。

use crate::clients::GitHubApi;
use tracing::{debug, warn};

/// 账号查询结果
///
/// `NotFound` 与 `Failed` 在下游处理上相同，但保留区分以便记录原因。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityLookup {
    /// 账号存在，携带平台保存的规范拼写
    Found(String),
    /// 平台确认账号不存在
    NotFound,
    /// 查询失败（网络错误或非成功状态）
    Failed(String),
}

impl IdentityLookup {
    pub fn canonical(&self) -> Option<&str> {
        match self {
            IdentityLookup::Found(login) => Some(login),
            _ => None,
        }
    }
}

/// 账号确认服务
pub struct IdentityResolver<'a, G> {
    github: &'a G,
}

impl<'a, G: GitHubApi> IdentityResolver<'a, G> {
    pub fn new(github: &'a G) -> Self {
        Self { github }
    }

    /// 查询一次账号接口，不重试
    pub async fn resolve(&self, handle: &str) -> IdentityLookup {
        match self.github.lookup_user(handle).await {
            Ok(Some(login)) => {
                debug!("账号 {} 的规范拼写: {}", handle, login);
                IdentityLookup::Found(login)
            }
            Ok(None) => IdentityLookup::NotFound,
            Err(e) if e.is_not_found() => IdentityLookup::NotFound,
            Err(e) => {
                warn!("账号 {} 查询失败: {}", handle, e);
                IdentityLookup::Failed(e.to_string())
            }
        }
    }
}
