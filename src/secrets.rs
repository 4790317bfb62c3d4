//! 凭据读取
//!
//! 令牌由外部密钥库按名称提供，在使用前读取。

use crate::error::ConfigError;
use std::collections::HashMap;

/// 密钥库
pub trait SecretStore {
    fn get(&self, name: &str) -> Option<String>;
}

/// 从环境变量读取
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// 内存中的密钥库
#[derive(Debug, Default, Clone)]
pub struct MapSecretStore {
    secrets: HashMap<String, String>,
}

impl MapSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

impl SecretStore for MapSecretStore {
    fn get(&self, name: &str) -> Option<String> {
        self.secrets.get(name).cloned()
    }
}

/// 读取必需的凭据，缺失或为空白时报配置错误
pub fn require_secret(store: &impl SecretStore, name: &str) -> Result<String, ConfigError> {
    store
        .get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingCredential {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_secret_present() {
        let store = MapSecretStore::new().with("GITHUB_TOKEN", " ghp_abc \n");
        assert_eq!(require_secret(&store, "GITHUB_TOKEN").unwrap(), "ghp_abc");
    }

    #[test]
    fn test_require_secret_missing_or_blank() {
        let store = MapSecretStore::new().with("CANVAS_API_TOKEN", "   ");

        let err = require_secret(&store, "CANVAS_API_TOKEN").unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { ref name } if name == "CANVAS_API_TOKEN"));

        assert!(require_secret(&store, "GITHUB_TOKEN").is_err());
    }
}
