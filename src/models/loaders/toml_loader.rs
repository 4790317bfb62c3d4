use crate::error::ConfigError;
use crate::models::rubric::RubricConfig;
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载评分配置
pub async fn load_rubric_config(path: &Path) -> Result<RubricConfig, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidRubric {
        path: path.display().to_string(),
        reason,
    };

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| invalid(format!("无法读取: {}", e)))?;

    let config: RubricConfig =
        toml::from_str(&content).map_err(|e| invalid(format!("无法解析: {}", e)))?;

    if config.repo_names.is_empty() {
        return Err(invalid("repo_names 不能为空".to_string()));
    }

    tracing::info!(
        "成功加载评分配置: {} 个候选仓库, {} 条基础检查, {} 条评分规则",
        config.repo_names.len(),
        config.basic_checks.len(),
        config.rubric.len()
    );

    Ok(config)
}
