use crate::models::RubricConfig;

/// 程序配置
///
/// 显式传入各层，不使用全局状态。
#[derive(Clone, Debug)]
pub struct Config {
    // --- 学习管理平台 ---
    /// 课程ID
    pub course_id: String,
    /// 主作业ID
    pub primary_assignment_id: String,
    /// 备用作业ID（主作业中找不到用户名时使用）
    pub fallback_assignment_id: String,
    pub lms_api_base_url: String,
    // --- 代码托管平台 ---
    pub github_api_base_url: String,
    pub github_graphql_url: String,
    /// Pages 站点域名，如 `github.io`
    pub pages_host: String,
    /// 仓库站点域名，如 `github.com`
    pub repo_host: String,
    // --- 凭据（密钥库中的名称） ---
    pub lms_token_secret: String,
    pub github_token_secret: String,
    // --- 运行参数 ---
    /// 每个学生之间的等待时间（毫秒）
    pub request_delay_ms: u64,
    /// 结果表输出路径
    pub output_file: String,
    /// 评分规则文件（为空则使用内置规则）
    pub rubric_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    pub rubric: RubricConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            course_id: String::new(),
            primary_assignment_id: String::new(),
            fallback_assignment_id: String::new(),
            lms_api_base_url: "https://byui.instructure.com".to_string(),
            github_api_base_url: "https://api.github.com".to_string(),
            github_graphql_url: "https://api.github.com/graphql".to_string(),
            pages_host: "github.io".to_string(),
            repo_host: "github.com".to_string(),
            lms_token_secret: "CANVAS_API_TOKEN".to_string(),
            github_token_secret: "GITHUB_TOKEN".to_string(),
            request_delay_ms: 500,
            output_file: "rubric_results.json".to_string(),
            rubric_file: None,
            verbose_logging: false,
            rubric: RubricConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            course_id: std::env::var("COURSE_ID").unwrap_or(default.course_id),
            primary_assignment_id: std::env::var("PRIMARY_ASSIGNMENT_ID").unwrap_or(default.primary_assignment_id),
            fallback_assignment_id: std::env::var("FALLBACK_ASSIGNMENT_ID").unwrap_or(default.fallback_assignment_id),
            lms_api_base_url: std::env::var("LMS_API_BASE_URL").unwrap_or(default.lms_api_base_url),
            github_api_base_url: std::env::var("GITHUB_API_BASE_URL").unwrap_or(default.github_api_base_url),
            github_graphql_url: std::env::var("GITHUB_GRAPHQL_URL").unwrap_or(default.github_graphql_url),
            pages_host: std::env::var("PAGES_HOST").unwrap_or(default.pages_host),
            repo_host: std::env::var("REPO_HOST").unwrap_or(default.repo_host),
            lms_token_secret: std::env::var("LMS_TOKEN_SECRET").unwrap_or(default.lms_token_secret),
            github_token_secret: std::env::var("GITHUB_TOKEN_SECRET").unwrap_or(default.github_token_secret),
            request_delay_ms: std::env::var("REQUEST_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_delay_ms),
            output_file: std::env::var("OUTPUT_FILE").unwrap_or(default.output_file),
            rubric_file: std::env::var("RUBRIC_FILE").ok().filter(|v| !v.is_empty()).or(default.rubric_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            rubric: default.rubric,
        }
    }
}
