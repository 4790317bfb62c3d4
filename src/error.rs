use thiserror::Error;

/// 应用程序错误类型
///
/// 分两层：批次级错误（配置、花名册、提交记录）直接向上传播并终止运行；
/// 单个学生的错误由编排层捕获，写入该行的备注。
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 远程服务错误
    #[error("远程服务错误: {0}")]
    Remote(#[from] RemoteError),
    /// 聚合查询响应错误
    #[error("查询错误: {0}")]
    Query(#[from] QueryError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 密钥库中缺少凭据
    #[error("缺少凭据: {name}")]
    MissingCredential { name: String },
    /// 评分规则文件无法读取或解析
    #[error("评分规则文件无效 ({path}): {reason}")]
    InvalidRubric { path: String, reason: String },
    /// 正则表达式构建失败（主机名配置有误）
    #[error("无法构建用户名匹配规则: {0}")]
    Pattern(#[from] regex::Error),
}

/// 远程服务错误
#[derive(Debug, Error)]
pub enum RemoteError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 返回非成功状态码
    #[error("返回错误状态 ({endpoint}): HTTP {status}: {body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 响应解析失败
    #[error("响应解析失败 ({endpoint}): {reason}")]
    DecodeFailed { endpoint: String, reason: String },
}

/// 聚合查询响应错误
#[derive(Debug, Error)]
pub enum QueryError {
    /// 响应中没有 data 字段
    #[error("响应缺少 data 字段: {errors}")]
    MissingData { errors: String },
    /// 某个槽位的结构不符合预期
    #[error("槽位 {alias} 结构异常: {reason}")]
    MalformedSlot { alias: String, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 序列化失败
    #[error("序列化失败 ({path}): {source}")]
    SerializeFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// ========== 便捷构造函数 ==========

impl RemoteError {
    /// 创建网络请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        RemoteError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建响应解析失败错误
    pub fn decode_failed(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        RemoteError::DecodeFailed {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// 是否为确认不存在（404）
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::BadStatus { status: 404, .. })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
