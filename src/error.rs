use thiserror::Error;

/// 库内统一错误类型
#[derive(Debug, Error)]
pub enum ZhihuError {
    /// 问题链接格式不正确（构造期错误）
    #[error("问题链接不正确: {0}")]
    InvalidQuestionUrl(String),

    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 接口返回错误响应
    #[error("接口返回错误响应 ({endpoint}): r={code}, msg={message:?}")]
    BadResponse {
        endpoint: String,
        code: i64,
        message: Option<String>,
    },

    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    JsonParseFailed(#[from] serde_json::Error),

    /// 偏移量超过已知回答总数
    #[error("没有更多回答 (offset={offset}, 回答总数={total})")]
    NoMoreAnswers { offset: usize, total: usize },

    /// 页面中找不到 _xsrf 令牌
    #[error("页面中缺少 _xsrf 令牌: {0}")]
    MissingXsrf(String),

    /// HTTP 客户端初始化失败
    #[error("HTTP 客户端初始化失败: {0}")]
    ClientBuildFailed(#[source] reqwest::Error),

    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ConfigReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 解析配置文件失败
    #[error("解析配置文件失败 ({path}): {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 分页任务异常退出
    #[error("分页任务执行失败: {0}")]
    TaskFailed(String),
}

impl ZhihuError {
    /// 创建请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ZhihuError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }
}

impl From<tokio::task::JoinError> for ZhihuError {
    fn from(err: tokio::task::JoinError) -> Self {
        ZhihuError::TaskFailed(err.to_string())
    }
}

impl From<tokio::sync::AcquireError> for ZhihuError {
    fn from(err: tokio::sync::AcquireError) -> Self {
        ZhihuError::TaskFailed(err.to_string())
    }
}

/// 库结果类型
pub type ZhihuResult<T> = Result<T, ZhihuError>;
