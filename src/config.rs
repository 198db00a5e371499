use crate::error::{ZhihuError, ZhihuResult};
use serde::Deserialize;
use std::path::Path;

/// 知乎单页（以及每次"更多"）返回的回答数量
pub const PAGE_SIZE: usize = 20;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 站点根地址，分页接口挂在其下
    pub base_url: String,
    /// 每页回答数量
    pub page_size: usize,
    /// 同时请求的"更多"分页数量
    pub max_concurrent_pages: usize,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// 原始 Cookie 请求头（登录态由外部获取）
    pub cookie: String,
    /// 预先取得的 _xsrf 令牌，为空时从问题页面读取
    pub xsrf: String,
    // --- 命令行程序使用 ---
    pub question_url: String,
    pub top_n: usize,
    pub output_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.zhihu.com".to_string(),
            page_size: PAGE_SIZE,
            max_concurrent_pages: 4,
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string(),
            cookie: String::new(),
            xsrf: String::new(),
            question_url: String::new(),
            top_n: PAGE_SIZE,
            output_file: "answers.json".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("ZHIHU_BASE_URL").unwrap_or(default.base_url),
            page_size: std::env::var("ZHIHU_PAGE_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.page_size),
            max_concurrent_pages: std::env::var("MAX_CONCURRENT_PAGES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_pages),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            user_agent: std::env::var("ZHIHU_USER_AGENT").unwrap_or(default.user_agent),
            cookie: std::env::var("ZHIHU_COOKIE").unwrap_or(default.cookie),
            xsrf: std::env::var("ZHIHU_XSRF").unwrap_or(default.xsrf),
            question_url: std::env::var("ZHIHU_QUESTION_URL").unwrap_or(default.question_url),
            top_n: std::env::var("TOP_N").ok().and_then(|v| v.parse().ok()).unwrap_or(default.top_n),
            output_file: std::env::var("OUTPUT_FILE").unwrap_or(default.output_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 从 TOML 文件加载配置，缺省的键使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> ZhihuResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ZhihuError::ConfigReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ZhihuError::ConfigParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 分页相关的设置
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            page_size: self.page_size.max(1),
            max_concurrent_pages: self.max_concurrent_pages.max(1),
        }
    }
}

/// 每个问题携带的分页参数
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchSettings {
    pub page_size: usize,
    pub max_concurrent_pages: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Config::default().fetch_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_missing_keys_fall_back_to_defaults() {
        let config: Config = toml::from_str("top_n = 55\ncookie = \"z_c0=abc\"").unwrap();
        assert_eq!(config.top_n, 55);
        assert_eq!(config.cookie, "z_c0=abc");
        assert_eq!(config.page_size, PAGE_SIZE);
        assert_eq!(config.base_url, "https://www.zhihu.com");
    }

    #[test]
    fn fetch_settings_never_zero() {
        let config = Config {
            page_size: 0,
            max_concurrent_pages: 0,
            ..Config::default()
        };
        let settings = config.fetch_settings();
        assert_eq!(settings.page_size, 1);
        assert_eq!(settings.max_concurrent_pages, 1);
    }

    #[test]
    fn missing_config_file_is_read_error() {
        let err = Config::from_toml_file("/nonexistent/zhihu.toml").unwrap_err();
        assert!(matches!(err, ZhihuError::ConfigReadFailed { .. }));
    }
}
