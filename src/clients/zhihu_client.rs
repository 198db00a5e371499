/// 知乎 HTTP 客户端
///
/// 基于 reqwest 实现 `DocumentSource`：获取问题页面、调用"更多回答"分页接口
use crate::config::Config;
use crate::error::{ZhihuError, ZhihuResult};
use crate::infrastructure::DocumentSource;
use crate::utils::text::question_token;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, REFERER, USER_AGENT};
use scraper::Html;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// "更多回答"分页接口路径
pub const ANSWER_LIST_PATH: &str = "/node/QuestionAnswerListV2";

static_selector!(XSRF_INPUT, r#"input[name="_xsrf"]"#);

/// 分页接口响应：`{"r":0,"msg":["<div ...>", ...]}`
#[derive(Debug, Deserialize)]
struct AnswerListResponse {
    #[serde(default)]
    r: i64,
    #[serde(default)]
    msg: Value,
}

/// 知乎客户端
pub struct ZhihuClient {
    http: reqwest::Client,
    base_url: String,
    xsrf: String,
    /// 从页面读取到的令牌，同一会话内复用
    scraped_xsrf: OnceCell<String>,
}

impl ZhihuClient {
    /// 创建新的知乎客户端
    pub fn new(config: &Config) -> ZhihuResult<Self> {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&config.user_agent) {
            Ok(value) => {
                headers.insert(USER_AGENT, value);
            }
            Err(_) => warn!("⚠️ User-Agent 含非法字符，已忽略"),
        }
        if !config.cookie.is_empty() {
            match HeaderValue::from_str(&config.cookie) {
                Ok(value) => {
                    headers.insert(COOKIE, value);
                }
                Err(_) => warn!("⚠️ Cookie 含非法字符，已忽略"),
            }
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ZhihuError::ClientBuildFailed)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            xsrf: config.xsrf.clone(),
            scraped_xsrf: OnceCell::new(),
        })
    }

    fn answer_list_endpoint(&self) -> String {
        format!("{}{}", self.base_url, ANSWER_LIST_PATH)
    }
}

#[async_trait]
impl DocumentSource for ZhihuClient {
    async fn fetch_page(&self, link: &str) -> ZhihuResult<String> {
        debug!("获取页面: {}", link);

        let response = self
            .http
            .get(link)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ZhihuError::request_failed(link, e))?;

        response
            .text()
            .await
            .map_err(|e| ZhihuError::request_failed(link, e))
    }

    async fn fetch_answer_batch(
        &self,
        link: &str,
        page: usize,
        page_size: usize,
        xsrf: &str,
    ) -> ZhihuResult<Vec<String>> {
        let url_token =
            question_token(link).ok_or_else(|| ZhihuError::InvalidQuestionUrl(link.to_string()))?;
        let offset = page * page_size;
        let params = json!({
            "url_token": url_token,
            "pagesize": page_size,
            "offset": offset,
        })
        .to_string();

        let endpoint = self.answer_list_endpoint();
        debug!("请求第 {} 页回答: {} (offset={})", page, endpoint, offset);

        let response = self
            .http
            .post(&endpoint)
            .header(REFERER, link)
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&[("_xsrf", xsrf), ("method", "next"), ("params", params.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ZhihuError::request_failed(endpoint.as_str(), e))?;

        let body = response
            .text()
            .await
            .map_err(|e| ZhihuError::request_failed(endpoint.as_str(), e))?;

        parse_answer_list(&endpoint, &body)
    }

    async fn auth_token(&self, link: &str) -> ZhihuResult<String> {
        if !self.xsrf.is_empty() {
            return Ok(self.xsrf.clone());
        }
        let token = self
            .scraped_xsrf
            .get_or_try_init(|| async {
                let html = self.fetch_page(link).await?;
                extract_xsrf(&html).ok_or_else(|| ZhihuError::MissingXsrf(link.to_string()))
            })
            .await?;
        Ok(token.clone())
    }
}

/// 解析分页接口响应，取出回答 HTML 片段
pub fn parse_answer_list(endpoint: &str, body: &str) -> ZhihuResult<Vec<String>> {
    let response: AnswerListResponse = serde_json::from_str(body)?;

    if response.r != 0 {
        return Err(ZhihuError::BadResponse {
            endpoint: endpoint.to_string(),
            code: response.r,
            message: response.msg.as_str().map(String::from),
        });
    }

    match response.msg {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(html) => Some(html),
                _ => None,
            })
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(ZhihuError::BadResponse {
            endpoint: endpoint.to_string(),
            code: response.r,
            message: Some(other.to_string()),
        }),
    }
}

/// 从页面表单中读取 _xsrf 令牌
fn extract_xsrf(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    doc.select(&XSRF_INPUT)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}
