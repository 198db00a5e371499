//! 文档来源 - 基础设施层
//!
//! 只暴露"取页面"和"取更多回答"的能力，不认识 Question / Answer

use crate::error::ZhihuResult;
use async_trait::async_trait;

/// 文档来源
///
/// 职责：
/// - 获取问题页面的原始 HTML
/// - 带 _xsrf 令牌调用"更多回答"分页接口
/// - 不解析回答、不处理分页流程
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// 获取页面原始 HTML
    async fn fetch_page(&self, link: &str) -> ZhihuResult<String>;

    /// 获取第 `page` 页（从 1 开始）的回答 HTML 片段
    ///
    /// 请求体携带 `offset = page * page_size`
    async fn fetch_answer_batch(
        &self,
        link: &str,
        page: usize,
        page_size: usize,
        xsrf: &str,
    ) -> ZhihuResult<Vec<String>>;

    /// 获取分页接口需要的 _xsrf 令牌
    async fn auth_token(&self, link: &str) -> ZhihuResult<String>;
}
