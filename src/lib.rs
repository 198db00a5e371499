//! # Zhihu Answers
//!
//! 抓取知乎问题下的回答：合并问题页面内嵌的第一页回答与"更多"分页接口返回的回答
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只暴露能力，不认识业务对象
//! - `Document` - 已解析、只读的问题页面
//! - `DocumentSource` - 取页面 / 取"更多"分页 / 取 _xsrf 令牌
//!
//! ### ② 客户端（Clients）
//! - `ZhihuClient` - `DocumentSource` 的 reqwest 实现
//!
//! ### ③ 业务能力层（Services）
//! - `AnswerExtractor` - 单个回答片段 → `Answer`（纯内存转换）
//! - `content_builder` - 页面快照 + 回答内容重建
//!
//! ### ④ 编排层（Orchestration）
//! - `AnswerPager` - top-N 请求，计算分页、并发请求、容忍单页失败
//!
//! ## 模块结构

/// 定义一个惰性解析的静态 CSS 选择器
macro_rules! static_selector {
    ($name:ident, $css:expr) => {
        static $name: ::std::sync::LazyLock<::scraper::Selector> =
            ::std::sync::LazyLock::new(|| {
                ::scraper::Selector::parse($css).expect("静态选择器无效")
            });
    };
}

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::ZhihuClient;
pub use config::{Config, FetchSettings, PAGE_SIZE};
pub use error::{ZhihuError, ZhihuResult};
pub use infrastructure::{Document, DocumentSource};
pub use models::{Answer, Author, Question, User};
pub use orchestrator::{AnswerPager, PageFailure, TopAnswers};
pub use services::{AnswerExtractor, PageContext};
