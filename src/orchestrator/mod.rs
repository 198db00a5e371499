//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::AnswerPager (处理 top-N 请求，驱动分页)
//!     ↓
//! services (能力层：回答抽取 / 内容重建)
//!     ↓
//! infrastructure (基础设施：Document / DocumentSource)
//! ```
//!
//! 编排层只做调度、按页归位和失败统计，不做具体的页面解析。

pub mod answer_pager;

pub use answer_pager::{remote_page_count, AnswerPager, PageFailure, TopAnswers};
