//! 回答分页抓取器 - 编排层
//!
//! ## 职责
//!
//! 给定请求的回答数量，组合"问题页面内嵌的第一页"和若干次"更多"接口调用，
//! 返回恰好 `min(x, 回答总数)` 个回答。
//!
//! ## 核心流程
//!
//! 1. **回答总数快照**：每次调用只读取一次回答总数，整次调用内的分页边界都以它为准
//! 2. **第一页**：抽取页面内嵌的回答，足够时直接截断返回，不发任何分页请求
//! 3. **并发分页**：用 Semaphore 限制同时进行的"更多"请求数量；调用被丢弃时未完成的请求随 JoinSet 一起取消
//! 4. **按页重组**：结果按页码归位，与完成先后无关
//! 5. **部分失败**：某一页失败只记录日志，该页贡献 0 个回答，不影响其他页
//!
//! 分页器本身无状态，重复调用会重新请求所有"更多"分页。

use crate::config::FetchSettings;
use crate::error::{ZhihuError, ZhihuResult};
use crate::models::{Answer, Question};
use crate::services::{AnswerExtractor, PageContext};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// 单页失败记录
#[derive(Debug)]
pub struct PageFailure {
    /// 页码，从 1 开始
    pub page: usize,
    pub error: ZhihuError,
}

/// 一次抓取的结果
#[derive(Debug, Default)]
pub struct TopAnswers {
    pub answers: Vec<Answer>,
    /// 失败的"更多"分页，按页码排序
    pub failures: Vec<PageFailure>,
}

/// "更多"分页的原始结果
#[derive(Debug, Default)]
struct MoreBatches {
    /// (页码, 回答 HTML 片段)，按页码排序
    batches: Vec<(usize, Vec<String>)>,
    failures: Vec<PageFailure>,
}

/// 除第一页外还需要请求的分页数量
pub fn remote_page_count(x: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    x.saturating_sub(page_size).div_ceil(page_size)
}

/// 回答分页抓取器
pub struct AnswerPager {
    settings: FetchSettings,
}

impl AnswerPager {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    /// 排名前 `x` 的回答
    pub async fn top_x(&self, question: &Question, x: usize) -> ZhihuResult<Vec<Answer>> {
        Ok(self.top_x_with_report(question, x).await?.answers)
    }

    /// 排名前 `x` 的回答，同时返回失败的分页
    ///
    /// 问题页面本身获取失败时返回错误；单个"更多"分页失败不会返回错误
    pub async fn top_x_with_report(&self, question: &Question, x: usize) -> ZhihuResult<TopAnswers> {
        let total = question.answers_num().await? as usize;
        let x = x.min(total);
        if x == 0 {
            info!("[问题 {}] 无需获取回答 (回答总数: {})", question.link(), total);
            return Ok(TopAnswers::default());
        }

        // 1. 页面内嵌的回答
        let doc = question.document().await?;
        let ctx = PageContext::snapshot(doc);
        let extractor = AnswerExtractor::new(&ctx, question.link());
        let mut answers = extractor.extract_page(doc);
        debug!("[问题 {}] 页面内嵌 {} 个回答", question.link(), answers.len());

        if x <= answers.len() {
            answers.truncate(x);
            return Ok(TopAnswers {
                answers,
                failures: Vec::new(),
            });
        }

        // 2. "更多"，调用分页接口
        let pages = remote_page_count(x, self.settings.page_size);
        if pages == 0 {
            return Ok(TopAnswers {
                answers,
                failures: Vec::new(),
            });
        }

        info!(
            "[问题 {}] 需要再请求 {} 页回答 (目标 {} / 共 {})",
            question.link(),
            pages,
            x,
            total
        );
        let more = self.fetch_more(question, total, pages).await;

        for failure in &more.failures {
            error!(
                "[问题 {}] 加载第 {} 页回答失败: {}",
                question.link(),
                failure.page,
                failure.error
            );
        }

        for (_, batch) in &more.batches {
            answers.extend(batch.iter().map(|raw| extractor.extract_raw(raw)));
        }
        answers.truncate(x);

        // 失败的分页已经逐页记录过
        if answers.len() < x && more.failures.is_empty() {
            warn!(
                "[问题 {}] ⚠️ 仅获取到 {}/{} 个回答",
                question.link(),
                answers.len(),
                x
            );
        }

        Ok(TopAnswers {
            answers,
            failures: more.failures,
        })
    }

    /// 并发请求第 1..=pages 页
    async fn fetch_more(&self, question: &Question, total: usize, pages: usize) -> MoreBatches {
        let mut more = MoreBatches::default();
        let source = question.source().clone();
        let link = question.link().to_string();
        let page_size = self.settings.page_size.max(1);

        let xsrf = match source.auth_token(&link).await {
            Ok(token) => token,
            Err(e) => {
                let reason = e.to_string();
                more.failures = (1..=pages)
                    .map(|page| PageFailure {
                        page,
                        error: ZhihuError::MissingXsrf(reason.clone()),
                    })
                    .collect();
                return more;
            }
        };

        let semaphore = Arc::new(Semaphore::new(self.settings.max_concurrent_pages.max(1)));
        let mut tasks = JoinSet::new();
        let mut pending = BTreeSet::new();

        for page in 1..=pages {
            let offset = page * page_size;
            if offset > total {
                more.failures.push(PageFailure {
                    page,
                    error: ZhihuError::NoMoreAnswers { offset, total },
                });
                continue;
            }

            let semaphore = semaphore.clone();
            let source = source.clone();
            let link = link.clone();
            let xsrf = xsrf.clone();

            pending.insert(page);
            tasks.spawn(async move {
                let result: ZhihuResult<Vec<String>> = async {
                    let _permit = semaphore.acquire_owned().await?;
                    source.fetch_answer_batch(&link, page, page_size, &xsrf).await
                }
                .await;
                (page, result)
            });
        }

        let mut join_failure = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((page, Ok(batch))) => {
                    debug!("[问题 {}] 第 {} 页返回 {} 个回答", link, page, batch.len());
                    pending.remove(&page);
                    more.batches.push((page, batch));
                }
                Ok((page, Err(error))) => {
                    pending.remove(&page);
                    more.failures.push(PageFailure { page, error });
                }
                Err(join_error) => join_failure = Some(join_error.to_string()),
            }
        }

        // 异常退出的任务拿不到页码，剩下未归位的页就是它们
        let reason = join_failure.unwrap_or_default();
        more.failures.extend(pending.into_iter().map(|page| PageFailure {
            page,
            error: ZhihuError::TaskFailed(reason.clone()),
        }));

        more.batches.sort_by_key(|(page, _)| *page);
        more.failures.sort_by_key(|failure| failure.page);
        more
    }
}
