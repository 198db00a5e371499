//! 知乎问题
//!
//! 页面在第一次需要时获取并解析，此后只读；各个标量字段各自缓存，
//! 同一个实例上第二次读取不会再查询页面。需要最新数据时请重新构造实例。

use crate::config::FetchSettings;
use crate::error::{ZhihuError, ZhihuResult};
use crate::infrastructure::{Document, DocumentSource};
use crate::models::Answer;
use crate::orchestrator::AnswerPager;
use crate::utils::text::{parse_int, question_token, strip};
use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;
use url::Url;

static_selector!(TITLE, "h2.zm-item-title");
static_selector!(DETAIL, "div#zh-question-detail");
static_selector!(ANSWERS_NUM, "h3#zh-question-answer-num");
static_selector!(FOLLOWERS_NUM, "div.zg-gray-normal>a>strong");
static_selector!(TOPICS, "a.zm-item-tag");
static_selector!(VISIT_TIMES, r#"meta[itemprop="visitsCount"]"#);

/// 页面标量字段缓存，每个字段独立记录是否已计算
#[derive(Default)]
struct QuestionFields {
    detail: OnceCell<String>,
    answers_num: OnceCell<u32>,
    followers_num: OnceCell<u32>,
    topics: OnceCell<Vec<String>>,
    visit_times: OnceCell<u32>,
}

/// 一个知乎问题，可以获取标题、描述、回答等信息
pub struct Question {
    link: String,
    url: Url,
    url_token: u64,
    title: OnceCell<String>,
    source: Arc<dyn DocumentSource>,
    settings: FetchSettings,
    doc: tokio::sync::OnceCell<Document>,
    fields: QuestionFields,
}

impl Question {
    /// 通过问题链接创建，链接格式不正确时立即失败
    ///
    /// # 参数
    /// - `link`: 形如 `https://www.zhihu.com/question/23759686` 的链接
    /// - `title`: 已知的标题；为 `None` 时第一次读取时从页面获取
    /// - `source`: 页面与分页接口的来源
    pub fn new(
        link: impl Into<String>,
        title: Option<String>,
        source: Arc<dyn DocumentSource>,
    ) -> ZhihuResult<Self> {
        let link = link.into();
        let url_token =
            question_token(&link).ok_or_else(|| ZhihuError::InvalidQuestionUrl(link.clone()))?;
        let url = Url::parse(&link).map_err(|_| ZhihuError::InvalidQuestionUrl(link.clone()))?;

        let title_cell = OnceCell::new();
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            let _ = title_cell.set(title);
        }

        Ok(Self {
            link,
            url,
            url_token,
            title: title_cell,
            source,
            settings: FetchSettings::default(),
            doc: tokio::sync::OnceCell::new(),
            fields: QuestionFields::default(),
        })
    }

    /// 使用指定的分页参数
    pub fn with_settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 使用已经获取到的页面 HTML，不再请求问题页面
    pub fn with_document(mut self, page_html: &str) -> Self {
        self.doc = tokio::sync::OnceCell::from(Document::parse(self.url.clone(), page_html));
        self
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    /// 问题的数字 id
    pub fn url_token(&self) -> u64 {
        self.url_token
    }

    pub fn settings(&self) -> FetchSettings {
        self.settings
    }

    pub(crate) fn source(&self) -> &Arc<dyn DocumentSource> {
        &self.source
    }

    /// 问题页面，第一次调用时获取并解析
    pub async fn document(&self) -> ZhihuResult<&Document> {
        self.doc
            .get_or_try_init(|| async {
                let html = self.source.fetch_page(&self.link).await?;
                Ok::<_, ZhihuError>(Document::parse(self.url.clone(), &html))
            })
            .await
    }

    /// 读取缓存字段，未命中时查询页面并写入缓存
    async fn cached<'a, T>(
        &'a self,
        slot: &'a OnceCell<T>,
        compute: impl FnOnce(&Document) -> T,
    ) -> ZhihuResult<&'a T> {
        if let Some(value) = slot.get() {
            return Ok(value);
        }
        let doc = self.document().await?;
        Ok(slot.get_or_init(|| compute(doc)))
    }

    /// 问题标题
    pub async fn title(&self) -> ZhihuResult<&str> {
        let title = self
            .cached(&self.title, |doc| doc.first_text(&TITLE))
            .await?;
        Ok(title.as_str())
    }

    /// 问题描述
    pub async fn detail(&self) -> ZhihuResult<&str> {
        let detail = self
            .cached(&self.fields.detail, |doc| doc.first_text(&DETAIL))
            .await?;
        Ok(detail.as_str())
    }

    /// 回答数量
    pub async fn answers_num(&self) -> ZhihuResult<u32> {
        self.cached(&self.fields.answers_num, |doc| {
            parse_int(doc.first_attr(&ANSWERS_NUM, "data-num"))
        })
        .await
        .copied()
    }

    /// 关注者数量
    pub async fn followers_num(&self) -> ZhihuResult<u32> {
        self.cached(&self.fields.followers_num, |doc| {
            parse_int(Some(&doc.first_text(&FOLLOWERS_NUM)))
        })
        .await
        .copied()
    }

    /// 话题列表
    pub async fn topics(&self) -> ZhihuResult<&[String]> {
        let topics = self
            .cached(&self.fields.topics, |doc| {
                doc.all_texts(&TOPICS).iter().map(|t| strip(t)).collect()
            })
            .await?;
        Ok(topics.as_slice())
    }

    /// 被浏览次数
    pub async fn visit_times(&self) -> ZhihuResult<u32> {
        self.cached(&self.fields.visit_times, |doc| {
            parse_int(doc.first_attr(&VISIT_TIMES, "content"))
        })
        .await
        .copied()
    }

    /// 排名前 `x` 的回答，数量为 `min(x, 回答总数)`
    pub async fn top_x_answers(&self, x: usize) -> ZhihuResult<Vec<Answer>> {
        AnswerPager::new(self.settings).top_x(self, x).await
    }

    /// 全部回答
    pub async fn all_answers(&self) -> ZhihuResult<Vec<Answer>> {
        let total = self.answers_num().await?;
        self.top_x_answers(total as usize).await
    }

    /// 排名第一的回答，没有回答时为 `None`
    pub async fn top_answer(&self) -> ZhihuResult<Option<Answer>> {
        Ok(self.top_x_answers(1).await?.into_iter().next())
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.title.get().map(String::as_str).unwrap_or_default();
        write!(f, "<Question: {} - {}>", title, self.link)
    }
}
