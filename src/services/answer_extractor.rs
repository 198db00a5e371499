//! 回答抽取服务 - 业务能力层
//!
//! 把一个回答片段（问题页面内嵌的，或"更多"接口返回的）转换为 `Answer`。
//! 纯内存转换，不做任何网络请求。

use crate::infrastructure::document::element_text;
use crate::infrastructure::Document;
use crate::models::{Answer, Author, User};
use crate::services::content_builder::{rebuild_content, PageContext};
use crate::utils::text::{make_zhihu_link, parse_vote_count};
use scraper::{ElementRef, Html};
use tracing::debug;

static_selector!(ANSWER_ITEM, "div.zm-item-answer");
static_selector!(ANSWER_DATE_LINK, "a.answer-date-link");
static_selector!(AUTHOR_LINK, "div.zm-item-answer-author-info a.author-link");
static_selector!(OWNER_VOTE_COUNT, "a.zm-item-vote-count");
static_selector!(VOTEBAR_COUNT, "div.zm-votebar span.count");

/// 自己的回答上 `data-isowner` 的取值
const OWNER_MARKER: &str = "1";

/// 回答抽取器
///
/// 职责：
/// - 解析回答链接、作者、赞同数
/// - 基于页面快照重建回答内容
/// - 不关心片段来自哪一页
pub struct AnswerExtractor<'a> {
    ctx: &'a PageContext,
    question_link: &'a str,
}

impl<'a> AnswerExtractor<'a> {
    pub fn new(ctx: &'a PageContext, question_link: &'a str) -> Self {
        Self { ctx, question_link }
    }

    /// 问题页面上内嵌的所有回答，按文档顺序
    pub fn extract_page(&self, doc: &Document) -> Vec<Answer> {
        doc.html()
            .select(&ANSWER_ITEM)
            .map(|fragment| self.extract(fragment))
            .collect()
    }

    /// "更多"接口返回的单个 HTML 片段
    pub fn extract_raw(&self, raw: &str) -> Answer {
        let fragment = Html::parse_fragment(raw);
        let root = fragment
            .select(&ANSWER_ITEM)
            .next()
            .unwrap_or_else(|| fragment.root_element());
        self.extract(root)
    }

    /// 处理一个回答片段
    pub fn extract(&self, fragment: ElementRef<'_>) -> Answer {
        // 1. 链接，缺失时为空
        let link = fragment
            .select(&ANSWER_DATE_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(make_zhihu_link)
            .unwrap_or_default();

        // 2. 作者
        let author = resolve_author(fragment);

        // 3. 赞同数
        let upvote = resolve_upvote(fragment);

        // 4. 内容
        let content = rebuild_content(fragment, self.ctx);

        debug!("抽取回答: {} | 作者: {} | 赞同: {}", link, author, upvote);

        Answer::new(
            link,
            self.question_link.to_string(),
            author,
            upvote,
            content,
        )
    }
}

fn resolve_author(fragment: ElementRef<'_>) -> Author {
    match fragment.select(&AUTHOR_LINK).next() {
        None => Author::Anonymous,
        Some(link) => {
            let id = element_text(&link);
            let href = link.value().attr("href").unwrap_or_default();
            Author::Identified(User::new(make_zhihu_link(href), id))
        }
    }
}

fn resolve_upvote(fragment: ElementRef<'_>) -> u64 {
    let is_owner = fragment.value().attr("data-isowner") == Some(OWNER_MARKER);
    let selector = if is_owner {
        &OWNER_VOTE_COUNT
    } else {
        &VOTEBAR_COUNT
    };
    let text = fragment
        .select(selector)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default();
    parse_vote_count(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    const QUESTION: &str = "https://www.zhihu.com/question/23759686";

    fn ctx() -> PageContext {
        let doc = Document::parse(Url::parse(QUESTION).unwrap(), "<html></html>");
        PageContext::snapshot(&doc)
    }

    fn fragment(attrs: &str, author: &str) -> String {
        format!(
            r#"<div class="zm-item-answer" {attrs}>
                <div class="zm-votebar"><span class="count">1.2K</span></div>
                <a class="zm-item-vote-count">7</a>
                <div class="zm-item-answer-author-info">{author}</div>
                <a class="answer-date-link" href="/question/23759686/answer/1">编辑于 昨天</a>
                <div class="zm-editable-content">正文<a href="/topic/1">话题</a></div>
            </div>"#
        )
    }

    #[test]
    fn anonymous_when_no_author_link() {
        let ctx = ctx();
        let extractor = AnswerExtractor::new(&ctx, QUESTION);
        let first = extractor.extract_raw(&fragment("", "匿名用户"));
        let second = extractor.extract_raw(&fragment("", "<span>匿名用户</span>"));
        assert_eq!(first.author(), &Author::Anonymous);
        assert_eq!(first.author(), second.author());
        assert!(first.author().user().is_none());
    }

    #[test]
    fn identified_author_uses_trimmed_text_and_href() {
        let ctx = ctx();
        let extractor = AnswerExtractor::new(&ctx, QUESTION);
        let answer = extractor.extract_raw(&fragment(
            "",
            r#"<a class="author-link" href="/people/rustacean">  锈儿 </a>"#,
        ));
        let user = answer.author().user().unwrap();
        assert_eq!(user.id, "锈儿");
        assert_eq!(user.link, "https://www.zhihu.com/people/rustacean");
    }

    #[test]
    fn empty_author_href_gives_empty_link() {
        let ctx = ctx();
        let extractor = AnswerExtractor::new(&ctx, QUESTION);
        let answer = extractor.extract_raw(&fragment("", r#"<a class="author-link">某人</a>"#));
        assert_eq!(answer.author(), &Author::Identified(User::new("", "某人")));
    }

    #[test]
    fn vote_count_depends_on_owner_marker() {
        let ctx = ctx();
        let extractor = AnswerExtractor::new(&ctx, QUESTION);
        let owner = extractor.extract_raw(&fragment(r#"data-isowner="1""#, ""));
        let other = extractor.extract_raw(&fragment(r#"data-isowner="0""#, ""));
        let unset = extractor.extract_raw(&fragment("", ""));
        assert_eq!(owner.upvote(), 7);
        assert_eq!(other.upvote(), 1200);
        assert_eq!(unset.upvote(), 1200);
    }

    #[test]
    fn unparsable_vote_count_is_zero() {
        let ctx = ctx();
        let extractor = AnswerExtractor::new(&ctx, QUESTION);
        let answer = extractor.extract_raw(
            r#"<div class="zm-item-answer" data-isowner="1"><a class="zm-item-vote-count">赞同</a></div>"#,
        );
        assert_eq!(answer.upvote(), 0);
        let answer = extractor.extract_raw(r#"<div class="zm-item-answer"></div>"#);
        assert_eq!(answer.upvote(), 0);
    }

    #[test]
    fn missing_permalink_is_empty_link() {
        let ctx = ctx();
        let extractor = AnswerExtractor::new(&ctx, QUESTION);
        let answer = extractor.extract_raw(r#"<div class="zm-item-answer">无链接</div>"#);
        assert_eq!(answer.link(), "");
        assert_eq!(answer.question_link(), QUESTION);

        let answer = extractor.extract_raw(&fragment("", ""));
        assert_eq!(answer.link(), "https://www.zhihu.com/question/23759686/answer/1");
        assert!(answer.content().contains(r#"href="https://www.zhihu.com/topic/1""#));
    }

    #[test]
    fn page_answers_in_document_order() {
        let page = format!(
            "<html><body>{}{}</body></html>",
            fragment("", r#"<a class="author-link" href="/people/a">A</a>"#),
            fragment("", r#"<a class="author-link" href="/people/b">B</a>"#),
        );
        let doc = Document::parse(Url::parse(QUESTION).unwrap(), &page);
        let ctx = PageContext::snapshot(&doc);
        let answers = AnswerExtractor::new(&ctx, QUESTION).extract_page(&doc);
        let ids: Vec<&str> = answers
            .iter()
            .filter_map(|a| a.author().user())
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "B"]);
    }
}
