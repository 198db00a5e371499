use crate::models::user::Author;
use serde::Serialize;
use std::fmt;

/// 一个回答
///
/// 由抽取器一次性构造，之后只读
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    link: String,
    /// 所属问题的链接，仅作上下文使用
    question_link: String,
    author: Author,
    upvote: u64,
    /// 可独立渲染的 HTML
    content: String,
}

impl Answer {
    pub(crate) fn new(
        link: String,
        question_link: String,
        author: Author,
        upvote: u64,
        content: String,
    ) -> Self {
        Self {
            link,
            question_link,
            author,
            upvote,
            content,
        }
    }

    /// 回答链接，页面缺失时为空串
    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn question_link(&self) -> &str {
        &self.question_link
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    /// 赞同数
    pub fn upvote(&self) -> u64 {
        self.upvote
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Answer: {} - {} 赞同>", self.link, self.upvote)
    }
}
