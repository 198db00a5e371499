use serde::Serialize;
use std::fmt;

/// 具名用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// 个人主页链接，可能为空
    pub link: String,
    /// 显示名
    pub id: String,
}

impl User {
    pub fn new(link: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            id: id.into(),
        }
    }
}

/// 回答作者：匿名或具名用户，二者必居其一
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Author {
    Anonymous,
    Identified(User),
}

impl Author {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Author::Anonymous)
    }

    /// 具名用户；匿名时为 `None`
    pub fn user(&self) -> Option<&User> {
        match self {
            Author::Anonymous => None,
            Author::Identified(user) => Some(user),
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::Anonymous => write!(f, "<User: 匿名用户>"),
            Author::Identified(user) => write!(f, "<User: {} - {}>", user.id, user.link),
        }
    }
}
